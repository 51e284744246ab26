//! # Credential storage for the gallery client
//!
//! The API client never reaches for ambient global state to find its bearer token.
//! Instead it is handed something implementing [`TokenStore`], a capability over a
//! single named slot ([`TOKEN_KEY`]) that can be read, written and cleared.
//!
//! | Store | Platform | Backing |
//! |-------|----------|---------|
//! | [`MemoryStore`] | all | `Arc<Mutex<Option<String>>>`, shared between clones |
//! | [`FileStore`] | native | one file per slot under a data directory |
//! | [`LocalStorageStore`] | `wasm32` + `web` feature | `window.localStorage` |

pub mod credential;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use credential::{TokenStore, TOKEN_KEY};
