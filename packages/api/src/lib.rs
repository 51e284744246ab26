//! # API crate — authenticated client for the image gallery backend
//!
//! Everything that talks to the backend goes through [`ApiClient`]. It attaches the
//! bearer token from a [`TokenStore`](store::TokenStore) to every request and hands
//! image listings back in the client's canonical naming, whatever the backend
//! calls its columns.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`]: URL joining, bearer injection, status handling |
//! | [`response`] | Declared [`ResponseShape`]s and the classification of response bodies |
//! | [`models`] | Wire and canonical image records, [`UserInfo`], upload forms |
//! | [`auth`] | Register, login, logout, current user |
//! | [`images`] | List, get, upload, analyze, delete |
//! | [`gallery`] | [`Gallery`] view-model keeping a local list in step with the backend |
//! | [`config`] | [`ClientConfig`] from defaults, `gallery.toml` and `GALLERY_*` variables |
//! | [`error`] | [`ApiError`] |
//!
//! ## Example
//!
//! ```no_run
//! use api::{auth, images, ApiClient, ClientConfig};
//! use store::MemoryStore;
//!
//! # async fn run() -> Result<(), api::ApiError> {
//! let client = ApiClient::new(&ClientConfig::from_env()?, MemoryStore::new())?;
//! auth::login(&client, "alice", "pw").await?;
//! for image in images::list(&client).await? {
//!     println!("{} {}", image.id, image.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gallery;
pub mod images;
pub mod models;
pub mod response;

pub use client::{ApiClient, RequestBody, RequestOptions};
pub use config::ClientConfig;
pub use error::ApiError;
pub use gallery::Gallery;
pub use models::{Image, UploadForm, UserInfo, WireImage};
pub use response::{ApiResponse, ResponseShape};

pub use reqwest::Method;
