//! # `localStorage` token store — browser-side persistence
//!
//! [`LocalStorageStore`] keeps the bearer token in `window.localStorage` under
//! [`TOKEN_KEY`], the slot a browser session of the gallery has always used.
//!
//! The store is a zero-size handle that looks up `window.localStorage` on every
//! call. When storage is unavailable (private browsing, sandboxed iframes) reads
//! return `None` and writes are dropped with a warning.

use web_sys::Storage;

use crate::credential::{normalize, TokenStore, TOKEN_KEY};

/// `window.localStorage`-backed TokenStore for the web platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStore for LocalStorageStore {
    fn get(&self) -> Option<String> {
        let raw = Self::storage()?.get_item(TOKEN_KEY).ok().flatten()?;
        normalize(&raw)
    }

    fn set(&self, token: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable, token not persisted");
            return;
        };
        if storage.set_item(TOKEN_KEY, token.trim()).is_err() {
            tracing::warn!("Failed to write token to localStorage");
        }
    }

    fn clear(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if storage.remove_item(TOKEN_KEY).is_err() {
            tracing::warn!("Failed to remove token from localStorage");
        }
    }
}
