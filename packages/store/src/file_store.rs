//! # Filesystem-backed token store
//!
//! [`FileStore`] is a [`TokenStore`] implementation that persists the bearer token
//! to the local filesystem, so a command-line session survives between
//! invocations.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── token          # the bearer token, nothing else
//! ```
//!
//! ## Platform data directories
//!
//! [`FileStore::default_dir`] uses [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/image-gallery/` |
//! | Linux | `~/.local/share/image-gallery/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\image-gallery\` |
//!
//! I/O errors never surface to the caller: a failed read is "no token", a failed
//! write is logged. The backend rejecting the next request is the signal the
//! user acts on.

use std::path::{Path, PathBuf};

use crate::credential::{normalize, TokenStore, TOKEN_KEY};

const APP_DIR: &str = "image-gallery";

/// Filesystem-backed TokenStore for desktop persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Platform data directory for the gallery client, if one exists.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn token_path(&self) -> PathBuf {
        self.base.join(TOKEN_KEY)
    }
}

impl TokenStore for FileStore {
    fn get(&self) -> Option<String> {
        let content = std::fs::read_to_string(self.token_path()).ok()?;
        normalize(&content)
    }

    fn set(&self, token: &str) {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, token.trim()) {
            tracing::warn!("Failed to write token to {}: {}", path.display(), e);
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(self.token_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove stored token: {}", e),
        }
    }
}
