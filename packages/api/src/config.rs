//! # Client configuration — `gallery.toml` and environment
//!
//! Where the backend lives is deployment configuration, not behaviour. A
//! [`ClientConfig`] starts from production defaults and can be overridden from a
//! TOML file, from the environment, or both (environment wins).
//!
//! ## File format
//!
//! ```toml
//! [api]
//! base_url = "https://backend-image-manager-1.onrender.com/api"
//! timeout_secs = 30
//! ```
//!
//! ## Environment
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GALLERY_API_URL` | `base_url` |
//! | `GALLERY_TIMEOUT_SECS` | `timeout_secs` |
//!
//! A `.env` file in the working directory is loaded first via `dotenvy`.

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Production backend.
pub const DEFAULT_BASE_URL: &str = "https://backend-image-manager-1.onrender.com/api";

/// Settings for [`ApiClient`](crate::ApiClient).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Every request path is appended to this.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("image-gallery/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// On-disk layout: everything lives under `[api]`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ClientConfig,
}

impl ClientConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "gallery.toml"
    }

    /// Builder method to point at another backend.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ApiError> {
        let file: ConfigFile =
            toml::from_str(s).map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(file.api)
    }

    /// Read a config file from disk.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::default().merge_env()
    }

    /// Apply `GALLERY_*` environment overrides on top of `self`.
    pub fn merge_env(mut self) -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        if let Ok(url) = std::env::var("GALLERY_API_URL") {
            self.base_url = url;
        }
        if let Ok(secs) = std::env::var("GALLERY_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                ApiError::Config(format!("GALLERY_TIMEOUT_SECS is not a number: {secs}"))
            })?;
        }
        Ok(self)
    }

    /// Parsed base URL; only `http` and `https` are accepted.
    pub fn parsed_base_url(&self) -> Result<Url, ApiError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ApiError::Config(format!(
                "unsupported scheme {scheme:?} in base URL"
            ))),
        }
    }
}
