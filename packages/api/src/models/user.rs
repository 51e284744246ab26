//! # User model for authenticated users
//!
//! [`UserInfo`] is what `/auth/me`, `/auth/login` and `/auth/register` return for
//! the signed-in account. The backend's integer primary key is converted to a
//! `String` on the way in, the same way image ids are, so callers never branch on
//! the id's wire type.

use serde::{Deserialize, Serialize};

use super::image::WireId;

/// User information returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    #[serde(deserialize_with = "WireId::deserialize_string")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl UserInfo {
    /// Get display name, falling back to email if username is blank.
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}
