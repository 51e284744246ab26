//! Session data types.

use serde::{Deserialize, Serialize};

use crate::models::UserInfo;

/// Credentials submitted to `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    /// Required by registration, never sent on login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthForm {
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    pub fn register(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: Some(email.into()),
        }
    }
}

/// Successful login/registration: the token to store plus the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: UserInfo,
}
