//! # Authentication endpoints
//!
//! | Function | Request | Effect on the store |
//! |----------|---------|---------------------|
//! | [`register`] | `POST /auth/register` `{username, password, email}` | token written |
//! | [`login`] | `POST /auth/login` `{username, password}` | token written |
//! | [`logout`] | none | token cleared |
//! | [`fetch_current_user`] | `GET /auth/me` | none |
//! | [`current_user`] | `GET /auth/me` | none; any failure reads as "nobody" |
//!
//! The token is only written after the backend accepted the credentials; a
//! failed login leaves whatever was stored before untouched.

mod session;

pub use session::{AuthForm, AuthSession};

use store::TokenStore;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::UserInfo;
use crate::response::ResponseShape;

/// Log in and store the returned token.
pub async fn login<S: TokenStore>(
    client: &ApiClient<S>,
    username: &str,
    password: &str,
) -> Result<AuthSession, ApiError> {
    authenticate(client, "/auth/login", &AuthForm::login(username, password)).await
}

/// Create an account and store the returned token.
pub async fn register<S: TokenStore>(
    client: &ApiClient<S>,
    username: &str,
    password: &str,
    email: &str,
) -> Result<AuthSession, ApiError> {
    let form = AuthForm::register(username, password, email);
    authenticate(client, "/auth/register", &form).await
}

async fn authenticate<S: TokenStore>(
    client: &ApiClient<S>,
    path: &str,
    form: &AuthForm,
) -> Result<AuthSession, ApiError> {
    let session: AuthSession = client
        .post_json(path, serde_json::to_value(form)?)
        .await?
        .decode()?;

    client.store().set(&session.access_token);
    tracing::info!("Signed in as {}", session.user.display_name());
    Ok(session)
}

/// Forget the stored token. No request is made.
pub fn logout<S: TokenStore>(client: &ApiClient<S>) {
    client.store().clear();
}

/// The signed-in account, with every failure reported.
pub async fn fetch_current_user<S: TokenStore>(
    client: &ApiClient<S>,
) -> Result<UserInfo, ApiError> {
    client
        .get("/auth/me", ResponseShape::Passthrough)
        .await?
        .decode()
}

/// The signed-in account, or `None` if there isn't one or it can't be fetched.
pub async fn current_user<S: TokenStore>(client: &ApiClient<S>) -> Option<UserInfo> {
    match fetch_current_user(client).await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Error fetching current user: {}", e);
            None
        }
    }
}
