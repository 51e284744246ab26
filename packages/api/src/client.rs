//! # Authenticated API client
//!
//! [`ApiClient`] is the single chokepoint for backend communication. Each call to
//! [`send`](ApiClient::send):
//!
//! 1. joins the request path onto the configured base URL,
//! 2. reads the token from the [`TokenStore`] *at that moment* and, when one is
//!    present, attaches `Authorization: Bearer <token>`,
//! 3. executes the request,
//! 4. turns a non-2xx status into [`ApiError::Status`] carrying the backend's
//!    payload, or classifies a successful body by the declared [`ResponseShape`].
//!
//! The client holds no per-user state of its own. Logging in or out through any
//! handle on the same store changes what the next request carries.

use reqwest::header::HeaderMap;
use reqwest::{Method, Request, RequestBuilder, Url};
use serde_json::Value;
use store::TokenStore;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::response::{classify, ApiResponse, ResponseShape};

/// Request payload for [`ApiClient::send`].
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Per-call options for [`ApiClient::send`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub shape: ResponseShape,
    /// Extra headers. An `Authorization` header here is replaced by the stored
    /// credential when one exists.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn expecting(shape: ResponseShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }
}

/// HTTP client bound to one backend and one credential store.
#[derive(Clone, Debug)]
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: Url,
    store: S,
}

impl<S: TokenStore> ApiClient<S> {
    /// Create a client from a config and the store it should read tokens from.
    pub fn new(config: &ClientConfig, store: S) -> Result<Self, ApiError> {
        let base_url = config.parsed_base_url()?;

        #[cfg(not(target_arch = "wasm32"))]
        let http = {
            let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
            if config.timeout_secs > 0 {
                builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
            }
            builder.build()?
        };
        #[cfg(target_arch = "wasm32")]
        let http = reqwest::Client::new();

        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    /// The credential store this client reads from.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `path`, with exactly one `/` between base and path.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn authorize(builder: RequestBuilder, token: Option<String>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Build, but do not send, the request [`send`](Self::send) would issue.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: &RequestOptions,
    ) -> Result<Request, ApiError> {
        let token = self.store.get();
        let mut headers = options.headers.clone();
        if token.is_some() {
            headers.remove(reqwest::header::AUTHORIZATION);
        }

        let builder = self.http.request(method, self.url(path)).headers(headers);
        let builder = Self::authorize(builder, token);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };
        Ok(builder.build()?)
    }

    /// Issue a request and classify its response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_request(method, path, body, &options)?;
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            authenticated = request.headers().contains_key(reqwest::header::AUTHORIZATION),
            "sending request"
        );

        let response = self.http.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &bytes);
            tracing::debug!("request failed: {}", err);
            return Err(err);
        }

        classify(options.shape, &bytes)
    }

    /// `GET path`, expecting `shape`.
    pub async fn get(&self, path: &str, shape: ResponseShape) -> Result<ApiResponse, ApiError> {
        self.send(
            Method::GET,
            path,
            RequestBody::Empty,
            RequestOptions::expecting(shape),
        )
        .await
    }

    /// `POST path` with a JSON body.
    pub async fn post_json(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(
            Method::POST,
            path,
            RequestBody::Json(body),
            RequestOptions::default(),
        )
        .await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(
            Method::DELETE,
            path,
            RequestBody::Empty,
            RequestOptions::default(),
        )
        .await
    }
}
