//! Error type shared by every call that goes through [`ApiClient`](crate::ApiClient).

use reqwest::StatusCode;
use serde_json::Value;

/// Everything that can go wrong talking to the gallery backend.
///
/// [`Transport`](ApiError::Transport) and [`Status`](ApiError::Status) are passed
/// through exactly as they happened; the client never retries or reinterprets
/// them. [`UnexpectedShape`](ApiError::UnexpectedShape) is raised when a
/// successful response does not match the shape its endpoint declares.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Backend error payload, verbatim when it was JSON.
        body: Option<Value>,
    },

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a [`Status`](ApiError::Status) error from a non-2xx response.
    ///
    /// The message is taken from the first of `error`, `message` or `msg` found in
    /// a JSON object body, falling back to the raw text and then to the status
    /// reason phrase.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let json = serde_json::from_slice::<Value>(body).ok();

        let message = json
            .as_ref()
            .and_then(|v| {
                ["error", "message", "msg"]
                    .iter()
                    .find_map(|key| v.get(key).and_then(Value::as_str))
            })
            .map(str::to_string)
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty() && json.is_none()).then_some(text)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string()
            });

        ApiError::Status {
            status: status.as_u16(),
            message,
            body: json,
        }
    }

    /// HTTP status of a [`Status`](ApiError::Status) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the credential (or its absence).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
