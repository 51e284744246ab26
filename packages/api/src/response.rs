//! # Response classification
//!
//! Every call through [`ApiClient::send`](crate::ApiClient::send) declares the
//! [`ResponseShape`] it expects. The body of a successful response is then turned
//! into an [`ApiResponse`]:
//!
//! | Declared shape | Body | Result |
//! |----------------|------|--------|
//! | [`ImageList`](ResponseShape::ImageList) | `{"images": [...]}` or `[...]` | [`ApiResponse::Images`] with canonical records |
//! | [`ImageList`](ResponseShape::ImageList) | anything else, including non-JSON | [`ApiError::UnexpectedShape`] |
//! | [`Passthrough`](ResponseShape::Passthrough) | object with an `images` array of wire images | [`ApiResponse::Images`] |
//! | [`Passthrough`](ResponseShape::Passthrough) | other JSON | [`ApiResponse::Json`], unmodified |
//! | [`Passthrough`](ResponseShape::Passthrough) | non-JSON text | [`ApiResponse::Text`] |
//! | any | empty | [`ApiResponse::Empty`] (an error for `ImageList`) |
//!
//! Under `Passthrough`, an `images` array whose entries are not wire images is left
//! untouched rather than half-mapped.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{Image, WireImage};

/// What a caller expects a successful response body to look like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// Hand the body back as-is.
    #[default]
    Passthrough,
    /// A listing of images, wrapped in `{"images": ...}` or bare.
    ImageList,
}

/// A classified successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Images(Vec<Image>),
    Json(Value),
    Text(String),
    Empty,
}

impl ApiResponse {
    /// Canonical image list, or an error if the response was anything else.
    pub fn into_images(self) -> Result<Vec<Image>, ApiError> {
        match self {
            ApiResponse::Images(images) => Ok(images),
            other => Err(ApiError::UnexpectedShape(format!(
                "expected an image list, got {}",
                other.kind()
            ))),
        }
    }

    /// Decode a JSON body into `T`.
    ///
    /// A body that does not deserialise as `T` is an
    /// [`UnexpectedShape`](ApiError::UnexpectedShape), not a transport problem.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::UnexpectedShape(e.to_string())),
            other => Err(ApiError::UnexpectedShape(format!(
                "expected a JSON body, got {}",
                other.kind()
            ))),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiResponse::Images(_) => "an image list",
            ApiResponse::Json(_) => "JSON",
            ApiResponse::Text(_) => "plain text",
            ApiResponse::Empty => "an empty body",
        }
    }
}

/// Turn a successful response body into an [`ApiResponse`] according to `shape`.
pub fn classify(shape: ResponseShape, body: &[u8]) -> Result<ApiResponse, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return match shape {
            ResponseShape::Passthrough => Ok(ApiResponse::Empty),
            ResponseShape::ImageList => Err(ApiError::UnexpectedShape(
                "expected an image list, got an empty body".to_string(),
            )),
        };
    }

    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            return match shape {
                ResponseShape::Passthrough => Ok(ApiResponse::Text(
                    String::from_utf8_lossy(body).into_owned(),
                )),
                ResponseShape::ImageList => Err(ApiError::UnexpectedShape(format!(
                    "expected an image list, got a non-JSON body: {e}"
                ))),
            }
        }
    };

    match shape {
        ResponseShape::ImageList => image_list(value).map(ApiResponse::Images),
        ResponseShape::Passthrough => Ok(passthrough(value)),
    }
}

fn image_list(value: Value) -> Result<Vec<Image>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("images") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ApiError::UnexpectedShape(
                    "`images` is not an array".to_string(),
                ))
            }
            None => {
                return Err(ApiError::UnexpectedShape(
                    "response has no `images` field".to_string(),
                ))
            }
        },
        other => {
            return Err(ApiError::UnexpectedShape(format!(
                "expected an object or array, got {}",
                json_kind(&other)
            )))
        }
    };

    map_wire_images(items).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
}

fn passthrough(value: Value) -> ApiResponse {
    let Some(Value::Array(items)) = value.get("images") else {
        return ApiResponse::Json(value);
    };

    match map_wire_images(items.clone()) {
        Ok(images) => ApiResponse::Images(images),
        Err(e) => {
            tracing::debug!("`images` field is not a list of wire images: {}", e);
            ApiResponse::Json(value)
        }
    }
}

fn map_wire_images(items: Vec<Value>) -> Result<Vec<Image>, serde_json::Error> {
    items
        .into_iter()
        .map(|item| serde_json::from_value::<WireImage>(item).map(Image::from))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
