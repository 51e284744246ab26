//! # Image endpoints
//!
//! Typed wrappers over [`ApiClient::send`] for everything under `/images`. Every
//! function returns canonical [`Image`] records; wire field names never leave
//! this module and [`crate::response`].

use reqwest::Method;
use serde::{Deserialize, Serialize};
use store::TokenStore;

use crate::client::{ApiClient, RequestBody, RequestOptions};
use crate::error::ApiError;
use crate::models::{Image, UploadForm, WireImage};
use crate::response::ResponseShape;

/// `{"image": {...}}`, returned by upload and analyze.
#[derive(Debug, Deserialize)]
struct ImageEnvelope {
    image: WireImage,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
}

fn image_path(id: &str) -> String {
    format!("/images/{}", id)
}

/// All images belonging to the signed-in user, newest first.
pub async fn list<S: TokenStore>(client: &ApiClient<S>) -> Result<Vec<Image>, ApiError> {
    client
        .get("/images", ResponseShape::ImageList)
        .await?
        .into_images()
}

/// A single image.
pub async fn get<S: TokenStore>(client: &ApiClient<S>, id: &str) -> Result<Image, ApiError> {
    let wire: WireImage = client
        .get(&image_path(id), ResponseShape::Passthrough)
        .await?
        .decode()?;
    Ok(wire.into())
}

/// Upload an image with its title and description.
pub async fn upload<S: TokenStore>(
    client: &ApiClient<S>,
    form: UploadForm,
) -> Result<Image, ApiError> {
    tracing::debug!(
        file = %form.file_name,
        bytes = form.data.len(),
        analyze = form.analyze,
        "uploading image"
    );
    let envelope: ImageEnvelope = client
        .send(
            Method::POST,
            "/images",
            RequestBody::Multipart(form.into_multipart()?),
            RequestOptions::default(),
        )
        .await?
        .decode()?;
    Ok(envelope.image.into())
}

/// Ask the backend for an AI description of an image.
///
/// A blank prompt is treated as no prompt, letting the backend use its default.
/// A response without a description is an
/// [`UnexpectedShape`](ApiError::UnexpectedShape), so callers never replace a
/// known description with an empty one.
pub async fn analyze<S: TokenStore>(
    client: &ApiClient<S>,
    id: &str,
    prompt: Option<&str>,
) -> Result<Image, ApiError> {
    let body = AnalyzeRequest {
        prompt: prompt.map(str::trim).filter(|p| !p.is_empty()),
    };
    let envelope: ImageEnvelope = client
        .post_json(
            &format!("{}/analyze", image_path(id)),
            serde_json::to_value(&body)?,
        )
        .await?
        .decode()?;
    described(envelope.image)
}

fn described(image: WireImage) -> Result<Image, ApiError> {
    let has_description = image
        .ai_description
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty());
    if has_description {
        Ok(image.into())
    } else {
        Err(ApiError::UnexpectedShape(format!(
            "analysis of image {} returned no description",
            image.id
        )))
    }
}

/// Delete an image.
pub async fn delete<S: TokenStore>(client: &ApiClient<S>, id: &str) -> Result<(), ApiError> {
    client.delete(&image_path(id)).await?;
    Ok(())
}
