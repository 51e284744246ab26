//! # Image records: wire form and canonical form
//!
//! The backend describes an image with its own column names (`s3_url`,
//! `original_filename`, `uploaded_at`, ...). The rest of the client only ever sees
//! [`Image`], whose fields are named for what they mean in a gallery.
//!
//! | Wire field | Canonical field | Rule |
//! |------------|-----------------|------|
//! | `id` (number or string) | `id` | always a string |
//! | `s3_url` | `url` | copied |
//! | `original_filename` | `title` | `"Untitled"` when absent, null or empty |
//! | `ai_description` | `description` | `""` when absent or null |
//! | `user_id` (number or string) | `userId` | always a string |
//! | `uploaded_at` | `createdAt` | copied |
//!
//! Other wire fields (`filename`, `content_type`, `size`) are accepted and dropped.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

/// Title given to an image uploaded without a filename.
pub const UNTITLED: &str = "Untitled";

/// An identifier the backend may send either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(serde_json::Number),
    Text(String),
}

impl WireId {
    /// `deserialize_with` helper for fields that should land as `String`.
    pub fn deserialize_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        WireId::deserialize(deserializer).map(|id| id.to_string())
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Number(n) => write!(f, "{}", n),
            WireId::Text(s) => f.write_str(s),
        }
    }
}

/// An image exactly as the backend serialises it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireImage {
    pub id: WireId,
    pub s3_url: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub ai_description: Option<String>,
    pub user_id: WireId,
    pub uploaded_at: String,
}

/// An image in the client's canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<WireImage> for Image {
    fn from(wire: WireImage) -> Self {
        Image {
            id: wire.id.to_string(),
            url: wire.s3_url,
            title: wire
                .original_filename
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            description: wire.ai_description.unwrap_or_default(),
            user_id: wire.user_id.to_string(),
            created_at: wire.uploaded_at,
        }
    }
}

/// Multipart payload for `POST /images`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub title: String,
    pub description: String,
    /// Ask the backend to run AI analysis right after storing the image.
    pub analyze: bool,
    /// Custom analysis prompt, only meaningful with `analyze`.
    pub prompt: Option<String>,
}

impl UploadForm {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            data,
            title: String::new(),
            description: String::new(),
            analyze: false,
            prompt: None,
        }
    }

    /// Read an image from disk, naming the upload after the file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, data))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Request analysis on upload, optionally with a custom prompt.
    pub fn with_analysis(mut self, prompt: Option<String>) -> Self {
        self.analyze = true;
        self.prompt = prompt;
        self
    }

    pub(crate) fn into_multipart(self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        use reqwest::multipart::{Form, Part};

        let part = Part::bytes(self.data)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?;

        let mut form = Form::new()
            .part("image", part)
            .text("title", self.title)
            .text("description", self.description);

        if self.analyze {
            form = form.text("analyze", "true");
            if let Some(prompt) = self.prompt {
                form = form.text("prompt", prompt);
            }
        }
        Ok(form)
    }
}

/// MIME type for an image file name; the backend rejects anything not `image/*`.
fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif" | "tiff") => "image/tiff",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
