//! Data models for the gallery backend.

mod image;
mod user;

pub use image::{Image, UploadForm, WireId, WireImage};
pub use user::UserInfo;
