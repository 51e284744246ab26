//! # Gallery view-model
//!
//! [`Gallery`] holds the list of images a front end displays and keeps it in
//! step with the backend:
//!
//! - [`refresh`](Gallery::refresh) replaces the list. A listing in an
//!   unrecognised shape empties the list and is logged instead of failing;
//!   transport and status errors propagate and leave the list as it was.
//! - [`analyze`](Gallery::analyze) and [`delete`](Gallery::delete) call the
//!   backend, then patch the local list without refetching it.

use store::TokenStore;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::images;
use crate::models::Image;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gallery {
    images: Vec<Image>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn find(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|image| image.id == id)
    }

    /// Reload the list from the backend.
    pub async fn refresh<S: TokenStore>(&mut self, client: &ApiClient<S>) -> Result<(), ApiError> {
        match images::list(client).await {
            Ok(images) => {
                tracing::debug!("Loaded {} images", images.len());
                self.images = images;
                Ok(())
            }
            Err(ApiError::UnexpectedShape(detail)) => {
                tracing::error!("Unexpected response format: {}", detail);
                self.images.clear();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Set the description of one image. Returns whether it was found.
    pub fn apply_description(&mut self, id: &str, description: &str) -> bool {
        match self.images.iter_mut().find(|image| image.id == id) {
            Some(image) => {
                image.description = description.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop an image from the list.
    pub fn remove(&mut self, id: &str) -> Option<Image> {
        let index = self.images.iter().position(|image| image.id == id)?;
        Some(self.images.remove(index))
    }

    /// Analyze an image and record its new description.
    pub async fn analyze<S: TokenStore>(
        &mut self,
        client: &ApiClient<S>,
        id: &str,
        prompt: Option<&str>,
    ) -> Result<Image, ApiError> {
        let image = images::analyze(client, id, prompt).await?;
        self.apply_description(id, &image.description);
        Ok(image)
    }

    /// Delete an image on the backend, then locally.
    pub async fn delete<S: TokenStore>(
        &mut self,
        client: &ApiClient<S>,
        id: &str,
    ) -> Result<(), ApiError> {
        images::delete(client, id).await?;
        self.remove(id);
        Ok(())
    }
}

impl From<Vec<Image>> for Gallery {
    fn from(images: Vec<Image>) -> Self {
        Self { images }
    }
}
