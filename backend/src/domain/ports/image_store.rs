//! Port for persisting uploaded post images.
use async_trait::async_trait;

use crate::domain::{ImagePath, ValidatedImage};

use super::define_port_error;

define_port_error! {
    /// Errors raised while writing images.
    pub enum ImageStoreError {
        /// Writing the file failed.
        Io { message: String } => "image store write failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image under a fresh name and return its media path.
    async fn save(&self, image: ValidatedImage) -> Result<ImagePath, ImageStoreError>;
}
