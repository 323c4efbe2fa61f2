//! Filesystem image store rooted at the media directory.
//!
//! Writes go through a `cap_std` directory handle, so stored paths can never
//! escape the media root.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImagePath, ValidatedImage};

/// Sub-directory of the media root that holds post images.
pub const POST_IMAGE_DIR: &str = "posts";

/// [`ImageStore`] adapter writing files below a media root.
#[derive(Clone)]
pub struct MediaImageStore {
    root: Arc<Dir>,
}

impl MediaImageStore {
    /// Open (creating if needed) the media root at `path`.
    ///
    /// # Errors
    /// Propagates I/O failures creating or opening the directory.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(path)?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        root.create_dir_all(POST_IMAGE_DIR)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

#[async_trait]
impl ImageStore for MediaImageStore {
    async fn save(&self, image: ValidatedImage) -> Result<ImagePath, ImageStoreError> {
        let relative = format!("{POST_IMAGE_DIR}/{}.{}", Uuid::new_v4(), image.extension());
        let path = ImagePath::new(relative.clone())
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || root.write(&relative, image.bytes()))
            .await
            .map_err(|err| ImageStoreError::io(format!("image write task failed: {err}")))?
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        debug!(path = %path, "image stored");
        Ok(path)
    }
}
