//! Image attachments for posts.

use std::fmt;

/// Maximum accepted upload size in bytes (5 MiB).
pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Accepted upload extensions, lowercase.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Validation errors for uploaded images and stored image paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("the uploaded file is empty")]
    Empty,
    #[error("images must be at most {max} bytes")]
    TooLarge { max: usize },
    #[error("unsupported image type; use jpg, jpeg, png, gif or webp")]
    UnsupportedExtension,
    #[error("image path must be a relative path inside the media root")]
    InvalidPath,
}

/// Raw file received from a post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Check size and extension, yielding an image ready for storage.
    pub fn validate(self) -> Result<ValidatedImage, ImageValidationError> {
        if self.bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        if self.bytes.len() > IMAGE_MAX_BYTES {
            return Err(ImageValidationError::TooLarge {
                max: IMAGE_MAX_BYTES,
            });
        }
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or(ImageValidationError::UnsupportedExtension)?;
        Ok(ValidatedImage {
            extension,
            bytes: self.bytes,
        })
    }
}

/// Upload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    extension: String,
    bytes: Vec<u8>,
}

impl ValidatedImage {
    /// Lowercase file extension without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Location of a stored image relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(String);

impl ImagePath {
    /// Validate a relative media path such as `posts/<uuid>.png`.
    pub fn new(value: impl Into<String>) -> Result<Self, ImageValidationError> {
        let value = value.into();
        let valid = !value.is_empty()
            && !value.starts_with('/')
            && !value.contains('\\')
            && value
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if valid {
            Ok(Self(value))
        } else {
            Err(ImageValidationError::InvalidPath)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
