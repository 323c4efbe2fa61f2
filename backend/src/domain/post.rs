//! Posts and the post form.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{AuthorRef, GroupId, GroupRef, ImagePath, UploadedImage, ValidatedImage};

/// Number of characters of the text used as the detail page title.
pub const POST_TITLE_CHARS: usize = 30;

/// Validation errors for post values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("post text must not be empty")]
    EmptyText,
    #[error("post id must be a positive integer")]
    InvalidId,
}

/// Storage identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(i64);

impl PostId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse a route segment such as `/posts/{id}/`.
    pub fn parse(raw: &str) -> Result<Self, PostValidationError> {
        match raw.parse::<i64>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(PostValidationError::InvalidId),
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post body text; never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostText(String);

impl PostText {
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub text: PostText,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
    pub image: Option<ImagePath>,
}

impl Post {
    /// Short title derived from the first characters of the text.
    pub fn title(&self) -> String {
        self.text.as_str().chars().take(POST_TITLE_CHARS).collect()
    }
}

/// Raw post form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    /// Raw value of the group selector; empty means "no group".
    pub group: String,
    pub image: Option<UploadedImage>,
    /// Drop the stored image when editing.
    pub clear_image: bool,
}

/// Shown when a submission both uploads a file and asks to clear it.
pub const IMAGE_CLEAR_CONFLICT: &str =
    "Please either submit a file or check the clear checkbox, not both.";

/// Form values kept for re-display after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFormState {
    pub text: String,
    pub group: String,
}

impl PostFormState {
    /// Pre-fill the form from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.as_str().to_owned(),
            group: post
                .group
                .as_ref()
                .map(|group| group.id.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Per-field validation messages of the post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFormErrors {
    pub text: Option<String>,
    pub group: Option<String>,
    pub image: Option<String>,
}

impl PostFormErrors {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.group.is_none() && self.image.is_none()
    }
}

/// A rejected submission together with the values to re-display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPostDraft {
    pub form: PostFormState,
    pub errors: PostFormErrors,
}

/// A submission whose fields are individually valid.
///
/// The group still has to be resolved against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPostDraft {
    pub text: PostText,
    pub group: Option<GroupId>,
    pub image: Option<ValidatedImage>,
    pub clear_image: bool,
    pub form: PostFormState,
}

impl PostDraft {
    /// The values to show again if the submission is rejected.
    pub fn form_state(&self) -> PostFormState {
        PostFormState {
            text: self.text.clone(),
            group: self.group.trim().to_owned(),
        }
    }

    /// Validate every field, collecting all messages at once.
    pub fn validate(self) -> Result<ValidPostDraft, InvalidPostDraft> {
        let form = self.form_state();
        let mut errors = PostFormErrors::default();

        let text = PostText::new(self.text)
            .map_err(|err| errors.text = Some(err.to_string()))
            .ok();

        let group = if form.group.is_empty() {
            None
        } else {
            GroupId::parse(&form.group)
                .map_err(|_| errors.group = Some("select a valid group".to_owned()))
                .ok()
        };

        let image = match self.image {
            Some(_) if self.clear_image => {
                errors.image = Some(IMAGE_CLEAR_CONFLICT.to_owned());
                None
            }
            Some(upload) => upload
                .validate()
                .map_err(|err| errors.image = Some(err.to_string()))
                .ok(),
            None => None,
        };

        match text {
            Some(text) if errors.is_empty() => Ok(ValidPostDraft {
                text,
                group,
                image,
                clear_image: self.clear_image,
                form,
            }),
            _ => Err(InvalidPostDraft { form, errors }),
        }
    }
}
