//! Communities that posts may be filed under.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a group slug.
pub const GROUP_SLUG_MAX: usize = 50;
/// Maximum length of a group title.
pub const GROUP_TITLE_MAX: usize = 200;

/// Validation errors for group values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    #[error("group slug must not be empty")]
    EmptySlug,
    #[error("group slug must be at most {max} characters")]
    SlugTooLong { max: usize },
    #[error("group slug may only contain lowercase letters, digits, '-' and '_'")]
    SlugInvalidCharacters,
    #[error("group id must be a positive integer")]
    InvalidId,
    #[error("group title must not be empty")]
    EmptyTitle,
    #[error("group title must be at most {max} characters")]
    TitleTooLong { max: usize },
}

/// Storage identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(i64);

impl GroupId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parse the value submitted by the post form's group selector.
    pub fn parse(raw: &str) -> Result<Self, GroupValidationError> {
        match raw.trim().parse::<i64>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(GroupValidationError::InvalidId),
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL slug identifying a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, GroupValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(GroupValidationError::EmptySlug);
        }
        if value.chars().count() > GROUP_SLUG_MAX {
            return Err(GroupValidationError::SlugTooLong {
                max: GROUP_SLUG_MAX,
            });
        }
        let valid = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(GroupValidationError::SlugInvalidCharacters);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A named community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    /// Build a group, validating its title.
    pub fn new(
        id: GroupId,
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Result<Self, GroupValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX {
            return Err(GroupValidationError::TitleTooLong {
                max: GROUP_TITLE_MAX,
            });
        }
        Ok(Self {
            id,
            title,
            slug,
            description: description.into(),
        })
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Reference embedded in posts.
    pub fn to_ref(&self) -> GroupRef {
        GroupRef {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }
}

/// Group reference carried by posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    pub id: GroupId,
    pub slug: GroupSlug,
    pub title: String,
}
