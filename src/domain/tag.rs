// src/domain/tag.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Represents a single tag as a value object
///
/// Tags are free-text labels ("Red", "Greek Letters"). Surrounding whitespace
/// is trimmed but case and inner spaces are kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    value: String,
}

impl Tag {
    /// Creates a new Tag with validation
    pub fn new<S: AsRef<str>>(value: S) -> DomainResult<Self> {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return Err(DomainError::InvalidTag("Tag cannot be empty".to_string()));
        }

        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Builds a tag from a literal known to be trimmed and non-empty
    pub(crate) fn from_literal(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// Get the tag value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parse a comma-separated tag string into an ordered list of unique Tags.
    ///
    /// Input helper for typed commands only; stored tags may contain commas.
    pub fn parse_tags<S: AsRef<str>>(tag_str: S) -> DomainResult<Vec<Tag>> {
        let mut result: Vec<Tag> = Vec::new();

        for tag_value in tag_str
            .as_ref()
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            let tag = Tag::new(tag_value)?;
            if !result.contains(&tag) {
                result.push(tag);
            }
        }

        Ok(result)
    }

    /// Format tags for display, in their stored order
    pub fn format_tags(tags: &[Tag]) -> String {
        tags.iter().map(Tag::value).collect::<Vec<_>>().join(", ")
    }

    /// Check if a tag list contains any of another list of tags
    pub fn contains_any(haystack: &[Tag], needles: &[Tag]) -> bool {
        !needles.is_empty() && needles.iter().any(|tag| haystack.contains(tag))
    }
}

impl TryFrom<String> for Tag {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tag::new(value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.value
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
