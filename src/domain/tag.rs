/// User-defined tags that habits use as categories
///
/// Habits reference tags by name only. Removing a tag leaves habits with the
/// old name, and display falls back to a default style for unknown tags.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Tag every fresh store starts with
pub const DEFAULT_TAG: &str = "General";

/// Number of entries in the tag color palette
pub const PALETTE_SIZE: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTag {
    pub name: String,
    /// Index into the display palette
    pub color_index: u8,
}

impl UserTag {
    pub fn new(name: &str, color_index: u8) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Tag name cannot be empty".to_string(),
            });
        }
        if trimmed.chars().count() > 30 {
            return Err(DomainError::Validation {
                message: "Tag name cannot be longer than 30 characters".to_string(),
            });
        }
        Ok(Self {
            name: trimmed.to_string(),
            color_index: color_index % PALETTE_SIZE,
        })
    }

    pub fn default_tag() -> Self {
        Self {
            name: DEFAULT_TAG.to_string(),
            color_index: 0,
        }
    }
}
