/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, UserTag, HabitStore) and the
/// period logic built on them: date buckets, status resolution, record writes
/// and streaks. Nothing in here touches storage or the network directly.

pub mod bucket;
pub mod habit;
pub mod legacy;
pub mod record;
pub mod status;
pub mod store;
pub mod streak;
pub mod tag;
pub mod types;

// Re-export public types for easy access
pub use bucket::*;
pub use habit::*;
pub use legacy::*;
pub use record::*;
pub use status::*;
pub use store::*;
pub use streak::*;
pub use tag::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(HabitId),

    #[error("Habit id {0} is already in use")]
    DuplicateHabitId(HabitId),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Tag '{0}' already exists")]
    DuplicateTag(String),

    #[error("The last remaining tag cannot be deleted")]
    LastTag,
}
