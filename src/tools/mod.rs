/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients
/// can call to interact with the habit tracker. Each tool loads the current
/// snapshot from storage, runs one core operation, saves, and renders a reply.

pub mod analysis;
pub mod create;
pub mod import;
pub mod list;
pub mod record;
pub mod status;
pub mod sync;
pub mod tags;
pub mod update;

// Re-export tool functions for easy access
pub use analysis::*;
pub use create::*;
pub use import::*;
pub use list::*;
pub use record::*;
pub use status::*;
pub use sync::*;
pub use tags::*;
pub use update::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{parse_date, DomainError, HabitId};
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Date argument, defaulting to `today` when omitted
pub(crate) fn date_or_today(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ToolError> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today),
    }
}

pub(crate) fn habit_id(value: u32) -> Result<HabitId, ToolError> {
    Ok(HabitId::new(value)?)
}
