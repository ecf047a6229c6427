/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. The core works
/// on an in-memory `HabitStore`; storage only loads and saves snapshots of it,
/// plus a few key/value settings such as the sync URL.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::HabitStore;

/// Settings key holding the webhook URL
pub const SYNC_URL_KEY: &str = "sync_url";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait HabitStorage {
    /// Load every habit (with its records) and tag, in display order
    fn load_store(&self) -> Result<HabitStore, StorageError>;

    /// Replace the persisted snapshot with `store`
    fn save_store(&self, store: &HabitStore) -> Result<(), StorageError>;

    /// Read a setting, `None` when unset
    fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a setting; `None` clears it
    fn set_setting(&self, key: &str, value: Option<&str>) -> Result<(), StorageError>;
}
