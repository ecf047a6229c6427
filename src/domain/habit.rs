/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, along with its validation rules.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, HabitId, HabitType, Mark};

/// A habit represents something the user wants to do (or avoid) regularly
///
/// `completions` maps exact calendar dates to a recorded outcome; a missing
/// key means neutral. For weekly and monthly habits the record mutator keeps
/// at most one key per bucket, but the map itself does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// User-assigned identifier
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "No sugar")
    pub name: String,
    /// Tag name; a soft reference that may outlive the tag
    pub category: String,
    /// Polarity, display only
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// Recorded outcomes keyed by exact date
    #[serde(default)]
    pub completions: BTreeMap<NaiveDate, Mark>,
    /// Counter updated alongside toggles
    #[serde(default)]
    pub streak: u32,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start with no completions and a zero streak.
    pub fn new(
        id: HabitId,
        name: String,
        category: String,
        habit_type: HabitType,
        frequency: Frequency,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;
        let category = Self::validate_category(&category)?;

        Ok(Self {
            id,
            name,
            category,
            habit_type,
            frequency,
            completions: BTreeMap::new(),
            streak: 0,
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        category: String,
        habit_type: HabitType,
        frequency: Frequency,
        completions: BTreeMap<NaiveDate, Mark>,
        streak: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            habit_type,
            frequency,
            completions,
            streak,
            created_at,
        }
    }

    /// Update the habit's non-temporal properties with validation
    ///
    /// Changing the frequency re-buckets existing records on the next read;
    /// nothing is migrated.
    pub fn update(
        &mut self,
        name: Option<String>,
        category: Option<String>,
        habit_type: Option<HabitType>,
        frequency: Option<Frequency>,
    ) -> Result<(), DomainError> {
        // Validate new values before applying any of them
        let name = name.map(|n| Self::validate_name(&n)).transpose()?;
        let category = category.map(|c| Self::validate_category(&c)).transpose()?;

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_category) = category {
            self.category = new_category;
        }
        if let Some(new_type) = habit_type {
            self.habit_type = new_type;
        }
        if let Some(new_frequency) = frequency {
            if new_frequency != self.frequency {
                tracing::debug!(
                    "Habit {} frequency changed {} -> {}, {} records re-bucketed",
                    self.id,
                    self.frequency,
                    new_frequency,
                    self.completions.len()
                );
            }
            self.frequency = new_frequency;
        }

        Ok(())
    }

    /// Number of successful records ever stored
    pub fn total_successes(&self) -> usize {
        self.completions.values().filter(|m| **m == Mark::Success).count()
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }

    fn validate_category(category: &str) -> Result<String, DomainError> {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Category cannot be empty".to_string(),
            });
        }
        Ok(trimmed.to_string())
    }
}
