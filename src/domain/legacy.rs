/// One-time import from the boolean completion-list format
///
/// Older exports stored each habit's completions as a plain list of dates.
/// The conversion is lossy in one direction only: a listed date becomes a
/// success, everything else stays neutral, and failures cannot be recovered.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{DomainError, Frequency, Habit, HabitId, HabitStore, HabitType, Mark};

/// Habit as written by the list-based format
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHabit {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub streak: u32,
}

/// Outcome of an import run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: Vec<HabitId>,
    /// Ids that already existed in the store and were left alone
    pub skipped: Vec<HabitId>,
}

/// Map a completion list onto tri-state records: present means success
pub fn completions_from_list(dates: &[NaiveDate]) -> BTreeMap<NaiveDate, Mark> {
    dates.iter().map(|date| (*date, Mark::Success)).collect()
}

impl LegacyHabit {
    pub fn into_habit(self, fallback_category: &str) -> Result<Habit, DomainError> {
        let id = HabitId::new(self.id)?;
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| fallback_category.to_string());

        let mut habit = Habit::new(id, self.name, category, HabitType::Positive, self.frequency)?;
        habit.completions = completions_from_list(&self.completed_dates);
        habit.streak = self.streak;
        if let Some(created_at) = self.created_at {
            habit.created_at = created_at;
        }
        Ok(habit)
    }
}

/// Parse a JSON array of list-format habits and add them to `store`
///
/// Habits whose id is already taken are skipped, not merged.
pub fn import_legacy_json(store: &mut HabitStore, json: &str) -> Result<ImportSummary, DomainError> {
    let legacy: Vec<LegacyHabit> = serde_json::from_str(json).map_err(|e| DomainError::Validation {
        message: format!("Unreadable legacy export: {}", e),
    })?;

    let fallback = store.tags[0].name.clone();
    let mut summary = ImportSummary::default();
    for entry in legacy {
        let habit = entry.into_habit(&fallback)?;
        if store.contains(habit.id) {
            warn!("Skipping legacy habit {}: id already in use", habit.id);
            summary.skipped.push(habit.id);
            continue;
        }
        summary.imported.push(habit.id);
        store.add_habit(habit)?;
    }

    info!(
        "Legacy import finished: {} imported, {} skipped",
        summary.imported.len(),
        summary.skipped.len()
    );
    Ok(summary)
}
