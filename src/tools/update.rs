/// Tools for editing, deleting and reordering existing habits
///
/// This module implements the habit_update, habit_delete and habit_move MCP
/// tools. None of them touch recorded outcomes: a frequency change re-buckets
/// the existing records the next time they are read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, HabitType, MoveDirection};
use crate::storage::HabitStorage;
use crate::tools::{habit_id, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: u32,
    pub name: Option<String>,
    /// New tag name
    pub category: Option<String>,
    /// New frequency; existing records are kept and re-bucketed
    pub frequency: Option<Frequency>,
    #[serde(rename = "type")]
    pub habit_type: Option<HabitType>,
}

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete, together with all of its records
    pub habit_id: u32,
}

/// Parameters for moving a habit in the list
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MoveHabitParams {
    pub habit_id: u32,
    /// up or down
    pub direction: MoveDirection,
}

/// Response shared by the editing tools
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let id = habit_id(params.habit_id)?;
    if params.name.is_none()
        && params.category.is_none()
        && params.frequency.is_none()
        && params.habit_type.is_none()
    {
        return Err(ToolError::InvalidParams(
            "Nothing to update: pass at least one of name, category, frequency, type".to_string(),
        ));
    }

    let mut store = storage.load_store()?;
    let previous_frequency = store.habit(id)?.frequency;
    let habit = store.update_habit(
        id,
        params.name,
        params.category,
        params.habit_type,
        params.frequency,
    )?;

    let mut message = format!("✏️ Updated habit '{}' ({})", habit.name, habit.id);
    if habit.frequency != previous_frequency {
        message.push_str(&format!(
            "\nFrequency is now {}; existing records are regrouped by {}.",
            habit.frequency,
            habit.frequency.unit_name()
        ));
    }

    storage.save_store(&store)?;

    Ok(UpdateHabitResponse {
        success: true,
        message,
    })
}

/// Delete a habit and its records
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let mut store = storage.load_store()?;
    let removed = store.remove_habit(habit_id(params.habit_id)?)?;
    storage.save_store(&store)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!(
            "🗑️ Deleted habit '{}' ({}) and {} recorded days",
            removed.name,
            removed.id,
            removed.completions.len()
        ),
    })
}

/// Move a habit one position up or down
pub fn move_habit<S: HabitStorage>(
    storage: &S,
    params: MoveHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let id = habit_id(params.habit_id)?;
    let mut store = storage.load_store()?;
    store.move_habit(id, params.direction)?;
    storage.save_store(&store)?;

    let position = store
        .habits
        .iter()
        .position(|h| h.id == id)
        .map(|p| p + 1)
        .unwrap_or_default();

    Ok(UpdateHabitResponse {
        success: true,
        message: format!(
            "Habit {} is now at position {} of {}",
            id,
            position,
            store.habits.len()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, HabitId, HabitStore, Mark};
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;

    fn seeded() -> SqliteStorage {
        let storage = SqliteStorage::in_memory().unwrap();
        let mut store = HabitStore::default();
        for name in ["Run", "Read", "Stretch"] {
            store
                .create_habit(None, name.to_string(), None, HabitType::Positive, Frequency::Daily)
                .unwrap();
        }
        store
            .habit_mut(HabitId(1))
            .unwrap()
            .completions
            .insert(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), Mark::Success);
        storage.save_store(&store).unwrap();
        storage
    }

    #[test]
    fn test_frequency_change_keeps_records() {
        let storage = seeded();
        let response = update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: 1,
                name: None,
                category: None,
                frequency: Some(Frequency::Weekly),
                habit_type: None,
            },
        )
        .unwrap();

        assert!(response.message.contains("regrouped by week"));
        let store = storage.load_store().unwrap();
        let habit = store.habit(HabitId(1)).unwrap();
        assert_eq!(habit.frequency, Frequency::Weekly);
        assert_eq!(habit.completions.len(), 1);
    }

    #[test]
    fn test_empty_update_rejected() {
        let storage = seeded();
        let result = update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: 1,
                name: None,
                category: None,
                frequency: None,
                habit_type: None,
            },
        );
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[test]
    fn test_delete_and_move() {
        let storage = seeded();
        delete_habit(&storage, DeleteHabitParams { habit_id: 1 }).unwrap();
        move_habit(
            &storage,
            MoveHabitParams {
                habit_id: 3,
                direction: MoveDirection::Up,
            },
        )
        .unwrap();

        let order: Vec<u32> = storage
            .load_store()
            .unwrap()
            .habits
            .iter()
            .map(|h| h.id.0)
            .collect();
        assert_eq!(order, vec![3, 2]);

        let missing = delete_habit(&storage, DeleteHabitParams { habit_id: 1 });
        assert!(matches!(
            missing,
            Err(ToolError::Domain(DomainError::HabitNotFound(HabitId(1))))
        ));
    }
}
