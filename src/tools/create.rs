/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, HabitId, HabitType};
use crate::storage::HabitStorage;
use crate::tools::{habit_id, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Tag to file the habit under (defaults to the first tag)
    pub category: Option<String>,
    /// daily, weekly or monthly (defaults to daily)
    pub frequency: Option<Frequency>,
    /// positive (something to do) or negative (something to avoid)
    #[serde(rename = "type")]
    pub habit_type: Option<HabitType>,
    /// Explicit id; the lowest free id is used when omitted
    pub id: Option<u32>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: HabitId,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let mut store = storage.load_store()?;
    let id = params.id.map(habit_id).transpose()?;

    let habit = store.create_habit(
        id,
        params.name,
        params.category,
        params.habit_type.unwrap_or_default(),
        params.frequency.unwrap_or(Frequency::Daily),
    )?;
    let habit_id = habit.id;
    let message = format!(
        "✅ Created {} habit '{}' ({}, tag {}). Ready to start your streak!",
        habit.frequency, habit.name, habit.habit_type.as_str(), habit.category
    );

    storage.save_store(&store)?;

    Ok(CreateHabitResponse {
        success: true,
        habit_id,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::storage::SqliteStorage;

    fn params(name: &str, id: Option<u32>) -> CreateHabitParams {
        CreateHabitParams {
            name: name.to_string(),
            category: None,
            frequency: Some(Frequency::Weekly),
            habit_type: None,
            id,
        }
    }

    #[test]
    fn test_create_assigns_lowest_free_id() {
        let storage = SqliteStorage::in_memory().unwrap();

        create_habit(&storage, params("Gym", Some(2))).unwrap();
        let response = create_habit(&storage, params("Read", None)).unwrap();

        assert_eq!(response.habit_id, HabitId(1));
        let store = storage.load_store().unwrap();
        assert_eq!(store.habits.len(), 2);
        assert_eq!(store.habits[1].habit_type, HabitType::Positive);
    }

    #[test]
    fn test_create_rejects_taken_id() {
        let storage = SqliteStorage::in_memory().unwrap();
        create_habit(&storage, params("Gym", Some(2))).unwrap();

        let result = create_habit(&storage, params("Swim", Some(2)));
        assert!(matches!(
            result,
            Err(ToolError::Domain(DomainError::DuplicateHabitId(HabitId(2))))
        ));
    }

    #[test]
    fn test_params_accept_type_field() {
        let params: CreateHabitParams = serde_json::from_value(serde_json::json!({
            "name": "No sugar",
            "type": "negative",
            "frequency": "daily"
        }))
        .unwrap();
        assert_eq!(params.habit_type, Some(HabitType::Negative));
    }
}
