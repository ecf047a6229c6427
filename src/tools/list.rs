/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use chrono::{Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{rate_in_range, TRAILING_DAYS};
use crate::domain::{Frequency, HabitId, HabitType};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for listing habits
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only show habits with this tag (optional)
    pub category: Option<String>,
    /// Sort by: 'position' (default), 'name', 'streak', 'rate'
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: HabitId,
    pub name: String,
    pub category: String,
    /// Palette index of the habit's tag, `None` when the tag no longer exists
    pub color_index: Option<u8>,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    pub streak: u32,
    /// Success rate over the trailing window
    pub rate: u8,
    pub total_successes: usize,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub average_rate: u8,
    pub message: String,
}

/// List habits using the provided storage
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    today: NaiveDate,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let store = storage.load_store()?;
    let window_start = today
        .checked_sub_days(Days::new(TRAILING_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);

    let category = params.category.as_deref().map(str::trim);
    let mut habits: Vec<HabitSummary> = store
        .habits
        .iter()
        .filter(|h| category.map_or(true, |c| h.category == c))
        .map(|h| HabitSummary {
            habit_id: h.id,
            name: h.name.clone(),
            category: h.category.clone(),
            color_index: store.tag_color(&h.category),
            habit_type: h.habit_type,
            frequency: h.frequency,
            streak: h.streak,
            rate: rate_in_range(h, window_start, today),
            total_successes: h.total_successes(),
        })
        .collect();

    match params.sort_by.as_deref().unwrap_or("position") {
        "position" => {}
        "name" => habits.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        "streak" => habits.sort_by(|a, b| b.streak.cmp(&a.streak)),
        "rate" => habits.sort_by(|a, b| b.rate.cmp(&a.rate)),
        other => {
            return Err(ToolError::InvalidParams(format!(
                "Invalid sort_by '{}'. Valid options: position, name, streak, rate",
                other
            )))
        }
    }

    let average_rate = if habits.is_empty() {
        0
    } else {
        let sum: u32 = habits.iter().map(|h| h.rate as u32).sum();
        (sum as f64 / habits.len() as f64).round() as u8
    };

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let list = habits
            .iter()
            .map(|h| {
                format!(
                    "🎯 **{}** (id {}, {}{})\n   📅 {} {} | 🔥 Streak: {} | 📊 {}-day rate: {}% | ✅ Total: {}",
                    h.name,
                    h.habit_id,
                    h.category,
                    if h.color_index.is_some() { "" } else { ", untagged" },
                    h.frequency,
                    h.habit_type.as_str(),
                    h.streak,
                    TRAILING_DAYS,
                    h.rate,
                    h.total_successes
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "📋 **Habit Summary** ({} habits)\n\n{}\n\n📊 Average rate: {}%",
            habits.len(),
            list,
            average_rate
        )
    };

    Ok(ListHabitsResponse {
        habits,
        average_rate,
        message,
    })
}
