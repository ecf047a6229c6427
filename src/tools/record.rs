/// Tools for recording outcomes
///
/// This module implements the habit_toggle and habit_set_status MCP tools.
/// Both write through the record mutator, so weekly and monthly habits keep
/// at most one record per bucket and every non-neutral change is synced.
/// Notifications reach the sink only after the snapshot has been saved.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Bucket, Habit, HabitId, Status};
use crate::storage::HabitStorage;
use crate::sync::{DeferredSink, NotificationSink};
use crate::tools::{date_or_today, habit_id, ToolError};

/// Parameters for cycling a habit's status on a date
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleParams {
    /// ID of the habit to toggle
    pub habit_id: u32,
    /// Date in YYYY-MM-DD (optional, defaults to today)
    pub date: Option<String>,
}

/// Parameters for setting a status directly, usually for a past date
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetStatusParams {
    pub habit_id: u32,
    /// Date in YYYY-MM-DD (optional, defaults to today)
    pub date: Option<String>,
    /// success, failure or neutral (clears the period)
    pub status: Status,
}

/// Response from a recording tool
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub habit_id: HabitId,
    pub date: NaiveDate,
    /// Resolved status of the bucket containing `date` after the write
    pub status: Status,
    pub streak: u32,
    pub message: String,
}

fn describe(habit: &Habit, date: NaiveDate, status: Status) -> String {
    let icon = match status {
        Status::Success => "✅",
        Status::Failure => "❌",
        Status::Neutral => "⚪",
    };
    let bucket = Bucket::containing(date, habit.frequency);
    let mut message = format!(
        "{} '{}' marked {} for {}",
        icon,
        habit.name,
        habit.habit_type.describe(status),
        bucket.label()
    );
    if habit.streak > 0 {
        message.push_str(&format!(
            "\n🔥 Streak: {} {}{}",
            habit.streak,
            habit.frequency.unit_name(),
            if habit.streak == 1 { "" } else { "s" }
        ));
    }
    message
}

/// Cycle neutral -> success -> failure -> neutral for the bucket containing `date`
pub fn toggle_habit<S: HabitStorage>(
    storage: &S,
    sink: &dyn NotificationSink,
    today: NaiveDate,
    params: ToggleParams,
) -> Result<RecordResponse, ToolError> {
    let id = habit_id(params.habit_id)?;
    let date = date_or_today(params.date.as_deref(), today)?;

    let mut store = storage.load_store()?;
    let pending = DeferredSink::new();
    let status = store.toggle(id, date, &pending)?;
    storage.save_store(&store)?;
    pending.release(sink);

    let habit = store.habit(id)?;
    Ok(RecordResponse {
        success: true,
        habit_id: id,
        date,
        status,
        streak: habit.streak,
        message: describe(habit, date, status),
    })
}

/// Set the bucket containing `date` to an explicit status
///
/// The stored streak is recomputed from history as of `today`.
pub fn set_habit_status<S: HabitStorage>(
    storage: &S,
    sink: &dyn NotificationSink,
    today: NaiveDate,
    params: SetStatusParams,
) -> Result<RecordResponse, ToolError> {
    let id = habit_id(params.habit_id)?;
    let date = date_or_today(params.date.as_deref(), today)?;

    let mut store = storage.load_store()?;
    let pending = DeferredSink::new();
    store.set_explicit_status(id, date, params.status, today, &pending)?;
    storage.save_store(&store)?;
    pending.release(sink);

    let habit = store.habit(id)?;
    Ok(RecordResponse {
        success: true,
        habit_id: id,
        date,
        status: params.status,
        streak: habit.streak,
        message: describe(habit, date, params.status),
    })
}
