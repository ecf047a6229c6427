/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool: the resolved status of
/// the period containing a date, for one habit or all of them.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{period_progress, PeriodProgress};
use crate::domain::{resolve_bucket, Bucket, Habit, HabitId, Status, StreakSummary};
use crate::storage::HabitStorage;
use crate::tools::{date_or_today, habit_id, ToolError};

/// Parameters for checking habit status
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of a specific habit (optional, shows all if omitted)
    pub habit_id: Option<u32>,
    /// Date in YYYY-MM-DD (optional, defaults to today)
    pub date: Option<String>,
}

/// Status of a single habit for the requested period
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: HabitId,
    pub name: String,
    pub period: String,
    pub status: Status,
    /// Counter maintained by toggles
    pub streak: u32,
    pub longest_streak: u32,
    pub last_success: Option<NaiveDate>,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub date: NaiveDate,
    pub habits: Vec<HabitStatus>,
    /// Only filled in when the request covers every habit
    pub progress: Option<PeriodProgress>,
    pub message: String,
}

fn habit_status(habit: &Habit, date: NaiveDate, today: NaiveDate) -> HabitStatus {
    let bucket = Bucket::containing(date, habit.frequency);
    let summary = StreakSummary::from_history(habit, today);
    HabitStatus {
        habit_id: habit.id,
        name: habit.name.clone(),
        period: bucket.label(),
        status: resolve_bucket(habit, &bucket),
        streak: habit.streak,
        longest_streak: summary.longest,
        last_success: summary.last_success,
    }
}

/// Get status for habits using the provided storage
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    today: NaiveDate,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let store = storage.load_store()?;

    let (habits, progress) = match params.habit_id {
        Some(raw) => {
            let habit = store.habit(habit_id(raw)?)?;
            let status = habit_status(habit, date, today);
            let mut message = format!(
                "📊 **{}** ({}): {} [{}]\n🔥 Streak: {} (best {})",
                status.name,
                status.period,
                habit.habit_type.describe(status.status),
                status.status.symbol(),
                status.streak,
                status.longest_streak
            );
            message.push('\n');
            message.push_str(&StreakSummary::from_history(habit, today).motivational_message(habit.frequency));
            return Ok(StatusResponse {
                date,
                habits: vec![status],
                progress: None,
                message,
            });
        }
        None => {
            let statuses: Vec<HabitStatus> = store
                .habits
                .iter()
                .map(|h| habit_status(h, date, today))
                .collect();
            (statuses, period_progress(&store.habits, date))
        }
    };

    let message = if habits.is_empty() {
        "No habits yet. Create your first habit to get started!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|s| {
                format!(
                    "{} {} ({}) {} | streak {}",
                    s.status.symbol(),
                    s.name,
                    s.habit_id,
                    s.period,
                    s.streak
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "📅 Progress for {}: {}/{} done ({}%)\n\n{}",
            date,
            progress.completed,
            progress.total,
            progress.percent(),
            lines
        )
    };

    Ok(StatusResponse {
        date,
        habits,
        progress: Some(progress),
        message,
    })
}
