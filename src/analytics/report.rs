/// Multi-window analysis of habits
///
/// Every figure is a pure function of the habit collection and `today`:
/// this week against last week, this month against last month, the trailing
/// 90 days, the year so far, and a fixed-length grid of recent buckets.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::analytics::rate_in_range;
use crate::domain::{
    resolve_bucket, resolve_status, trailing_buckets, Bucket, Frequency, Habit, HabitId, HabitType,
    Status, StreakSummary,
};

/// Days covered by the trailing window, today included
pub const TRAILING_DAYS: u64 = 90;

/// Grid length in buckets for each frequency
pub fn history_length(frequency: Frequency) -> usize {
    match frequency {
        Frequency::Daily => 28,
        Frequency::Weekly => 12,
        Frequency::Monthly => 12,
    }
}

/// Rate in the current window against the one right before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowComparison {
    pub current: u8,
    pub previous: u8,
    /// `current >= previous`
    pub improved: bool,
}

impl WindowComparison {
    fn new(current: u8, previous: u8) -> Self {
        Self {
            current,
            previous,
            improved: current >= previous,
        }
    }

    /// Signed change in percentage points
    pub fn delta(&self) -> i16 {
        self.current as i16 - self.previous as i16
    }
}

/// One cell of the history grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryCell {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: Status,
}

/// Analysis of one habit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub habit_id: HabitId,
    pub name: String,
    pub category: String,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    /// Sunday-to-today against the previous full week
    pub week: WindowComparison,
    /// Month-to-date against the previous full month
    pub month: WindowComparison,
    pub trailing_90_days: u8,
    pub year_to_date: u8,
    /// Oldest first, ending with the bucket containing today
    pub history: Vec<HistoryCell>,
    pub streak: StreakSummary,
    /// Counter maintained by toggles
    pub stored_streak: u32,
}

impl AnalysisReport {
    pub fn history_successes(&self) -> usize {
        self.history.iter().filter(|c| c.status == Status::Success).count()
    }

    /// Grid rendered as one character per bucket
    pub fn history_strip(&self) -> String {
        self.history.iter().map(|c| c.status.symbol()).collect()
    }
}

/// Share of habits whose current bucket already resolved to success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodProgress {
    pub completed: usize,
    pub total: usize,
}

impl PeriodProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// Everything the analysis view shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOverview {
    pub today: NaiveDate,
    pub progress: PeriodProgress,
    pub habits: Vec<AnalysisReport>,
}

/// Count habits whose bucket containing `today` is a success
pub fn period_progress(habits: &[Habit], today: NaiveDate) -> PeriodProgress {
    PeriodProgress {
        completed: habits
            .iter()
            .filter(|h| resolve_status(h, today) == Status::Success)
            .count(),
        total: habits.len(),
    }
}

/// Build the analysis of a single habit as of `today`
pub fn analyze_habit(habit: &Habit, today: NaiveDate) -> AnalysisReport {
    let this_week = Bucket::containing(today, Frequency::Weekly);
    let week = match this_week.previous() {
        Some(last_week) => WindowComparison::new(
            rate_in_range(habit, this_week.start, today),
            rate_in_range(habit, last_week.start, last_week.end),
        ),
        None => WindowComparison::new(rate_in_range(habit, this_week.start, today), 0),
    };

    let this_month = Bucket::containing(today, Frequency::Monthly);
    let month = match this_month.previous() {
        Some(last_month) => WindowComparison::new(
            rate_in_range(habit, this_month.start, today),
            rate_in_range(habit, last_month.start, last_month.end),
        ),
        None => WindowComparison::new(rate_in_range(habit, this_month.start, today), 0),
    };

    let trailing_start = today
        .checked_sub_days(Days::new(TRAILING_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    let year_start = today.with_ordinal(1).unwrap_or(today);

    let history = trailing_buckets(today, habit.frequency, history_length(habit.frequency))
        .into_iter()
        .map(|bucket| HistoryCell {
            start: bucket.start,
            end: bucket.end,
            status: resolve_bucket(habit, &bucket),
        })
        .collect();

    AnalysisReport {
        habit_id: habit.id,
        name: habit.name.clone(),
        category: habit.category.clone(),
        habit_type: habit.habit_type,
        frequency: habit.frequency,
        week,
        month,
        trailing_90_days: rate_in_range(habit, trailing_start, today),
        year_to_date: rate_in_range(habit, year_start, today),
        history,
        streak: StreakSummary::from_history(habit, today),
        stored_streak: habit.streak,
    }
}

/// Build the analysis of every habit, in collection order
pub fn build_analysis_report(habits: &[Habit], today: NaiveDate) -> Vec<AnalysisReport> {
    habits.iter().map(|h| analyze_habit(h, today)).collect()
}

/// Reports plus the current-period progress header
pub fn build_overview(habits: &[Habit], today: NaiveDate) -> AnalysisOverview {
    AnalysisOverview {
        today,
        progress: period_progress(habits, today),
        habits: build_analysis_report(habits, today),
    }
}
