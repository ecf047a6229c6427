/// Analytics engine for rates, comparisons and insights
///
/// This module turns a habit collection into the numbers the analysis view
/// shows: coverage rates over arbitrary ranges, week and month comparisons,
/// history grids, and a few plain-language insights on top of them.

pub mod rate;
pub mod report;

pub use rate::*;
pub use report::*;

use chrono::NaiveDate;

use crate::domain::{Habit, HabitType};

/// Analytics engine for processing habit data
///
/// Stateless: every method is a pure function of its arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Successful and total buckets between two dates, both inclusive
    pub fn coverage(&self, habit: &Habit, start: NaiveDate, end: NaiveDate) -> Coverage {
        coverage_in_range(habit, start, end)
    }

    /// Build the full analysis view as of `today`
    pub fn overview(&self, habits: &[Habit], today: NaiveDate) -> AnalysisOverview {
        build_overview(habits, today)
    }

    /// Generate short observations about an overview
    ///
    /// Highlights the habits that moved the most against last week and last
    /// month, and nudges towards habits with an empty trailing window.
    pub fn generate_insights(&self, overview: &AnalysisOverview) -> Vec<String> {
        let mut insights = Vec::new();

        if overview.habits.is_empty() {
            insights.push("Start by creating your first habit to track!".to_string());
            return insights;
        }

        if overview.progress.completed == overview.progress.total {
            insights.push(format!(
                "Every habit is already a success for the current period ({} of {}).",
                overview.progress.completed, overview.progress.total
            ));
        }

        if let Some(best) = overview
            .habits
            .iter()
            .filter(|r| r.week.delta() > 0)
            .max_by_key(|r| r.week.delta())
        {
            insights.push(format!(
                "'{}' is up {} points on last week ({}% vs {}%).",
                best.name,
                best.week.delta(),
                best.week.current,
                best.week.previous
            ));
        }

        if let Some(worst) = overview
            .habits
            .iter()
            .filter(|r| !r.month.improved)
            .min_by_key(|r| r.month.delta())
        {
            let verb = match worst.habit_type {
                HabitType::Positive => "slipped",
                HabitType::Negative => "needs more resisting",
            };
            insights.push(format!(
                "'{}' {} this month: {}% vs {}% last month.",
                worst.name, verb, worst.month.current, worst.month.previous
            ));
        }

        for idle in overview.habits.iter().filter(|r| r.trailing_90_days == 0) {
            insights.push(format!(
                "'{}' has no success in the last {} days. Try logging it today.",
                idle.name, TRAILING_DAYS
            ));
        }

        if insights.is_empty() {
            insights.push("Steady as it goes: no big changes against last week or month.".to_string());
        }
        insights
    }
}
