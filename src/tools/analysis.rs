/// Tools for the analysis view
///
/// This module implements the habit_analysis MCP tool, which renders the
/// multi-window report and insights, and habit_rate, which answers a single
/// coverage question over an arbitrary date range.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalysisOverview, AnalysisReport, AnalyticsEngine, Coverage, TRAILING_DAYS};
use crate::domain::{parse_date, HabitId};
use crate::storage::HabitStorage;
use crate::tools::{habit_id, ToolError};

/// Parameters for the analysis report
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalysisParams {
    /// ID of a specific habit (optional, analyzes all habits if omitted)
    pub habit_id: Option<u32>,
}

/// Response from the analysis tool
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub overview: AnalysisOverview,
    pub insights: Vec<String>,
    pub message: String,
}

/// Parameters for a rate query
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RateParams {
    pub habit_id: u32,
    /// First day of the range, YYYY-MM-DD
    pub start: String,
    /// Last day of the range, YYYY-MM-DD
    pub end: String,
}

/// Response from a rate query
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub habit_id: HabitId,
    pub coverage: Coverage,
    pub rate: u8,
    pub message: String,
}

fn arrow(improved: bool) -> &'static str {
    if improved {
        "↑"
    } else {
        "↓"
    }
}

fn render_report(report: &AnalysisReport) -> String {
    format!(
        "🎯 **{}** ({}, {})\n   Week: {}% vs {}% {} | Month: {}% vs {}% {}\n   {} days: {}% | Year: {}% | 🔥 {} (best {})\n   {}",
        report.name,
        report.frequency,
        report.habit_type.as_str(),
        report.week.current,
        report.week.previous,
        arrow(report.week.improved),
        report.month.current,
        report.month.previous,
        arrow(report.month.improved),
        TRAILING_DAYS,
        report.trailing_90_days,
        report.year_to_date,
        report.streak.current,
        report.streak.longest,
        report.history_strip()
    )
}

/// Build the analysis view for all habits or one of them
pub fn analyze_habits<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    today: NaiveDate,
    params: AnalysisParams,
) -> Result<AnalysisResponse, ToolError> {
    let store = storage.load_store()?;

    let mut overview = analytics.overview(&store.habits, today);
    if let Some(raw) = params.habit_id {
        let id = habit_id(raw)?;
        // Not-found check against the store so the error names the id
        store.habit(id)?;
        overview.habits.retain(|r| r.habit_id == id);
    }

    let insights = analytics.generate_insights(&overview);

    let mut message = format!(
        "📈 **Analysis for {}**\nCurrent period: {}/{} done ({}%)\n",
        overview.today,
        overview.progress.completed,
        overview.progress.total,
        overview.progress.percent()
    );
    for report in &overview.habits {
        message.push('\n');
        message.push_str(&render_report(report));
        message.push('\n');
    }
    message.push_str("\n💡 **Insights**\n");
    message.push_str(
        &insights
            .iter()
            .map(|i| format!("- {}", i))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    Ok(AnalysisResponse {
        overview,
        insights,
        message,
    })
}

/// Success rate of one habit between two dates, both inclusive
pub fn habit_rate<S: HabitStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: RateParams,
) -> Result<RateResponse, ToolError> {
    let id = habit_id(params.habit_id)?;
    let start = parse_date(&params.start)?;
    let end = parse_date(&params.end)?;

    let store = storage.load_store()?;
    let habit = store.habit(id)?;
    let coverage = analytics.coverage(habit, start, end);
    let rate = coverage.percent();

    Ok(RateResponse {
        habit_id: id,
        coverage,
        rate,
        message: format!(
            "📊 '{}' from {} to {}: {}% ({} of {} {}s)",
            habit.name,
            start,
            end,
            rate,
            coverage.successful,
            coverage.total,
            habit.frequency.unit_name()
        ),
    })
}
