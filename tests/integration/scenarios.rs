/// Worked scenarios for weekly, monthly and daily habits
use std::sync::Mutex;

use chrono::NaiveDate;
use habitquest_mcp::analytics::rate_in_range;
use habitquest_mcp::*;

#[derive(Default)]
struct RecordingSink {
    received: Mutex<Vec<SyncNotification>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: SyncNotification) {
        self.received.lock().unwrap().push(notification);
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habits(frequency: Frequency) -> Vec<Habit> {
    vec![Habit::new(
        HabitId(1),
        "Call family".to_string(),
        "General".to_string(),
        HabitType::Positive,
        frequency,
    )
    .unwrap()]
}

#[test]
fn test_weekly_success_covers_whole_week() {
    let sink = RecordingSink::default();
    let habits = set_explicit_status(
        habits(Frequency::Weekly),
        HabitId(1),
        date(2024, 3, 6),
        Status::Success,
        date(2024, 3, 6),
        &sink,
    )
    .unwrap();

    assert_eq!(resolve_status(&habits[0], date(2024, 3, 4)), Status::Success);
    assert_eq!(resolve_status(&habits[0], date(2024, 3, 3)), Status::Success);
    assert_eq!(resolve_status(&habits[0], date(2024, 3, 10)), Status::Neutral);
}

#[test]
fn test_monthly_rate_over_quarter() {
    let mut habits = habits(Frequency::Monthly);
    habits[0].completions.insert(date(2024, 1, 15), Mark::Success);
    habits[0].completions.insert(date(2024, 3, 20), Mark::Success);

    assert_eq!(rate_in_range(&habits[0], date(2024, 1, 1), date(2024, 3, 31)), 67);
}

#[test]
fn test_weekly_retoggle_moves_the_record() {
    let sink = RecordingSink::default();
    let habits = toggle(habits(Frequency::Weekly), HabitId(1), date(2024, 3, 6), &sink).unwrap();
    assert_eq!(habits[0].completions.get(&date(2024, 3, 6)), Some(&Mark::Success));

    let habits = toggle(habits, HabitId(1), date(2024, 3, 4), &sink).unwrap();
    let week = Bucket::containing(date(2024, 3, 4), Frequency::Weekly);
    assert_eq!(records_in_bucket(&habits[0], &week), vec![date(2024, 3, 4)]);
    assert_eq!(habits[0].completions.get(&date(2024, 3, 4)), Some(&Mark::Failure));
    assert!(!habits[0].completions.contains_key(&date(2024, 3, 6)));

    let values: Vec<u8> = sink
        .received
        .lock()
        .unwrap()
        .iter()
        .map(|n| u8::from(n.value))
        .collect();
    assert_eq!(values, vec![1, 0]);
}

#[test]
fn test_daily_days_are_independent() {
    let sink = RecordingSink::default();
    let habits = set_explicit_status(
        habits(Frequency::Daily),
        HabitId(1),
        date(2024, 5, 2),
        Status::Success,
        date(2024, 5, 2),
        &sink,
    )
    .unwrap();
    let habits = set_explicit_status(
        habits,
        HabitId(1),
        date(2024, 5, 1),
        Status::Failure,
        date(2024, 5, 2),
        &sink,
    )
    .unwrap();

    assert_eq!(resolve_status(&habits[0], date(2024, 5, 1)), Status::Failure);
    assert_eq!(resolve_status(&habits[0], date(2024, 5, 2)), Status::Success);
}

#[test]
fn test_frequency_change_rebuckets_without_migration() {
    let mut store = HabitStore::default();
    store
        .create_habit(Some(HabitId(1)), "Journal".to_string(), None, HabitType::Positive, Frequency::Daily)
        .unwrap();
    store.toggle(HabitId(1), date(2024, 3, 4), &NullSink).unwrap();
    store.toggle(HabitId(1), date(2024, 3, 5), &NullSink).unwrap();
    store.toggle(HabitId(1), date(2024, 3, 5), &NullSink).unwrap();

    store
        .update_habit(HabitId(1), None, None, None, Some(Frequency::Weekly))
        .unwrap();
    let habit = store.habit(HabitId(1)).unwrap();

    // Both old daily records now fall in one week; success still wins
    assert_eq!(habit.completions.len(), 2);
    assert_eq!(resolve_status(habit, date(2024, 3, 9)), Status::Success);
}

#[test]
fn test_analysis_report_for_collection() {
    let today = date(2024, 3, 6);
    let mut store = HabitStore::default();
    store
        .create_habit(None, "Run".to_string(), None, HabitType::Positive, Frequency::Daily)
        .unwrap();
    store
        .create_habit(None, "No soda".to_string(), None, HabitType::Negative, Frequency::Weekly)
        .unwrap();
    store.toggle(HabitId(1), today, &NullSink).unwrap();
    store.toggle(HabitId(2), date(2024, 2, 28), &NullSink).unwrap();

    let reports = analytics::build_analysis_report(&store.habits, today);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].history.len(), 28);
    assert_eq!(reports[0].history.last().map(|c| c.status), Some(Status::Success));
    assert_eq!(reports[1].week.previous, 100);
    assert_eq!(reports[1].week.current, 0);
    assert!(!reports[1].week.improved);

    let overview = AnalyticsEngine::new().overview(&store.habits, today);
    assert_eq!(overview.progress, PeriodProgress { completed: 1, total: 2 });
}
