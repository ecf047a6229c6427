/// Writes to a habit's completion records
///
/// Every write first clears the bucket that contains the target date, which
/// keeps at most one record per bucket for weekly and monthly habits. For daily
/// habits the bucket is the date itself. Non-neutral results are reported to
/// the notification sink after the in-memory change is applied.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{current_streak, resolve_status, step_streak, Bucket, Habit, Status};
use crate::sync::{NotificationSink, SyncNotification};

/// Cycle the status of `date`'s bucket and return the new status
///
/// The cycle is driven by the resolved bucket status, not by the raw record
/// at `date`: neutral -> success -> failure -> neutral.
pub fn toggle_record(habit: &mut Habit, date: NaiveDate, sink: &dyn NotificationSink) -> Status {
    let current = resolve_status(habit, date);
    let next = current.cycle();

    write_bucket(habit, date, next, sink);
    habit.streak = step_streak(habit.streak, next);

    debug!(
        "Toggled habit {} on {}: {} -> {} (streak {})",
        habit.id, date, current, next, habit.streak
    );
    next
}

/// Set the status of `date`'s bucket directly (past-date logging)
///
/// The stored streak is recomputed from history as of `today`, so retroactive
/// edits cannot leave it out of step with the records.
pub fn set_record(
    habit: &mut Habit,
    date: NaiveDate,
    status: Status,
    today: NaiveDate,
    sink: &dyn NotificationSink,
) {
    write_bucket(habit, date, status, sink);
    habit.streak = current_streak(habit, today);

    debug!(
        "Set habit {} on {} to {} (streak {})",
        habit.id, date, status, habit.streak
    );
}

/// Clear the bucket containing `date`, then record `status` at `date`
fn write_bucket(habit: &mut Habit, date: NaiveDate, status: Status, sink: &dyn NotificationSink) {
    let bucket = Bucket::containing(date, habit.frequency);
    let stale: Vec<NaiveDate> = habit
        .completions
        .range(bucket.start..=bucket.end)
        .map(|(d, _)| *d)
        .collect();
    for key in stale {
        habit.completions.remove(&key);
    }

    if let Some(mark) = status.mark() {
        habit.completions.insert(date, mark);
        sink.notify(SyncNotification::new(habit, date, mark));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{records_in_bucket, Frequency, HabitId, HabitType, Mark};
    use crate::sync::testing::RecordingSink;
    use crate::sync::SyncValue;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(frequency: Frequency) -> Habit {
        Habit::new(
            HabitId(4),
            "Call mom".to_string(),
            "Social".to_string(),
            HabitType::Positive,
            frequency,
        )
        .unwrap()
    }

    #[test]
    fn test_toggle_cycles_through_three_states() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Daily);
        let day = date(2024, 5, 1);

        assert_eq!(toggle_record(&mut h, day, &sink), Status::Success);
        assert_eq!(toggle_record(&mut h, day, &sink), Status::Failure);
        assert_eq!(toggle_record(&mut h, day, &sink), Status::Neutral);
        assert!(h.completions.is_empty());
        assert_eq!(toggle_record(&mut h, day, &sink), Status::Success);
    }

    #[test]
    fn test_weekly_retoggle_keeps_one_record_per_bucket() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Weekly);

        toggle_record(&mut h, date(2024, 3, 6), &sink);
        assert_eq!(h.completions.get(&date(2024, 3, 6)), Some(&Mark::Success));

        // Monday of the same Sunday-start week
        let next = toggle_record(&mut h, date(2024, 3, 4), &sink);
        assert_eq!(next, Status::Failure);

        let bucket = Bucket::containing(date(2024, 3, 4), Frequency::Weekly);
        assert_eq!(records_in_bucket(&h, &bucket), vec![date(2024, 3, 4)]);
        assert_eq!(h.completions.get(&date(2024, 3, 4)), Some(&Mark::Failure));
        assert!(!h.completions.contains_key(&date(2024, 3, 6)));
    }

    #[test]
    fn test_exclusivity_holds_over_many_writes() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Monthly);
        let today = date(2024, 4, 30);

        for day in [3, 17, 9, 28, 1, 14, 30] {
            toggle_record(&mut h, date(2024, 4, day), &sink);
            set_record(&mut h, date(2024, 4, 31 - day), Status::Failure, today, &sink);
            toggle_record(&mut h, date(2024, 4, day), &sink);

            let bucket = Bucket::containing(date(2024, 4, 1), Frequency::Monthly);
            assert!(records_in_bucket(&h, &bucket).len() <= 1);
        }
    }

    #[test]
    fn test_weekly_scenario_resolves_whole_week() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Weekly);
        set_record(&mut h, date(2024, 3, 6), Status::Success, date(2024, 3, 6), &sink);

        assert_eq!(resolve_status(&h, date(2024, 3, 4)), Status::Success);
        assert_eq!(resolve_status(&h, date(2024, 3, 10)), Status::Neutral);
    }

    #[test]
    fn test_daily_write_does_not_touch_neighbours() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Daily);
        h.completions.insert(date(2024, 5, 2), Mark::Success);

        set_record(&mut h, date(2024, 5, 1), Status::Failure, date(2024, 5, 2), &sink);

        assert_eq!(resolve_status(&h, date(2024, 5, 1)), Status::Failure);
        assert_eq!(resolve_status(&h, date(2024, 5, 2)), Status::Success);
    }

    #[test]
    fn test_streak_counter_follows_toggles() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Daily);
        h.streak = 5;

        toggle_record(&mut h, date(2024, 5, 1), &sink);
        assert_eq!(h.streak, 6);
        toggle_record(&mut h, date(2024, 5, 1), &sink);
        assert_eq!(h.streak, 0);
        toggle_record(&mut h, date(2024, 5, 1), &sink);
        assert_eq!(h.streak, 0);
    }

    #[test]
    fn test_set_record_recomputes_streak_from_history() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Daily);
        h.streak = 42;
        let today = date(2024, 5, 4);

        set_record(&mut h, date(2024, 5, 2), Status::Success, today, &sink);
        set_record(&mut h, date(2024, 5, 3), Status::Success, today, &sink);
        assert_eq!(h.streak, 2);

        set_record(&mut h, date(2024, 5, 3), Status::Neutral, today, &sink);
        assert_eq!(h.streak, 0);
    }

    #[test]
    fn test_only_non_neutral_changes_are_notified() {
        let sink = RecordingSink::default();
        let mut h = habit(Frequency::Daily);
        let day = date(2024, 5, 1);

        toggle_record(&mut h, day, &sink);
        toggle_record(&mut h, day, &sink);
        toggle_record(&mut h, day, &sink);
        set_record(&mut h, day, Status::Neutral, day, &sink);

        let values: Vec<_> = sink.take().into_iter().map(|n| n.value).collect();
        assert_eq!(values, vec![SyncValue::Success, SyncValue::Failure]);
    }
}
