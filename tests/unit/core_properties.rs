/// Property checks for bucketing, resolution, toggling and rates
use std::sync::Mutex;

use chrono::{Datelike, Days, NaiveDate};
use habitquest_mcp::analytics::rate_in_range;
use habitquest_mcp::*;

#[derive(Default)]
struct CountingSink {
    values: Mutex<Vec<SyncValue>>,
}

impl NotificationSink for CountingSink {
    fn notify(&self, notification: SyncNotification) {
        self.values.lock().unwrap().push(notification.value);
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habit(frequency: Frequency) -> Habit {
    Habit::new(
        HabitId(1),
        "Stretch".to_string(),
        "General".to_string(),
        HabitType::Positive,
        frequency,
    )
    .unwrap()
}

/// Days from 2023-12-01 through 2024-03-31, covering a year change and a leap February
fn sample_days() -> impl Iterator<Item = NaiveDate> {
    let start = date(2023, 12, 1);
    (0..122).map(move |offset| start + Days::new(offset))
}

#[test]
fn test_every_date_lies_in_its_bucket() {
    for day in sample_days() {
        for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
            let bucket = Bucket::containing(day, frequency);
            assert!(bucket.contains(day), "{} not in its {} bucket", day, frequency);

            let expected_len = match frequency {
                Frequency::Daily => 1,
                Frequency::Weekly => 7,
                Frequency::Monthly => {
                    let next_month = bucket.end + Days::new(1);
                    (next_month - bucket.start).num_days()
                }
            };
            assert_eq!(bucket.len_days(), expected_len);
        }

        let week = Bucket::containing(day, Frequency::Weekly);
        assert_eq!(week.start.weekday(), chrono::Weekday::Sun);
    }

    assert_eq!(Bucket::containing(date(2024, 2, 10), Frequency::Monthly).len_days(), 29);
    assert_eq!(Bucket::containing(date(2023, 2, 10), Frequency::Monthly).len_days(), 28);
}

#[test]
fn test_success_wins_over_failure_in_same_bucket() {
    let mut h = habit(Frequency::Monthly);
    h.completions.insert(date(2024, 3, 2), Mark::Failure);
    h.completions.insert(date(2024, 3, 20), Mark::Success);
    h.completions.insert(date(2024, 3, 28), Mark::Failure);

    assert_eq!(resolve_status(&h, date(2024, 3, 15)), Status::Success);
}

#[test]
fn test_toggle_cycle_repeats() {
    let sink = CountingSink::default();
    for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
        let mut h = habit(frequency);
        let day = date(2024, 3, 6);
        let statuses: Vec<Status> = (0..4).map(|_| toggle_record(&mut h, day, &sink)).collect();
        assert_eq!(
            statuses,
            vec![Status::Success, Status::Failure, Status::Neutral, Status::Success]
        );
    }
    // Neutral transitions are not sent
    assert_eq!(sink.values.lock().unwrap().len(), 9);
}

#[test]
fn test_at_most_one_record_per_bucket_after_mixed_writes() {
    let sink = CountingSink::default();
    let statuses = [Status::Success, Status::Failure, Status::Neutral];
    let base = date(2024, 3, 3);

    for frequency in [Frequency::Weekly, Frequency::Monthly] {
        let mut h = habit(frequency);
        // Deterministic walk over days of one week, mixing toggles and explicit writes
        let mut state: u32 = 7;
        for step in 0..60 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let day = base + Days::new((state % 7) as u64);
            if step % 3 == 0 {
                let status = statuses[(state as usize / 7) % 3];
                set_record(&mut h, day, status, date(2024, 3, 9), &sink);
            } else {
                toggle_record(&mut h, day, &sink);
            }

            let bucket = Bucket::containing(day, frequency);
            assert!(records_in_bucket(&h, &bucket).len() <= 1);
        }
    }
}

#[test]
fn test_rate_stays_in_bounds() {
    let mut h = habit(Frequency::Daily);
    for day in sample_days().step_by(3) {
        h.completions.insert(day, Mark::Success);
    }
    for (start, end) in [
        (date(2023, 12, 1), date(2024, 3, 31)),
        (date(2024, 1, 1), date(2024, 1, 1)),
        (date(2024, 2, 1), date(2024, 1, 1)),
    ] {
        assert!(rate_in_range(&h, start, end) <= 100);
    }
    assert_eq!(rate_in_range(&h, date(2024, 2, 1), date(2024, 1, 1)), 0);
}

#[test]
fn test_rate_ignores_records_outside_range() {
    let mut h = habit(Frequency::Weekly);
    h.completions.insert(date(2024, 3, 5), Mark::Success);
    let before = rate_in_range(&h, date(2024, 3, 3), date(2024, 3, 23));

    h.completions.insert(date(2023, 11, 1), Mark::Success);
    h.completions.insert(date(2024, 6, 1), Mark::Failure);
    assert_eq!(rate_in_range(&h, date(2024, 3, 3), date(2024, 3, 23)), before);
    assert_eq!(before, 33);
}

#[test]
fn test_polarity_does_not_change_resolution() {
    let mut positive = habit(Frequency::Daily);
    positive.completions.insert(date(2024, 5, 1), Mark::Success);
    let mut negative = positive.clone();
    negative.habit_type = HabitType::Negative;

    assert_eq!(
        resolve_status(&positive, date(2024, 5, 1)),
        resolve_status(&negative, date(2024, 5, 1))
    );
    assert_eq!(
        rate_in_range(&positive, date(2024, 5, 1), date(2024, 5, 2)),
        rate_in_range(&negative, date(2024, 5, 1), date(2024, 5, 2))
    );
    assert_eq!(negative.habit_type.describe(Status::Success), "resisted");
}
