/// Status resolution for a habit's buckets
///
/// A bucket resolves to success if any record inside it is a success,
/// otherwise to failure if any record is a failure, otherwise to neutral.
/// The unit of commitment is the bucket, so one success outweighs misses.

use chrono::NaiveDate;

use crate::domain::{Bucket, Habit, Mark, Status};

/// Resolve the effective status of the bucket containing `date`
pub fn resolve_status(habit: &Habit, date: NaiveDate) -> Status {
    let bucket = Bucket::containing(date, habit.frequency);
    resolve_bucket(habit, &bucket)
}

/// Resolve a bucket that was already computed by the caller
pub fn resolve_bucket(habit: &Habit, bucket: &Bucket) -> Status {
    let mut status = Status::Neutral;
    for mark in habit.completions.range(bucket.start..=bucket.end).map(|(_, m)| *m) {
        match mark {
            Mark::Success => return Status::Success,
            Mark::Failure => status = Status::Failure,
        }
    }
    status
}

/// Dates of the records that fall inside `bucket`
pub fn records_in_bucket(habit: &Habit, bucket: &Bucket) -> Vec<NaiveDate> {
    habit
        .completions
        .range(bucket.start..=bucket.end)
        .map(|(date, _)| *date)
        .collect()
}
