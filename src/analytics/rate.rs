/// Coverage rates over date ranges
///
/// A rate is the share of buckets in a range that hold at least one success,
/// counted in the habit's own unit: days, Sunday-start weeks or months. Edge
/// buckets are counted whole even when the range only partly overlaps them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{buckets_between, resolve_bucket, Habit, Status};

/// Successful buckets out of all buckets in a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Coverage {
    pub successful: u32,
    pub total: u32,
}

impl Coverage {
    /// Rounded percentage in `[0, 100]`, zero for an empty range
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let ratio = self.successful as f64 / self.total as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Count successful buckets between `start` and `end` (inclusive)
pub fn coverage_in_range(habit: &Habit, start: NaiveDate, end: NaiveDate) -> Coverage {
    let buckets = buckets_between(start, end, habit.frequency);
    let successful = buckets
        .iter()
        .filter(|bucket| resolve_bucket(habit, bucket) == Status::Success)
        .count();

    Coverage {
        successful: successful as u32,
        total: buckets.len() as u32,
    }
}

/// Success coverage between `start` and `end` as an integer percent
///
/// An inverted range has no buckets and rates 0.
pub fn rate_in_range(habit: &Habit, start: NaiveDate, end: NaiveDate) -> u8 {
    coverage_in_range(habit, start, end).percent()
}
