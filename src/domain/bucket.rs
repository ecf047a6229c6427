/// Period buckets for habit frequencies
///
/// A bucket is the contiguous date range that counts as one unit of commitment:
/// the day itself for daily habits, the Sunday-start week for weekly habits and
/// the calendar month for monthly habits. Everything here is pure date arithmetic.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::domain::Frequency;

/// One period bucket with an inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bucket {
    pub frequency: Frequency,
    /// First day of the bucket, also used as its key
    pub start: NaiveDate,
    /// Last day of the bucket (inclusive)
    pub end: NaiveDate,
}

impl Bucket {
    /// Bucket of `frequency` that contains `date`
    pub fn containing(date: NaiveDate, frequency: Frequency) -> Self {
        let start = bucket_start(date, frequency);
        Self {
            frequency,
            start,
            end: bucket_end(start, frequency),
        }
    }

    /// Canonical key of the bucket: its first day
    pub fn key(&self) -> NaiveDate {
        self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The bucket right after this one
    pub fn next(&self) -> Option<Self> {
        let start = self.end.succ_opt()?;
        Some(Self::containing(start, self.frequency))
    }

    /// The bucket right before this one
    pub fn previous(&self) -> Option<Self> {
        let end = self.start.pred_opt()?;
        Some(Self::containing(end, self.frequency))
    }

    /// Short label for grids and reports
    pub fn label(&self) -> String {
        match self.frequency {
            Frequency::Daily => self.start.format("%Y-%m-%d").to_string(),
            Frequency::Weekly => format!("{}..{}", self.start.format("%m-%d"), self.end.format("%m-%d")),
            Frequency::Monthly => self.start.format("%Y-%m").to_string(),
        }
    }
}

/// First day of the bucket containing `date`
pub fn bucket_start(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => date,
        Frequency::Weekly => {
            let offset = date.weekday().num_days_from_sunday();
            date.checked_sub_days(Days::new(offset as u64))
                .unwrap_or(NaiveDate::MIN)
        }
        Frequency::Monthly => date.with_day(1).unwrap_or(date),
    }
}

/// Last day of the bucket starting at `start`
///
/// Saturates at `NaiveDate::MAX` at the very end of chrono's calendar.
pub fn bucket_end(start: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => start,
        Frequency::Weekly => start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
        Frequency::Monthly => start
            .checked_add_months(Months::new(1))
            .and_then(|next_month| next_month.pred_opt())
            .unwrap_or(NaiveDate::MAX),
    }
}

/// Every bucket whose start lies in `[bucket_start(from), to]`, oldest first
///
/// Buckets are whole: the first may begin before `from` and the last may
/// end after `to`. An inverted range yields nothing.
pub fn buckets_between(from: NaiveDate, to: NaiveDate, frequency: Frequency) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    if to < from {
        return buckets;
    }

    let mut current = Some(Bucket::containing(from, frequency));
    while let Some(bucket) = current {
        if bucket.start > to {
            break;
        }
        buckets.push(bucket);
        current = bucket.next();
    }
    buckets
}

/// The `count` buckets ending with the one that contains `anchor`, oldest first
pub fn trailing_buckets(anchor: NaiveDate, frequency: Frequency, count: usize) -> Vec<Bucket> {
    let mut buckets = Vec::with_capacity(count);
    let mut current = Some(Bucket::containing(anchor, frequency));
    while let Some(bucket) = current {
        if buckets.len() == count {
            break;
        }
        buckets.push(bucket);
        current = bucket.previous();
    }
    buckets.reverse();
    buckets
}
