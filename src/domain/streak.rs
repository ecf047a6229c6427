/// Streak tracking functionality
///
/// The stored `Habit::streak` is a counter moved by toggles. This module holds
/// the toggle step rules and the history-derived calculations used when a
/// past date is logged directly and when reports are built.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{resolve_bucket, Bucket, Frequency, Habit, Status};

/// New counter value after a toggle lands on `next`
///
/// Success increments, failure resets, and clearing steps back by one.
pub fn step_streak(streak: u32, next: Status) -> u32 {
    match next {
        Status::Success => streak.saturating_add(1),
        Status::Failure => 0,
        Status::Neutral => streak.saturating_sub(1),
    }
}

/// Streak statistics derived from a habit's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Consecutive successful buckets up to the current one
    pub current: u32,
    /// Best run of consecutive successful buckets ever recorded
    pub longest: u32,
    /// Date of the most recent success record
    pub last_success: Option<NaiveDate>,
}

impl StreakSummary {
    /// Calculate streak statistics for `habit` as of `today`
    pub fn from_history(habit: &Habit, today: NaiveDate) -> Self {
        let current = current_streak(habit, today);
        let longest = longest_streak(habit, today).max(current);
        let last_success = habit
            .completions
            .iter()
            .rev()
            .find(|(_, mark)| Status::from(**mark) == Status::Success)
            .map(|(date, _)| *date);

        Self {
            current,
            longest,
            last_success,
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self, frequency: Frequency) -> String {
        let unit = frequency.unit_name();
        match self.current {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => format!("Great start! One {} down, keep the momentum going.", unit),
            2..=6 => format!("Nice work! {} {}s in a row. You're building a strong habit.", self.current, unit),
            7..=13 => format!("Excellent! {} {}s strong. You're in the groove now!", self.current, unit),
            14..=29 => format!("Amazing! {} {}s straight. This is becoming second nature.", self.current, unit),
            _ => format!("Legendary! {} {}s of unwavering commitment.", self.current, unit),
        }
    }
}

/// Consecutive successful buckets counted backwards from today's bucket
///
/// If today's bucket has no success yet, counting starts from the previous
/// bucket so an in-progress period does not break the streak.
pub fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut bucket = Bucket::containing(today, habit.frequency);
    if resolve_bucket(habit, &bucket) != Status::Success {
        bucket = match bucket.previous() {
            Some(previous) => previous,
            None => return 0,
        };
    }

    let oldest = match habit.completions.keys().next() {
        Some(date) => *date,
        None => return 0,
    };

    let mut streak = 0;
    loop {
        if bucket.end < oldest || resolve_bucket(habit, &bucket) != Status::Success {
            break;
        }
        streak += 1;
        bucket = match bucket.previous() {
            Some(previous) => previous,
            None => break,
        };
    }
    streak
}

/// Longest run of consecutive successful buckets up to today's bucket
pub fn longest_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let oldest = match habit.completions.keys().next() {
        Some(date) => *date,
        None => return 0,
    };

    let mut longest = 0;
    let mut run = 0;
    for bucket in crate::domain::buckets_between(oldest, today, habit.frequency) {
        if resolve_bucket(habit, &bucket) == Status::Success {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HabitId, HabitType, Mark};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(frequency: Frequency) -> Habit {
        Habit::new(
            HabitId(2),
            "Journal".to_string(),
            "Mindfulness".to_string(),
            HabitType::Positive,
            frequency,
        )
        .unwrap()
    }

    #[test]
    fn test_step_streak_rules() {
        assert_eq!(step_streak(3, Status::Success), 4);
        assert_eq!(step_streak(3, Status::Failure), 0);
        assert_eq!(step_streak(3, Status::Neutral), 2);
        assert_eq!(step_streak(0, Status::Neutral), 0);
    }

    #[test]
    fn test_current_streak_skips_in_progress_day() {
        let mut h = habit(Frequency::Daily);
        h.completions.insert(date(2024, 5, 8), Mark::Success);
        h.completions.insert(date(2024, 5, 9), Mark::Success);

        // Today (the 10th) is still open
        assert_eq!(current_streak(&h, date(2024, 5, 10)), 2);
        // Two days later the run is broken
        assert_eq!(current_streak(&h, date(2024, 5, 11)), 0);
    }

    #[test]
    fn test_weekly_streak_counts_buckets() {
        let mut h = habit(Frequency::Weekly);
        h.completions.insert(date(2024, 2, 20), Mark::Success);
        h.completions.insert(date(2024, 2, 26), Mark::Success);
        h.completions.insert(date(2024, 3, 6), Mark::Success);

        assert_eq!(current_streak(&h, date(2024, 3, 7)), 3);
    }

    #[test]
    fn test_longest_streak_survives_a_failure() {
        let mut h = habit(Frequency::Daily);
        for day in 1..=4 {
            h.completions.insert(date(2024, 1, day), Mark::Success);
        }
        h.completions.insert(date(2024, 1, 5), Mark::Failure);
        h.completions.insert(date(2024, 1, 6), Mark::Success);

        let summary = StreakSummary::from_history(&h, date(2024, 1, 6));
        assert_eq!(summary.current, 1);
        assert_eq!(summary.longest, 4);
        assert_eq!(summary.last_success, Some(date(2024, 1, 6)));
    }

    #[test]
    fn test_motivational_messages_use_bucket_unit() {
        let summary = StreakSummary {
            current: 3,
            longest: 3,
            last_success: None,
        };
        assert!(summary.motivational_message(Frequency::Weekly).contains("3 weeks"));
        assert!(summary.motivational_message(Frequency::Daily).contains("Nice work"));
    }
}
