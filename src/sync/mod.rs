/// Outbound sync of individual state changes
///
/// The record mutator reports every non-neutral change to a notification sink.
/// Delivery is best-effort and at-most-once: a sink never blocks the caller and
/// never reports failure back into the mutation that triggered it.

pub mod webhook;

pub use webhook::*;

use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Habit, HabitId, Mark};

/// Errors raised by a sync transport
///
/// These are logged by the sink; they never reach the mutation caller.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook rejected notification with status {0}")]
    Rejected(u16),
}

/// Value pushed to the sink for a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum SyncValue {
    Success,
    Failure,
}

impl From<SyncValue> for u8 {
    fn from(value: SyncValue) -> Self {
        match value {
            SyncValue::Success => 1,
            SyncValue::Failure => 0,
        }
    }
}

impl From<Mark> for SyncValue {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Success => SyncValue::Success,
            Mark::Failure => SyncValue::Failure,
        }
    }
}

/// One state change as seen by the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncNotification {
    pub habit_id: HabitId,
    pub habit_name: String,
    pub category: String,
    pub date: NaiveDate,
    pub value: SyncValue,
}

impl SyncNotification {
    pub fn new(habit: &Habit, date: NaiveDate, mark: Mark) -> Self {
        Self {
            habit_id: habit.id,
            habit_name: habit.name.clone(),
            category: habit.category.clone(),
            date,
            value: mark.into(),
        }
    }
}

/// Capability the record mutator uses to mirror changes elsewhere
///
/// Implementations must return promptly and swallow (log) their own errors.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: SyncNotification);
}

/// Sink used when no sync target is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, notification: SyncNotification) {
        tracing::trace!(
            "Sync disabled, dropping notification for habit {} on {}",
            notification.habit_id,
            notification.date
        );
    }
}

/// Sink that holds notifications until the change they describe is saved
///
/// Tools mutate through one of these, persist the snapshot, and only then
/// release the held notifications to the real sink. A failed save drops them.
#[derive(Debug, Default)]
pub struct DeferredSink {
    pending: Mutex<Vec<SyncNotification>>,
}

impl DeferredSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward every held notification to `sink` in issue order
    pub fn release(self, sink: &dyn NotificationSink) -> usize {
        let pending = self.pending.into_inner().unwrap_or_else(PoisonError::into_inner);
        let count = pending.len();
        for notification in pending {
            sink.notify(notification);
        }
        count
    }
}

impl NotificationSink for DeferredSink {
    fn notify(&self, notification: SyncNotification) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
