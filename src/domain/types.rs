/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like HabitId, Frequency, HabitType
/// and the tri-state Status that Habit, the resolver and the aggregators share.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Date format used for every date crossing the tool boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar date
///
/// The core assumes well-formed dates, so callers validate with this first.
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}

/// Unique identifier for a habit
///
/// Ids are user-assigned positive integers. The store offers the lowest unused
/// one as a default but any free value is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HabitId(pub u32);

impl HabitId {
    /// Build an id, rejecting zero
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation {
                message: "Habit id must be a positive integer".to_string(),
            });
        }
        Ok(Self(value))
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a habit should be performed
///
/// The frequency decides the bucket a date belongs to: the day itself,
/// the Sunday-start week, or the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    Daily,
    /// Once per Sunday-to-Saturday week
    Weekly,
    /// Once per calendar month
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Name of the bucket unit, used when rendering grids and rates
    pub fn unit_name(&self) -> &'static str {
        match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, weekly, monthly",
                other
            ))),
        }
    }
}

/// Polarity of a habit
///
/// Display metadata only: resolution and rates treat success the same way
/// for both kinds, the UI just phrases outcomes differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    /// Something to do (e.g., "Read 20 pages")
    #[default]
    Positive,
    /// Something to avoid (e.g., "No sugar")
    Negative,
}

impl HabitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Positive => "positive",
            HabitType::Negative => "negative",
        }
    }

    /// Phrase a resolved status for this polarity
    pub fn describe(&self, status: Status) -> &'static str {
        match (self, status) {
            (HabitType::Positive, Status::Success) => "done",
            (HabitType::Positive, Status::Failure) => "missed",
            (HabitType::Negative, Status::Success) => "resisted",
            (HabitType::Negative, Status::Failure) => "slipped",
            (_, Status::Neutral) => "unmarked",
        }
    }
}

impl FromStr for HabitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(HabitType::Positive),
            "negative" => Ok(HabitType::Negative),
            other => Err(DomainError::Validation {
                message: format!("Invalid habit type '{}'. Valid options: positive, negative", other),
            }),
        }
    }
}

/// A raw record stored in a habit's completion map
///
/// Neutral is the absence of a record, so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Success,
    Failure,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Success => "success",
            Mark::Failure => "failure",
        }
    }
}

impl FromStr for Mark {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Mark::Success),
            "failure" => Ok(Mark::Failure),
            other => Err(DomainError::Validation {
                message: format!("Invalid completion mark '{}'", other),
            }),
        }
    }
}

/// Resolved tri-state outcome of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
    #[default]
    Neutral,
}

impl Status {
    /// Next status in the toggle cycle: neutral -> success -> failure -> neutral
    pub fn cycle(self) -> Self {
        match self {
            Status::Neutral => Status::Success,
            Status::Success => Status::Failure,
            Status::Failure => Status::Neutral,
        }
    }

    /// The record that represents this status, if any
    pub fn mark(self) -> Option<Mark> {
        match self {
            Status::Success => Some(Mark::Success),
            Status::Failure => Some(Mark::Failure),
            Status::Neutral => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Neutral => "neutral",
        }
    }

    /// Single-character cell used by history grids
    pub fn symbol(&self) -> char {
        match self {
            Status::Success => '✓',
            Status::Failure => '✗',
            Status::Neutral => '·',
        }
    }
}

impl From<Mark> for Status {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Success => Status::Success,
            Mark::Failure => Status::Failure,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" | "done" => Ok(Status::Success),
            "failure" | "missed" => Ok(Status::Failure),
            "neutral" | "clear" | "cleared" => Ok(Status::Neutral),
            other => Err(DomainError::Validation {
                message: format!("Invalid status '{}'. Valid options: success, failure, neutral", other),
            }),
        }
    }
}
