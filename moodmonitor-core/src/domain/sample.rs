//! Raw inputs handed to the reconciler
//!
//! Fields are optional or loosely typed on purpose: a sample that is missing
//! a field, or carries a value out of range, is applied as "no update" for
//! that field rather than rejected as a whole.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::clock::ClockTime;
use super::mood::{Factor, MoodValue};

/// Datetime layout used on the wire for moods and lifestyle entries
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One night of sleep as reported by the health source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSample {
    /// Date the sleep session ended on; the record it belongs to
    pub end_date: Option<NaiveDate>,
    pub seconds_in_bed: Option<f64>,
    /// When the user went to bed
    pub bedtime_start: Option<NaiveDateTime>,
}

/// Cumulative step count for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSample {
    pub date: Option<NaiveDate>,
    pub cumulative_steps: Option<f64>,
}

/// A mood tapped in by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSubmission {
    pub date: NaiveDate,
    /// Unvalidated; anything outside 1..=5 is ignored
    pub value: i64,
    pub factors: Vec<String>,
    pub time: ClockTime,
}

impl MoodSubmission {
    pub fn new(date: NaiveDate, value: i64, factors: Vec<String>, time: ClockTime) -> Self {
        Self {
            date,
            value,
            factors,
            time,
        }
    }

    pub fn at(datetime: NaiveDateTime, value: i64, factors: Vec<String>) -> Self {
        Self::new(datetime.date(), value, factors, ClockTime::from_time(datetime.time()))
    }

    pub fn wire_datetime(&self) -> String {
        format!("{} {}", self.date.format("%Y-%m-%d"), self.time)
    }
}

/// A mood as exchanged with the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMood {
    #[serde(alias = "mood")]
    pub value: i64,
    #[serde(default)]
    pub factors: Vec<String>,
    /// `yyyy-MM-dd HH:mm`
    pub datetime: String,
}

/// A remote mood after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRemoteMood {
    pub at: NaiveDateTime,
    pub value: MoodValue,
    pub factors: Vec<Factor>,
}

impl RemoteMood {
    pub fn from_submission(submission: &MoodSubmission) -> Self {
        Self {
            value: submission.value,
            factors: submission.factors.clone(),
            datetime: submission.wire_datetime(),
        }
    }

    /// Validate the entry; `None` when the value or datetime is unusable
    pub fn parse(&self) -> Option<ParsedRemoteMood> {
        let value = MoodValue::new(self.value)?;
        let at = NaiveDateTime::parse_from_str(self.datetime.trim(), WIRE_DATETIME_FORMAT).ok()?;
        Some(ParsedRemoteMood {
            at,
            value,
            factors: Factor::parse_all(&self.factors),
        })
    }
}

/// A bundle of health samples, as produced by a health source or a JSON export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthBatch {
    #[serde(default)]
    pub sleep: Vec<SleepSample>,
    #[serde(default)]
    pub steps: Vec<StepSample>,
}
