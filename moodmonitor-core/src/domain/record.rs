//! Daily record domain model

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::clock::ClockTime;
use super::mood::{Factor, MoodValue};

/// Sentinel text persisted for a value that has not been measured
pub const UNKNOWN: &str = "unknown";

/// A measured value or the "unknown" sentinel.
///
/// Serializes as the bare value, or as the string `"unknown"`. Anything that
/// does not decode as the value (including the legacy `"-"` placeholder)
/// reads back as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reading<T> {
    Known(T),
    Unknown,
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Reading::Unknown
    }
}

impl<T> Reading<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Reading::Known(value) => Some(value),
            Reading::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Reading::Unknown)
    }
}

impl<T: Copy> Reading<T> {
    pub fn value(&self) -> Option<T> {
        self.known().copied()
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reading::Known(v),
            None => Reading::Unknown,
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reading::Known(value) => value.fmt(f),
            Reading::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Known(value) => value.serialize(serializer),
            Reading::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Reading<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Known(T),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Raw::<T>::deserialize(deserializer)? {
            Raw::Known(value) => Reading::Known(value),
            Raw::Other(_) => Reading::Unknown,
        })
    }
}

/// One calendar day's self-report and sensor summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Upper-case weekday abbreviation, e.g. `MON`
    #[serde(rename = "day", default)]
    pub day_label: String,
    /// At most one value is kept per day, the list form is kept for storage compatibility
    #[serde(default)]
    pub moods: Vec<MoodValue>,
    #[serde(default)]
    pub factors: Vec<Factor>,
    #[serde(default)]
    pub bedtime: Reading<ClockTime>,
    #[serde(rename = "inBed", default)]
    pub time_in_bed: Reading<ClockTime>,
    #[serde(default)]
    pub steps: Reading<u32>,
    /// When the kept mood was logged
    #[serde(rename = "time", default, deserialize_with = "lenient_time")]
    pub last_mood_time: Option<ClockTime>,
}

impl DailyRecord {
    /// A fresh record with no moods and every measurement unknown
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day_label: day_label(date),
            moods: Vec::new(),
            factors: Vec::new(),
            bedtime: Reading::Unknown,
            time_in_bed: Reading::Unknown,
            steps: Reading::Unknown,
            last_mood_time: None,
        }
    }

    pub fn has_moods(&self) -> bool {
        !self.moods.is_empty()
    }

    pub fn last_mood(&self) -> Option<MoodValue> {
        self.moods.last().copied()
    }

    /// Apply a single field write
    pub fn apply(&mut self, field: RecordField) {
        match field {
            RecordField::Moods(moods) => self.moods = moods,
            RecordField::Factors(factors) => self.factors = factors,
            RecordField::Bedtime(value) => self.bedtime = value,
            RecordField::TimeInBed(value) => self.time_in_bed = value,
            RecordField::Steps(value) => self.steps = value,
            RecordField::LastMoodTime(time) => self.last_mood_time = time,
        }
    }
}

/// A single writable field of a [`DailyRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordField {
    Moods(Vec<MoodValue>),
    Factors(Vec<Factor>),
    Bedtime(Reading<ClockTime>),
    TimeInBed(Reading<ClockTime>),
    Steps(Reading<u32>),
    LastMoodTime(Option<ClockTime>),
}

fn lenient_time<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ClockTime>, D::Error> {
    Ok(Reading::<ClockTime>::deserialize(deserializer)?.value())
}

/// Upper-case three letter weekday name for a date
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a").to_string().to_uppercase()
}
