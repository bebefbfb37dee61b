//! Sleep and activity levels derived from daily measurements

use serde::{Deserialize, Serialize};

use super::clock::ClockTime;
use super::record::Reading;

/// How full the sleep gauge is for a night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SleepLevel {
    Full,
    MostlyFull,
    Half,
    Low,
}

impl SleepLevel {
    /// Unknown durations show as `Full` so a missing night does not look alarming
    pub fn from_time_in_bed(time_in_bed: Reading<ClockTime>) -> Self {
        match time_in_bed.value().map(|t| t.hour()) {
            None => SleepLevel::Full,
            Some(h) if h >= 8 => SleepLevel::Full,
            Some(h) if h >= 6 => SleepLevel::MostlyFull,
            Some(h) if h >= 4 => SleepLevel::Half,
            Some(_) => SleepLevel::Low,
        }
    }
}

/// Which walking figure represents a day's activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityIcon {
    Walking,
    FastWalking,
    Running,
}

impl ActivityIcon {
    pub fn from_steps(steps: Reading<u32>) -> Self {
        match steps.value() {
            Some(s) if s >= 8000 => ActivityIcon::Running,
            Some(s) if s >= 3000 => ActivityIcon::FastWalking,
            _ => ActivityIcon::Walking,
        }
    }
}

/// Activity level on the 1-5 scale sent with lifestyle reports.
///
/// A zero count is a sensor gap rather than a sedentary day and maps to the
/// middle of the scale.
pub fn activity_level(steps: u32) -> u8 {
    match steps {
        0 => 3,
        s if s >= 10_000 => 5,
        s if s >= 8_000 => 4,
        s if s >= 5_000 => 3,
        s if s >= 2_000 => 2,
        _ => 1,
    }
}

/// Whole hours of a time-in-bed duration
pub fn hours_slept(time_in_bed: ClockTime) -> u32 {
    time_in_bed.hour()
}
