//! Clock times and sleep durations in `HH:mm` form

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::result::Error;

pub const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HALF_HOUR: i64 = 1_800;

/// A time of day, or a duration below 24h, at minute resolution.
///
/// Both bedtimes and time-in-bed values use this type. Ordering is
/// chronological, which matches the lexicographic order of the zero-padded
/// `HH:mm` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { minutes: 0 };
    pub const NOON: ClockTime = ClockTime { minutes: 12 * 60 };

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Build from a number of seconds since midnight (truncated to the minute)
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        if !(0..SECONDS_PER_DAY).contains(&seconds) {
            return None;
        }
        Some(Self {
            minutes: (seconds / 60) as u16,
        })
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    pub fn total_minutes(&self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn as_seconds(&self) -> i64 {
        i64::from(self.minutes) * 60
    }

    /// Parse `HH:mm`, also accepting unpadded `H:m` and the `HHhMM` display form
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (hours, minutes) = text.split_once(':').or_else(|| text.split_once('h'))?;
        let hour: u32 = hours.trim().parse().ok()?;
        let minute: u32 = minutes.trim().parse().ok()?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::validation(format!("invalid clock time: {}", s)))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Round a number of seconds to the nearest half hour.
///
/// Ties round up. Results at or past 24h wrap back around to `00:00`.
/// Negative input has no meaningful rounding and yields `None`.
pub fn round_to_half_hour(seconds: i64) -> Option<ClockTime> {
    if seconds < 0 {
        return None;
    }

    // Rounding commutes with the day modulus; reducing first keeps the sums in range
    let seconds = seconds % SECONDS_PER_DAY;
    let previous = seconds - seconds % SECONDS_PER_HALF_HOUR;
    let next = previous + SECONDS_PER_HALF_HOUR;

    let nearest = if seconds - previous < next - seconds {
        previous
    } else {
        next
    };

    ClockTime::from_seconds(nearest.rem_euclid(SECONDS_PER_DAY))
}
