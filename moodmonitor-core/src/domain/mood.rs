//! Mood values and the factors a user can attach to them

use std::fmt;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// A self-reported mood on the 1 (worst) to 5 (best) scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodValue(u8);

impl MoodValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodValue {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            Error::validation(format!(
                "mood must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ))
        })
    }
}

impl From<MoodValue> for u8 {
    fn from(value: MoodValue) -> Self {
        value.0
    }
}

impl fmt::Display for MoodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that may have influenced a mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Factor {
    Sleep,
    Exercise,
    Diet,
    Coffee,
    Alcohol,
    Medication,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Sleep,
        Factor::Exercise,
        Factor::Diet,
        Factor::Coffee,
        Factor::Alcohol,
        Factor::Medication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Sleep => "Sleep",
            Factor::Exercise => "Exercise",
            Factor::Diet => "Diet",
            Factor::Coffee => "Coffee",
            Factor::Alcohol => "Alcohol",
            Factor::Medication => "Medication",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
    }

    /// Keep the recognised factor names, dropping unknown ones and duplicates
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Vec<Factor> {
        let mut factors: Vec<Factor> = names.iter().filter_map(|n| Self::parse(n.as_ref())).collect();
        factors.sort();
        factors.dedup();
        factors
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_value_range() {
        assert!(MoodValue::new(0).is_none());
        assert_eq!(MoodValue::new(1).map(|m| m.get()), Some(1));
        assert_eq!(MoodValue::new(5).map(|m| m.get()), Some(5));
        assert!(MoodValue::new(6).is_none());
    }

    #[test]
    fn test_mood_value_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<MoodValue>("3").is_ok());
        assert!(serde_json::from_str::<MoodValue>("9").is_err());
    }

    #[test]
    fn test_factor_parse_all_drops_unknown() {
        let factors = Factor::parse_all(&["sleep", "Coffee", "Weather", "SLEEP"]);
        assert_eq!(factors, vec![Factor::Sleep, Factor::Coffee]);
    }
}
