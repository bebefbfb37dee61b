//! Day-over-day trend indicators

use serde::{Deserialize, Serialize};

/// Direction of today's value against yesterday's.
///
/// For bedtime `Increase` means an earlier night, i.e. an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increase,
    Decrease,
    Same,
    /// One of the two days is missing or unknown
    Undetermined,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Increase => "↑",
            Trend::Decrease => "↓",
            Trend::Same => "=",
            Trend::Undetermined => "",
        }
    }
}

/// Trend indicators for the three tracked metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub bedtime: Trend,
    pub time_in_bed: Trend,
    pub steps: Trend,
}

impl Default for TrendReport {
    fn default() -> Self {
        Self {
            bedtime: Trend::Undetermined,
            time_in_bed: Trend::Undetermined,
            steps: Trend::Undetermined,
        }
    }
}
