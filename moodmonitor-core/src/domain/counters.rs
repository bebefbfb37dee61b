//! Scalar counters the achievement rules read

use serde::{Deserialize, Serialize};

use super::clock::ClockTime;
use super::record::Reading;

/// Counters owned by the achievement engine.
///
/// Only `total_moods_logged` is persisted. The other two are filled from the
/// record store at the start of an evaluation pass and cleared after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingCounters {
    pub total_moods_logged: u64,
    /// Bedtimes of today, yesterday and the day before, newest first
    #[serde(skip)]
    pub recent_bedtimes: Vec<Reading<ClockTime>>,
    /// Days with a mood in the trailing 7-day window
    #[serde(skip)]
    pub recent_mood_log_count: u32,
}

impl RollingCounters {
    pub fn with_total(total_moods_logged: u64) -> Self {
        Self {
            total_moods_logged,
            ..Self::default()
        }
    }

    pub fn record_mood(&mut self) {
        self.total_moods_logged = self.total_moods_logged.saturating_add(1);
    }

    /// Forget the per-pass values
    pub fn clear_pass(&mut self) {
        self.recent_bedtimes.clear();
        self.recent_mood_log_count = 0;
    }
}
