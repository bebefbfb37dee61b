//! Remote mood sync endpoint port

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::RemoteMood;

/// One lifestyle entry pushed to the remote platform.
///
/// Exactly one of `exercise` (activity level 1-5) or `sleep` (whole hours)
/// is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<u32>,
    /// `yyyy-MM-dd HH:mm`
    pub datetime: String,
}

/// Exchanges moods and lifestyle data with the remote platform
pub trait MoodSyncEndpoint: Send + Sync {
    /// Endpoint name (e.g. "http", "demo")
    fn name(&self) -> &str;

    /// Push a single mood
    fn send_mood(&self, mood: &RemoteMood) -> Result<()>;

    /// Fetch the moods the platform holds for this user
    fn fetch_moods(&self) -> Result<Vec<RemoteMood>>;

    /// Push lifestyle entries
    fn send_lifestyle(&self, entries: &[LifestyleEntry]) -> Result<()>;
}
