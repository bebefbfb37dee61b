//! Health sample source port
//!
//! The core never queries a health store itself. A source hands over the
//! samples it has for a date range and the reconciler merges them.

use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{SleepSample, StepSample};

/// Supplies sleep and step samples on demand
pub trait HealthSampleSource: Send + Sync {
    /// Source name (e.g. "demo", "file")
    fn name(&self) -> &str;

    /// Sleep sessions that ended between `from` and `to` inclusive
    fn sleep_samples(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SleepSample>>;

    /// Daily cumulative step counts between `from` and `to` inclusive
    fn step_samples(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<StepSample>>;
}
