//! Core domain entities
//!
//! All domain types are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod achievement;
pub mod clock;
mod counters;
pub mod levels;
mod mood;
pub mod record;
pub mod reminder;
pub mod result;
pub mod sample;
mod state;
pub mod store;
pub mod tips;
mod trend;

pub use achievement::{Achievement, AchievementCatalogue, AchievementId};
pub use clock::{round_to_half_hour, ClockTime};
pub use counters::RollingCounters;
pub use levels::{activity_level, hours_slept, ActivityIcon, SleepLevel};
pub use mood::{Factor, MoodValue};
pub use record::{DailyRecord, Reading, RecordField};
pub use reminder::{PlannedReminder, ReminderSettings, ReminderWindow};
pub use sample::{HealthBatch, MoodSubmission, ParsedRemoteMood, RemoteMood, SleepSample, StepSample};
pub use state::MoodState;
pub use store::{DailyRecordStore, WINDOW_LIMIT};
pub use tips::TipDeck;
pub use trend::{Trend, TrendReport};
