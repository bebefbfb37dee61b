//! Everything the app keeps between launches

use super::achievement::AchievementCatalogue;
use super::counters::RollingCounters;
use super::reminder::ReminderSettings;
use super::store::DailyRecordStore;
use super::tips::TipDeck;

/// The single owner of all mutable app state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodState {
    pub store: DailyRecordStore,
    pub achievements: AchievementCatalogue,
    pub counters: RollingCounters,
    pub tips: TipDeck,
    pub reminders: ReminderSettings,
    pub has_already_launched: bool,
}
