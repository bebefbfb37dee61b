//! Achievement (encouragement) catalogue and per-entry display state

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Every achievement the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementId {
    /// Three nights in a row in bed between 19:00 and 23:00
    BedBeforeMidnight3Row,
    Moods3ThisWeek,
    Moods7DaysThisWeek,
    MoodsPast2Weeks,
    MoodsPast3Weeks,
    MoodsPast4Weeks,
    MoodsPast5Weeks,
    MoodsPast6Weeks,
    MoodsPast7Weeks,
    Moods15,
    Moods30,
    Moods50,
    Moods70,
    Moods100,
}

impl AchievementId {
    pub const ALL: [AchievementId; 14] = [
        AchievementId::BedBeforeMidnight3Row,
        AchievementId::Moods3ThisWeek,
        AchievementId::Moods7DaysThisWeek,
        AchievementId::MoodsPast2Weeks,
        AchievementId::MoodsPast3Weeks,
        AchievementId::MoodsPast4Weeks,
        AchievementId::MoodsPast5Weeks,
        AchievementId::MoodsPast6Weeks,
        AchievementId::MoodsPast7Weeks,
        AchievementId::Moods15,
        AchievementId::Moods30,
        AchievementId::Moods50,
        AchievementId::Moods70,
        AchievementId::Moods100,
    ];

    /// Multi-week streaks, index `k` is a run of `k + 2` weeks
    pub const WEEK_STREAKS: [AchievementId; 6] = [
        AchievementId::MoodsPast2Weeks,
        AchievementId::MoodsPast3Weeks,
        AchievementId::MoodsPast4Weeks,
        AchievementId::MoodsPast5Weeks,
        AchievementId::MoodsPast6Weeks,
        AchievementId::MoodsPast7Weeks,
    ];

    /// Cumulative milestones with the exact total that unlocks each
    pub const MILESTONES: [(u64, AchievementId); 5] = [
        (15, AchievementId::Moods15),
        (30, AchievementId::Moods30),
        (50, AchievementId::Moods50),
        (70, AchievementId::Moods70),
        (100, AchievementId::Moods100),
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::BedBeforeMidnight3Row => "bedBeforeMidnight3Row",
            AchievementId::Moods3ThisWeek => "moods3ThisWeek",
            AchievementId::Moods7DaysThisWeek => "moods7DaysThisWeek",
            AchievementId::MoodsPast2Weeks => "moodsPast2Weeks",
            AchievementId::MoodsPast3Weeks => "moodsPast3Weeks",
            AchievementId::MoodsPast4Weeks => "moodsPast4Weeks",
            AchievementId::MoodsPast5Weeks => "moodsPast5Weeks",
            AchievementId::MoodsPast6Weeks => "moodsPast6Weeks",
            AchievementId::MoodsPast7Weeks => "moodsPast7Weeks",
            AchievementId::Moods15 => "moods15",
            AchievementId::Moods30 => "moods30",
            AchievementId::Moods50 => "moods50",
            AchievementId::Moods70 => "moods70",
            AchievementId::Moods100 => "moods100",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    /// How long after display the entry can fire again; `None` means never
    pub fn rearm_delay(&self) -> Option<Duration> {
        match self {
            AchievementId::BedBeforeMidnight3Row | AchievementId::Moods3ThisWeek => {
                Some(Duration::days(3))
            }
            AchievementId::Moods7DaysThisWeek => Some(Duration::days(7)),
            _ => None,
        }
    }

    /// Title of the encouragement screen
    pub fn heading(&self) -> &'static str {
        match self {
            AchievementId::BedBeforeMidnight3Row => "3-day Streak!",
            AchievementId::Moods3ThisWeek => "3-log Streak!",
            AchievementId::Moods7DaysThisWeek => "7-log Streak!",
            AchievementId::MoodsPast2Weeks => "2-week Streak!",
            AchievementId::MoodsPast3Weeks => "3-week Streak!",
            AchievementId::MoodsPast4Weeks => "4-week Streak!",
            AchievementId::MoodsPast5Weeks => "5-week Streak!",
            AchievementId::MoodsPast6Weeks => "6-week Streak!",
            AchievementId::MoodsPast7Weeks => "7-week Streak!",
            AchievementId::Moods15 => "15 moods!",
            AchievementId::Moods30 => "30 moods!",
            AchievementId::Moods50 => "50 moods!",
            AchievementId::Moods70 => "70 moods!",
            AchievementId::Moods100 => "100 moods!",
        }
    }

    pub fn praise(&self) -> &'static str {
        match self {
            AchievementId::MoodsPast2Weeks | AchievementId::Moods15 => "Keep it up!",
            AchievementId::Moods3ThisWeek | AchievementId::Moods30 => "Way to go!",
            AchievementId::MoodsPast5Weeks | AchievementId::Moods70 => "Excellent!",
            AchievementId::MoodsPast6Weeks | AchievementId::Moods100 => "Congratulations!",
            AchievementId::MoodsPast7Weeks => "Brilliant!",
            AchievementId::BedBeforeMidnight3Row
            | AchievementId::Moods7DaysThisWeek
            | AchievementId::MoodsPast3Weeks
            | AchievementId::MoodsPast4Weeks
            | AchievementId::Moods50 => "Well done!",
        }
    }

    /// What was achieved
    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::BedBeforeMidnight3Row => "Bed before midnight each day",
            AchievementId::Moods3ThisWeek => "3 moods logged this week",
            AchievementId::Moods7DaysThisWeek => "Moods logged each day of the week",
            AchievementId::MoodsPast2Weeks => "Moods logged in the past 2 weeks",
            AchievementId::MoodsPast3Weeks => "Moods logged in the past 3 weeks",
            AchievementId::MoodsPast4Weeks => "Moods logged in the past 4 weeks",
            AchievementId::MoodsPast5Weeks => "Moods logged in the past 5 weeks",
            AchievementId::MoodsPast6Weeks => "Moods logged in the past 6 weeks",
            AchievementId::MoodsPast7Weeks => "Moods logged in the past 7 weeks",
            AchievementId::Moods15 => "15 moods logged",
            AchievementId::Moods30 => "30 moods logged",
            AchievementId::Moods50 => "50 moods logged",
            AchievementId::Moods70 => "70 moods logged",
            AchievementId::Moods100 => "100 moods logged",
        }
    }

    /// Follow-up advice shown under the description
    pub fn advice(&self) -> &'static str {
        match self {
            AchievementId::BedBeforeMidnight3Row => {
                "Maintain a sleep routine by sleeping and waking at a regular time each day."
            }
            _ => "Log your mood often to build an accurate picture of how you are feeling.",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One catalogue entry.
///
/// Whether the entry counts as already displayed is derived from
/// `last_displayed_at` and the entry's re-arm delay, so no timer has to
/// outlive the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: AchievementId,
    pub unlocked: bool,
    pub last_displayed_at: Option<NaiveDateTime>,
}

impl Achievement {
    pub fn new(id: AchievementId) -> Self {
        Self {
            id,
            unlocked: false,
            last_displayed_at: None,
        }
    }

    pub fn already_displayed(&self, now: NaiveDateTime) -> bool {
        match (self.last_displayed_at, self.id.rearm_delay()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(shown), Some(delay)) => now - shown < delay,
        }
    }

    /// Consume an unlock.
    ///
    /// Returns `true` when the entry should be surfaced now. An unlock that
    /// arrives while the entry still counts as displayed is dropped.
    pub fn take_for_display(&mut self, now: NaiveDateTime) -> bool {
        if !self.unlocked {
            return false;
        }
        self.unlocked = false;
        if self.already_displayed(now) {
            return false;
        }
        self.last_displayed_at = Some(now);
        true
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAchievement {
    #[serde(default)]
    unlocked: bool,
    #[serde(default)]
    last_displayed_at: Option<NaiveDateTime>,
}

/// The full set of achievements, one entry per [`AchievementId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementCatalogue {
    entries: BTreeMap<AchievementId, Achievement>,
}

impl Default for AchievementCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementCatalogue {
    pub fn new() -> Self {
        let mut catalogue = Self {
            entries: BTreeMap::new(),
        };
        catalogue.ensure_all();
        catalogue
    }

    /// Decode the persisted `{id: {unlocked, lastDisplayedAt}}` object.
    ///
    /// Unknown keys and undecodable entries are skipped and returned so the
    /// caller can report them; missing entries are created fresh.
    pub fn from_persisted(value: &serde_json::Value) -> (Self, Vec<String>) {
        let mut entries = BTreeMap::new();
        let mut skipped = Vec::new();

        if let Some(object) = value.as_object() {
            for (key, raw) in object {
                let Some(id) = AchievementId::from_key(key) else {
                    skipped.push(key.clone());
                    continue;
                };
                match serde_json::from_value::<StoredAchievement>(raw.clone()) {
                    Ok(stored) => {
                        entries.insert(
                            id,
                            Achievement {
                                id,
                                unlocked: stored.unlocked,
                                last_displayed_at: stored.last_displayed_at,
                            },
                        );
                    }
                    Err(_) => skipped.push(key.clone()),
                }
            }
        }

        let mut catalogue = Self { entries };
        catalogue.ensure_all();
        (catalogue, skipped)
    }

    pub fn to_persisted(&self) -> serde_json::Value {
        let object: serde_json::Map<String, serde_json::Value> = self
            .entries
            .values()
            .map(|a| {
                let stored = StoredAchievement {
                    unlocked: a.unlocked,
                    last_displayed_at: a.last_displayed_at,
                };
                (
                    a.id.key().to_string(),
                    serde_json::to_value(stored).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        serde_json::Value::Object(object)
    }

    /// Create any missing entries. Returns how many were added.
    pub fn ensure_all(&mut self) -> usize {
        let before = self.entries.len();
        for id in AchievementId::ALL {
            self.entries.entry(id).or_insert_with(|| Achievement::new(id));
        }
        self.entries.len() - before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.entries.get(&id)
    }

    pub fn unlock(&mut self, id: AchievementId) {
        self.entries
            .entry(id)
            .or_insert_with(|| Achievement::new(id))
            .unlocked = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> + '_ {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Achievement> + '_ {
        self.entries.values_mut()
    }
}
