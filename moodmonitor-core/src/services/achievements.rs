//! Achievement engine - evaluates the streak and milestone rules
//!
//! A pass fills the per-pass counters from the store, unlocks every entry
//! whose rule holds, then clears the per-pass counters again. Display is a
//! separate step so the caller decides when unlocks are surfaced.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{
    AchievementCatalogue, AchievementId, ClockTime, DailyRecordStore, Reading, RollingCounters,
};

/// Number of trailing weeks checked for the multi-week streaks
pub const STREAK_WEEKS: usize = 8;

/// An achievement surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementEvent {
    pub id: AchievementId,
    pub heading: String,
    pub praise: String,
    pub description: String,
    pub advice: String,
    pub displayed_at: NaiveDateTime,
}

impl AchievementEvent {
    pub fn new(id: AchievementId, displayed_at: NaiveDateTime) -> Self {
        Self {
            id,
            heading: id.heading().to_string(),
            praise: id.praise().to_string(),
            description: id.description().to_string(),
            advice: id.advice().to_string(),
            displayed_at,
        }
    }
}

/// Which of the trailing 8 weeks contain at least one logged mood.
///
/// Week 1 covers 0 to 7 days ago, week `k` covers `7(k-1)+1` to `7k` days ago.
pub fn weeks_with_moods(store: &DailyRecordStore, today: NaiveDate) -> [bool; STREAK_WEEKS] {
    let mut weeks = [false; STREAK_WEEKS];
    for (k, week) in weeks.iter_mut().enumerate() {
        let nearest = if k == 0 { 0 } else { 7 * k as i64 + 1 };
        let furthest = 7 * (k as i64 + 1);
        *week = store
            .range(today - Duration::days(furthest), today - Duration::days(nearest))
            .any(|record| record.has_moods());
    }
    weeks
}

/// Length of the longest run of consecutive `true` weeks
pub fn longest_run(weeks: &[bool]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &week in weeks {
        if week {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Streak achievement for a run of weeks, longest first, at most one
pub fn week_streak_for_run(run: usize) -> Option<AchievementId> {
    if run < 2 {
        return None;
    }
    let index = run.min(AchievementId::WEEK_STREAKS.len() + 1) - 2;
    AchievementId::WEEK_STREAKS.get(index).copied()
}

/// Bedtime window for the early-night streak, in minutes since midnight
const EARLY_BEDTIME_MINUTES: std::ops::RangeInclusive<u32> = (19 * 60)..=(23 * 60);

fn bedtime_in_range(bedtime: &Reading<ClockTime>) -> bool {
    bedtime
        .value()
        .is_some_and(|t| EARLY_BEDTIME_MINUTES.contains(&t.total_minutes()))
}

/// Evaluates the rule catalogue against the store and counters
pub struct AchievementEngine<'a> {
    store: &'a DailyRecordStore,
    catalogue: &'a mut AchievementCatalogue,
    counters: &'a mut RollingCounters,
}

impl<'a> AchievementEngine<'a> {
    pub fn new(
        store: &'a DailyRecordStore,
        catalogue: &'a mut AchievementCatalogue,
        counters: &'a mut RollingCounters,
    ) -> Self {
        Self {
            store,
            catalogue,
            counters,
        }
    }

    /// Run every rule for `today` and return the entries unlocked by this pass
    pub fn evaluate(&mut self, today: NaiveDate) -> Vec<AchievementId> {
        self.fill_counters(today);

        let mut unlocked = Vec::new();

        let run = longest_run(&weeks_with_moods(self.store, today));
        if let Some(id) = week_streak_for_run(run) {
            unlocked.push(id);
        }

        if self.counters.recent_bedtimes.len() == 3
            && self.counters.recent_bedtimes.iter().all(bedtime_in_range)
        {
            unlocked.push(AchievementId::BedBeforeMidnight3Row);
        }

        match self.counters.recent_mood_log_count {
            3 => unlocked.push(AchievementId::Moods3ThisWeek),
            7 => unlocked.push(AchievementId::Moods7DaysThisWeek),
            _ => {}
        }

        if let Some((_, id)) = AchievementId::MILESTONES
            .iter()
            .find(|(total, _)| *total == self.counters.total_moods_logged)
        {
            unlocked.push(*id);
        }

        for id in &unlocked {
            self.catalogue.unlock(*id);
        }

        self.counters.clear_pass();
        unlocked
    }

    /// Surface every unlocked entry that is not still within its display window
    pub fn display(&mut self, now: NaiveDateTime) -> Vec<AchievementEvent> {
        self.catalogue
            .iter_mut()
            .filter_map(|achievement| {
                achievement
                    .take_for_display(now)
                    .then(|| AchievementEvent::new(achievement.id, now))
            })
            .collect()
    }

    fn fill_counters(&mut self, today: NaiveDate) {
        let store = self.store;
        self.counters.recent_bedtimes = (0..3)
            .map(|offset| {
                store
                    .get(today - Duration::days(offset))
                    .map(|record| record.bedtime)
                    .unwrap_or_default()
            })
            .collect();

        self.counters.recent_mood_log_count = store
            .range(today - Duration::days(6), today)
            .filter(|record| record.has_moods())
            .count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MoodValue, RecordField};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn log_mood(store: &mut DailyRecordStore, days_ago: i64) {
        store.upsert(
            today() - Duration::days(days_ago),
            RecordField::Moods(vec![MoodValue::new(3).unwrap()]),
        );
    }

    fn bedtime(store: &mut DailyRecordStore, days_ago: i64, hour: u32, minute: u32) {
        store.upsert(
            today() - Duration::days(days_ago),
            RecordField::Bedtime(Reading::Known(ClockTime::new(hour, minute).unwrap())),
        );
    }

    fn evaluate(store: &DailyRecordStore, counters: &mut RollingCounters) -> Vec<AchievementId> {
        let mut catalogue = AchievementCatalogue::new();
        AchievementEngine::new(store, &mut catalogue, counters).evaluate(today())
    }

    #[test]
    fn test_longest_run_anywhere() {
        assert_eq!(longest_run(&[true, true, true, true, false, false, false, false]), 4);
        assert_eq!(longest_run(&[false, true, true, false, true, true, true, false]), 3);
        assert_eq!(longest_run(&[false; 8]), 0);
        assert_eq!(longest_run(&[true; 8]), 8);
    }

    #[test]
    fn test_streak_reports_only_longest() {
        assert_eq!(week_streak_for_run(4), Some(AchievementId::MoodsPast4Weeks));
        assert_eq!(week_streak_for_run(1), None);
        // Eight straight weeks still caps at the 7 week entry
        assert_eq!(week_streak_for_run(8), Some(AchievementId::MoodsPast7Weeks));
    }

    #[test]
    fn test_week_boundaries() {
        let mut store = DailyRecordStore::new();
        // 7 days ago is still week 1, 8 days ago is week 2
        log_mood(&mut store, 7);
        log_mood(&mut store, 8);
        log_mood(&mut store, 22);

        let weeks = weeks_with_moods(&store, today());
        assert_eq!(weeks, [true, true, false, true, false, false, false, false]);
    }

    #[test]
    fn test_four_week_streak_unlocks_only_four() {
        let mut store = DailyRecordStore::new();
        for days_ago in [1, 10, 17, 24] {
            log_mood(&mut store, days_ago);
        }
        let mut counters = RollingCounters::default();
        let unlocked = evaluate(&store, &mut counters);

        assert!(unlocked.contains(&AchievementId::MoodsPast4Weeks));
        assert!(!unlocked.contains(&AchievementId::MoodsPast3Weeks));
        assert!(!unlocked.contains(&AchievementId::MoodsPast2Weeks));
    }

    #[test]
    fn test_bedtime_streak() {
        let mut store = DailyRecordStore::new();
        bedtime(&mut store, 0, 22, 30);
        bedtime(&mut store, 1, 19, 0);
        bedtime(&mut store, 2, 23, 0);
        let mut counters = RollingCounters::default();
        assert!(evaluate(&store, &mut counters).contains(&AchievementId::BedBeforeMidnight3Row));

        bedtime(&mut store, 1, 23, 30);
        assert!(!evaluate(&store, &mut counters).contains(&AchievementId::BedBeforeMidnight3Row));
    }

    #[test]
    fn test_bedtime_streak_needs_three_known_nights() {
        let mut store = DailyRecordStore::new();
        bedtime(&mut store, 0, 22, 0);
        bedtime(&mut store, 1, 22, 0);
        let mut counters = RollingCounters::default();
        assert!(!evaluate(&store, &mut counters).contains(&AchievementId::BedBeforeMidnight3Row));
    }

    #[test]
    fn test_weekly_counts_are_exact() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        for days_ago in 0..3 {
            log_mood(&mut store, days_ago);
        }
        assert!(evaluate(&store, &mut counters).contains(&AchievementId::Moods3ThisWeek));

        log_mood(&mut store, 3);
        let unlocked = evaluate(&store, &mut counters);
        assert!(!unlocked.contains(&AchievementId::Moods3ThisWeek));
        assert!(!unlocked.contains(&AchievementId::Moods7DaysThisWeek));

        for days_ago in 4..7 {
            log_mood(&mut store, days_ago);
        }
        assert!(evaluate(&store, &mut counters).contains(&AchievementId::Moods7DaysThisWeek));
    }

    #[test]
    fn test_milestones_are_exact() {
        let store = DailyRecordStore::new();
        let mut counters = RollingCounters::with_total(15);
        assert!(evaluate(&store, &mut counters).contains(&AchievementId::Moods15));

        counters.total_moods_logged = 16;
        assert!(!evaluate(&store, &mut counters).contains(&AchievementId::Moods15));

        // Skipping straight past 30 never unlocks it
        counters.total_moods_logged = 31;
        assert!(!evaluate(&store, &mut counters).contains(&AchievementId::Moods30));
    }

    #[test]
    fn test_pass_clears_counters() {
        let mut store = DailyRecordStore::new();
        log_mood(&mut store, 0);
        bedtime(&mut store, 0, 22, 0);
        let mut counters = RollingCounters::with_total(4);
        evaluate(&store, &mut counters);

        assert!(counters.recent_bedtimes.is_empty());
        assert_eq!(counters.recent_mood_log_count, 0);
        assert_eq!(counters.total_moods_logged, 4);
    }

    #[test]
    fn test_display_marks_and_suppresses() {
        let store = DailyRecordStore::new();
        let mut catalogue = AchievementCatalogue::new();
        let mut counters = RollingCounters::with_total(15);
        let now = today().and_hms_opt(9, 0, 0).unwrap();

        let mut engine = AchievementEngine::new(&store, &mut catalogue, &mut counters);
        engine.evaluate(today());
        let events = engine.display(now);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, AchievementId::Moods15);
        assert_eq!(events[0].heading, "15 moods!");
        assert_eq!(events[0].praise, "Keep it up!");
        assert_eq!(events[0].description, "15 moods logged");

        engine.evaluate(today());
        assert!(engine.display(now + Duration::days(10)).is_empty());

        let entry = catalogue.get(AchievementId::Moods15).unwrap();
        assert!(!entry.unlocked);
        assert_eq!(entry.last_displayed_at, Some(now));
    }
}
