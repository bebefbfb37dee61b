//! Reconciler - merges health samples and mood submissions into the record store
//!
//! Every apply method is infallible. A missing or out-of-range field means
//! "no update" for that field; the rest of the sample is still applied.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{
    round_to_half_hour, ClockTime, DailyRecordStore, Factor, HealthBatch, MoodSubmission, MoodValue,
    Reading, RecordField, RemoteMood, RollingCounters, SleepSample, StepSample,
};

/// Sleep sessions at or below this length are noise, not a night's sleep
pub const MIN_SLEEP_SECONDS: f64 = 3600.0;

/// Remote moods older than this are ignored
pub const REMOTE_MOOD_MAX_AGE_DAYS: i64 = 7;

/// What happened to a single mood submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodOutcome {
    /// First mood of the day
    Recorded,
    /// Logged earlier in the day than the stored mood, so it replaced it
    Replaced,
    /// Logged later than the stored mood; the stored one stays
    Kept,
    /// Value out of range
    Ignored,
}

impl MoodOutcome {
    pub fn changed_store(&self) -> bool {
        matches!(self, MoodOutcome::Recorded | MoodOutcome::Replaced)
    }
}

/// Result of applying a remote mood batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub received: usize,
    /// Malformed or older than the 7-day cutoff
    pub discarded: usize,
    /// Entries dropped because a newer one for the same date was in the batch
    pub collapsed: usize,
    pub applied: usize,
    pub kept_existing: usize,
}

/// Result of applying health samples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthApplyResult {
    pub sleep_applied: usize,
    pub steps_applied: usize,
    pub skipped: usize,
}

/// Applies external inputs to the store with per-source overwrite rules
pub struct Reconciler<'a> {
    store: &'a mut DailyRecordStore,
    counters: &'a mut RollingCounters,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a mut DailyRecordStore, counters: &'a mut RollingCounters) -> Self {
        Self { store, counters }
    }

    /// Write time in bed and bedtime for the night ending on `end_date`.
    ///
    /// Returns `false` when the sample carried nothing usable.
    pub fn apply_sleep_sample(&mut self, sample: &SleepSample) -> bool {
        let Some(date) = sample.end_date else {
            return false;
        };

        let time_in_bed = sample
            .seconds_in_bed
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|seconds| {
                if seconds > MIN_SLEEP_SECONDS {
                    Reading::from(round_to_half_hour(seconds as i64))
                } else {
                    Reading::Unknown
                }
            });

        // Bedtime rounds the minute-resolution clock reading
        let bedtime = sample.bedtime_start.and_then(|start| {
            let minutes = ClockTime::from_time(start.time());
            round_to_half_hour(minutes.as_seconds())
        });

        if time_in_bed.is_none() && bedtime.is_none() {
            return false;
        }

        if let Some(value) = time_in_bed {
            self.store.upsert(date, RecordField::TimeInBed(value));
        }
        if let Some(value) = bedtime {
            self.store.upsert(date, RecordField::Bedtime(Reading::Known(value)));
        }
        true
    }

    /// Write the day's cumulative step count. Last call wins.
    pub fn apply_step_sample(&mut self, sample: &StepSample) -> bool {
        let (Some(date), Some(steps)) = (sample.date, sample.cumulative_steps) else {
            return false;
        };
        if !steps.is_finite() || steps < 0.0 {
            return false;
        }

        let steps = steps.round().min(f64::from(u32::MAX)) as u32;
        self.store.upsert(date, RecordField::Steps(Reading::Known(steps)));
        true
    }

    /// Apply every sample in a batch, sleep first
    pub fn apply_health_batch(&mut self, batch: &HealthBatch) -> HealthApplyResult {
        let mut result = HealthApplyResult::default();
        for sample in &batch.sleep {
            if self.apply_sleep_sample(sample) {
                result.sleep_applied += 1;
            } else {
                result.skipped += 1;
            }
        }
        for sample in &batch.steps {
            if self.apply_step_sample(sample) {
                result.steps_applied += 1;
            } else {
                result.skipped += 1;
            }
        }
        result
    }

    /// Record a mood for its day.
    ///
    /// The first mood of a day is always recorded. After that the stored mood
    /// is replaced only by one logged earlier in the day. Every valid
    /// submission counts towards the total.
    pub fn apply_mood_submission(&mut self, submission: &MoodSubmission) -> MoodOutcome {
        let Some(value) = MoodValue::new(submission.value) else {
            return MoodOutcome::Ignored;
        };
        let factors = Factor::parse_all(&submission.factors);

        let outcome = self.write_mood(submission.date, value, factors, submission.time);
        self.counters.record_mood();
        outcome
    }

    /// Merge moods fetched from the remote endpoint.
    ///
    /// Entries older than 7 days before `now` are dropped, then only the most
    /// recent entry per date survives, then each survivor goes through the
    /// same earliest-wins rule as a local submission. Only entries that change
    /// the store count towards the total, so re-syncing the same batch is a
    /// no-op.
    pub fn apply_remote_mood_batch(&mut self, batch: &[RemoteMood], now: NaiveDateTime) -> BatchResult {
        let cutoff = now - Duration::days(REMOTE_MOOD_MAX_AGE_DAYS);
        let mut result = BatchResult {
            received: batch.len(),
            ..BatchResult::default()
        };

        let mut parsed: Vec<_> = batch
            .iter()
            .filter_map(|raw| raw.parse())
            .filter(|mood| mood.at > cutoff)
            .collect();
        result.discarded = batch.len() - parsed.len();

        parsed.sort_by(|a, b| b.at.cmp(&a.at));

        let mut newest_per_date: BTreeMap<NaiveDate, _> = BTreeMap::new();
        for mood in parsed {
            let date = mood.at.date();
            if newest_per_date.contains_key(&date) {
                result.collapsed += 1;
            } else {
                newest_per_date.insert(date, mood);
            }
        }

        for (date, mood) in newest_per_date {
            let time = ClockTime::from_time(mood.at.time());
            let outcome = self.write_mood(date, mood.value, mood.factors, time);
            if outcome.changed_store() {
                self.counters.record_mood();
                result.applied += 1;
            } else {
                result.kept_existing += 1;
            }
        }

        result
    }

    fn write_mood(
        &mut self,
        date: NaiveDate,
        value: MoodValue,
        factors: Vec<Factor>,
        time: ClockTime,
    ) -> MoodOutcome {
        let mut outcome = MoodOutcome::Kept;
        self.store.update(date, |record| {
            let replace = if !record.has_moods() {
                outcome = MoodOutcome::Recorded;
                true
            } else {
                match record.last_mood_time {
                    Some(stored) if time >= stored => false,
                    _ => {
                        outcome = MoodOutcome::Replaced;
                        true
                    }
                }
            };

            if replace {
                record.moods = vec![value];
                record.factors = factors;
                record.last_mood_time = Some(time);
            }
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hm(hour: u32, minute: u32) -> ClockTime {
        ClockTime::new(hour, minute).unwrap()
    }

    fn remote(value: i64, datetime: &str) -> RemoteMood {
        RemoteMood {
            value,
            factors: vec!["Sleep".into()],
            datetime: datetime.into(),
        }
    }

    fn now() -> NaiveDateTime {
        date("2024-01-10").and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_earlier_mood_replaces() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let day = date("2024-01-01");

        let first = reconciler.apply_mood_submission(&MoodSubmission::new(day, 5, vec![], hm(10, 0)));
        let second = reconciler.apply_mood_submission(&MoodSubmission::new(day, 2, vec![], hm(9, 0)));

        assert_eq!(first, MoodOutcome::Recorded);
        assert_eq!(second, MoodOutcome::Replaced);
        let record = store.get(day).unwrap();
        assert_eq!(record.moods, vec![MoodValue::new(2).unwrap()]);
        assert_eq!(record.last_mood_time, Some(hm(9, 0)));
        assert_eq!(counters.total_moods_logged, 2);
    }

    #[test]
    fn test_later_mood_loses() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let day = date("2024-01-01");

        reconciler.apply_mood_submission(&MoodSubmission::new(day, 5, vec!["Coffee".into()], hm(10, 0)));
        let outcome =
            reconciler.apply_mood_submission(&MoodSubmission::new(day, 2, vec!["Diet".into()], hm(11, 0)));

        assert_eq!(outcome, MoodOutcome::Kept);
        let record = store.get(day).unwrap();
        assert_eq!(record.moods, vec![MoodValue::new(5).unwrap()]);
        assert_eq!(record.factors, vec![Factor::Coffee]);
        // Overwrite attempts still count
        assert_eq!(counters.total_moods_logged, 2);
    }

    #[test]
    fn test_out_of_range_mood_is_ignored() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        let outcome = reconciler
            .apply_mood_submission(&MoodSubmission::new(date("2024-01-01"), 9, vec![], hm(10, 0)));

        assert_eq!(outcome, MoodOutcome::Ignored);
        assert!(store.is_empty());
        assert_eq!(counters.total_moods_logged, 0);
    }

    #[test]
    fn test_steps_last_call_wins() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let day = date("2024-01-01");

        reconciler.apply_step_sample(&StepSample { date: Some(day), cumulative_steps: Some(9500.0) });
        reconciler.apply_step_sample(&StepSample { date: Some(day), cumulative_steps: Some(12000.0) });

        assert_eq!(store.get(day).unwrap().steps, Reading::Known(12000));
    }

    #[test]
    fn test_malformed_step_sample_is_noop() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let day = date("2024-01-01");
        store.upsert(day, RecordField::Steps(Reading::Known(300)));
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        assert!(!reconciler.apply_step_sample(&StepSample { date: Some(day), cumulative_steps: None }));
        assert!(!reconciler.apply_step_sample(&StepSample { date: None, cumulative_steps: Some(5.0) }));
        assert!(!reconciler.apply_step_sample(&StepSample { date: Some(day), cumulative_steps: Some(f64::NAN) }));
        assert_eq!(store.get(day).unwrap().steps, Reading::Known(300));
    }

    #[test]
    fn test_short_sleep_is_unknown() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let day = date("2024-01-02");

        reconciler.apply_sleep_sample(&SleepSample {
            end_date: Some(day),
            seconds_in_bed: Some(3500.0),
            bedtime_start: Some(date("2024-01-02").and_hms_opt(5, 10, 0).unwrap()),
        });

        let record = store.get(day).unwrap();
        assert!(record.time_in_bed.is_unknown());
        assert_eq!(record.bedtime, Reading::Known(hm(5, 0)));
    }

    #[test]
    fn test_sleep_rounds_duration_and_bedtime() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let day = date("2024-01-02");

        reconciler.apply_sleep_sample(&SleepSample {
            end_date: Some(day),
            // 7h20m
            seconds_in_bed: Some(26_400.0),
            bedtime_start: Some(date("2024-01-01").and_hms_opt(23, 50, 0).unwrap()),
        });

        let record = store.get(day).unwrap();
        assert_eq!(record.time_in_bed, Reading::Known(hm(7, 30)));
        assert_eq!(record.bedtime, Reading::Known(ClockTime::MIDNIGHT));
    }

    #[test]
    fn test_huge_sleep_duration_does_not_overflow() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        for (day, seconds) in [("2024-01-02", 1e30), ("2024-01-03", f64::MAX)] {
            let applied = reconciler.apply_sleep_sample(&SleepSample {
                end_date: Some(date(day)),
                seconds_in_bed: Some(seconds),
                bedtime_start: Some(date(day).and_hms_opt(0, 40, 0).unwrap()),
            });
            assert!(applied);
        }

        for day in ["2024-01-02", "2024-01-03"] {
            let record = store.get(date(day)).unwrap();
            // Saturates to i64::MAX seconds, which wraps to 15:30 on the clock
            assert_eq!(record.time_in_bed, Reading::Known(hm(15, 30)));
            assert_eq!(record.bedtime, Reading::Known(hm(0, 30)));
        }
    }

    #[test]
    fn test_sleep_sample_without_start_keeps_bedtime() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let day = date("2024-01-02");
        store.upsert(day, RecordField::Bedtime(Reading::Known(hm(22, 0))));
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        reconciler.apply_sleep_sample(&SleepSample {
            end_date: Some(day),
            seconds_in_bed: Some(28_800.0),
            bedtime_start: None,
        });

        let record = store.get(day).unwrap();
        assert_eq!(record.bedtime, Reading::Known(hm(22, 0)));
        assert_eq!(record.time_in_bed, Reading::Known(hm(8, 0)));
    }

    #[test]
    fn test_health_batch_counts_skipped() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        let batch = HealthBatch {
            sleep: vec![SleepSample { end_date: None, seconds_in_bed: Some(28_800.0), bedtime_start: None }],
            steps: vec![
                StepSample { date: Some(date("2024-01-01")), cumulative_steps: Some(4000.0) },
                StepSample { date: Some(date("2024-01-02")), cumulative_steps: Some(6000.4) },
            ],
        };
        let result = reconciler.apply_health_batch(&batch);

        assert_eq!(result.sleep_applied, 0);
        assert_eq!(result.steps_applied, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(store.get(date("2024-01-02")).unwrap().steps, Reading::Known(6000));
    }

    #[test]
    fn test_remote_batch_collapses_per_date() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        let batch = vec![
            remote(3, "2024-01-09 08:00"),
            remote(5, "2024-01-09 18:30"),
            remote(4, "2024-01-08 10:00"),
        ];
        let result = reconciler.apply_remote_mood_batch(&batch, now());

        assert_eq!(result.received, 3);
        assert_eq!(result.collapsed, 1);
        assert_eq!(result.applied, 2);
        // Most recent entry of the day wins within a batch
        let record = store.get(date("2024-01-09")).unwrap();
        assert_eq!(record.moods, vec![MoodValue::new(5).unwrap()]);
        assert_eq!(record.last_mood_time, Some(hm(18, 30)));
        assert_eq!(counters.total_moods_logged, 2);
    }

    #[test]
    fn test_remote_batch_drops_old_and_malformed() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);

        let batch = vec![
            remote(3, "2024-01-02 08:00"),
            remote(0, "2024-01-09 08:00"),
            remote(2, "not a date"),
            remote(4, "2024-01-09 10:00"),
        ];
        let result = reconciler.apply_remote_mood_batch(&batch, now());

        assert_eq!(result.discarded, 3);
        assert_eq!(result.applied, 1);
        assert!(store.get(date("2024-01-02")).is_none());
    }

    #[test]
    fn test_remote_batch_respects_earlier_local_mood() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let day = date("2024-01-09");

        reconciler.apply_mood_submission(&MoodSubmission::new(day, 1, vec![], hm(7, 45)));
        let result = reconciler.apply_remote_mood_batch(&[remote(5, "2024-01-09 10:00")], now());

        assert_eq!(result.kept_existing, 1);
        assert_eq!(store.get(day).unwrap().moods, vec![MoodValue::new(1).unwrap()]);
    }

    #[test]
    fn test_remote_batch_is_idempotent() {
        let mut store = DailyRecordStore::new();
        let mut counters = RollingCounters::default();
        let mut reconciler = Reconciler::new(&mut store, &mut counters);
        let batch = vec![remote(4, "2024-01-09 10:00")];

        reconciler.apply_remote_mood_batch(&batch, now());
        let again = reconciler.apply_remote_mood_batch(&batch, now());

        assert_eq!(again.applied, 0);
        assert_eq!(counters.total_moods_logged, 1);
    }
}
