//! Lifestyle service - turns the record store into entries for the remote platform

use chrono::NaiveDateTime;

use crate::domain::{activity_level, hours_slept, ClockTime, DailyRecordStore};
use crate::ports::LifestyleEntry;

pub struct LifestyleService;

impl LifestyleService {
    /// One exercise entry per day with a known step count, then one sleep
    /// entry per day with a known time in bed. Every entry is stamped with
    /// its own date and the current time of day.
    pub fn build_report(store: &DailyRecordStore, now: NaiveDateTime) -> Vec<LifestyleEntry> {
        let stamp = ClockTime::from_time(now.time());
        let datetime = |date: chrono::NaiveDate| format!("{} {}", date.format("%Y-%m-%d"), stamp);

        let exercise = store.records().filter_map(|record| {
            record.steps.value().map(|steps| LifestyleEntry {
                exercise: Some(activity_level(steps)),
                sleep: None,
                datetime: datetime(record.date),
            })
        });

        let sleep = store.records().filter_map(|record| {
            record.time_in_bed.value().map(|time_in_bed| LifestyleEntry {
                exercise: None,
                sleep: Some(hours_slept(time_in_bed)),
                datetime: datetime(record.date),
            })
        });

        exercise.chain(sleep).collect()
    }
}
