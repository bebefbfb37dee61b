//! Summary service - weekly table and today's headline

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{
    ActivityIcon, ClockTime, DailyRecord, DailyRecordStore, Factor, MoodValue, Reading, SleepLevel,
    TrendReport,
};
use crate::services::trend;

/// One row of the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub day_label: String,
    pub mood: Option<MoodValue>,
    pub factors: Vec<Factor>,
    pub bedtime: Reading<ClockTime>,
    pub time_in_bed: Reading<ClockTime>,
    pub steps: Reading<u32>,
    pub sleep_level: SleepLevel,
    pub activity: ActivityIcon,
}

impl From<&DailyRecord> for DaySummary {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date: record.date,
            day_label: record.day_label.clone(),
            mood: record.last_mood(),
            factors: record.factors.clone(),
            bedtime: record.bedtime,
            time_in_bed: record.time_in_bed,
            steps: record.steps,
            sleep_level: SleepLevel::from_time_in_bed(record.time_in_bed),
            activity: ActivityIcon::from_steps(record.steps),
        }
    }
}

/// Today's values with the day-over-day trends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub today: Option<DaySummary>,
    pub trends: TrendReport,
}

/// Read-only views over the record store
pub struct SummaryService;

impl SummaryService {
    /// The 7-day window ending today, minus today itself, newest first
    pub fn weekly(store: &DailyRecordStore, today: NaiveDate) -> Vec<DaySummary> {
        let newest = today - Duration::days(1);
        let oldest = today - Duration::days(6);
        let mut rows: Vec<DaySummary> = store.range(oldest, newest).map(DaySummary::from).collect();
        rows.reverse();
        rows
    }

    pub fn today(store: &DailyRecordStore, today: NaiveDate) -> TodaySummary {
        TodaySummary {
            today: store.get(today).map(DaySummary::from),
            trends: trend::calculate(store, today),
        }
    }
}
