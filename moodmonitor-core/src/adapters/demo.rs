//! Demo collaborators
//!
//! Stand-ins for the watch health store and the remote mood platform so the
//! whole pipeline runs without either:
//! - one night of sleep and one step count per day, stable per date
//! - a week of remote moods at 10:00
//! - sends are accepted and counted, nothing leaves the process

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Datelike, Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::result::Result;
use crate::domain::{RemoteMood, SleepSample, StepSample};
use crate::ports::{HealthSampleSource, LifestyleEntry, MoodSyncEndpoint};

/// Remote moods served by the demo endpoint, newest day first
const DEMO_MOODS: [(i64, &str); 7] = [
    (5, "Sleep"),
    (2, "Diet"),
    (1, "Exercise"),
    (4, "Medication"),
    (3, "Coffee"),
    (4, "Sleep"),
    (5, "Sleep"),
];

fn days_between(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}

const SLEEP_STREAM: u64 = 1;
const STEP_STREAM: u64 = 2;

/// Same date, same numbers
fn rng_for(date: NaiveDate, stream: u64) -> StdRng {
    StdRng::seed_from_u64((date.num_days_from_ce() as u64) << 2 | stream)
}

#[derive(Debug, Default)]
pub struct DemoHealthSource;

impl DemoHealthSource {
    pub fn new() -> Self {
        Self
    }
}

impl HealthSampleSource for DemoHealthSource {
    fn name(&self) -> &str {
        "demo"
    }

    fn sleep_samples(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SleepSample>> {
        Ok(days_between(from, to)
            .filter_map(|date| {
                let mut rng = rng_for(date, SLEEP_STREAM);
                // Bed between 21:30 and 00:30 the evening before
                let minutes_after_2130 = rng.gen_range(0..=180);
                let start = (date - Duration::days(1)).and_hms_opt(21, 30, 0)?
                    + Duration::minutes(minutes_after_2130);
                let seconds_in_bed = rng.gen_range(5.0 * 3600.0..9.5 * 3600.0);
                Some(SleepSample {
                    end_date: Some(date),
                    seconds_in_bed: Some(seconds_in_bed),
                    bedtime_start: Some(start),
                })
            })
            .collect())
    }

    fn step_samples(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<StepSample>> {
        Ok(days_between(from, to)
            .map(|date| {
                let mut rng = rng_for(date, STEP_STREAM);
                StepSample {
                    date: Some(date),
                    cumulative_steps: Some(rng.gen_range(1500.0..14000.0)),
                }
            })
            .collect())
    }
}

/// Remote endpoint that serves a fixed week of moods
#[derive(Debug)]
pub struct DemoMoodSync {
    anchor: NaiveDate,
    moods_sent: AtomicUsize,
    lifestyle_sent: AtomicUsize,
}

impl Default for DemoMoodSync {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoMoodSync {
    /// Demo week ending today
    pub fn new() -> Self {
        Self::anchored(Local::now().date_naive())
    }

    /// Demo week ending on `anchor`
    pub fn anchored(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            moods_sent: AtomicUsize::new(0),
            lifestyle_sent: AtomicUsize::new(0),
        }
    }

    pub fn moods_sent(&self) -> usize {
        self.moods_sent.load(Ordering::Relaxed)
    }

    pub fn lifestyle_sent(&self) -> usize {
        self.lifestyle_sent.load(Ordering::Relaxed)
    }
}

impl MoodSyncEndpoint for DemoMoodSync {
    fn name(&self) -> &str {
        "demo"
    }

    fn send_mood(&self, _mood: &RemoteMood) -> Result<()> {
        self.moods_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn fetch_moods(&self) -> Result<Vec<RemoteMood>> {
        Ok(DEMO_MOODS
            .iter()
            .enumerate()
            .map(|(days_ago, (value, factor))| RemoteMood {
                value: *value,
                factors: vec![factor.to_string()],
                datetime: format!(
                    "{} 10:00",
                    (self.anchor - Duration::days(days_ago as i64)).format("%Y-%m-%d")
                ),
            })
            .collect())
    }

    fn send_lifestyle(&self, entries: &[LifestyleEntry]) -> Result<()> {
        self.lifestyle_sent.fetch_add(entries.len(), Ordering::Relaxed);
        Ok(())
    }
}
