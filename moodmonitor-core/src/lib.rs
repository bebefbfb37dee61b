//! Mood Monitor Core - daily mood, sleep and activity tracking for a watch companion
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (DailyRecord, DailyRecordStore, Achievement, etc.)
//! - **ports**: Trait definitions for external collaborators (KeyValueStore, HealthSampleSource, MoodSyncEndpoint)
//! - **services**: Reconciliation, trends, achievements, reminders, persistence
//! - **adapters**: Concrete implementations (DuckDB, in-memory, demo, HTTP)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use adapters::demo::{DemoHealthSource, DemoMoodSync};
use adapters::duckdb::DuckDbKeyValueStore;
use adapters::http::HttpMoodSync;
use config::Config;
use domain::store::MIN_WINDOW_DAYS;
use ports::{HealthSampleSource, KeyValueStore, MoodSyncEndpoint};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    AchievementId, ClockTime, DailyRecord, DailyRecordStore, Factor, HealthBatch, MoodState,
    MoodSubmission, MoodValue, PlannedReminder, ReminderSettings, ReminderWindow, RemoteMood,
    Trend, TrendReport,
};
pub use services::{
    AchievementEvent, DaySummary, EntryPoint, LogEntry, LogEvent, LoggingService, MoodOutcome,
    TodaySummary,
};

/// What an activation pass did
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationReport {
    pub date: Option<NaiveDate>,
    pub health: Option<HealthApplyResult>,
    pub remote: Option<BatchResult>,
    pub unlocked: Vec<AchievementId>,
    pub events: Vec<AchievementEvent>,
    pub trends: TrendReport,
    /// Collaborator failures; none of them stop the pass
    pub warnings: Vec<String>,
}

/// What logging one mood did
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogReport {
    pub outcome: MoodOutcome,
    pub total_moods_logged: u64,
    pub events: Vec<AchievementEvent>,
    pub reminders: Vec<PlannedReminder>,
    pub forwarded: bool,
}

/// Main context for Mood Monitor operations
///
/// Owns the whole app state and the collaborators. Every mutation goes
/// through here; callers that receive data asynchronously hand it over via
/// [`MutationQueue`] so mutations never overlap.
pub struct MoodMonitorContext {
    pub config: Config,
    state: MoodState,
    repository: StateRepository,
    health: Option<Arc<dyn HealthSampleSource>>,
    sync: Option<Arc<dyn MoodSyncEndpoint>>,
    logger: Option<Arc<LoggingService>>,
    rng: StdRng,
    first_launch: bool,
    load_report: LoadReport,
}

impl MoodMonitorContext {
    /// Open the data directory: settings, state database and collaborators
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let kv = Arc::new(DuckDbKeyValueStore::open(
            &data_dir.join(config.db_filename()),
        )?);

        let (health, sync): (
            Option<Arc<dyn HealthSampleSource>>,
            Option<Arc<dyn MoodSyncEndpoint>>,
        ) = if config.demo_mode {
            (
                Some(Arc::new(DemoHealthSource::new())),
                Some(Arc::new(DemoMoodSync::new())),
            )
        } else {
            let sync = match &config.sync_endpoint {
                Some(endpoint) => Some(Arc::new(HttpMoodSync::new(endpoint)?) as Arc<dyn MoodSyncEndpoint>),
                None => None,
            };
            (None, sync)
        };

        Self::with_parts(config, kv, health, sync)
    }

    /// Build a context from explicit parts and restore the persisted state
    pub fn with_parts(
        config: Config,
        kv: Arc<dyn KeyValueStore>,
        health: Option<Arc<dyn HealthSampleSource>>,
        sync: Option<Arc<dyn MoodSyncEndpoint>>,
    ) -> Result<Self> {
        let repository = StateRepository::new(kv);
        let (state, load_report) = repository.load()?;

        let mut context = Self {
            config,
            state,
            repository,
            health,
            sync,
            logger: None,
            rng: StdRng::from_entropy(),
            first_launch: false,
            load_report,
        };
        context.state.achievements.ensure_all();
        context.initialize_first_launch();
        Ok(context)
    }

    /// Attach the event log; earlier load warnings are written to it
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        for warning in self.load_report.warnings.clone() {
            self.log(LogEvent::new("state_decode_fallback").with_error(warning));
        }
        if self.first_launch {
            self.log(LogEvent::new("first_launch"));
        }
        self
    }

    /// Fixed randomness, for reproducible reminder times and tip order
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn initialize_first_launch(&mut self) {
        if self.state.has_already_launched {
            return;
        }
        self.first_launch = true;
        self.state.reminders = ReminderSettings::first_launch();
        self.state.tips = domain::TipDeck::shuffled(&mut self.rng);
        self.state.has_already_launched = true;
        self.persist_or_log();
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }

    // === State access ===

    pub fn state(&self) -> &MoodState {
        &self.state
    }

    pub fn store(&self) -> &DailyRecordStore {
        &self.state.store
    }

    pub fn is_first_launch(&self) -> bool {
        self.first_launch
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn backend(&self) -> &str {
        self.repository.backend()
    }

    pub fn health_source(&self) -> Option<&str> {
        self.health.as_ref().map(|h| h.name())
    }

    pub fn sync_endpoint(&self) -> Option<&str> {
        self.sync.as_ref().map(|s| s.name())
    }

    // === Lifecycle ===

    /// Bring the app up to date: default days, health samples, remote moods,
    /// then an achievement pass. Collaborator failures become warnings.
    pub fn activate(&mut self, now: NaiveDateTime) -> ActivationReport {
        let today = now.date();
        let mut report = ActivationReport {
            date: Some(today),
            ..ActivationReport::default()
        };

        self.state.store.ensure_defaults(today);

        match self.refresh_health(today) {
            Ok(health) => report.health = health,
            Err(e) => report.warnings.push(format!("health refresh failed: {}", e)),
        }

        match self.fetch_remote_moods() {
            Ok(Some(batch)) => report.remote = Some(self.apply_remote_moods(&batch, now)),
            Ok(None) => {}
            Err(e) => report.warnings.push(format!("mood sync failed: {}", e)),
        }

        report.unlocked = self.evaluate_only(today);
        report.events = self.display_achievements(now);
        report.trends = self.trends(today);

        self.persist_or_log();
        self.log(LogEvent::new("app_activated"));
        report
    }

    /// Persist everything before the process goes away
    pub fn suspend(&self) {
        self.persist_or_log();
    }

    /// Write the state through; the in-memory state stays authoritative on failure
    pub fn persist(&self) -> Result<()> {
        self.repository.save(&self.state)
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            eprintln!("[moodmonitor] Failed to persist state: {}", e);
            self.log(LogEvent::new("persist_failed").with_error(e.to_string()));
        }
    }

    // === Health ===

    /// Pull samples for the last week from the configured source
    pub fn refresh_health(&mut self, today: NaiveDate) -> Result<Option<HealthApplyResult>> {
        let Some(source) = self.health.clone() else {
            return Ok(None);
        };
        let from = today - Duration::days(MIN_WINDOW_DAYS as i64 - 1);
        let batch = HealthBatch {
            sleep: source.sleep_samples(from, today)?,
            steps: source.step_samples(from, today)?,
        };
        let result = self.apply_health_batch(&batch);
        self.log(LogEvent::new("health_refreshed").with_source(source.name()));
        Ok(Some(result))
    }

    /// Merge a batch of samples handed over by a health callback or an export
    pub fn apply_health_batch(&mut self, batch: &HealthBatch) -> HealthApplyResult {
        Reconciler::new(&mut self.state.store, &mut self.state.counters).apply_health_batch(batch)
    }

    // === Moods ===

    /// Record a mood, run an achievement pass, forward it and re-plan reminders
    pub fn log_mood(&mut self, submission: MoodSubmission, now: NaiveDateTime) -> MoodLogReport {
        let mut report = self.record_mood(&submission, now);

        if report.outcome != MoodOutcome::Ignored {
            report.forwarded = self.forward_mood(&submission);
            report.reminders = self.plan_after_answer(now);
        }

        self.persist_or_log();
        report
    }

    /// Local part of [`Self::log_mood`]: store update and achievement pass only
    pub fn record_mood(&mut self, submission: &MoodSubmission, now: NaiveDateTime) -> MoodLogReport {
        let outcome = Reconciler::new(&mut self.state.store, &mut self.state.counters)
            .apply_mood_submission(submission);

        let events = if outcome == MoodOutcome::Ignored {
            self.log(LogEvent::new("mood_ignored").with_error("mood value out of range"));
            Vec::new()
        } else {
            self.log(LogEvent::new("mood_logged"));
            self.evaluate_only(now.date());
            self.display_achievements(now)
        };

        MoodLogReport {
            outcome,
            total_moods_logged: self.state.counters.total_moods_logged,
            events,
            reminders: Vec::new(),
            forwarded: false,
        }
    }

    fn forward_mood(&self, submission: &MoodSubmission) -> bool {
        let Some(sync) = &self.sync else {
            return false;
        };
        match sync.send_mood(&RemoteMood::from_submission(submission)) {
            Ok(()) => true,
            Err(e) => {
                self.log(
                    LogEvent::new("mood_forward_failed")
                        .with_source(sync.name())
                        .with_error(e.to_string()),
                );
                false
            }
        }
    }

    /// Fetch the platform's moods; `None` without an endpoint
    pub fn fetch_remote_moods(&self) -> Result<Option<Vec<RemoteMood>>> {
        let Some(sync) = &self.sync else {
            return Ok(None);
        };
        match sync.fetch_moods() {
            Ok(moods) => Ok(Some(moods)),
            Err(e) => {
                self.log(
                    LogEvent::new("mood_sync_failed")
                        .with_source(sync.name())
                        .with_error(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    pub fn apply_remote_moods(&mut self, batch: &[RemoteMood], now: NaiveDateTime) -> BatchResult {
        let result = Reconciler::new(&mut self.state.store, &mut self.state.counters)
            .apply_remote_mood_batch(batch, now);
        self.log(LogEvent::new("moods_synced"));
        result
    }

    /// Fetch and merge remote moods, then persist
    pub fn sync_moods(&mut self, now: NaiveDateTime) -> Result<Option<BatchResult>> {
        let Some(batch) = self.fetch_remote_moods()? else {
            return Ok(None);
        };
        let result = self.apply_remote_moods(&batch, now);
        self.persist_or_log();
        Ok(Some(result))
    }

    /// Push exercise and sleep entries; returns how many were sent
    pub fn upload_lifestyle(&self, now: NaiveDateTime) -> Result<usize> {
        let Some(sync) = &self.sync else {
            return Ok(0);
        };
        let entries = LifestyleService::build_report(&self.state.store, now);
        if let Err(e) = sync.send_lifestyle(&entries) {
            self.log(
                LogEvent::new("lifestyle_upload_failed")
                    .with_source(sync.name())
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
        self.log(LogEvent::new("lifestyle_uploaded").with_source(sync.name()));
        Ok(entries.len())
    }

    // === Achievements ===

    /// Full achievement pass: evaluate the rules, then surface what is due
    pub fn evaluate(&mut self, now: NaiveDateTime) -> Vec<AchievementEvent> {
        self.evaluate_only(now.date());
        let events = self.display_achievements(now);
        self.persist_or_log();
        events
    }

    fn evaluate_only(&mut self, today: NaiveDate) -> Vec<AchievementId> {
        let state = &mut self.state;
        let unlocked =
            AchievementEngine::new(&state.store, &mut state.achievements, &mut state.counters)
                .evaluate(today);
        for id in &unlocked {
            self.log(LogEvent::new("achievement_unlocked").with_achievement(id.key()));
        }
        unlocked
    }

    fn display_achievements(&mut self, now: NaiveDateTime) -> Vec<AchievementEvent> {
        let state = &mut self.state;
        let events =
            AchievementEngine::new(&state.store, &mut state.achievements, &mut state.counters)
                .display(now);
        for event in &events {
            self.log(LogEvent::new("achievement_displayed").with_achievement(event.id.key()));
        }
        events
    }

    pub fn achievements(&self) -> &domain::AchievementCatalogue {
        &self.state.achievements
    }

    // === Views ===

    pub fn trends(&self, today: NaiveDate) -> TrendReport {
        services::trend::calculate(&self.state.store, today)
    }

    pub fn weekly_summary(&self, today: NaiveDate) -> Vec<DaySummary> {
        SummaryService::weekly(&self.state.store, today)
    }

    pub fn today_summary(&self, today: NaiveDate) -> TodaySummary {
        SummaryService::today(&self.state.store, today)
    }

    // === Reminders ===

    pub fn reminder_settings(&self) -> ReminderSettings {
        self.state.reminders
    }

    pub fn set_reminder(&mut self, window: ReminderWindow, enabled: bool) {
        self.state.reminders.set(window, enabled);
        self.persist_or_log();
    }

    pub fn plan_reminders(&mut self, date: NaiveDate) -> Vec<PlannedReminder> {
        ReminderPlanner::new(&self.state.reminders).plan_day(date, None, &mut self.rng)
    }

    fn plan_after_answer(&mut self, now: NaiveDateTime) -> Vec<PlannedReminder> {
        ReminderPlanner::new(&self.state.reminders).plan_after_answer(now, &mut self.rng)
    }

    /// "Ask later"
    pub fn postpone_reminder(&mut self, now: NaiveDateTime) -> Option<PlannedReminder> {
        ReminderPlanner::new(&self.state.reminders).postpone(now, &mut self.rng)
    }

    /// "Mute for today"
    pub fn mute_reminders(&mut self, today: NaiveDate) -> Vec<PlannedReminder> {
        ReminderPlanner::new(&self.state.reminders).mute_today(today, &mut self.rng)
    }

    // === Tips ===

    pub fn next_tip(&mut self) -> String {
        let tip = self.state.tips.next_tip(&mut self.rng);
        self.persist_or_log();
        tip
    }
}
