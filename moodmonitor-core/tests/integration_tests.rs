//! Integration tests for moodmonitor-core
//!
//! These run the whole context against real DuckDB files. Collaborators are
//! the demo adapters or none at all; no network is involved.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::json;
use tempfile::TempDir;

use moodmonitor_core::adapters::demo::{DemoHealthSource, DemoMoodSync};
use moodmonitor_core::adapters::duckdb::DuckDbKeyValueStore;
use moodmonitor_core::config::Config;
use moodmonitor_core::domain::{ClockTime, WINDOW_LIMIT};
use moodmonitor_core::ports::KeyValueStore;
use moodmonitor_core::services::{EntryPoint, LoggingService, MoodOutcome};
use moodmonitor_core::{
    AchievementId, MoodMonitorContext, MoodSubmission, ReminderSettings, ReminderWindow,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
}

fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap()
}

fn open_kv(dir: &Path) -> Arc<DuckDbKeyValueStore> {
    Arc::new(DuckDbKeyValueStore::open(&dir.join("moodmonitor.duckdb")).unwrap())
}

/// Context with no health source and no remote endpoint
fn offline_context(dir: &Path) -> MoodMonitorContext {
    MoodMonitorContext::with_parts(Config::default(), open_kv(dir), None, None)
        .unwrap()
        .with_rng_seed(7)
}

fn demo_context(dir: &Path) -> MoodMonitorContext {
    MoodMonitorContext::with_parts(
        Config {
            demo_mode: true,
            sync_endpoint: None,
        },
        open_kv(dir),
        Some(Arc::new(DemoHealthSource::new())),
        Some(Arc::new(DemoMoodSync::anchored(today()))),
    )
    .unwrap()
    .with_rng_seed(7)
}

fn mood(date: NaiveDate, value: i64, hour: u32) -> MoodSubmission {
    MoodSubmission::new(date, value, vec!["Sleep".into()], ClockTime::new(hour, 0).unwrap())
}

// ============================================================================
// Launch and persistence
// ============================================================================

#[test]
fn test_first_launch_then_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let context = offline_context(temp_dir.path());
        assert!(context.is_first_launch());
        assert_eq!(context.reminder_settings(), ReminderSettings::first_launch());
        assert_eq!(context.state().tips.remaining().len(), 10);
        assert_eq!(context.backend(), "duckdb");
    }

    let mut context = offline_context(temp_dir.path());
    assert!(!context.is_first_launch());
    assert_eq!(context.reminder_settings(), ReminderSettings::first_launch());

    let tip = context.next_tip();
    assert!(!tip.is_empty());
    drop(context);

    let context = offline_context(temp_dir.path());
    assert_eq!(context.state().tips.remaining().len(), 9);
}

#[test]
fn test_logged_moods_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut context = offline_context(temp_dir.path());
        let report = context.log_mood(mood(today(), 3, 14), at(today(), 14));
        assert_eq!(report.outcome, MoodOutcome::Recorded);
        assert!(!report.forwarded);
        let report = context.log_mood(mood(today(), 5, 9), at(today(), 14));
        assert_eq!(report.outcome, MoodOutcome::Replaced);
        context.suspend();
    }

    let context = offline_context(temp_dir.path());
    let record = context.store().get(today()).unwrap();
    assert_eq!(record.last_mood().unwrap().get(), 5);
    assert_eq!(record.last_mood_time, ClockTime::new(9, 0));
    assert_eq!(context.state().counters.total_moods_logged, 2);
}

#[test]
fn test_corrupt_state_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    {
        let kv = open_kv(temp_dir.path());
        kv.set("encouragements", &json!("garbage")).unwrap();
        kv.set("totalMoodsLogged", &json!({ "n": 3 })).unwrap();
        kv.set("hasAlreadyLaunched", &json!(true)).unwrap();
    }

    let context = offline_context(temp_dir.path());

    assert!(!context.is_first_launch());
    assert_eq!(context.achievements().len(), AchievementId::ALL.len());
    assert_eq!(context.state().counters.total_moods_logged, 0);
    assert!(!context.load_report().warnings.is_empty());
}

#[test]
fn test_out_of_range_mood_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let mut context = offline_context(temp_dir.path());

    let report = context.log_mood(mood(today(), 9, 10), at(today(), 10));

    assert_eq!(report.outcome, MoodOutcome::Ignored);
    assert!(report.reminders.is_empty());
    assert_eq!(report.total_moods_logged, 0);
    assert!(context.store().get(today()).is_none());
}

// ============================================================================
// Window and achievements
// ============================================================================

#[test]
fn test_window_never_exceeds_limit() {
    let temp_dir = TempDir::new().unwrap();
    let mut context = offline_context(temp_dir.path());
    let start = today() - Duration::days(39);

    let mut milestones = Vec::new();
    for offset in 0..40 {
        let date = start + Duration::days(offset);
        let report = context.log_mood(mood(date, 4, 12), at(date, 20));
        milestones.extend(
            report
                .events
                .iter()
                .map(|e| e.id)
                .filter(|id| matches!(id, AchievementId::Moods15 | AchievementId::Moods30)),
        );
        assert!(context.store().len() <= WINDOW_LIMIT);
    }

    assert_eq!(context.store().len(), WINDOW_LIMIT);
    assert!(context.store().get(start + Duration::days(9)).is_none());
    assert!(context.store().get(start + Duration::days(10)).is_some());
    assert_eq!(milestones, vec![AchievementId::Moods15, AchievementId::Moods30]);
}

#[test]
fn test_milestone_after_restored_total() {
    let temp_dir = TempDir::new().unwrap();
    {
        let kv = open_kv(temp_dir.path());
        kv.set("totalMoodsLogged", &json!(14)).unwrap();
    }

    let mut context = offline_context(temp_dir.path());
    let report = context.log_mood(mood(today(), 2, 10), at(today(), 10));

    assert_eq!(report.total_moods_logged, 15);
    assert!(report.events.iter().any(|e| e.id == AchievementId::Moods15));
    // Morning window was just answered; only the evening one is left
    assert_eq!(report.reminders.len(), 1);
    assert_eq!(report.reminders[0].start_hour, 16);
}

// ============================================================================
// Activation with demo collaborators
// ============================================================================

#[test]
fn test_demo_activation() {
    let temp_dir = TempDir::new().unwrap();
    let mut context = demo_context(temp_dir.path());
    let now = at(today(), 12);

    let report = context.activate(now);

    assert!(report.warnings.is_empty());
    assert_eq!(report.health.as_ref().unwrap().sleep_applied, 7);
    assert_eq!(report.health.as_ref().unwrap().steps_applied, 7);
    let remote = report.remote.as_ref().unwrap();
    assert_eq!(remote.received, 7);
    assert_eq!(remote.applied, 7);

    assert_eq!(context.state().counters.total_moods_logged, 7);
    assert!(report
        .events
        .iter()
        .any(|e| e.id == AchievementId::Moods7DaysThisWeek));
    for days_ago in 0..7 {
        let record = context.store().get(today() - Duration::days(days_ago)).unwrap();
        assert!(record.has_moods());
        assert!(!record.steps.is_unknown());
        assert!(!record.time_in_bed.is_unknown());
    }

    // Same batch again changes nothing and shows nothing new
    let again = context.activate(now + Duration::hours(1));
    assert_eq!(again.remote.as_ref().unwrap().applied, 0);
    assert_eq!(again.remote.as_ref().unwrap().kept_existing, 7);
    assert_eq!(context.state().counters.total_moods_logged, 7);
    assert!(!again
        .events
        .iter()
        .any(|e| e.id == AchievementId::Moods7DaysThisWeek));
}

#[test]
fn test_demo_mood_is_forwarded_and_lifestyle_uploaded() {
    let temp_dir = TempDir::new().unwrap();
    let mut context = demo_context(temp_dir.path());
    context.activate(at(today(), 12));

    let report = context.log_mood(mood(today(), 1, 8), at(today(), 12));
    assert!(report.forwarded);
    assert_eq!(report.outcome, MoodOutcome::Replaced);

    // 7 days of steps plus 7 days of time in bed
    assert_eq!(context.upload_lifestyle(at(today(), 12)).unwrap(), 14);
}

#[test]
fn test_sync_without_endpoint_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    let mut context = offline_context(temp_dir.path());

    assert!(context.sync_moods(at(today(), 12)).unwrap().is_none());
    assert_eq!(context.upload_lifestyle(at(today(), 12)).unwrap(), 0);
    assert!(context.sync_endpoint().is_none());
    assert!(context.health_source().is_none());
}

#[test]
fn test_demo_sync_merges_remote_moods() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut context = demo_context(temp_dir.path());
        let result = context.sync_moods(at(today(), 12)).unwrap().unwrap();
        assert_eq!(result.applied, 7);
    }

    let context = demo_context(temp_dir.path());
    assert_eq!(context.state().counters.total_moods_logged, 7);
    assert_eq!(
        context.store().get(today()).unwrap().last_mood().unwrap().get(),
        5
    );
}

#[test]
fn test_reminder_switches_persist() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut context = offline_context(temp_dir.path());
        context.set_reminder(ReminderWindow::Night, true);
        context.set_reminder(ReminderWindow::Morning, false);
    }

    let mut context = offline_context(temp_dir.path());
    let settings = context.reminder_settings();
    assert!(settings.night);
    assert!(!settings.morning);

    let plan = context.plan_reminders(today());
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].id, "2024-11-2016To20");
    assert_eq!(plan[1].id, "2024-11-2020To23");
    assert!(context.postpone_reminder(at(today(), 21)).is_some());
    assert!(context.postpone_reminder(at(today(), 9)).is_none());
}

// ============================================================================
// Event log
// ============================================================================

#[test]
fn test_events_are_logged_without_values() {
    let temp_dir = TempDir::new().unwrap();
    let logger =
        Arc::new(LoggingService::new(temp_dir.path(), EntryPoint::Cli, "0.1.0").unwrap());
    let mut context = offline_context(temp_dir.path()).with_logger(logger.clone());

    context.log_mood(mood(today(), 4, 10), at(today(), 10));

    let entries = logger.get_recent(20).unwrap();
    assert!(entries.iter().any(|e| e.event == "first_launch"));
    assert!(entries.iter().any(|e| e.event == "mood_logged"));
    assert!(logger.get_errors(10).unwrap().is_empty());
}
