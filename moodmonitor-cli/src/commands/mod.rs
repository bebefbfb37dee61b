//! CLI command implementations

pub mod achievements;
pub mod activate;
pub mod demo;
pub mod log;
pub mod logs;
pub mod reminders;
pub mod status;
pub mod summary;
pub mod sync;
pub mod tips;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use moodmonitor_core::{EntryPoint, LogEvent, LoggingService, MoodMonitorContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MOODMONITOR_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".moodmonitor"))
        .context("Could not find home directory")
}

/// Open the context for one command, with the event log attached when it opens
pub fn get_context(command: &str) -> Result<MoodMonitorContext> {
    let data_dir = get_data_dir()?;
    let logger = get_logger();
    if let Some(l) = &logger {
        let _ = l.log_command(command);
    }

    let context = MoodMonitorContext::open(&data_dir)
        .with_context(|| format!("Failed to open mood data in {:?}", data_dir))?;

    Ok(match logger {
        Some(logger) => context.with_logger(logger),
        None => context,
    })
}
