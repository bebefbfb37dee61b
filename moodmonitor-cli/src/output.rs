//! Output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use moodmonitor_core::domain::{ActivityIcon, SleepLevel};
use moodmonitor_core::{MoodValue, OperationResult, Trend};
use serde::Serialize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print a `--json` envelope
pub fn json<T: Serialize>(result: &OperationResult<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn trend(trend: Trend) -> String {
    match trend {
        Trend::Increase => trend.arrow().green().to_string(),
        Trend::Decrease => trend.arrow().red().to_string(),
        Trend::Same => trend.arrow().dimmed().to_string(),
        Trend::Undetermined => String::new(),
    }
}

pub fn mood(mood: Option<MoodValue>) -> String {
    match mood.map(|m| m.get()) {
        None => "-".dimmed().to_string(),
        Some(v @ 4..=5) => v.to_string().green().to_string(),
        Some(3) => "3".yellow().to_string(),
        Some(v) => v.to_string().red().to_string(),
    }
}

pub fn sleep_level(level: SleepLevel) -> &'static str {
    match level {
        SleepLevel::Full => "full",
        SleepLevel::MostlyFull => "mostly full",
        SleepLevel::Half => "half",
        SleepLevel::Low => "low",
    }
}

pub fn activity(icon: ActivityIcon) -> &'static str {
    match icon {
        ActivityIcon::Walking => "walking",
        ActivityIcon::FastWalking => "fast walking",
        ActivityIcon::Running => "running",
    }
}
