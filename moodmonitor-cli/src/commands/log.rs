//! Log command - record a mood

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;

use moodmonitor_core::{ClockTime, Factor, MoodOutcome, MoodSubmission, OperationResult};

use super::get_context;
use crate::output;

pub fn run(
    mood: i64,
    factors: Vec<String>,
    at: Option<&str>,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let now = Local::now().naive_local();

    let date = match date {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text))?,
        None => now.date(),
    };
    let time = match at {
        Some(text) => ClockTime::parse(text)
            .with_context(|| format!("Invalid time '{}', expected HH:MM", text))?,
        None => ClockTime::from_time(now.time()),
    };
    for name in &factors {
        if Factor::parse(name).is_none() {
            output::warning(&format!("Unknown factor '{}' will be ignored", name));
        }
    }

    let mut ctx = get_context("log")?;
    let report = ctx.log_mood(MoodSubmission::new(date, mood, factors, time), now);

    let ignored = format!("Mood must be between 1 and 5, got {}", mood);
    if json {
        if report.outcome == MoodOutcome::Ignored {
            return output::json(&OperationResult::<()>::fail(ignored));
        }
        return output::json(&OperationResult::ok(report));
    }

    match report.outcome {
        MoodOutcome::Ignored => bail!(ignored),
        MoodOutcome::Recorded => output::success(&format!("Logged mood {} for {}", mood, date)),
        MoodOutcome::Replaced => output::success(&format!(
            "Logged mood {} for {}, replacing a later entry",
            mood, date
        )),
        MoodOutcome::Kept => output::warning(&format!(
            "An earlier mood is already logged for {}; it stays",
            date
        )),
    }

    for event in &report.events {
        println!(
            "  {} {} {} {}",
            "★".yellow(),
            event.heading.bold(),
            event.praise,
            event.description.dimmed()
        );
    }
    if report.forwarded {
        println!("  {}", "Sent to the mood endpoint".dimmed());
    }
    if let Some(next) = report.reminders.first() {
        println!("  Next reminder: {} at {}", next.date, next.time);
    }

    Ok(())
}
