//! Activate command - the pass the app runs when it comes to the foreground

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use moodmonitor_core::OperationResult;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let mut ctx = get_context("activate")?;
    let report = ctx.activate(Local::now().naive_local());

    if json {
        return output::json(&OperationResult::ok(report));
    }

    if let Some(health) = &report.health {
        println!(
            "Health: {} night(s), {} day(s) of steps",
            health.sleep_applied, health.steps_applied
        );
    }
    if let Some(remote) = &report.remote {
        println!(
            "Remote moods: {} received, {} applied, {} discarded",
            remote.received, remote.applied, remote.discarded
        );
    }
    for warning in &report.warnings {
        output::warning(warning);
    }

    if report.events.is_empty() {
        println!("{}", "No new achievements".dimmed());
    } else {
        println!();
        println!("{}", "Achievements".bold());
        for event in &report.events {
            println!(
                "  {} {} {} {}",
                "★".yellow(),
                event.heading.bold(),
                event.praise,
                event.description.dimmed()
            );
        }
    }

    Ok(())
}
