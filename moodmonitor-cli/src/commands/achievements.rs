//! Achievements command - the catalogue with display state

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use moodmonitor_core::domain::Achievement;
use moodmonitor_core::OperationResult;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("achievements")?;
    let now = Local::now().naive_local();
    let entries: Vec<&Achievement> = ctx.achievements().iter().collect();

    if json {
        return output::json(&OperationResult::ok(entries));
    }

    let mut table = output::create_table();
    table.set_header(vec!["Achievement", "State", "Last shown"]);
    for entry in entries {
        let state = if entry.unlocked {
            "pending".yellow().to_string()
        } else if entry.already_displayed(now) {
            "shown".green().to_string()
        } else {
            "locked".dimmed().to_string()
        };
        let shown = entry
            .last_displayed_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        table.add_row(vec![entry.id.description().to_string(), state, shown]);
    }
    println!("{}", table);

    Ok(())
}
