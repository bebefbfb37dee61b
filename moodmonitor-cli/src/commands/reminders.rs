//! Reminders command - switch windows and plan notification times

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use moodmonitor_core::{PlannedReminder, ReminderWindow};

use super::get_context;
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Show which windows are switched on
    Show,
    /// Switch a window on or off (9-12, 12-16, 16-20 or 20-23)
    Set {
        window: String,
        #[arg(value_enum)]
        state: Switch,
    },
    /// Plan today's reminders
    Plan,
    /// Ask again in the next hour
    Later,
    /// No more reminders today
    Mute,
}

fn print_plan(plan: &[PlannedReminder]) {
    if plan.is_empty() {
        println!("No reminders planned.");
        return;
    }
    let mut table = output::create_table();
    table.set_header(vec!["Date", "Time", "Window"]);
    for reminder in plan {
        table.add_row(vec![
            reminder.date.to_string(),
            reminder.time.to_string(),
            format!("{:02}:00-{:02}:00", reminder.start_hour, reminder.end_hour),
        ]);
    }
    println!("{}", table);
}

pub fn run(command: Option<ReminderCommands>) -> Result<()> {
    let mut ctx = get_context("reminders")?;
    let now = Local::now().naive_local();

    match command {
        Some(ReminderCommands::Show) | None => {
            let settings = ctx.reminder_settings();
            for window in ReminderWindow::ALL {
                let state = if settings.is_enabled(window) {
                    "on".green()
                } else {
                    "off".dimmed()
                };
                println!("  {}  {}", window, state);
            }
        }
        Some(ReminderCommands::Set { window, state }) => {
            let parsed = ReminderWindow::parse(&window)
                .ok_or_else(|| anyhow!("Unknown reminder window '{}'", window))?;
            let enabled = matches!(state, Switch::On);
            ctx.set_reminder(parsed, enabled);
            output::success(&format!(
                "Reminders {} {}",
                parsed,
                if enabled { "on" } else { "off" }
            ));
        }
        Some(ReminderCommands::Plan) => print_plan(&ctx.plan_reminders(now.date())),
        Some(ReminderCommands::Later) => match ctx.postpone_reminder(now) {
            Some(reminder) => print_plan(&[reminder]),
            None => output::warning("The next hour is outside every enabled window"),
        },
        Some(ReminderCommands::Mute) => {
            let plan = ctx.mute_reminders(now.date());
            output::info("Muted for today");
            print_plan(&plan);
        }
    }

    Ok(())
}
