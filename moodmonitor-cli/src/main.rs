//! Mood Monitor CLI - daily mood, sleep and steps in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{achievements, activate, demo, log, logs, reminders, status, summary, sync, tips};

/// Mood Monitor - track how you feel next to how you sleep and move
#[derive(Parser)]
#[command(name = "mm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's values, trends and pending achievements
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log a mood from 1 (bad) to 5 (great)
    Log {
        /// Mood value
        mood: i64,
        /// Comma-separated factors (Sleep, Exercise, Diet, Coffee, Alcohol, Medication)
        #[arg(long, value_delimiter = ',')]
        factors: Vec<String>,
        /// Time of the mood as HH:MM (defaults to now)
        #[arg(long)]
        at: Option<String>,
        /// Day of the mood as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the last week, one row per day
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pull health data and remote moods, then surface achievements
    Activate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exchange moods and lifestyle data with the sync endpoint
    Sync {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List achievements and when they were last shown
    Achievements {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage mood reminders
    Reminders {
        #[command(subcommand)]
        command: Option<reminders::ReminderCommands>,
    },

    /// Show the next tip
    Tips,

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Log { mood, factors, at, date, json } => {
            log::run(mood, factors, at.as_deref(), date.as_deref(), json)
        }
        Commands::Summary { json } => summary::run(json),
        Commands::Activate { json } => activate::run(json),
        Commands::Sync { json } => sync::run(json),
        Commands::Achievements { json } => achievements::run(json),
        Commands::Reminders { command } => reminders::run(command),
        Commands::Tips => tips::run(),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
