//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use moodmonitor_core::services::DemoService;
use moodmonitor_core::LogEvent;

use super::{get_data_dir, get_logger, log_event};

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off {
        /// Also delete the demo database
        #[arg(long)]
        clean: bool,
    },
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let demo_service = DemoService::new(&data_dir);
    let logger = get_logger();

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable()?;
            log_event(&logger, LogEvent::new("demo_enabled").with_command("demo"));
            println!("{}", "Demo mode enabled".green());
            println!("Run 'mm activate' to load a week of demo sleep, steps and moods.");
            Ok(())
        }
        Some(DemoCommands::Off { clean }) => {
            demo_service.disable(clean)?;
            log_event(&logger, LogEvent::new("demo_disabled").with_command("demo"));
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
