//! Status command - today's values and trends

use std::collections::HashMap;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

use moodmonitor_core::OperationResult;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("status")?;
    let today = Local::now().date_naive();

    let summary = ctx.today_summary(today);
    let total_moods_logged = ctx.state().counters.total_moods_logged;
    let pending_achievements = ctx.achievements().iter().filter(|a| a.unlocked).count();

    if json {
        let context = HashMap::from([
            ("totalMoodsLogged".to_string(), json!(total_moods_logged)),
            ("pendingAchievements".to_string(), json!(pending_achievements)),
            ("demoMode".to_string(), json!(ctx.config.demo_mode)),
            ("syncEndpoint".to_string(), json!(ctx.sync_endpoint())),
            ("healthSource".to_string(), json!(ctx.health_source())),
        ]);
        return output::json(&OperationResult::ok_with_context(summary, context));
    }

    println!("{}", format!("Today, {}", today.format("%A %-d %B")).bold());
    println!();

    let trends = &summary.trends;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    match &summary.today {
        Some(day) => {
            table.add_row(vec!["Mood".to_string(), output::mood(day.mood)]);
            table.add_row(vec![
                "Bedtime".to_string(),
                format!("{} {}", day.bedtime, output::trend(trends.bedtime)),
            ]);
            table.add_row(vec![
                "Time in bed".to_string(),
                format!(
                    "{} {} ({})",
                    day.time_in_bed,
                    output::trend(trends.time_in_bed),
                    output::sleep_level(day.sleep_level)
                ),
            ]);
            table.add_row(vec![
                "Steps".to_string(),
                format!(
                    "{} {} ({})",
                    day.steps,
                    output::trend(trends.steps),
                    output::activity(day.activity)
                ),
            ]);
        }
        None => {
            table.add_row(vec!["Mood".to_string(), output::mood(None)]);
        }
    }
    table.add_row(vec![
        "Moods logged".to_string(),
        total_moods_logged.to_string(),
    ]);
    if let Some(source) = ctx.health_source() {
        table.add_row(vec!["Health source".to_string(), source.to_string()]);
    }
    println!("{}", table);

    if pending_achievements > 0 {
        println!();
        output::info(&format!(
            "{} achievement(s) waiting. Run 'mm activate' to see them.",
            pending_achievements
        ));
    }
    if ctx.config.demo_mode {
        println!();
        output::warning("Demo mode is on");
    }

    Ok(())
}
