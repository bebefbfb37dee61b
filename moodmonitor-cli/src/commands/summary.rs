//! Summary command - the past week

use anyhow::Result;
use chrono::Local;

use moodmonitor_core::OperationResult;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context("summary")?;
    let rows = ctx.weekly_summary(Local::now().date_naive());

    if json {
        return output::json(&OperationResult::ok(rows));
    }

    if rows.is_empty() {
        println!("Nothing recorded for the past week.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Day", "Mood", "Factors", "Bedtime", "In bed", "Steps", "Activity"]);
    for row in rows {
        let factors = row
            .factors
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            row.day_label,
            output::mood(row.mood),
            factors,
            row.bedtime.to_string(),
            format!("{} ({})", row.time_in_bed, output::sleep_level(row.sleep_level)),
            row.steps.to_string(),
            output::activity(row.activity).to_string(),
        ]);
    }
    println!("{}", table);

    Ok(())
}
