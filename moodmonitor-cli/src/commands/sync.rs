//! Sync command - pull remote moods, push lifestyle entries

use anyhow::{bail, Result};
use chrono::Local;
use serde_json::json;

use moodmonitor_core::OperationResult;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let mut ctx = get_context("sync")?;
    let Some(endpoint) = ctx.sync_endpoint().map(str::to_string) else {
        bail!("No sync endpoint configured. Set syncEndpoint in settings.json or MOODMONITOR_SYNC_ENDPOINT.");
    };
    let now = Local::now().naive_local();

    let moods = ctx.sync_moods(now)?;
    let uploaded = ctx.upload_lifestyle(now)?;

    if json {
        return output::json(&OperationResult::ok(json!({
            "endpoint": endpoint,
            "moods": moods,
            "lifestyleEntries": uploaded,
        })));
    }

    output::info(&format!("Synced with {}", endpoint));
    if let Some(result) = moods {
        println!(
            "  Moods: {} received, {} applied, {} kept, {} discarded",
            result.received, result.applied, result.kept_existing, result.discarded
        );
    }
    println!("  Lifestyle entries sent: {}", uploaded);

    Ok(())
}
