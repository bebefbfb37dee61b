//! Tips command

use anyhow::Result;
use colored::Colorize;

use super::get_context;

pub fn run() -> Result<()> {
    let mut ctx = get_context("tips")?;
    println!("{} {}", "Tip:".bold(), ctx.next_tip());
    Ok(())
}
