use colored::Colorize;

use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::log_columns::AVAILABLE_COLUMNS;

/// Execute the `oversee-view columns` command.
///
/// Lists every column the audit table can show and marks the ones the
/// current configuration displays, with their position.
pub fn execute() -> Result<()> {
    let config = AppConfig::load(context::config_path())?;
    let shown = &config.table.columns;

    output::header("Available columns");
    println!();

    for column in &AVAILABLE_COLUMNS {
        let marker = match shown.iter().position(|k| k == column.key) {
            Some(pos) => format!("{:>2}", pos + 1).green().to_string(),
            None => " -".dimmed().to_string(),
        };
        println!(
            "  {} {:<14} {:<10} {}",
            marker,
            column.key,
            column.label,
            column.description.dimmed()
        );
    }

    println!();
    println!("  Choose columns with --columns id,timestamp or [table] columns in oversee.toml.");
    Ok(())
}
