//! Diff command handler

use anyhow::Result;
use colored::*;

use super::DiffCommands;
use super::output::{emit, format_counts, to_json};
use crate::config::{Config, OutputFormat};
use crate::diff::{DiffResult, diff_with_options};
use crate::inventory::load_inventory;

/// Returns whether changes were found
pub fn handle_diff_command(args: DiffCommands, config: &Config) -> Result<bool> {
    let source = load_inventory(&args.source)?;
    let target = load_inventory(&args.target)?;

    let options = config.diff_options(&args.ignore, &args.skip);
    let result = diff_with_options(&source, &target, &options);
    result.log_summary();

    let content = match args.format.unwrap_or(config.default_format) {
        OutputFormat::Json => to_json(&result)?,
        OutputFormat::Text => format_text(&result),
    };

    emit(&content, args.output.as_deref())?;

    Ok(result.has_changes())
}

/// Per-category counts and the grand total
fn format_text(result: &DiffResult) -> String {
    let mut lines = Vec::new();

    for category in &result.categories {
        lines.push(format!(
            "{:<20} {}",
            category.kind.label(),
            format_counts(
                category.counts.added,
                category.counts.removed,
                category.counts.modified
            )
        ));
    }

    let summary = &result.summary;
    lines.push(format!(
        "{:<20} {}",
        "Total".bold(),
        format_counts(summary.total_added, summary.total_removed, summary.total_modified)
    ));

    lines.join("\n")
}
