//! Shared output helpers for command handlers

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

/// Pretty JSON for any serializable result
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format JSON output")
}

/// Print to stdout, or write to `output` when given
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output to: {}", path.display()))?;
            eprintln!("Output saved to: {}", path.display().to_string().bright_green());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// `+3 -1 ~2`, colored when counts are non-zero
pub fn format_counts(added: usize, removed: usize, modified: usize) -> String {
    let paint = |symbol: &str, count: usize, color: Color| {
        let text = format!("{}{}", symbol, count);
        if count > 0 {
            text.color(color).to_string()
        } else {
            text.dimmed().to_string()
        }
    };

    format!(
        "{} {} {}",
        paint("+", added, Color::Green),
        paint("-", removed, Color::Red),
        paint("~", modified, Color::Yellow)
    )
}
