//! Validate command handler

use anyhow::Result;
use colored::*;

use super::ValidateCommands;
use crate::inventory::{IssueSeverity, has_errors, load_inventory, validate_inventory};

/// Returns whether the inventory is free of key errors
pub fn handle_validate_command(args: ValidateCommands) -> Result<bool> {
    let inventory = load_inventory(&args.inventory)?;
    let issues = validate_inventory(&inventory);

    let mut shown = 0;
    for issue in &issues {
        match issue.severity() {
            IssueSeverity::Error => println!("{} {}", "error:".red().bold(), issue),
            IssueSeverity::Info if args.verbose => println!("{} {}", "info:".cyan(), issue),
            IssueSeverity::Info => continue,
        }
        shown += 1;
    }

    let ok = !has_errors(&issues);
    if ok {
        println!("{} {}", "✓".green(), args.inventory.display());
    } else {
        log::warn!("{} issues found in {}", shown, args.inventory.display());
    }

    Ok(ok)
}
