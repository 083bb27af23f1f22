//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{DiffCommands, GraphCommands, ValidateCommands};

#[derive(Parser, Debug)]
#[command(name = "orgdrift", version, about = "Dependency graphs and drift reports for metadata inventories")]
pub struct Cli {
    /// Path to a config file (defaults to ~/.config/orgdrift/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the object dependency graph of an inventory
    Graph(GraphCommands),
    /// Compare two inventories
    Diff(DiffCommands),
    /// Check an inventory for duplicate keys and dangling references
    Validate(ValidateCommands),
}
