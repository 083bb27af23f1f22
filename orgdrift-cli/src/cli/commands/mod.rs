//! Command arguments and handlers

pub mod diff;
pub mod graph;
pub mod output;
pub mod validate;

use std::path::PathBuf;

use clap::Args;

use crate::config::OutputFormat;
use crate::diff::EntityKind;

pub use diff::handle_diff_command;
pub use graph::handle_graph_command;
pub use validate::handle_validate_command;

#[derive(Args, Debug)]
pub struct GraphCommands {
    /// Inventory JSON file
    pub inventory: PathBuf,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DiffCommands {
    /// Earlier inventory JSON file
    pub source: PathBuf,

    /// Later inventory JSON file
    pub target: PathBuf,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Attribute to ignore, e.g. `fields.length` or `*.label` (repeatable)
    #[arg(long = "ignore", value_name = "ATTR")]
    pub ignore: Vec<String>,

    /// Category to skip, e.g. `reports` (repeatable)
    #[arg(long = "skip", value_name = "CATEGORY")]
    pub skip: Vec<EntityKind>,

    /// Exit with status 1 when any change is found
    #[arg(long)]
    pub fail_on_changes: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateCommands {
    /// Inventory JSON file
    pub inventory: PathBuf,

    /// Also list informational issues such as references outside the scan
    #[arg(short, long)]
    pub verbose: bool,
}
