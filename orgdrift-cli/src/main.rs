use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use orgdrift::cli::commands::{handle_diff_command, handle_graph_command, handle_validate_command};
use orgdrift::cli::{Cli, Commands};
use orgdrift::config::Config;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .format_timestamp(None)
        .init();

    log::debug!("Running {:?}", cli.command);

    let success = match cli.command {
        Commands::Graph(args) => {
            handle_graph_command(args, &config)?;
            true
        }
        Commands::Diff(args) => {
            let fail_on_changes = args.fail_on_changes;
            let has_changes = handle_diff_command(args, &config)?;
            !(fail_on_changes && has_changes)
        }
        Commands::Validate(args) => handle_validate_command(args)?,
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
