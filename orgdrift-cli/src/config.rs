//! Configuration file handling
//!
//! Reads `~/.config/orgdrift/config.toml` (or an explicit path). A missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::diff::{DiffOptions, EntityKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default `env_logger` filter, overridden by `RUST_LOG`
    pub log_level: String,
    pub default_format: OutputFormat,
    pub diff: DiffSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSection {
    pub ignore_attributes: Vec<String>,
    pub skip_categories: Vec<EntityKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            default_format: OutputFormat::Json,
            diff: DiffSection::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    /// Diff options from the config, extended with command-line additions
    pub fn diff_options(&self, extra_ignores: &[String], extra_skips: &[EntityKind]) -> DiffOptions {
        let mut options = DiffOptions {
            ignore_attributes: self.diff.ignore_attributes.clone(),
            skip_categories: self.diff.skip_categories.clone(),
        };
        options.ignore_attributes.extend(extra_ignores.iter().cloned());
        for kind in extra_skips {
            if !options.skip_categories.contains(kind) {
                options.skip_categories.push(*kind);
            }
        }
        options
    }
}

/// `~/.config/orgdrift/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("orgdrift").join("config.toml"))
}
