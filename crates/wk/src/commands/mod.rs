//! CLI command implementations.

pub(crate) mod access;
pub(crate) mod page;

use std::path::PathBuf;

use clap::Args;
use wk_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use access::AccessCommand;
pub(crate) use page::{LinkArgs, ParseArgs, PathArgs, SitemapArgs};

/// Configuration arguments shared by all commands.
#[derive(Args, Debug)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover wk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Neutral culture of the site (overrides config).
    #[arg(long)]
    neutral_culture: Option<String>,
}

impl ConfigArgs {
    /// Load configuration, applying CLI overrides.
    pub(crate) fn load(&self, rules_file: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            neutral_culture: self.neutral_culture.clone(),
            rules_file,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}
