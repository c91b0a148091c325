pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-booking")]
#[command(about = "Inspect reservation snapshots and quote stays")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the snapshot output directory
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Decode a JSON or XML snapshot and print it as JSON
    Show {
        /// Snapshot file; relative paths resolve against the output directory
        file: PathBuf,
    },
    /// Print the price of a stay
    Quote {
        #[arg(long)]
        price: f64,
        /// Check-in date, YYYY-MM-DD
        #[arg(long)]
        check_in: String,
        /// Check-out date, YYYY-MM-DD
        #[arg(long)]
        check_out: String,
    },
    /// Validate the configuration and print the resolved snapshot paths
    Check,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// The TOML configuration with command-line overrides applied.
    pub fn load_settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            settings.snapshot.output_path = output_path.clone();
        }

        Ok(settings)
    }
}
