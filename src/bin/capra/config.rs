//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Cart output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table with totals.
    Table,

    /// Cart state as JSON.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Fixture settings.
#[derive(Debug, Args)]
pub struct FixtureConfig {
    /// Directory holding `catalog/` and `carts/` fixtures
    #[arg(long = "fixtures", env = "CAPRA_FIXTURES", default_value = "./fixtures")]
    pub path: PathBuf,

    /// Fixture set to replay
    #[arg(short, long, env = "CAPRA_SET", default_value = "starter")]
    pub set: String,

    /// Write the resulting cart state to this JSON file
    #[arg(long, env = "CAPRA_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,
}

/// Capra CLI configuration
#[derive(Debug, Parser)]
#[command(name = "capra", about = "Replay a cart fixture and print the cart", long_about = None)]
pub struct CliConfig {
    /// Fixture settings.
    #[command(flatten)]
    pub fixtures: FixtureConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Output format (table, json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
