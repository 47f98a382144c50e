//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Arrival;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Babypool - baby shower guessing pool
///
/// Collect guesses (name, weight, arrival timing) for the new arrival
/// and render them as a chart, name cloud, and table.
///
/// Examples:
///   babypool submit --name "Jane" --baby-name "Sam" --weight 7.5 --arrival early
///   babypool report --output pool_report.html
///   babypool list
///   babypool init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Directory backing the guess store
    #[arg(
        long,
        value_name = "DIR",
        env = "BABYPOOL_STORE_DIR",
        global = true
    )]
    pub store_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .babypool.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Submit a guess for the new arrival
    Submit {
        /// Your name
        #[arg(long, value_name = "WHO")]
        name: String,

        /// Your guess for the baby's name
        #[arg(long, value_name = "NAME")]
        baby_name: String,

        /// Guessed weight in pounds
        ///
        /// Falls back to the configured default (8.0 lbs) when omitted.
        #[arg(long, value_name = "LBS")]
        weight: Option<f64>,

        /// Arrival timing guess
        #[arg(long, value_name = "WHEN")]
        arrival: ArrivalArg,
    },

    /// Render all guesses as a report (chart, name cloud, table)
    Report {
        /// Output file path (default from config)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (html, markdown, json)
        #[arg(long, default_value = "html", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Print all guesses to stdout
    List,

    /// Generate a default .babypool.toml configuration file
    InitConfig,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

/// Arrival timing as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArrivalArg {
    Early,
    OnTime,
    Late,
}

impl From<ArrivalArg> for Arrival {
    fn from(arg: ArrivalArg) -> Self {
        match arg {
            ArrivalArg::Early => Arrival::Early,
            ArrivalArg::OnTime => Arrival::OnTime,
            ArrivalArg::Late => Arrival::Late,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Submit {
            weight: Some(weight),
            ..
        } = &self.command
        {
            if !weight.is_finite() {
                return Err("Weight must be a finite number".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
