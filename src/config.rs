//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.babypool.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Guess input settings.
    #[serde(default)]
    pub guess: GuessConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Blob store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory the store resolves keys under.
    #[serde(default = "default_store_root")]
    pub root: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

fn default_store_root() -> String {
    "pool_data".to_string()
}

/// Weight bounds offered on the submission form.
///
/// These are display guidance for input validation only; guesses
/// already in the store are never re-checked against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessConfig {
    /// Minimum weight offered (lbs).
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,

    /// Maximum weight offered (lbs).
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,

    /// Weight used when the submitter does not pick one (lbs).
    #[serde(default = "default_weight")]
    pub default_weight: f64,
}

impl Default for GuessConfig {
    fn default() -> Self {
        Self {
            min_weight: default_min_weight(),
            max_weight: default_max_weight(),
            default_weight: default_weight(),
        }
    }
}

fn default_min_weight() -> f64 {
    5.0
}

fn default_max_weight() -> f64 {
    12.0
}

fn default_weight() -> f64 {
    8.0
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Vertical spacing between stacked chart points sharing a weight.
    #[serde(default = "default_stack_spacing")]
    pub stack_spacing: f64,

    /// Include the name cloud section.
    #[serde(default = "default_true")]
    pub include_name_cloud: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            stack_spacing: default_stack_spacing(),
            include_name_cloud: true,
        }
    }
}

fn default_output() -> String {
    "pool_report.html".to_string()
}

fn default_stack_spacing() -> f64 {
    crate::analysis::DEFAULT_STACK_SPACING
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".babypool.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only
    /// explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref store_dir) = args.store_dir {
            self.store.root = store_dir.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
