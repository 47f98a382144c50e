//! Data models for the guessing pool.
//!
//! This module contains the core data structures used throughout
//! the application for representing guesses and rendered reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrival-timing guess for the baby.
///
/// Serializes with the historical on-disk strings (`"Early"`, `"On-time"`,
/// `"Late"`) so existing shard files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arrival {
    /// Before the due date.
    Early,
    /// On or around the due date.
    #[serde(rename = "On-time")]
    OnTime,
    /// After the due date.
    Late,
}

impl fmt::Display for Arrival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arrival::Early => write!(f, "Early"),
            Arrival::OnTime => write!(f, "On-time"),
            Arrival::Late => write!(f, "Late"),
        }
    }
}

impl Arrival {
    /// All variants, in display order.
    pub const ALL: [Arrival; 3] = [Arrival::Early, Arrival::OnTime, Arrival::Late];

    /// Chart color for this arrival guess (blue, green, orange).
    pub fn chart_color(&self) -> &'static str {
        match self {
            Arrival::Early => "#3b82f6",
            Arrival::OnTime => "#16a34a",
            Arrival::Late => "#f97316",
        }
    }
}

impl std::str::FromStr for Arrival {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "early" => Ok(Arrival::Early),
            "on-time" | "ontime" | "on_time" => Ok(Arrival::OnTime),
            "late" => Ok(Arrival::Late),
            other => Err(format!(
                "unknown arrival '{}' (expected early, on-time, or late)",
                other
            )),
        }
    }
}

/// A single guess submitted by one guest.
///
/// Field names on the wire are camelCase (`guesserName`, `babyName`, ...)
/// to match the persisted shard format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    /// Name of the person guessing (required, non-empty).
    pub guesser_name: String,
    /// Their guess for the baby's name (required, non-empty).
    pub baby_name: String,
    /// Guessed weight in pounds. Constrained at input time only;
    /// never re-validated on read.
    pub weight: f64,
    /// Guessed arrival timing.
    pub arrival: Arrival,
}

impl Guess {
    /// Validate required-field presence.
    ///
    /// Weight bounds are a display concern checked at the form/CLI layer,
    /// not here.
    pub fn validate(&self) -> Result<(), String> {
        if self.guesser_name.trim().is_empty() {
            return Err("guesser name must not be empty".to_string());
        }
        if self.baby_name.trim().is_empty() {
            return Err("baby name guess must not be empty".to_string());
        }
        Ok(())
    }

    /// The submitter identity this guess belongs to.
    pub fn submitter_id(&self) -> String {
        normalize_submitter_id(&self.guesser_name)
    }
}

/// Normalize a submitter identity: trimmed and lower-cased.
///
/// Used as the shard key component, so "Jane", " jane" and "JANE" all
/// land in the same shard.
pub fn normalize_submitter_id(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize a baby-name guess for frequency counting.
pub fn normalize_baby_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Metadata about a rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the guesses were loaded from.
    pub store_root: String,
    /// Total number of guesses across all shards.
    pub total_guesses: usize,
    /// Number of distinct submitter identities.
    pub submitters: usize,
}
