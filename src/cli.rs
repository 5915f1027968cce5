//! CLI command implementations for Dawnfall.

pub(crate) mod play;
pub(crate) mod rules;
pub(crate) mod simulate;

mod console;
mod output;
mod script;

use clap::ValueEnum;
use dawnfall::{InvalidRule, RuleSet, SetupError, SnapshotError};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SetupError> for CliError {
    fn from(e: SetupError) -> Self {
        Self::new(format!("cannot start game: {e}"))
    }
}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<InvalidRule> for CliError {
    fn from(e: InvalidRule) -> Self {
        Self::new(e.to_string())
    }
}

/// Build the rule matrix from an optional JSON file plus `name=value`
/// overrides, applied in order.
pub(crate) fn load_rules(path: Option<&Path>, overrides: &[String]) -> Result<RuleSet, CliError> {
    let mut rules = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
            serde_json::from_str(&json)
                .map_err(|e| CliError::new(format!("Bad rules file {}: {e}", path.display())))?
        }
        None => RuleSet::default(),
    };
    for item in overrides {
        let Some((name, value)) = item.split_once('=') else {
            return Err(CliError::new(format!("expected name=value, got {item:?}")));
        };
        rules.set(name, value)?;
    }
    Ok(rules)
}
