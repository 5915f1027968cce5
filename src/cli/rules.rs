//! Rules command implementation.

use super::output::format_rules;
use super::{load_rules, CliError};
use std::path::PathBuf;

/// Print every rule with its allowed values, bracketing the active one.
///
/// # Errors
///
/// Returns an error if the rules file or an override is invalid.
pub(crate) fn execute(rules: Option<PathBuf>, set: &[String]) -> Result<(), CliError> {
    let rules = load_rules(rules.as_deref(), set)?;
    print!("{}", format_rules(&rules));
    Ok(())
}
