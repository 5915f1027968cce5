//! Output formatting utilities for CLI.

use dawnfall::rules::{RuleSet, RULES};
use dawnfall::simulate::{BatchConfig, BatchReport};
use serde::Serialize;
use std::fmt::Write as _;

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult<'a> {
    /// Seats per game.
    players: usize,
    /// First game seed.
    seed: u64,
    /// Raw counts.
    counts: &'a BatchReport,
    /// Town win rate (0.0-1.0).
    town_rate: f64,
    /// Mafia win rate (0.0-1.0).
    mafia_rate: f64,
    /// Idiot win rate (0.0-1.0).
    idiot_rate: f64,
    /// Average final day.
    avg_days: f64,
    /// Contract success rate (0.0-1.0), null without contracts.
    contract_rate: Option<f64>,
}

impl<'a> JsonBatchResult<'a> {
    pub(super) fn new(config: &BatchConfig, report: &'a BatchReport) -> Self {
        Self {
            players: config.players,
            seed: config.seed,
            counts: report,
            town_rate: report.rate(report.town_wins),
            mafia_rate: report.rate(report.mafia_wins),
            idiot_rate: report.rate(report.idiot_wins),
            avg_days: report.average_days(),
            contract_rate: contract_rate(report),
        }
    }
}

fn contract_rate(report: &BatchReport) -> Option<f64> {
    (report.contracts > 0).then(|| report.contracts_won as f64 / report.contracts as f64)
}

/// Format batch results as human-readable text.
pub(super) fn format_batch_text(config: &BatchConfig, report: &BatchReport) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Simulation Results ({} games, {} players, seed {})",
        report.games_played + report.games_failed,
        config.players,
        config.seed
    );
    let _ = writeln!(output, "{}", "=".repeat(50));
    for (side, wins) in [
        ("Town", report.town_wins),
        ("Mafia", report.mafia_wins),
        ("Idiot", report.idiot_wins),
    ] {
        let _ = writeln!(
            output,
            "  {side:<6} {wins:>8} wins ({:>5.1}%)",
            report.rate(wins) * 100.0
        );
    }
    let _ = writeln!(output, "\nAverage length: {:.1} days", report.average_days());
    if let Some(rate) = contract_rate(report) {
        let _ = writeln!(
            output,
            "Contracts: {}/{} succeeded ({:.1}%)",
            report.contracts_won,
            report.contracts,
            rate * 100.0
        );
    }
    if report.games_failed > 0 {
        let _ = writeln!(output, "Failed games: {}", report.games_failed);
    }
    output
}

/// Format the rule matrix with allowed values, marking the active one.
pub(super) fn format_rules(rules: &RuleSet) -> String {
    let mut output = String::new();
    for info in &RULES {
        let current = rules.get(info.name).unwrap_or_default();
        let values: Vec<String> = info
            .values
            .iter()
            .map(|v| if *v == current { format!("[{v}]") } else { (*v).to_string() })
            .collect();
        let _ = writeln!(output, "{:<22} {:<28} {}", info.name, values.join(" "), info.summary);
    }
    output
}
