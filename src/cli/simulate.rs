//! Simulate command implementation.

use super::output::{format_batch_text, JsonBatchResult};
use super::{load_rules, CliError, SimulateFormat};
use dawnfall::simulate::{run_batch_with, BatchConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments of the simulate command.
#[derive(Debug)]
pub(crate) struct SimulateArgs {
    pub(crate) players: usize,
    pub(crate) games: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) threads: Option<usize>,
    pub(crate) rules: Option<PathBuf>,
    pub(crate) set: Vec<String>,
    pub(crate) format: SimulateFormat,
    pub(crate) progress: bool,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the rules are invalid or the table is too small.
pub(crate) fn execute(args: SimulateArgs) -> Result<(), CliError> {
    let rules = load_rules(args.rules.as_deref(), &args.set)?;

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(42)
    });
    let config = BatchConfig {
        games: args.games,
        players: args.players,
        seed,
        rules,
    };

    let pb = if args.progress {
        let pb = ProgressBar::new(args.games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("bad progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let report = run_batch_with(&config, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })
    .map_err(|e| CliError::new(e.to_string()))?;
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    match args.format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_batch_text(&config, &report));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        SimulateFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::new(&config, &report))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}
