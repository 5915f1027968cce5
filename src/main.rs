//! Dawnfall CLI - play scripted Mafia games and simulate random ones.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Dawnfall - a Mafia game moderator
#[derive(Parser, Debug)]
#[command(name = "dawnfall")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine decisions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted game
    Play {
        /// Script file: players, setup or assign lines, then actions
        #[arg(required = true)]
        script: PathBuf,

        /// Rules file (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Override one rule, as name=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Seed for dealing roles when the script has no assign lines
        #[arg(short, long)]
        seed: Option<u64>,

        /// Save a snapshot when the script ends
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Continue a saved game with a script of actions
    Resume {
        /// Snapshot file written by --save
        #[arg(required = true)]
        snapshot: PathBuf,

        /// Script file with actions only
        #[arg(required = true)]
        script: PathBuf,

        /// Save a snapshot when the script ends
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run many random-bot games in parallel and report win rates
    Simulate {
        /// Seats per game
        #[arg(short = 'n', long, default_value = "7")]
        players: usize,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Rules file (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Override one rule, as name=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// List every rule, its values and the active setting
    Rules {
        /// Rules file (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Override one rule, as name=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Silent by default, only warnings and refused actions
    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::Play {
            script,
            rules,
            set,
            seed,
            save,
        } => cli::play::execute(&script, rules, &set, seed, save),

        Commands::Resume {
            snapshot,
            script,
            save,
        } => cli::play::resume(&snapshot, &script, save),

        Commands::Simulate {
            players,
            games,
            seed,
            threads,
            rules,
            set,
            format,
            progress,
        } => cli::simulate::execute(cli::simulate::SimulateArgs {
            players,
            games,
            seed,
            threads,
            rules,
            set,
            format,
            progress,
        }),

        Commands::Rules { rules, set } => cli::rules::execute(rules, &set),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
