//! Play and resume command implementations.

use super::console::ConsoleSinks;
use super::script::{self, Action, Step};
use super::{load_rules, CliError};
use dawnfall::game::{snapshot, SeededAssigner, Sinks};
use dawnfall::{ActionError, Game, Progress};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn read_script(path: &Path) -> Result<script::Script, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    script::parse(&text)
}

fn apply<S: Sinks>(game: &mut Game<S>, action: &Action) -> Result<Progress, ActionError> {
    match action {
        Action::Vote(voter, choice) => game.vote(voter, choice.clone()),
        Action::Target(actor, choice) => game.target(actor, choice.clone()),
        Action::Mafia(actor, choice) => game.mafia_target(actor, choice.clone()),
        Action::Reveal(actor) => game.reveal(actor),
        Action::Timer => game.timer(),
    }
}

/// Run every step, warning about refused ones. Returns how many were refused.
fn run_steps<S: Sinks>(game: &mut Game<S>, steps: &[Step]) -> usize {
    let mut refused = 0;
    for step in steps {
        match apply(game, &step.action) {
            Ok(Progress::Ended(over)) => {
                info!(line = step.line, winner = ?over.winner, "game ended");
            }
            Ok(Progress::Ongoing) => {}
            Err(err) => {
                refused += 1;
                warn!(line = step.line, %err, "action refused");
            }
        }
    }
    refused
}

fn finish<S: Sinks>(game: &Game<S>, refused: usize, save: Option<&Path>) -> Result<(), CliError> {
    println!();
    match game.outcome() {
        Some(over) => println!("Game over on day {}: {:?}", game.day(), over.winner),
        None => println!(
            "Stopped in {} of day {} with {} players alive",
            game.phase(),
            game.day(),
            game.players().len()
        ),
    }
    if refused > 0 {
        println!("{refused} action(s) refused");
    }
    if let Some(path) = save {
        snapshot::save_to_path(&game.snapshot(), path)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the script, rules or setup are unusable.
pub(crate) fn execute(
    script_path: &Path,
    rules_path: Option<PathBuf>,
    set: &[String],
    seed: Option<u64>,
    save: Option<PathBuf>,
) -> Result<(), CliError> {
    let script = read_script(script_path)?;
    if script.players.is_empty() {
        return Err(CliError::new("script has no players line"));
    }
    let rules = load_rules(rules_path.as_deref(), set)?;

    let mut game = match script.assignment()? {
        Some(mut assignment) => {
            Game::start(script.players.clone(), &mut assignment, rules, ConsoleSinks::stdout())?
        }
        None => {
            let seed = seed.unwrap_or_else(|| {
                use std::time::{SystemTime, UNIX_EPOCH};
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(42)
            });
            println!("Dealing with seed {seed}");
            let mut assigner = SeededAssigner::new(seed).with_setup(script.setup.clone());
            Game::start(script.players.clone(), &mut assigner, rules, ConsoleSinks::stdout())?
        }
    };

    let refused = run_steps(&mut game, &script.steps);
    finish(&game, refused, save.as_deref())
}

/// Execute the resume command.
///
/// # Errors
///
/// Returns an error if the snapshot or script cannot be used.
pub(crate) fn resume(snapshot_path: &Path, script_path: &Path, save: Option<PathBuf>) -> Result<(), CliError> {
    let script = read_script(script_path)?;
    if !script.is_headless() {
        return Err(CliError::new("a resumed game cannot take players, setup or assign lines"));
    }
    let saved = snapshot::load_from_path(snapshot_path)?;
    let mut game = Game::restore(saved, ConsoleSinks::stdout())?;
    println!("Resumed in {} of day {}", game.phase(), game.day());

    let refused = run_steps(&mut game, &script.steps);
    finish(&game, refused, save.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawnfall::game::RecordingSinks;
    use dawnfall::{Phase, RuleSet};

    #[test]
    fn test_scripted_game_reaches_town_win() {
        let script = script::parse(
            "players ann bob cat\n\
             assign ann=Town bob=Town cat=Mafia\n\
             vote ann zed\n\
             vote ann cat\n\
             vote bob cat\n\
             timer\n",
        )
        .unwrap();
        let mut assignment = script.assignment().unwrap().unwrap();
        let mut game =
            Game::start(script.players.clone(), &mut assignment, RuleSet::default(), RecordingSinks::new())
                .unwrap();

        let refused = run_steps(&mut game, &script.steps);
        // The unknown vote and the timer after the end.
        assert_eq!(refused, 2);
        assert_eq!(game.phase(), Phase::End);
    }
}
