//! Saving and restoring a game in progress.
//!
//! Snapshots are pretty-printed JSON carrying a `format` number. Loading
//! checks the number before decoding anything else, then checks the
//! decoded game against every invariant.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SnapshotError;
use crate::game::invariants::check_invariants;
use crate::game::state::{Death, GameOver, MafiaTarget, Phase, Vengeance};
use crate::game::{Contract, Game, PlayerId, Roster, Sinks};
use crate::rules::RuleSet;

/// Current snapshot format.
pub const SNAPSHOT_FORMAT: u32 = 1;

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Always [`SNAPSHOT_FORMAT`] when written by this version.
    pub format: u32,
    /// Rule matrix.
    pub rules: RuleSet,
    /// Current phase.
    pub phase: Phase,
    /// Day counter.
    pub day: u32,
    /// Living players in seating order.
    pub players: Roster,
    /// Contracts by holder.
    pub contracts: BTreeMap<PlayerId, Contract>,
    /// Dead players.
    pub graveyard: Vec<Death>,
    /// Pending kill order.
    pub mafia_target: Option<MafiaTarget>,
    /// Members who ordered a kill tonight.
    pub mafia_actors: BTreeSet<PlayerId>,
    /// Players stripped tonight.
    pub stripped: BTreeSet<PlayerId>,
    /// Players who cannot vote today.
    pub stunned: BTreeSet<PlayerId>,
    /// Celebs who revealed.
    pub revealed: BTreeSet<PlayerId>,
    /// Pending Idiot vengeance.
    pub vengeance: Option<Vengeance>,
    /// Result of a finished game.
    pub outcome: Option<GameOver>,
}

#[derive(Deserialize)]
struct Header {
    format: u32,
}

impl Snapshot {
    /// Encode as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode JSON written by [`Snapshot::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedFormat`] for other format
    /// numbers and [`SnapshotError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let header: Header = serde_json::from_str(json)?;
        if header.format != SNAPSHOT_FORMAT {
            return Err(SnapshotError::UnsupportedFormat(header.format));
        }
        Ok(serde_json::from_str(json)?)
    }
}

/// Write a snapshot to a file.
///
/// # Errors
///
/// Returns an error if serialization or file I/O fails.
pub fn save_to_path(snapshot: &Snapshot, path: &Path) -> Result<(), SnapshotError> {
    fs::write(path, snapshot.to_json()?)?;
    info!(path = %path.display(), day = snapshot.day, "snapshot saved");
    Ok(())
}

/// Read a snapshot from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_from_path(path: &Path) -> Result<Snapshot, SnapshotError> {
    let json = fs::read_to_string(path)?;
    Snapshot::from_json(&json)
}

impl<S: Sinks> Game<S> {
    /// Capture the full game state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            format: SNAPSHOT_FORMAT,
            rules: self.rules,
            phase: self.phase,
            day: self.day,
            players: self.roster.clone(),
            contracts: self.contracts.clone(),
            graveyard: self.graveyard.clone(),
            mafia_target: self.mafia_target.clone(),
            mafia_actors: self.mafia_actors.clone(),
            stripped: self.stripped.clone(),
            stunned: self.stunned.clone(),
            revealed: self.revealed.clone(),
            vengeance: self.vengeance.clone(),
            outcome: self.outcome.clone(),
        }
    }

    /// Rebuild a game from a snapshot. Nothing is announced.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedFormat`] or, if the state is
    /// inconsistent, [`SnapshotError::Corrupt`].
    pub fn restore(snapshot: Snapshot, sinks: S) -> Result<Self, SnapshotError> {
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(SnapshotError::UnsupportedFormat(snapshot.format));
        }
        if snapshot.phase == Phase::Init {
            return Err(SnapshotError::Corrupt(String::from("game never started")));
        }
        let game = Self {
            sinks,
            rules: snapshot.rules,
            phase: snapshot.phase,
            day: snapshot.day,
            roster: snapshot.players,
            contracts: snapshot.contracts,
            graveyard: snapshot.graveyard,
            mafia_target: snapshot.mafia_target,
            mafia_actors: snapshot.mafia_actors,
            stripped: snapshot.stripped,
            stunned: snapshot.stunned,
            revealed: snapshot.revealed,
            vengeance: snapshot.vengeance,
            outcome: snapshot.outcome,
        };

        let violations = check_invariants(&game);
        if !violations.is_empty() {
            let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
            return Err(SnapshotError::Corrupt(messages.join("; ")));
        }
        info!(phase = %game.phase, day = game.day, alive = game.roster.len(), "game restored");
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Assignment, Choice, Progress, RecordingSinks, Role};

    fn game() -> Game<RecordingSinks> {
        let players: Vec<PlayerId> = ["ann", "bob", "cat", "dan", "eve"]
            .into_iter()
            .map(PlayerId::from)
            .collect();
        let roles = [Role::Cop, Role::Idiot, Role::Mafia, Role::Town, Role::Agent];
        let mut assignment = Assignment::new(players.iter().cloned().zip(roles).collect())
            .with_contract("bob", Role::Idiot, "bob")
            .with_contract("eve", Role::Agent, "ann");
        Game::start(players, &mut assignment, RuleSet::default(), RecordingSinks::new()).unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let mut game = game();
        let _ = game.vote(&"ann".into(), Some(Choice::Player("cat".into()))).unwrap();
        let snapshot = game.snapshot();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"format\": 1"));
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_restored_game_continues_identically() {
        let mut original = game();
        let _ = original.vote(&"ann".into(), Some(Choice::Player("cat".into()))).unwrap();
        let mut restored = Game::restore(original.snapshot(), RecordingSinks::new()).unwrap();
        assert!(restored.sinks().messages.is_empty());

        for game in [&mut original, &mut restored] {
            let _ = game.vote(&"dan".into(), Some(Choice::Player("cat".into()))).unwrap();
            let p = game.vote(&"eve".into(), Some(Choice::Player("cat".into()))).unwrap();
            assert!(matches!(p, Progress::Ended(_)));
        }
        assert_eq!(original.snapshot(), restored.snapshot());
    }

    #[test]
    fn test_unsupported_format() {
        let mut snapshot = game().snapshot();
        snapshot.format = 7;
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(matches!(
            Snapshot::from_json(&json),
            Err(SnapshotError::UnsupportedFormat(7))
        ));
        assert!(matches!(
            Game::restore(snapshot, RecordingSinks::new()),
            Err(SnapshotError::UnsupportedFormat(7))
        ));
        assert!(matches!(
            Snapshot::from_json("{\"format\": 2, \"anything\": true}"),
            Err(SnapshotError::UnsupportedFormat(2))
        ));
    }

    #[test]
    fn test_corrupt_snapshot_rejected() {
        let mut snapshot = game().snapshot();
        snapshot.phase = Phase::Dusk;
        assert!(matches!(
            Game::restore(snapshot, RecordingSinks::new()),
            Err(SnapshotError::Corrupt(_))
        ));
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(SnapshotError::Json(_))
        ));
    }
}
