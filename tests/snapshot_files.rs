//! Snapshot files on disk.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(unused_must_use)]

use dawnfall::game::snapshot::{load_from_path, save_to_path};
use dawnfall::game::{Assignment, RecordingSinks, Silent, SNAPSHOT_FORMAT};
use dawnfall::{Choice, Game, Phase, PlayerId, Role, RuleSet, SnapshotError};
use tempfile::TempDir;

fn five_player_game() -> Game<Silent> {
    let names = ["ann", "bob", "cat", "dan", "eve"];
    let roles = [Role::Cop, Role::Town, Role::Mafia, Role::Doctor, Role::Town];
    let players: Vec<PlayerId> = names.iter().copied().map(PlayerId::from).collect();
    let mut assignment = Assignment::new(players.iter().cloned().zip(roles).collect());
    Game::start(players, &mut assignment, RuleSet::default(), Silent).unwrap()
}

#[test]
fn test_save_and_load_mid_night() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("night.json");

    let mut game = five_player_game();
    for voter in ["ann", "bob", "dan"] {
        game.vote(&voter.into(), Some(Choice::Nobody)).unwrap();
    }
    assert_eq!(game.phase(), Phase::Night);
    game.mafia_target(&"cat".into(), Choice::Player("bob".into())).unwrap();

    save_to_path(&game.snapshot(), &path).unwrap();
    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded, game.snapshot());

    // The restored night resolves once the last two actions arrive.
    let mut restored = Game::restore(loaded, RecordingSinks::new()).unwrap();
    assert!(restored.sinks().messages.is_empty());
    restored.target(&"ann".into(), Some(Choice::Player("cat".into()))).unwrap();
    restored.target(&"dan".into(), Some(Choice::Player("ann".into()))).unwrap();

    assert_eq!(restored.phase(), Phase::Day);
    assert_eq!(restored.day(), 2);
    assert!(!restored.players().contains(&"bob".into()));
    assert!(restored
        .sinks()
        .direct(&"ann".into())
        .any(|text| text == "cat is Mafia."));
}

#[test]
fn test_future_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");

    let mut snapshot = five_player_game().snapshot();
    snapshot.format = SNAPSHOT_FORMAT + 1;
    std::fs::write(&path, snapshot.to_json().unwrap()).unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, SnapshotError::UnsupportedFormat(f) if f == SNAPSHOT_FORMAT + 1));
}

#[test]
fn test_tampered_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tampered.json");

    let mut snapshot = five_player_game().snapshot();
    snapshot.day = 0;
    save_to_path(&snapshot, &path).unwrap();

    let loaded = load_from_path(&path).unwrap();
    let err = Game::restore(loaded, Silent).unwrap_err();
    assert!(matches!(err, SnapshotError::Corrupt(_)));
}

#[test]
fn test_missing_and_garbled_files() {
    let dir = TempDir::new().unwrap();

    let err = load_from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SnapshotError::Io(_)));

    let path = dir.path().join("garbled.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_from_path(&path).unwrap_err(), SnapshotError::Json(_)));
}
