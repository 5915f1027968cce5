//! Consistency checks over a whole game.
//!
//! A correctly implemented engine never violates these. They run after
//! every accepted action in debug builds and on every restored snapshot.

use std::collections::BTreeSet;
use std::fmt;

use crate::game::elimination::mafia_has_parity;
use crate::game::{Choice, Game, Phase, PlayerId};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns every violation found, or an empty list.
#[must_use]
pub fn check_invariants<S>(game: &Game<S>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    if game.day == 0 {
        fail(String::from("day counter is zero"));
    }
    if (game.phase == Phase::End) != game.outcome.is_some() {
        fail(format!("phase {} with outcome {:?}", game.phase, game.outcome.is_some()));
    }
    if (game.phase == Phase::Dusk) != game.vengeance.is_some() {
        fail(format!("phase {} with pending vengeance {:?}", game.phase, game.vengeance.is_some()));
    }
    if game.phase != Phase::Night && game.mafia_target.is_some() {
        fail(format!("mafia target pending during {}", game.phase));
    }

    let mut living = BTreeSet::new();
    for player in game.roster.iter() {
        if !living.insert(&player.id) {
            fail(format!("{} is seated twice", player.id));
        }
    }
    let mut everyone = living.clone();
    for death in &game.graveyard {
        if !everyone.insert(&death.id) {
            fail(format!("{} died twice or is dead and alive", death.id));
        }
    }

    if game.phase != Phase::End {
        let mafia = game.roster.mafia_count();
        if mafia == 0 || mafia_has_parity(mafia, game.roster.len()) {
            fail(format!(
                "game still running with {mafia} mafia among {} players",
                game.roster.len()
            ));
        }
    }

    for player in game.roster.iter() {
        if let Some(Choice::Player(votee)) = &player.vote {
            if game.phase == Phase::Day && !living.contains(votee) {
                fail(format!("{} votes for non-living {votee}", player.id));
            }
        }
        if player.vote.is_some() && game.phase == Phase::Night {
            fail(format!("{} has a vote at night", player.id));
        }
        if player.role.is_contract() && !game.contracts.contains_key(&player.id) {
            fail(format!("{} is a {} without a contract", player.id, player.role));
        }
    }

    for (holder, contract) in &game.contracts {
        if !everyone.contains(holder) {
            fail(format!("contract held by stranger {holder}"));
        }
        if !everyone.contains(&contract.charge) {
            fail(format!("{holder} holds a contract on stranger {}", contract.charge));
        }
        if let Some(player) = game.roster.get(holder) {
            if player.role != contract.role {
                fail(format!(
                    "{holder} plays {} but holds a {} contract",
                    player.role, contract.role
                ));
            }
            if player.target != Some(Choice::Player(contract.charge.clone())) {
                fail(format!("{holder} lost track of charge {}", contract.charge));
            }
        }
    }

    let strangers = |set: &BTreeSet<PlayerId>| set.iter().any(|id| !everyone.contains(id));
    if strangers(&game.stunned) || strangers(&game.revealed) || strangers(&game.mafia_actors) {
        fail(String::from("bookkeeping refers to unknown players"));
    }

    if let Some(vengeance) = &game.vengeance {
        if !living.contains(&vengeance.idiot) {
            fail(format!("vengeance for non-living {}", vengeance.idiot));
        }
        if vengeance.voters.contains(&vengeance.idiot) {
            fail(format!("{} may take vengeance on themselves", vengeance.idiot));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds.
///
/// # Panics
///
/// Panics listing every violation.
#[cfg(debug_assertions)]
pub fn assert_invariants<S>(game: &Game<S>) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants<S>(_game: &Game<S>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Assignment, RecordingSinks, Role};
    use crate::rules::RuleSet;

    fn valid_game() -> Game<RecordingSinks> {
        let players: Vec<PlayerId> = ["ann", "bob", "cat", "dan", "eve"]
            .into_iter()
            .map(PlayerId::from)
            .collect();
        let roles = [Role::Town, Role::Guard, Role::Mafia, Role::Town, Role::Town];
        let mut assignment = Assignment::new(players.iter().cloned().zip(roles).collect())
            .with_contract("bob", Role::Guard, "ann");
        Game::start(players, &mut assignment, RuleSet::default(), RecordingSinks::new()).unwrap()
    }

    #[test]
    fn test_valid_game_passes() {
        assert!(check_invariants(&valid_game()).is_empty());
    }

    #[test]
    fn test_mafia_parity_while_running_detected() {
        let mut game = valid_game();
        for id in ["ann", "dan", "eve"] {
            let _ = game.roster.remove(&id.into());
        }
        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("still running")));
    }

    #[test]
    fn test_contract_role_mismatch_detected() {
        let mut game = valid_game();
        if let Some(bob) = game.roster.get_mut(&"bob".into()) {
            bob.role = Role::Agent;
        }
        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("holds a Guard contract")));
    }

    #[test]
    fn test_dusk_without_vengeance_detected() {
        let mut game = valid_game();
        game.phase = Phase::Dusk;
        assert_eq!(check_invariants(&game).len(), 1);
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut game = valid_game();
        game.day = 0;
        game.phase = Phase::End;
        game.stunned.insert("zed".into());
        let violations = check_invariants(&game);
        assert!(violations.len() >= 3);
        assert!(violations[0].to_string().starts_with("Invariant violation:"));
    }
}
