//! Error types for the game engine.
//!
//! Only illegal requests are errors. A game reaching its end is reported
//! through [`crate::game::Progress::Ended`], never through these types.

use thiserror::Error;

use crate::game::{Phase, PlayerId, Role};

/// A request the engine refused. The game state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action is not legal in the current phase.
    #[error("cannot {action} during {phase}")]
    WrongPhase {
        /// Name of the attempted action.
        action: &'static str,
        /// Phase the game was in.
        phase: Phase,
    },
    /// The id does not belong to a living player.
    #[error("{0} is not a living player")]
    UnknownPlayer(PlayerId),
    /// A stunned player tried to vote.
    #[error("{0} is stunned and cannot vote today")]
    Stunned(PlayerId),
    /// The actor's role has no night action.
    #[error("{0} has no night action")]
    NoNightAction(PlayerId),
    /// The actor may not order the mafia kill.
    #[error("{0} cannot order the mafia kill")]
    CannotOrderKill(PlayerId),
    /// Self-targeting is forbidden for this action.
    #[error("{0} cannot target themselves")]
    SelfTarget(PlayerId),
    /// The idiot picked someone who did not vote for them.
    #[error("{target} did not vote for {idiot}")]
    NotAVoter {
        /// The idiot taking vengeance.
        idiot: PlayerId,
        /// The rejected target.
        target: PlayerId,
    },
    /// Only the elected idiot acts at dusk.
    #[error("{0} is not the elected idiot")]
    NotTheIdiot(PlayerId),
    /// Only a celeb can reveal.
    #[error("{0} is not a celeb")]
    NotCeleb(PlayerId),
    /// The celeb has already revealed.
    #[error("{0} has already revealed")]
    AlreadyRevealed(PlayerId),
    /// The actor already spent tonight's action on the other ability.
    #[error("{0} has already acted tonight")]
    AlreadyActed(PlayerId),
    /// The game is over.
    #[error("the game has ended")]
    GameOver,
}

/// A rule write with an unknown name or value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rule {name}={value}")]
pub struct InvalidRule {
    /// Requested rule name.
    pub name: String,
    /// Requested value.
    pub value: String,
}

/// The role assignment handed to [`crate::game::Game::start`] is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Fewer than three players.
    #[error("too few players: {0} (minimum 3)")]
    TooFewPlayers(usize),
    /// A player id was listed twice.
    #[error("duplicate player {0}")]
    DuplicatePlayer(PlayerId),
    /// A player received no role, or a role went to a stranger.
    #[error("assignment does not cover exactly the signed-up players")]
    AssignmentMismatch,
    /// Mafia headcount outside `1..ceil(n/2)`.
    #[error("{mafia} mafia among {players} players is not a playable setup")]
    MafiaCount {
        /// Mafia-aligned players assigned.
        mafia: usize,
        /// Total players.
        players: usize,
    },
    /// A contract is inconsistent with the assignment.
    #[error("bad contract for {holder}: {reason}")]
    BadContract {
        /// Contract holder.
        holder: PlayerId,
        /// What is wrong with it.
        reason: String,
    },
    /// A contract role was assigned without a contract.
    #[error("{holder} is a {role} but has no contract")]
    MissingContract {
        /// The player.
        holder: PlayerId,
        /// The assigned role.
        role: Role,
    },
}

/// A snapshot could not be read or written.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot written by an incompatible version.
    #[error("unsupported snapshot format {0}")]
    UnsupportedFormat(u32),
    /// The snapshot decodes but describes an impossible game.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
    /// JSON encoding or decoding failed.
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    /// Filesystem failure.
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::WrongPhase {
            action: "vote",
            phase: Phase::Night,
        };
        assert_eq!(err.to_string(), "cannot vote during night");

        let err = ActionError::NotAVoter {
            idiot: PlayerId::from("dan"),
            target: PlayerId::from("cat"),
        };
        assert_eq!(err.to_string(), "cat did not vote for dan");
    }

    #[test]
    fn test_invalid_rule_display() {
        let err = InvalidRule {
            name: "cop_strength".into(),
            value: "psychic".into(),
        };
        assert_eq!(err.to_string(), "invalid rule cop_strength=psychic");
    }
}
