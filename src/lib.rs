// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Dawnfall: a moderator engine for Mafia (Werewolf) games.
//!
//! The engine owns the state of one game and enforces its rules:
//! - Day votes with live majorities and no-kill elections
//! - Night actions resolved at dawn in a fixed order
//! - Contract roles that win on the fate of a charge
//! - Fourteen tunable rules
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI scripts / simulator (rayon)   │
//! ├─────────────────────────────────────┤
//! │   Game: phases, votes, dawn, wins   │
//! ├──────────────────┬──────────────────┤
//! │  RoleAssigner    │  Sinks (output)  │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! Every operation returns once its whole cascade has resolved. The end of
//! a game is an ordinary result, [`game::Progress::Ended`]; only refused
//! requests are errors.

pub mod error;
pub mod game;
mod rng;
pub mod rules;
pub mod simulate;

pub use error::{ActionError, InvalidRule, SetupError, SnapshotError};
pub use game::{Choice, Game, GameOver, Phase, PlayerId, Progress, Role, Sinks, Winner};
pub use rules::RuleSet;
