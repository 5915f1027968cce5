//! Game layer.
//!
//! A moderator for one game of Mafia:
//! - Roles, teams and contracts
//! - Day votes, elections and the Idiot's dusk
//! - Night actions resolved at dawn
//! - Win detection and snapshots
//!
//! [`Game`] owns all state. Output goes through [`Sinks`]; roles come from a
//! [`RoleAssigner`]. Nothing here blocks or spawns.

mod assign;
mod contract;
mod dawn;
mod elimination;
pub mod invariants;
mod messages;
mod player;
mod role;
mod sinks;
pub mod snapshot;
mod state;
mod vote;

pub use assign::{default_setup, validate, Assignment, RoleAssigner, SeededAssigner, MIN_PLAYERS};
pub use contract::{refocus, Contract, ContractOutcome, NewCharge};
pub use elimination::mafia_has_parity;
pub use player::{Choice, Player, PlayerId, Roster};
pub use role::{NightAction, Role, Team, UnknownRole};
pub use sinks::{Message, RecordingSinks, Silent, Sinks};
pub use snapshot::{Snapshot, SNAPSHOT_FORMAT};
pub use state::{Cause, Death, Game, GameOver, MafiaTarget, Phase, Progress, Vengeance, Winner};
pub use vote::{majority, no_kill_majority, threshold};
