//! Role assignment.
//!
//! The engine asks a [`RoleAssigner`] once, at start, and refuses to play
//! an assignment that fails [`validate`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SetupError;
use crate::game::elimination::mafia_has_parity;
use crate::game::{PlayerId, Role};
use crate::rng::Rng;

/// Smallest playable table.
pub const MIN_PLAYERS: usize = 3;

/// Roles and contracts for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// One role per player.
    pub roles: Vec<(PlayerId, Role)>,
    /// Contract role and charge, keyed by holder.
    pub contracts: BTreeMap<PlayerId, (Role, PlayerId)>,
}

impl Assignment {
    /// An assignment without contracts.
    #[must_use]
    pub fn new(roles: Vec<(PlayerId, Role)>) -> Self {
        Self {
            roles,
            contracts: BTreeMap::new(),
        }
    }

    /// Add a contract.
    #[must_use]
    pub fn with_contract(
        mut self,
        holder: impl Into<PlayerId>,
        role: Role,
        charge: impl Into<PlayerId>,
    ) -> Self {
        self.contracts.insert(holder.into(), (role, charge.into()));
        self
    }

    fn role_of(&self, id: &PlayerId) -> Option<Role> {
        self.roles.iter().find(|(p, _)| p == id).map(|(_, r)| *r)
    }
}

/// Decides who plays what.
pub trait RoleAssigner {
    /// Deal roles to `players`, given in seating order.
    fn assign(&mut self, players: &[PlayerId]) -> Assignment;
}

impl RoleAssigner for Assignment {
    fn assign(&mut self, _players: &[PlayerId]) -> Assignment {
        self.clone()
    }
}

/// Check that `assignment` describes a playable game for `players`.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate(players: &[PlayerId], assignment: &Assignment) -> Result<(), SetupError> {
    if players.len() < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers(players.len()));
    }
    let mut seen = BTreeSet::new();
    for id in players {
        if !seen.insert(id) {
            return Err(SetupError::DuplicatePlayer(id.clone()));
        }
    }

    let dealt: BTreeSet<&PlayerId> = assignment.roles.iter().map(|(id, _)| id).collect();
    if dealt.len() != assignment.roles.len() || dealt != seen {
        return Err(SetupError::AssignmentMismatch);
    }

    let mafia = assignment.roles.iter().filter(|(_, r)| r.is_mafia()).count();
    if mafia == 0 || mafia_has_parity(mafia, players.len()) {
        return Err(SetupError::MafiaCount {
            mafia,
            players: players.len(),
        });
    }

    for (holder, (role, charge)) in &assignment.contracts {
        let bad = |reason: String| SetupError::BadContract {
            holder: holder.clone(),
            reason,
        };
        let Some(assigned) = assignment.role_of(holder) else {
            return Err(bad(String::from("holder is not playing")));
        };
        if assigned != *role {
            return Err(bad(format!("holder was dealt {assigned}, not {role}")));
        }
        if !seen.contains(charge) {
            return Err(bad(format!("charge {charge} is not playing")));
        }
        match (role.charges_self(), charge == holder) {
            (true, false) => return Err(bad(format!("a {role} must be their own charge"))),
            (false, true) => return Err(bad(format!("a {role} needs another player as charge"))),
            _ => {}
        }
    }

    for (id, role) in &assignment.roles {
        if role.is_contract() && !assignment.contracts.contains_key(id) {
            return Err(SetupError::MissingContract {
                holder: id.clone(),
                role: *role,
            });
        }
    }
    Ok(())
}

/// A balanced setup for `players` seats.
///
/// The contract role at six or more players rotates with `seed`.
#[must_use]
pub fn default_setup(players: usize, seed: u64) -> Vec<Role> {
    const CONTRACTS: [Role; 4] = [Role::Idiot, Role::Survivor, Role::Guard, Role::Agent];

    let mafia = (players / 4).max(1);
    let mut setup = Vec::with_capacity(players);
    for i in 0..mafia {
        setup.push(match i {
            0 if players >= 6 => Role::Godfather,
            1 if players >= 9 => Role::Dentist,
            _ => Role::Mafia,
        });
    }
    if players >= 5 {
        setup.extend([Role::Cop, Role::Doctor]);
    }
    if players >= 7 {
        setup.push(Role::Stripper);
    }
    if players >= 8 {
        setup.extend([Role::Milky, Role::Celeb]);
    }
    if players >= 6 {
        setup.push(CONTRACTS[(seed % 4) as usize]);
    }
    setup.resize(players.max(setup.len()), Role::Town);
    setup
}

/// Deals a fixed setup to shuffled seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededAssigner {
    /// Shuffle seed.
    pub seed: u64,
    /// Roles to deal. Empty means [`default_setup`]; short setups are
    /// padded with Town.
    pub setup: Vec<Role>,
}

impl SeededAssigner {
    /// Deal [`default_setup`].
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            setup: Vec::new(),
        }
    }

    /// Deal `setup` instead of the default.
    #[must_use]
    pub fn with_setup(mut self, setup: Vec<Role>) -> Self {
        self.setup = setup;
        self
    }
}

impl RoleAssigner for SeededAssigner {
    fn assign(&mut self, players: &[PlayerId]) -> Assignment {
        let mut rng = Rng::new(self.seed);
        let mut roles = if self.setup.is_empty() {
            default_setup(players.len(), self.seed)
        } else {
            self.setup.clone()
        };
        roles.resize(players.len(), Role::Town);

        let mut seats = players.to_vec();
        rng.shuffle(&mut seats);

        let mut assignment = Assignment::new(seats.into_iter().zip(roles).collect());
        let holders: Vec<(PlayerId, Role)> = assignment
            .roles
            .iter()
            .filter(|(_, role)| role.is_contract())
            .cloned()
            .collect();
        for (holder, role) in holders {
            let charge = if role.charges_self() {
                holder.clone()
            } else {
                let others: Vec<&PlayerId> = players.iter().filter(|p| **p != holder).collect();
                match rng.pick(&others) {
                    Some(charge) => (*charge).clone(),
                    None => holder.clone(),
                }
            };
            assignment = assignment.with_contract(holder, role, charge);
        }
        assignment
    }
}
