//! Roles and their static capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Alignment that decides who wins with whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Uninformed majority.
    Town,
    /// Informed minority sharing a private channel.
    Mafia,
    /// Contract holders playing for themselves.
    Rogue,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Town => "Town",
            Self::Mafia => "Mafia",
            Self::Rogue => "Rogue",
        })
    }
}

/// The night ability a role carries, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightAction {
    /// Learn something about the target.
    Investigate,
    /// Protect the target from the mafia kill.
    Save,
    /// Give the target milk.
    Milk,
    /// Block the target's own ability.
    Strip,
    /// Stop the target from voting the next day.
    Stun,
}

/// Every role a player can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Vanilla townsperson.
    Town,
    /// Investigates at night.
    Cop,
    /// Protects at night.
    Doctor,
    /// May reveal publicly during the day.
    Celeb,
    /// Town member who looks like mafia.
    Miller,
    /// Delivers milk at night.
    Milky,
    /// Roleblocks at night.
    Stripper,
    /// Vanilla mafia.
    Mafia,
    /// Mafia member who looks like town.
    Godfather,
    /// Mafia member who may only kill under `goon_potence`.
    Goon,
    /// Mafia member who silences voters.
    Dentist,
    /// Wants to be elected.
    Idiot,
    /// Wants to live.
    Survivor,
    /// Wants its charge to live.
    Guard,
    /// Wants its charge to die.
    Agent,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Town,
        Self::Cop,
        Self::Doctor,
        Self::Celeb,
        Self::Miller,
        Self::Milky,
        Self::Stripper,
        Self::Mafia,
        Self::Godfather,
        Self::Goon,
        Self::Dentist,
        Self::Idiot,
        Self::Survivor,
        Self::Guard,
        Self::Agent,
    ];

    /// True alignment.
    #[must_use]
    pub const fn team(self) -> Team {
        match self {
            Self::Town
            | Self::Cop
            | Self::Doctor
            | Self::Celeb
            | Self::Miller
            | Self::Milky
            | Self::Stripper => Team::Town,
            Self::Mafia | Self::Godfather | Self::Goon | Self::Dentist => Team::Mafia,
            Self::Idiot | Self::Survivor | Self::Guard | Self::Agent => Team::Rogue,
        }
    }

    /// Whether the role belongs to the mafia.
    #[must_use]
    pub const fn is_mafia(self) -> bool {
        matches!(self.team(), Team::Mafia)
    }

    /// The role's own night ability.
    #[must_use]
    pub const fn night_action(self) -> Option<NightAction> {
        match self {
            Self::Cop => Some(NightAction::Investigate),
            Self::Doctor => Some(NightAction::Save),
            Self::Milky => Some(NightAction::Milk),
            Self::Stripper => Some(NightAction::Strip),
            Self::Dentist => Some(NightAction::Stun),
            _ => None,
        }
    }

    /// Whether the role may order the mafia kill.
    #[must_use]
    pub const fn can_order_kill(self, goon_potent: bool) -> bool {
        match self {
            Self::Mafia | Self::Godfather | Self::Dentist => true,
            Self::Goon => goon_potent,
            _ => false,
        }
    }

    /// Whether the role is tied to a contract.
    #[must_use]
    pub const fn is_contract(self) -> bool {
        matches!(self, Self::Idiot | Self::Survivor | Self::Guard | Self::Agent)
    }

    /// Whether the contract's charge is the holder itself.
    #[must_use]
    pub const fn charges_self(self) -> bool {
        matches!(self, Self::Idiot | Self::Survivor)
    }

    /// The role a cop sees.
    #[must_use]
    pub const fn apparent(self) -> Self {
        match self {
            Self::Godfather => Self::Town,
            Self::Miller => Self::Mafia,
            other => other,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Town => "Town",
            Self::Cop => "Cop",
            Self::Doctor => "Doctor",
            Self::Celeb => "Celeb",
            Self::Miller => "Miller",
            Self::Milky => "Milky",
            Self::Stripper => "Stripper",
            Self::Mafia => "Mafia",
            Self::Godfather => "Godfather",
            Self::Goon => "Goon",
            Self::Dentist => "Dentist",
            Self::Idiot => "Idiot",
            Self::Survivor => "Survivor",
            Self::Guard => "Guard",
            Self::Agent => "Agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
