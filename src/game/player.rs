//! Player registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Role;

/// Opaque identifier for a player, as handed over by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap a transport id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vote or night target.
///
/// `Nobody` is the no-kill vote by day and the deliberate no-target at night.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum Choice {
    /// A specific player.
    Player(PlayerId),
    /// Nobody.
    Nobody,
}

impl Choice {
    /// The chosen player, if any.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            Self::Player(id) => Some(id),
            Self::Nobody => None,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "{id}"),
            Self::Nobody => f.write_str("nobody"),
        }
    }
}

/// A living player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Transport id.
    pub id: PlayerId,
    /// Current role. Contract holders can change role mid-game.
    pub role: Role,
    /// Today's vote.
    pub vote: Option<Choice>,
    /// Tonight's target, or the charge of a contract holder.
    pub target: Option<Choice>,
}

impl Player {
    /// Create a player with no vote and no target.
    #[must_use]
    pub fn new(id: PlayerId, role: Role) -> Self {
        Self {
            id,
            role,
            vote: None,
            target: None,
        }
    }
}

/// Ordered collection of the living players.
///
/// Sole owner of player state; eliminated players are removed outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Build a roster from players in seating order.
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Number of living players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether everyone is dead.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of living mafia-aligned players.
    #[must_use]
    pub fn mafia_count(&self) -> usize {
        self.players.iter().filter(|p| p.role.is_mafia()).count()
    }

    /// Whether `id` is alive.
    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == id)
    }

    /// Look up a living player.
    #[must_use]
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Look up a living player for mutation.
    #[must_use]
    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Remove a player, returning its final state.
    pub fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| &p.id == id)?;
        Some(self.players.remove(index))
    }

    /// Living players in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Mutable iteration in seating order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Count of players whose vote equals `choice`.
    #[must_use]
    pub fn votes_for(&self, choice: &Choice) -> usize {
        self.players
            .iter()
            .filter(|p| p.vote.as_ref() == Some(choice))
            .count()
    }

    /// Ids of players whose vote equals `choice`.
    pub fn voters_for<'a>(&'a self, choice: &'a Choice) -> impl Iterator<Item = &'a PlayerId> {
        self.players
            .iter()
            .filter(move |p| p.vote.as_ref() == Some(choice))
            .map(|p| &p.id)
    }

    /// Clear every vote.
    pub fn clear_votes(&mut self) {
        for player in &mut self.players {
            player.vote = None;
        }
    }

    /// Clear night targets, keeping the charges of contract holders.
    pub fn clear_night_targets(&mut self) {
        for player in &mut self.players {
            if !player.role.is_contract() {
                player.target = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            Player::new("ann".into(), Role::Town),
            Player::new("bob".into(), Role::Guard),
            Player::new("cat".into(), Role::Mafia),
        ])
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut roster = roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.mafia_count(), 1);

        let cat = roster.remove(&"cat".into()).unwrap();
        assert_eq!(cat.role, Role::Mafia);
        assert!(!roster.contains(&"cat".into()));
        assert_eq!(roster.mafia_count(), 0);
        assert!(roster.remove(&"cat".into()).is_none());
    }

    #[test]
    fn test_vote_counting() {
        let mut roster = roster();
        let cat = Choice::Player("cat".into());
        roster.get_mut(&"ann".into()).unwrap().vote = Some(cat.clone());
        roster.get_mut(&"bob".into()).unwrap().vote = Some(cat.clone());
        roster.get_mut(&"cat".into()).unwrap().vote = Some(Choice::Nobody);

        assert_eq!(roster.votes_for(&cat), 2);
        assert_eq!(roster.votes_for(&Choice::Nobody), 1);
        let voters: Vec<_> = roster.voters_for(&cat).map(PlayerId::as_str).collect();
        assert_eq!(voters, ["ann", "bob"]);

        roster.clear_votes();
        assert_eq!(roster.votes_for(&cat), 0);
    }

    #[test]
    fn test_clear_night_targets_keeps_charges() {
        let mut roster = roster();
        roster.get_mut(&"ann".into()).unwrap().target = Some(Choice::Nobody);
        roster.get_mut(&"bob".into()).unwrap().target = Some(Choice::Player("ann".into()));

        roster.clear_night_targets();
        assert_eq!(roster.get(&"ann".into()).unwrap().target, None);
        assert_eq!(
            roster.get(&"bob".into()).unwrap().target,
            Some(Choice::Player("ann".into()))
        );
    }

    #[test]
    fn test_choice_json_shape() {
        let json = serde_json::to_string(&Choice::Player("ann".into())).unwrap();
        assert_eq!(json, r#"{"kind":"Player","id":"ann"}"#);
        let json = serde_json::to_string(&Choice::Nobody).unwrap();
        assert_eq!(json, r#"{"kind":"Nobody"}"#);
    }
}
