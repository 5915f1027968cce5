//! Game state and the phase machine.
//!
//! Every public operation runs to completion, including any cascade of
//! dawn resolution, eliminations, refocusing and win detection, before it
//! returns. A finished game answers every further request with
//! [`ActionError::GameOver`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ActionError, SetupError};
use crate::game::assign::{validate, RoleAssigner};
use crate::game::invariants::assert_invariants;
use crate::game::vote::majority;
use crate::game::{
    messages, Choice, Contract, ContractOutcome, Player, PlayerId, Role, Roster, Sinks,
};
use crate::rules::{RuleSet, Toggle};

/// Which actions are currently legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Before roles are dealt.
    Init,
    /// Voting.
    Day,
    /// Night actions.
    Night,
    /// An elected Idiot picks a victim.
    Dusk,
    /// The game is over.
    End,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Day => "day",
            Self::Night => "night",
            Self::Dusk => "dusk",
            Self::End => "end",
        })
    }
}

/// Who won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum Winner {
    /// Every mafia member is dead.
    Town,
    /// The mafia reached parity.
    Mafia,
    /// The town elected this Idiot under `idiot_vengeance = WIN`.
    Idiot(PlayerId),
}

/// Terminal result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    /// The winning side.
    pub winner: Winner,
    /// Every contract, resolved.
    pub contracts: Vec<ContractOutcome>,
    /// Final public announcement.
    pub announcement: String,
}

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Progress {
    /// The game goes on.
    Ongoing,
    /// This action ended the game.
    Ended(GameOver),
}

impl Progress {
    /// Whether the game ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

/// Why a player left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    /// Elected by the town.
    Election,
    /// Killed by the mafia at night.
    MafiaKill,
    /// Dragged down by an elected Idiot.
    Vengeance,
}

/// A dead player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    /// Who died.
    pub id: PlayerId,
    /// Role at the time of death.
    pub role: Role,
    /// How.
    pub cause: Cause,
    /// Day counter when it happened.
    pub day: u32,
}

/// Tonight's pending mafia kill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MafiaTarget {
    /// Victim, or `Nobody`.
    pub target: Choice,
    /// The member who gave the order.
    pub actor: PlayerId,
}

/// An elected Idiot waiting to pick a victim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vengeance {
    /// The elected Idiot.
    pub idiot: PlayerId,
    /// Everyone else who voted for the Idiot.
    pub voters: BTreeSet<PlayerId>,
    /// The voter whose vote completed the majority.
    pub elector: PlayerId,
}

/// Internal cascade result: `Break` carries the end of the game upward.
pub(crate) type Flow = ControlFlow<GameOver>;

/// One game of Mafia.
#[derive(Debug)]
pub struct Game<S> {
    pub(crate) sinks: S,
    pub(crate) rules: RuleSet,
    pub(crate) phase: Phase,
    pub(crate) day: u32,
    pub(crate) roster: Roster,
    pub(crate) contracts: BTreeMap<PlayerId, Contract>,
    pub(crate) graveyard: Vec<Death>,
    pub(crate) mafia_target: Option<MafiaTarget>,
    pub(crate) mafia_actors: BTreeSet<PlayerId>,
    pub(crate) stripped: BTreeSet<PlayerId>,
    pub(crate) stunned: BTreeSet<PlayerId>,
    pub(crate) revealed: BTreeSet<PlayerId>,
    pub(crate) vengeance: Option<Vengeance>,
    pub(crate) outcome: Option<GameOver>,
}

impl<S: Sinks> Game<S> {
    /// Deal roles and open the first phase.
    ///
    /// `players` is the seating order. The assigner is consulted once and
    /// its answer is validated before anything is announced.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the assignment is not a playable game.
    pub fn start<A: RoleAssigner + ?Sized>(
        players: Vec<PlayerId>,
        assigner: &mut A,
        rules: RuleSet,
        sinks: S,
    ) -> Result<Self, SetupError> {
        let assignment = assigner.assign(&players);
        validate(&players, &assignment)?;

        let roles: BTreeMap<&PlayerId, Role> =
            assignment.roles.iter().map(|(id, role)| (id, *role)).collect();
        let mut roster = Vec::with_capacity(players.len());
        for id in &players {
            let Some(&role) = roles.get(id) else {
                return Err(SetupError::AssignmentMismatch);
            };
            let mut player = Player::new(id.clone(), role);
            if let Some((_, charge)) = assignment.contracts.get(id) {
                player.target = Some(Choice::Player(charge.clone()));
            }
            roster.push(player);
        }
        let contracts = assignment
            .contracts
            .iter()
            .map(|(holder, (role, charge))| (holder.clone(), Contract::new(*role, charge.clone())))
            .collect();

        let mut game = Self {
            sinks,
            rules,
            phase: Phase::Init,
            day: 1,
            roster: Roster::new(roster),
            contracts,
            graveyard: Vec::new(),
            mafia_target: None,
            mafia_actors: BTreeSet::new(),
            stripped: BTreeSet::new(),
            stunned: BTreeSet::new(),
            revealed: BTreeSet::new(),
            vengeance: None,
            outcome: None,
        };
        game.announce_roles();

        info!(players = game.roster.len(), mafia = game.roster.mafia_count(), "game started");
        if game.rules.starts_at_night(game.roster.len()) {
            game.enter_night();
        } else {
            game.enter_day();
        }
        assert_invariants(&game);
        Ok(game)
    }

    fn announce_roles(&mut self) {
        for player in self.roster.iter() {
            self.sinks
                .direct_message(&messages::role_intro(player.role), &player.id);
            if let Some(contract) = self.contracts.get(&player.id) {
                self.sinks.direct_message(
                    &messages::contract_intro(contract.role, &contract.charge),
                    &player.id,
                );
            }
        }

        let roster = messages::mafia_roster(
            self.roster
                .iter()
                .filter(|p| p.role.is_mafia())
                .map(|p| (&p.id, p.role)),
        );
        self.sinks.broadcast_mafia(&roster);

        let roles: Vec<_> = self.roster.iter().map(|p| p.role).collect();
        if let Some(text) = messages::known_roles(self.rules.known_roles, &roles) {
            self.sinks.broadcast_main(&text);
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Day counter, starting at 1.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// The rule matrix this game runs under.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Living players.
    #[must_use]
    pub const fn players(&self) -> &Roster {
        &self.roster
    }

    /// Every contract, keyed by holder.
    #[must_use]
    pub const fn contracts(&self) -> &BTreeMap<PlayerId, Contract> {
        &self.contracts
    }

    /// Dead players in order of death.
    #[must_use]
    pub fn graveyard(&self) -> &[Death] {
        &self.graveyard
    }

    /// Players who cannot vote today.
    #[must_use]
    pub const fn stunned(&self) -> &BTreeSet<PlayerId> {
        &self.stunned
    }

    /// Celebs who have revealed.
    #[must_use]
    pub const fn revealed(&self) -> &BTreeSet<PlayerId> {
        &self.revealed
    }

    /// The pending Idiot vengeance, during dusk.
    #[must_use]
    pub const fn vengeance(&self) -> Option<&Vengeance> {
        self.vengeance.as_ref()
    }

    /// The result, once the game has ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<&GameOver> {
        self.outcome.as_ref()
    }

    /// The output collaborators.
    #[must_use]
    pub const fn sinks(&self) -> &S {
        &self.sinks
    }

    /// Mutable access to the output collaborators.
    pub fn sinks_mut(&mut self) -> &mut S {
        &mut self.sinks
    }

    /// Consume the game, returning its collaborators.
    pub fn into_sinks(self) -> S {
        self.sinks
    }

    pub(crate) fn ensure_phase(&self, action: &'static str, phase: Phase) -> Result<(), ActionError> {
        if self.phase == Phase::End {
            return Err(ActionError::GameOver);
        }
        if self.phase != phase {
            return Err(ActionError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    pub(crate) fn living(&self, id: &PlayerId) -> Result<&Player, ActionError> {
        self.roster
            .get(id)
            .ok_or_else(|| ActionError::UnknownPlayer(id.clone()))
    }

    pub(crate) fn check_choice(&self, choice: Option<&Choice>) -> Result<(), ActionError> {
        match choice {
            Some(Choice::Player(id)) => self.living(id).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Turn an internal cascade result into the public one.
    pub(crate) fn settle(&mut self, flow: Flow) -> Progress {
        assert_invariants(self);
        match flow {
            ControlFlow::Continue(()) => Progress::Ongoing,
            ControlFlow::Break(over) => Progress::Ended(over),
        }
    }

    /// Pick a night target, or at dusk, the Idiot's victim.
    ///
    /// `None` withdraws a night target. `Some(Choice::Nobody)` deliberately
    /// targets no one.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if the actor or target is not legal right now.
    pub fn target(
        &mut self,
        actor: &PlayerId,
        choice: Option<Choice>,
    ) -> Result<Progress, ActionError> {
        match self.phase {
            Phase::Dusk => self.vengeance_target(actor, choice),
            _ => self.night_target(actor, choice),
        }
    }

    fn night_target(
        &mut self,
        actor: &PlayerId,
        choice: Option<Choice>,
    ) -> Result<Progress, ActionError> {
        self.ensure_phase("target", Phase::Night)?;
        let role = self.living(actor)?.role;
        if role.night_action().is_none() {
            return Err(ActionError::NoNightAction(actor.clone()));
        }
        self.check_choice(choice.as_ref())?;
        if role == Role::Milky
            && self.rules.no_milk_self == Toggle::On
            && choice.as_ref().and_then(Choice::player) == Some(actor)
        {
            return Err(ActionError::SelfTarget(actor.clone()));
        }
        if self.rules.unique_night_act == Toggle::On && self.mafia_actors.contains(actor) {
            return Err(ActionError::AlreadyActed(actor.clone()));
        }

        debug!(%actor, target = ?choice, "night target");
        if let Some(chosen) = &choice {
            self.sinks
                .direct_message(&messages::target_set(chosen), actor);
        }
        if let Some(player) = self.roster.get_mut(actor) {
            player.target = choice;
        }

        let flow = if self.night_complete() {
            self.dawn()
        } else {
            ControlFlow::Continue(())
        };
        Ok(self.settle(flow))
    }

    fn vengeance_target(
        &mut self,
        actor: &PlayerId,
        choice: Option<Choice>,
    ) -> Result<Progress, ActionError> {
        let Some(vengeance) = &self.vengeance else {
            return Err(ActionError::WrongPhase {
                action: "target",
                phase: self.phase,
            });
        };
        if &vengeance.idiot != actor {
            return Err(ActionError::NotTheIdiot(actor.clone()));
        }
        let victim = match choice {
            None => return Ok(Progress::Ongoing),
            Some(Choice::Nobody) => None,
            Some(Choice::Player(id)) => {
                if !vengeance.voters.contains(&id) || !self.roster.contains(&id) {
                    return Err(ActionError::NotAVoter {
                        idiot: actor.clone(),
                        target: id,
                    });
                }
                Some(id)
            }
        };

        debug!(idiot = %actor, victim = ?victim, "vengeance");
        let flow = self.resolve_vengeance(victim);
        Ok(self.settle(flow))
    }

    /// Order the mafia kill.
    ///
    /// A later order from any member replaces the pending one.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if it is not night, the actor cannot order
    /// kills, or the target is not alive.
    pub fn mafia_target(&mut self, actor: &PlayerId, choice: Choice) -> Result<Progress, ActionError> {
        self.ensure_phase("order a kill", Phase::Night)?;
        let player = self.living(actor)?;
        if !player
            .role
            .can_order_kill(self.rules.goon_potence == Toggle::On)
        {
            return Err(ActionError::CannotOrderKill(actor.clone()));
        }
        if self.rules.unique_night_act == Toggle::On
            && player.role.night_action().is_some()
            && player.target.is_some()
        {
            return Err(ActionError::AlreadyActed(actor.clone()));
        }
        self.check_choice(Some(&choice))?;

        debug!(%actor, target = %choice, "mafia target");
        self.sinks
            .broadcast_mafia(&messages::mafia_target_set(actor, &choice));
        self.mafia_actors.insert(actor.clone());
        self.mafia_target = Some(MafiaTarget {
            target: choice,
            actor: actor.clone(),
        });

        let flow = if self.night_complete() {
            self.dawn()
        } else {
            ControlFlow::Continue(())
        };
        Ok(self.settle(flow))
    }

    /// A Celeb reveals their role to everyone.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] outside the day, for non-Celebs, or on a
    /// second reveal.
    pub fn reveal(&mut self, actor: &PlayerId) -> Result<Progress, ActionError> {
        self.ensure_phase("reveal", Phase::Day)?;
        if self.living(actor)?.role != Role::Celeb {
            return Err(ActionError::NotCeleb(actor.clone()));
        }
        if !self.revealed.insert(actor.clone()) {
            return Err(ActionError::AlreadyRevealed(actor.clone()));
        }
        info!(%actor, "celeb revealed");
        self.sinks.broadcast_main(&messages::celeb_reveal(actor));
        Ok(self.settle(ControlFlow::Continue(())))
    }

    /// The external phase timer ran out.
    ///
    /// Day ends without an election, night resolves with whatever targets
    /// are in, and dusk resolves without a victim.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::GameOver`] once the game has ended.
    pub fn timer(&mut self) -> Result<Progress, ActionError> {
        let flow = match self.phase {
            Phase::End => return Err(ActionError::GameOver),
            Phase::Init => {
                return Err(ActionError::WrongPhase {
                    action: "expire the timer",
                    phase: self.phase,
                });
            }
            Phase::Day => {
                warn!(day = self.day, "day timer expired");
                self.sinks.broadcast_main(&messages::day_expired());
                self.enter_night();
                ControlFlow::Continue(())
            }
            Phase::Night => {
                warn!(day = self.day, "night timer expired");
                self.dawn()
            }
            Phase::Dusk => {
                warn!(day = self.day, "dusk timer expired");
                self.resolve_vengeance(None)
            }
        };
        Ok(self.settle(flow))
    }

    /// Whether every night decision is in.
    ///
    /// Under `unique_night_act`, a member who ordered the kill is excused
    /// from its own action, and the kill is excused once every member able
    /// to order it has spent the night on its own action instead.
    pub(crate) fn night_complete(&self) -> bool {
        let unique = self.rules.unique_night_act == Toggle::On;
        let potent = self.rules.goon_potence == Toggle::On;

        let actions_in = self
            .roster
            .iter()
            .filter(|p| p.role.night_action().is_some())
            .all(|p| p.target.is_some() || (unique && self.mafia_actors.contains(&p.id)));
        let kill_in = self.mafia_target.is_some()
            || self
                .roster
                .iter()
                .filter(|p| p.role.can_order_kill(potent))
                .all(|p| unique && p.role.night_action().is_some() && p.target.is_some());

        actions_in && kill_in
    }

    pub(crate) fn enter_night(&mut self) {
        self.phase = Phase::Night;
        self.roster.clear_votes();
        self.roster.clear_night_targets();
        self.stripped.clear();
        self.vengeance = None;
        self.mafia_target = None;
        self.mafia_actors.clear();
        self.sinks.halt_timer();
        info!(day = self.day, alive = self.roster.len(), "night begins");

        self.sinks.broadcast_main(&messages::night_start(self.day));
        let prompts: Vec<_> = self
            .roster
            .iter()
            .filter(|p| p.role.night_action().is_some())
            .map(|p| (p.id.clone(), p.role))
            .collect();
        for (id, role) in prompts {
            self.sinks
                .direct_message(&messages::night_prompt(role), &id);
        }
        self.sinks.broadcast_mafia(&messages::mafia_prompt());
    }

    pub(crate) fn enter_day(&mut self) {
        self.open_day();
        self.sinks.broadcast_main(&messages::day_start(
            self.day,
            self.roster.len(),
            majority(self.roster.len()),
        ));
    }

    /// Start a fresh vote on the same day, after an Idiot's vengeance.
    pub(crate) fn resume_day(&mut self) {
        self.open_day();
        self.sinks.broadcast_main(&messages::day_resumes(
            self.day,
            self.roster.len(),
            majority(self.roster.len()),
        ));
    }

    fn open_day(&mut self) {
        self.phase = Phase::Day;
        self.roster.clear_votes();
        self.roster.clear_night_targets();
        self.vengeance = None;
        self.sinks.halt_timer();
        info!(day = self.day, alive = self.roster.len(), "day begins");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Assignment, RecordingSinks};

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    fn start(roles: &[(&str, Role)], rules: RuleSet) -> Game<RecordingSinks> {
        let players = ids(&roles.iter().map(|(n, _)| *n).collect::<Vec<_>>());
        let mut assignment = Assignment::new(
            roles.iter().map(|(n, r)| (PlayerId::from(*n), *r)).collect(),
        );
        Game::start(players, &mut assignment, rules, RecordingSinks::new()).unwrap()
    }

    fn night_rules() -> RuleSet {
        RuleSet {
            start_night: crate::rules::StartNight::On,
            ..RuleSet::default()
        }
    }

    #[test]
    fn test_start_announces_roles() {
        let game = start(
            &[("ann", Role::Cop), ("bob", Role::Town), ("cat", Role::Mafia)],
            RuleSet::default(),
        );
        assert_eq!(game.phase(), Phase::Day);
        assert_eq!(game.day(), 1);
        let ann = PlayerId::from("ann");
        assert!(game.sinks().direct(&ann).any(|m| m.contains("You are the Cop")));
        assert!(game.sinks().mafia().any(|m| m.contains("cat (Mafia)")));
        assert!(game.sinks().saw("Roles in this game"));
    }

    #[test]
    fn test_start_night_by_parity() {
        let mut rules = RuleSet::default();
        rules.set("start_night", "ODD").unwrap();
        let game = start(
            &[("ann", Role::Town), ("bob", Role::Town), ("cat", Role::Mafia)],
            rules,
        );
        assert_eq!(game.phase(), Phase::Night);
    }

    #[test]
    fn test_night_waits_for_every_action() {
        let mut game = start(
            &[
                ("ann", Role::Cop),
                ("bob", Role::Doctor),
                ("cat", Role::Mafia),
                ("dan", Role::Town),
                ("eve", Role::Town),
            ],
            night_rules(),
        );

        let p = game.mafia_target(&"cat".into(), Choice::Player("dan".into())).unwrap();
        assert_eq!(p, Progress::Ongoing);
        let p = game.target(&"ann".into(), Some(Choice::Player("cat".into()))).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.phase(), Phase::Night);

        let p = game.target(&"bob".into(), Some(Choice::Nobody)).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.phase(), Phase::Day);
        assert_eq!(game.day(), 2);
        assert!(!game.players().contains(&"dan".into()));
        assert!(game.sinks().direct(&"ann".into()).any(|m| m == "cat is Mafia."));
    }

    #[test]
    fn test_target_validation() {
        let mut game = start(
            &[
                ("ann", Role::Milky),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Town),
            ],
            night_rules(),
        );
        assert_eq!(
            game.target(&"bob".into(), Some(Choice::Nobody)),
            Err(ActionError::NoNightAction("bob".into()))
        );
        assert_eq!(
            game.target(&"ann".into(), Some(Choice::Player("ann".into()))),
            Err(ActionError::SelfTarget("ann".into()))
        );
        assert_eq!(
            game.target(&"ann".into(), Some(Choice::Player("zed".into()))),
            Err(ActionError::UnknownPlayer("zed".into()))
        );
        assert_eq!(
            game.mafia_target(&"bob".into(), Choice::Nobody),
            Err(ActionError::CannotOrderKill("bob".into()))
        );
        assert_eq!(
            game.vote(&"bob".into(), Some(Choice::Nobody)),
            Err(ActionError::WrongPhase {
                action: "vote",
                phase: Phase::Night
            })
        );
    }

    #[test]
    fn test_kill_order_excuses_dentist_action() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Dentist),
                ("dan", Role::Town),
                ("eve", Role::Town),
            ],
            night_rules(),
        );
        let p = game.mafia_target(&"cat".into(), Choice::Nobody).unwrap();
        assert_eq!(p, Progress::Ongoing);
        // Ordering the kill excused the dentist, so dawn already ran.
        assert_eq!(game.phase(), Phase::Day);
    }

    #[test]
    fn test_dentist_stuns_instead_of_killing() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Dentist),
                ("dan", Role::Town),
                ("eve", Role::Town),
            ],
            night_rules(),
        );
        let p = game.target(&"cat".into(), Some(Choice::Player("ann".into()))).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.phase(), Phase::Day);
        assert!(game.stunned().contains(&PlayerId::from("ann")));
        assert_eq!(
            game.vote(&"ann".into(), Some(Choice::Nobody)),
            Err(ActionError::Stunned("ann".into()))
        );
    }

    #[test]
    fn test_reveal() {
        let mut game = start(
            &[("ann", Role::Celeb), ("bob", Role::Town), ("cat", Role::Mafia)],
            RuleSet::default(),
        );
        assert_eq!(
            game.reveal(&"bob".into()),
            Err(ActionError::NotCeleb("bob".into()))
        );
        assert_eq!(game.reveal(&"ann".into()), Ok(Progress::Ongoing));
        assert!(game.sinks().saw("ann reveals themselves as the Celeb!"));
        assert_eq!(
            game.reveal(&"ann".into()),
            Err(ActionError::AlreadyRevealed("ann".into()))
        );
    }

    #[test]
    fn test_day_timer_goes_to_night() {
        let mut game = start(
            &[("ann", Role::Town), ("bob", Role::Town), ("cat", Role::Mafia)],
            RuleSet::default(),
        );
        let halts = game.sinks().timer_halts;
        assert_eq!(game.timer(), Ok(Progress::Ongoing));
        assert_eq!(game.phase(), Phase::Night);
        assert!(game.sinks().timer_halts > halts);
    }

    #[test]
    fn test_night_timer_runs_dawn_with_missing_targets() {
        let mut game = start(
            &[
                ("ann", Role::Cop),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Town),
            ],
            night_rules(),
        );
        assert_eq!(game.timer(), Ok(Progress::Ongoing));
        assert_eq!(game.phase(), Phase::Day);
        assert_eq!(game.players().len(), 4);
        assert!(game.sinks().saw("Nobody died last night."));
    }
}
