//! Day votes and elections.
//!
//! An election fires the moment a candidate reaches its threshold, so the
//! first candidate to cross wins and ties never arise.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::error::ActionError;
use crate::game::state::{Flow, Phase, Progress, Vengeance, Winner};
use crate::game::{messages, Cause, Choice, PlayerId, Role, Sinks};
use crate::rules::IdiotVengeance;

/// Votes needed to elect a player among `alive` voters.
#[must_use]
pub const fn majority(alive: usize) -> usize {
    alive / 2 + 1
}

/// Votes needed for a no-kill among `alive` voters.
///
/// Never exceeds [`majority`].
#[must_use]
pub const fn no_kill_majority(alive: usize) -> usize {
    alive + 1 - majority(alive)
}

/// Threshold for `choice` among `alive` voters.
#[must_use]
pub const fn threshold(choice: &Choice, alive: usize) -> usize {
    match choice {
        Choice::Player(_) => majority(alive),
        Choice::Nobody => no_kill_majority(alive),
    }
}

impl<S: Sinks> crate::game::Game<S> {
    /// Cast, change or withdraw (`None`) a day vote.
    ///
    /// Repeating the current vote changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] outside the day, for unknown or stunned
    /// voters, and for votes on players who are not alive.
    pub fn vote(&mut self, voter: &PlayerId, choice: Option<Choice>) -> Result<Progress, ActionError> {
        self.ensure_phase("vote", Phase::Day)?;
        let previous = self.living(voter)?.vote.clone();
        if self.stunned.contains(voter) {
            return Err(ActionError::Stunned(voter.clone()));
        }
        self.check_choice(choice.as_ref())?;
        if previous == choice {
            return Ok(Progress::Ongoing);
        }

        if let Some(player) = self.roster.get_mut(voter) {
            player.vote.clone_from(&choice);
        }
        let alive = self.roster.len();
        if let Some(old) = &previous {
            debug!(%voter, from = %old, remaining = self.roster.votes_for(old), "vote moved");
        }

        let Some(choice) = choice else {
            self.sinks.broadcast_main(&messages::vote_retracted(voter));
            return Ok(self.settle(ControlFlow::Continue(())));
        };
        let count = self.roster.votes_for(&choice);
        let needed = threshold(&choice, alive);
        debug!(%voter, votee = %choice, count, needed, "vote cast");
        self.sinks
            .broadcast_main(&messages::vote_cast(voter, &choice, count, needed));

        let flow = if count >= needed {
            self.elect(choice, voter.clone())
        } else {
            ControlFlow::Continue(())
        };
        Ok(self.settle(flow))
    }

    fn elect(&mut self, choice: Choice, elector: PlayerId) -> Flow {
        let Choice::Player(elected) = choice else {
            info!(day = self.day, "no-kill elected");
            self.sinks.broadcast_main(&messages::no_kill_elected());
            self.enter_night();
            return ControlFlow::Continue(());
        };

        info!(day = self.day, %elected, %elector, "elected");
        self.sinks.broadcast_main(&messages::elected(&elected));

        let is_idiot = self
            .roster
            .get(&elected)
            .is_some_and(|p| p.role == Role::Idiot);
        if is_idiot {
            match self.rules.idiot_vengeance {
                IdiotVengeance::Off => {}
                IdiotVengeance::Win => {
                    if let Some(contract) = self.contracts.get_mut(&elected) {
                        contract.success = Some(true);
                    }
                    self.sinks
                        .broadcast_main(&messages::idiot_victory(&elected));
                    return ControlFlow::Break(self.finish(Winner::Idiot(elected)));
                }
                IdiotVengeance::Kill | IdiotVengeance::Day => {
                    let target = Choice::Player(elected.clone());
                    let voters: BTreeSet<PlayerId> = self
                        .roster
                        .voters_for(&target)
                        .filter(|id| **id != elected)
                        .cloned()
                        .collect();
                    let listed: Vec<&PlayerId> = voters.iter().collect();
                    self.sinks
                        .broadcast_main(&messages::dusk(&elected, &listed));
                    info!(idiot = %elected, voters = voters.len(), "dusk begins");
                    self.vengeance = Some(Vengeance {
                        idiot: elected,
                        voters,
                        elector,
                    });
                    self.phase = Phase::Dusk;
                    self.sinks.halt_timer();
                    return ControlFlow::Continue(());
                }
            }
        }

        self.eliminate(&elected, Some(&elector), Cause::Election)?;
        self.enter_night();
        ControlFlow::Continue(())
    }

    /// Finish an Idiot's dusk: take the victim, if any, then the Idiot.
    ///
    /// Both deaths land before the win check, so an Idiot whose victim was
    /// the last mafia member still leaves the game elected.
    pub(crate) fn resolve_vengeance(&mut self, victim: Option<PlayerId>) -> Flow {
        let Some(vengeance) = self.vengeance.take() else {
            return ControlFlow::Continue(());
        };

        match &victim {
            Some(victim) => {
                self.sinks
                    .broadcast_main(&messages::vengeance(&vengeance.idiot, victim));
                self.bury(victim, Some(&vengeance.idiot), Cause::Vengeance);
            }
            None => {
                self.sinks
                    .broadcast_main(&messages::vengeance_lapsed(&vengeance.idiot));
            }
        }
        self.bury(&vengeance.idiot, Some(&vengeance.elector), Cause::Election);
        self.check_win()?;

        if self.rules.idiot_vengeance == IdiotVengeance::Day {
            self.resume_day();
        } else {
            self.enter_night();
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Assignment, Game, RecordingSinks};
    use crate::rules::RuleSet;

    fn start(roles: &[(&str, Role)], rules: RuleSet) -> Game<RecordingSinks> {
        let players: Vec<PlayerId> = roles.iter().map(|(n, _)| PlayerId::from(*n)).collect();
        let mut assignment = Assignment::new(
            roles.iter().map(|(n, r)| (PlayerId::from(*n), *r)).collect(),
        );
        for (name, role) in roles {
            if role.charges_self() {
                assignment = assignment.with_contract(*name, *role, *name);
            }
        }
        Game::start(players, &mut assignment, rules, RecordingSinks::new()).unwrap()
    }

    fn vote(game: &mut Game<RecordingSinks>, voter: &str, votee: &str) -> Progress {
        game.vote(&voter.into(), Some(Choice::Player(votee.into())))
            .unwrap()
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(majority(3), 2);
        assert_eq!(majority(4), 3);
        assert_eq!(majority(7), 4);
        assert_eq!(no_kill_majority(3), 2);
        assert_eq!(no_kill_majority(4), 2);
        assert_eq!(no_kill_majority(7), 4);
        for n in 1..50 {
            assert!(no_kill_majority(n) <= majority(n));
            assert_eq!(no_kill_majority(n), n - n / 2);
        }
    }

    #[test]
    fn test_revote_is_idempotent() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Town),
                ("eve", Role::Town),
            ],
            RuleSet::default(),
        );
        assert_eq!(vote(&mut game, "ann", "cat"), Progress::Ongoing);
        let sent = game.sinks().messages.len();
        assert_eq!(vote(&mut game, "ann", "cat"), Progress::Ongoing);
        assert_eq!(game.sinks().messages.len(), sent);
        assert_eq!(game.players().votes_for(&Choice::Player("cat".into())), 1);
    }

    #[test]
    fn test_changing_vote_moves_count() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Town),
                ("eve", Role::Town),
            ],
            RuleSet::default(),
        );
        let _ = vote(&mut game, "ann", "cat");
        let _ = vote(&mut game, "ann", "dan");
        assert_eq!(game.players().votes_for(&Choice::Player("cat".into())), 0);
        assert_eq!(game.players().votes_for(&Choice::Player("dan".into())), 1);

        let p = game.vote(&"ann".into(), None).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.players().votes_for(&Choice::Player("dan".into())), 0);
        assert!(game.sinks().saw("ann retracts their vote"));
    }

    #[test]
    fn test_no_kill_goes_to_night() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Town),
            ],
            RuleSet::default(),
        );
        let p = game.vote(&"ann".into(), Some(Choice::Nobody)).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.phase(), Phase::Day);
        let p = game.vote(&"bob".into(), Some(Choice::Nobody)).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.phase(), Phase::Night);
        assert_eq!(game.players().len(), 4);
    }

    #[test]
    fn test_vote_for_dead_or_unknown_player() {
        let mut game = start(
            &[("ann", Role::Town), ("bob", Role::Town), ("cat", Role::Mafia)],
            RuleSet::default(),
        );
        assert_eq!(
            game.vote(&"ann".into(), Some(Choice::Player("zed".into()))),
            Err(ActionError::UnknownPlayer("zed".into()))
        );
        assert_eq!(
            game.vote(&"zed".into(), Some(Choice::Nobody)),
            Err(ActionError::UnknownPlayer("zed".into()))
        );
    }

    #[test]
    fn test_idiot_win() {
        let mut rules = RuleSet::default();
        rules.idiot_vengeance = IdiotVengeance::Win;
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Idiot),
                ("eve", Role::Town),
            ],
            rules,
        );
        let _ = vote(&mut game, "ann", "dan");
        let _ = vote(&mut game, "bob", "dan");
        let Progress::Ended(over) = vote(&mut game, "eve", "dan") else {
            panic!("electing the idiot should end the game");
        };
        assert_eq!(over.winner, Winner::Idiot("dan".into()));
        assert!(over.contracts.iter().any(|c| c.holder.as_str() == "dan" && c.success));
        assert_eq!(game.phase(), Phase::End);
        assert!(game.players().contains(&"dan".into()));
    }

    #[test]
    fn test_idiot_vengeance_day_resumes_voting() {
        let mut rules = RuleSet::default();
        rules.idiot_vengeance = IdiotVengeance::Day;
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Idiot),
                ("eve", Role::Town),
                ("fay", Role::Town),
                ("gus", Role::Town),
            ],
            rules,
        );
        for voter in ["ann", "bob", "eve", "fay"] {
            let _ = vote(&mut game, voter, "dan");
        }
        assert_eq!(game.phase(), Phase::Dusk);
        assert_eq!(
            game.target(&"ann".into(), Some(Choice::Player("bob".into()))),
            Err(ActionError::NotTheIdiot("ann".into()))
        );
        assert_eq!(
            game.target(&"dan".into(), Some(Choice::Player("gus".into()))),
            Err(ActionError::NotAVoter {
                idiot: "dan".into(),
                target: "gus".into()
            })
        );

        let p = game.target(&"dan".into(), Some(Choice::Player("fay".into()))).unwrap();
        assert_eq!(p, Progress::Ongoing);
        assert_eq!(game.phase(), Phase::Day);
        assert_eq!(game.day(), 1);
        assert_eq!(game.players().len(), 5);
        assert_eq!(game.players().votes_for(&Choice::Player("dan".into())), 0);
        assert!(game.sinks().saw("Day 1 continues."));
    }

    #[test]
    fn test_dusk_timer_spares_voters() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Idiot),
                ("eve", Role::Town),
            ],
            RuleSet::default(),
        );
        for voter in ["ann", "bob", "eve"] {
            let _ = vote(&mut game, voter, "dan");
        }
        assert_eq!(game.phase(), Phase::Dusk);
        assert_eq!(game.timer(), Ok(Progress::Ongoing));
        assert_eq!(game.phase(), Phase::Night);
        assert_eq!(game.players().len(), 4);
        assert_eq!(game.contracts()[&PlayerId::from("dan")].success, Some(true));
    }

    #[test]
    fn test_vengeance_on_last_mafia_still_elects_the_idiot() {
        let mut game = start(
            &[
                ("ann", Role::Town),
                ("bob", Role::Town),
                ("cat", Role::Mafia),
                ("dan", Role::Idiot),
                ("eve", Role::Town),
            ],
            RuleSet::default(),
        );
        for voter in ["ann", "bob", "cat"] {
            let _ = vote(&mut game, voter, "dan");
        }
        assert_eq!(game.phase(), Phase::Dusk);

        let Ok(Progress::Ended(over)) = game.target(&"dan".into(), Some(Choice::Player("cat".into())))
        else {
            panic!("taking the last mafia member should end the game");
        };
        assert_eq!(over.winner, Winner::Town);
        let idiot = over.contracts.iter().find(|c| c.holder.as_str() == "dan").unwrap();
        assert!(idiot.success);
        assert!(!game.players().contains(&"dan".into()));
        assert_eq!(game.graveyard().len(), 2);
        assert_eq!(game.graveyard()[1].cause, Cause::Election);
    }
}
