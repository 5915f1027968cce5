//! Eliminations, contract refocusing and win detection.

use std::ops::ControlFlow;

use tracing::info;

use crate::game::contract::{refocus, NewCharge};
use crate::game::state::{Death, Flow, GameOver, Phase, Winner};
use crate::game::{messages, Cause, Choice, Contract, ContractOutcome, PlayerId, Role, Sinks};
use crate::rules::Toggle;

/// Whether `mafia` living mafia members among `alive` players have won.
///
/// The mafia wins once it makes up at least half of the living players.
#[must_use]
pub const fn mafia_has_parity(mafia: usize, alive: usize) -> bool {
    mafia >= alive.div_ceil(2)
}

impl<S: Sinks> crate::game::Game<S> {
    /// Remove `target` from the game and run every consequence.
    ///
    /// `aggressor` is whoever caused the death: the elector, the mafia
    /// member who ordered the kill, or the avenging Idiot.
    pub(crate) fn eliminate(
        &mut self,
        target: &PlayerId,
        aggressor: Option<&PlayerId>,
        cause: Cause,
    ) -> Flow {
        self.bury(target, aggressor, cause);
        self.check_win()
    }

    /// Everything [`Self::eliminate`] does except the win check, for deaths
    /// that resolve together.
    pub(crate) fn bury(&mut self, target: &PlayerId, aggressor: Option<&PlayerId>, cause: Cause) {
        let Some(dead) = self.roster.remove(target) else {
            debug_assert!(false, "eliminating {target}, who is not alive");
            return;
        };
        info!(%target, role = %dead.role, ?cause, day = self.day, "eliminated");
        self.sinks
            .broadcast_main(&messages::death(target, dead.role, self.rules.reveal_on_death));
        self.graveyard.push(Death {
            id: target.clone(),
            role: dead.role,
            cause,
            day: self.day,
        });

        if let Some(own) = self.contracts.get_mut(target) {
            match own.role {
                Role::Idiot => own.success = Some(cause == Cause::Election),
                Role::Survivor => own.success = Some(false),
                _ => {}
            }
        }

        let holders: Vec<PlayerId> = self
            .contracts
            .iter()
            .filter(|(holder, contract)| &contract.charge == target && *holder != target)
            .map(|(holder, _)| holder.clone())
            .collect();
        for holder in holders {
            self.charge_died(&holder, aggressor);
        }
    }

    fn charge_died(&mut self, holder: &PlayerId, aggressor: Option<&PlayerId>) {
        let Some(contract) = self.contracts.get_mut(holder) else {
            return;
        };
        let enabled = match contract.role {
            Role::Agent => {
                contract.success = Some(true);
                self.rules.charge_refocus_agent == Toggle::On
            }
            Role::Guard => {
                contract.success = Some(false);
                self.rules.charge_refocus_guard == Toggle::On
            }
            _ => false,
        };
        if !enabled || !self.roster.contains(holder) {
            return;
        }

        let role = contract.role;
        let holder_was_killer = aggressor == Some(holder);
        let aggressor_alive = aggressor.is_some_and(|a| self.roster.contains(a));
        let (new_role, new_charge) = refocus(role, holder_was_killer, aggressor_alive);
        let charge = match (new_charge, aggressor) {
            (NewCharge::Aggressor, Some(aggressor)) => aggressor.clone(),
            _ => holder.clone(),
        };

        info!(%holder, from = %role, to = %new_role, %charge, "contract refocused");
        self.contracts
            .insert(holder.clone(), Contract::new(new_role, charge.clone()));
        if let Some(player) = self.roster.get_mut(holder) {
            player.role = new_role;
            player.target = Some(Choice::Player(charge.clone()));
        }
        self.sinks
            .direct_message(&messages::refocused(new_role, &charge, holder), holder);
    }

    /// End the game if either side has won.
    pub(crate) fn check_win(&mut self) -> Flow {
        let alive = self.roster.len();
        let mafia = self.roster.mafia_count();
        if mafia == 0 {
            return ControlFlow::Break(self.finish(Winner::Town));
        }
        if mafia_has_parity(mafia, alive) {
            return ControlFlow::Break(self.finish(Winner::Mafia));
        }
        ControlFlow::Continue(())
    }

    /// Resolve every contract, announce the result and lock the game.
    pub(crate) fn finish(&mut self, winner: Winner) -> GameOver {
        let mut outcomes = Vec::with_capacity(self.contracts.len());
        for (holder, contract) in &mut self.contracts {
            let success =
                contract.final_success(self.roster.contains(holder), self.roster.contains(&contract.charge));
            contract.success = Some(success);
            outcomes.push(ContractOutcome {
                holder: holder.clone(),
                role: contract.role,
                charge: contract.charge.clone(),
                success,
            });
        }

        let announcement = messages::game_over(&winner, &outcomes);
        info!(?winner, day = self.day, "game over");
        self.sinks.broadcast_main(&announcement);
        self.sinks.halt_timer();

        self.phase = Phase::End;
        self.vengeance = None;
        self.mafia_target = None;
        let over = GameOver {
            winner,
            contracts: outcomes,
            announcement,
        };
        self.outcome = Some(over.clone());
        over
    }
}
