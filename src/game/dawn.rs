//! Night resolution.
//!
//! Strip, save, kill, milk, investigate and stun run in that order. Each
//! step sees the effects of the ones before it, so a player killed
//! tonight neither milks, investigates nor stuns.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::game::state::{Flow, MafiaTarget};
use crate::game::{messages, Cause, Choice, PlayerId, Role, Sinks};
use crate::rules::{StripNotice, Toggle};

/// A night target, captured before anyone dies.
struct Act {
    id: PlayerId,
    target: Option<PlayerId>,
}

impl<S: Sinks> crate::game::Game<S> {
    fn acts(&self, role: Role) -> Vec<Act> {
        self.roster
            .iter()
            .filter(|p| p.role == role)
            .map(|p| Act {
                id: p.id.clone(),
                target: p.target.as_ref().and_then(Choice::player).cloned(),
            })
            .collect()
    }

    /// Acts of `role` whose actor is still alive and was not stripped.
    fn effective_acts(&self, role: Role) -> impl Iterator<Item = (PlayerId, PlayerId)> + '_ {
        self.acts(role).into_iter().filter_map(|act| {
            let target = act.target?;
            let blocked = self.stripped.contains(&act.id) || !self.roster.contains(&act.id);
            (!blocked && self.roster.contains(&target)).then_some((act.id, target))
        })
    }

    fn strip_noticed(&self, target: &PlayerId) -> bool {
        let Some(player) = self.roster.get(target) else {
            return false;
        };
        match self.rules.know_if_stripped {
            StripNotice::On => true,
            StripNotice::Off => false,
            StripNotice::Target => {
                player.role.night_action().is_some()
                    || player
                        .role
                        .can_order_kill(self.rules.goon_potence == Toggle::On)
            }
            StripNotice::Useful => {
                player.role.night_action().is_some()
                    && matches!(player.target, Some(Choice::Player(_)))
            }
        }
    }

    /// Resolve the night and open the next day.
    pub(crate) fn dawn(&mut self) -> Flow {
        info!(day = self.day, "dawn");

        for act in self.acts(Role::Stripper) {
            let Some(target) = act.target else { continue };
            debug!(stripper = %act.id, %target, "stripped");
            if self.strip_noticed(&target) {
                self.sinks.direct_message(&messages::stripped(), &target);
            }
            self.stripped.insert(target);
        }

        self.resolve_kill()?;

        let milk: Vec<_> = self.effective_acts(Role::Milky).collect();
        for (_, target) in milk {
            self.sinks.broadcast_main(&messages::milked(&target));
        }

        let strength = self.rules.cop_strength;
        let reports: Vec<_> = self
            .effective_acts(Role::Cop)
            .filter_map(|(cop, target)| {
                let role = self.roster.get(&target)?.role;
                Some((cop, messages::investigation(&target, role, strength)))
            })
            .collect();
        for (cop, report) in reports {
            self.sinks.direct_message(&report, &cop);
        }

        let stunned: BTreeSet<PlayerId> = self
            .effective_acts(Role::Dentist)
            .map(|(_, target)| target)
            .collect();
        for target in &stunned {
            self.sinks.direct_message(&messages::stunned(), target);
        }

        self.day += 1;
        self.stunned = stunned;
        self.enter_day();
        ControlFlow::Continue(())
    }

    fn resolve_kill(&mut self) -> Flow {
        let Some(MafiaTarget {
            target: Choice::Player(victim),
            actor,
        }) = self.mafia_target.take()
        else {
            self.sinks.broadcast_main(&messages::quiet_night());
            return ControlFlow::Continue(());
        };

        let doctors: Vec<PlayerId> = self
            .effective_acts(Role::Doctor)
            .filter(|(_, target)| *target == victim)
            .map(|(doctor, _)| doctor)
            .collect();
        if doctors.is_empty() {
            self.sinks
                .broadcast_main(&messages::killed_at_night(&victim));
            return self.eliminate(&victim, Some(&actor), Cause::MafiaKill);
        }

        info!(%victim, doctors = doctors.len(), "kill prevented");
        let public = if self.rules.know_if_saved == Toggle::On {
            messages::saved_public(&victim)
        } else {
            messages::quiet_night()
        };
        self.sinks.broadcast_main(&public);
        if self.rules.know_if_saved_doc == Toggle::On {
            for doctor in &doctors {
                self.sinks
                    .direct_message(&messages::saved_doctor(&victim), doctor);
            }
        }
        if self.rules.know_if_saved_self == Toggle::On {
            self.sinks.direct_message(&messages::saved_self(), &victim);
        }
        ControlFlow::Continue(())
    }
}
