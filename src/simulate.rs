//! Random-bot games for balance testing.
//!
//! Every bot plays legal-looking moves drawn from a seeded generator, so a
//! seed fully determines a game. Batches run in parallel with rayon.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::error::{ActionError, SetupError};
use crate::game::{
    Choice, ContractOutcome, Game, Phase, PlayerId, Progress, Role, SeededAssigner, Silent,
    Winner, MIN_PLAYERS,
};
use crate::rng::Rng;
use crate::rules::{RuleSet, Toggle};

/// Day-night cycles before a game is declared stalled.
pub const MAX_CYCLES: u32 = 500;

/// Votes cast per living player before the bots let the day timer run out.
const VOTES_PER_PLAYER: usize = 3;

/// Percent chance a bot votes for no kill, or targets nobody at night.
const ABSTAIN_PERCENT: u64 = 15;

/// Why a simulated game produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The dealt setup was rejected.
    #[error("setup rejected: {0}")]
    Setup(#[from] SetupError),
    /// Nobody won within [`MAX_CYCLES`] days.
    #[error("game {seed} stalled after {} cycles", MAX_CYCLES)]
    Stalled {
        /// Seed of the stalled game.
        seed: u64,
    },
}

/// One finished simulated game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimResult {
    /// Game seed.
    pub seed: u64,
    /// Who won.
    pub winner: Winner,
    /// Day counter at the end.
    pub days: u32,
    /// Accepted actions, timers included.
    pub actions: u32,
    /// Resolved contracts.
    pub contracts: Vec<ContractOutcome>,
}

struct Bots {
    rng: Rng,
    actions: u32,
}

impl Bots {
    /// Count accepted actions; refused ones are simply dropped.
    fn accept(&mut self, result: Result<Progress, ActionError>) {
        match result {
            Ok(_) => self.actions += 1,
            Err(err) => debug!(%err, "bot action refused"),
        }
    }

    fn someone(&mut self, candidates: &[PlayerId]) -> Option<PlayerId> {
        self.rng.pick(candidates).cloned()
    }

    fn choice(&mut self, candidates: &[PlayerId]) -> Choice {
        if self.rng.percent(ABSTAIN_PERCENT) {
            return Choice::Nobody;
        }
        self.someone(candidates).map_or(Choice::Nobody, Choice::Player)
    }

    fn day(&mut self, game: &mut Game<Silent>) {
        let day = game.day();
        let alive = living(game);

        let celebs: Vec<PlayerId> = game
            .players()
            .iter()
            .filter(|p| p.role == Role::Celeb && !game.revealed().contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        for celeb in celebs {
            if self.rng.percent(10) {
                self.accept(game.reveal(&celeb));
            }
        }

        for _ in 0..alive.len() * VOTES_PER_PLAYER {
            if game.phase() != Phase::Day || game.day() != day {
                return;
            }
            let Some(voter) = self.someone(&alive) else { return };
            let choice = self.choice(&alive);
            self.accept(game.vote(&voter, Some(choice)));
        }
        if game.phase() == Phase::Day && game.day() == day {
            self.accept(game.timer());
        }
    }

    fn night(&mut self, game: &mut Game<Silent>) {
        let potent = game.rules().goon_potence == Toggle::On;
        let alive = living(game);
        let killers: Vec<PlayerId> = game
            .players()
            .iter()
            .filter(|p| p.role.can_order_kill(potent))
            .map(|p| p.id.clone())
            .collect();
        let prey: Vec<PlayerId> = game
            .players()
            .iter()
            .filter(|p| !p.role.is_mafia())
            .map(|p| p.id.clone())
            .collect();

        if let (Some(killer), Some(victim)) = (self.someone(&killers), self.someone(&prey)) {
            self.accept(game.mafia_target(&killer, Choice::Player(victim)));
        }

        let actors: Vec<PlayerId> = game
            .players()
            .iter()
            .filter(|p| p.role.night_action().is_some())
            .map(|p| p.id.clone())
            .collect();
        for actor in actors {
            if game.phase() != Phase::Night {
                return;
            }
            let others: Vec<PlayerId> = alive.iter().filter(|id| **id != actor).cloned().collect();
            let choice = self.choice(&others);
            self.accept(game.target(&actor, Some(choice)));
        }
        if game.phase() == Phase::Night {
            self.accept(game.timer());
        }
    }

    fn dusk(&mut self, game: &mut Game<Silent>) {
        let Some(vengeance) = game.vengeance() else { return };
        let idiot = vengeance.idiot.clone();
        let voters: Vec<PlayerId> = vengeance.voters.iter().cloned().collect();
        let choice = self.choice(&voters);
        self.accept(game.target(&idiot, Some(choice)));
        if game.phase() == Phase::Dusk {
            self.accept(game.timer());
        }
    }
}

fn living(game: &Game<Silent>) -> Vec<PlayerId> {
    game.players().iter().map(|p| p.id.clone()).collect()
}

/// Play one game between random bots.
///
/// # Errors
///
/// Returns [`SimError`] if the setup is unplayable or the game stalls.
pub fn simulate_game(seed: u64, players: usize, rules: RuleSet) -> Result<SimResult, SimError> {
    let ids: Vec<PlayerId> = (0..players).map(|i| PlayerId::new(format!("p{i}"))).collect();
    let mut game = Game::start(ids, &mut SeededAssigner::new(seed), rules, Silent)?;
    let mut bots = Bots {
        rng: Rng::new(seed.rotate_left(17) ^ 0x9e37_79b9_7f4a_7c15),
        actions: 0,
    };

    let mut cycles = 0;
    loop {
        if let Some(over) = game.outcome() {
            return Ok(SimResult {
                seed,
                winner: over.winner.clone(),
                days: game.day(),
                actions: bots.actions,
                contracts: over.contracts.clone(),
            });
        }
        match game.phase() {
            Phase::Day => bots.day(&mut game),
            Phase::Night => {
                cycles += 1;
                if cycles > MAX_CYCLES {
                    return Err(SimError::Stalled { seed });
                }
                bots.night(&mut game);
            }
            Phase::Dusk => bots.dusk(&mut game),
            Phase::Init | Phase::End => return Err(SimError::Stalled { seed }),
        }
    }
}

/// Parameters for a batch of games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of games.
    pub games: u64,
    /// Seats per game.
    pub players: usize,
    /// Seed of the first game; game `i` uses `seed + i`.
    pub seed: u64,
    /// Rules for every game.
    pub rules: RuleSet,
}

/// Aggregated results of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Games that finished.
    pub games_played: u64,
    /// Games that failed to finish.
    pub games_failed: u64,
    /// Town victories.
    pub town_wins: u64,
    /// Mafia victories.
    pub mafia_wins: u64,
    /// Idiot victories.
    pub idiot_wins: u64,
    /// Sum of final day counters.
    pub total_days: u64,
    /// Contracts resolved.
    pub contracts: u64,
    /// Contracts that succeeded.
    pub contracts_won: u64,
}

impl BatchReport {
    /// Record one game.
    pub fn add(&mut self, result: &Result<SimResult, SimError>) {
        let Ok(result) = result else {
            self.games_failed += 1;
            return;
        };
        self.games_played += 1;
        match result.winner {
            Winner::Town => self.town_wins += 1,
            Winner::Mafia => self.mafia_wins += 1,
            Winner::Idiot(_) => self.idiot_wins += 1,
        }
        self.total_days += u64::from(result.days);
        self.contracts += result.contracts.len() as u64;
        self.contracts_won += result.contracts.iter().filter(|c| c.success).count() as u64;
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.games_failed += other.games_failed;
        self.town_wins += other.town_wins;
        self.mafia_wins += other.mafia_wins;
        self.idiot_wins += other.idiot_wins;
        self.total_days += other.total_days;
        self.contracts += other.contracts;
        self.contracts_won += other.contracts_won;
    }

    /// Fraction of finished games with `wins`.
    #[must_use]
    pub fn rate(&self, wins: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        wins as f64 / self.games_played as f64
    }

    /// Mean final day counter.
    #[must_use]
    pub fn average_days(&self) -> f64 {
        self.rate(self.total_days)
    }
}

/// Run a batch, calling `on_game` after every game from worker threads.
///
/// # Errors
///
/// Returns [`SetupError::TooFewPlayers`] for tables that cannot play.
pub fn run_batch_with<F>(config: &BatchConfig, on_game: F) -> Result<BatchReport, SetupError>
where
    F: Fn(&Result<SimResult, SimError>) + Sync,
{
    if config.players < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers(config.players));
    }

    // Each worker fills its own report; they are merged at the end.
    let report = (0..config.games)
        .into_par_iter()
        .fold(BatchReport::default, |mut local, i| {
            let result = simulate_game(config.seed.wrapping_add(i), config.players, config.rules);
            on_game(&result);
            local.add(&result);
            local
        })
        .reduce(BatchReport::default, |mut a, b| {
            a.merge(&b);
            a
        });
    Ok(report)
}

/// Run a batch.
///
/// # Errors
///
/// Returns [`SetupError::TooFewPlayers`] for tables that cannot play.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport, SetupError> {
    run_batch_with(config, |_| {})
}
