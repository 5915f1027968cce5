#![no_main]

//! Arbitrary action fuzzer.
//!
//! Deals a seeded table under fuzzer-chosen rules, then feeds it any
//! sequence of requests, legal or not. After every request:
//! 1. The state passes every invariant
//! 2. A refused request left the state untouched
//! 3. The game is over exactly when it says so

use arbitrary::Arbitrary;
use dawnfall::game::invariants::check_invariants;
use dawnfall::game::{Choice, Game, PlayerId, SeededAssigner, Silent};
use dawnfall::rules::{RULES, RuleSet};
use dawnfall::{ActionError, Phase, Progress};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated request. Seats wrap around the table; seats past
/// it mean "nobody".
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Vote { voter: u8, votee: u8, retract: bool },
    Target { actor: u8, target: u8, withdraw: bool },
    Mafia { actor: u8, target: u8 },
    Reveal { actor: u8 },
    Timer,
}

/// Structured input for one fuzzed game.
#[derive(Arbitrary, Debug)]
struct GameInput {
    /// Seed for dealing roles.
    seed: u64,
    /// Seats at the table, capped to a playable range.
    players: u8,
    /// One value index per rule, wrapped to the rule's allowed values.
    rules: [u8; 14],
    /// Requests in order.
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: GameInput| {
    let players = 3 + usize::from(input.players % 18);
    let seats: Vec<PlayerId> = (0..players).map(|i| PlayerId::new(format!("p{i}"))).collect();

    let mut rules = RuleSet::default();
    for (info, pick) in RULES.iter().zip(input.rules) {
        let value = info.values[usize::from(pick) % info.values.len()];
        rules.set(info.name, value).expect("listed values are valid");
    }

    let Ok(mut game) = Game::start(seats.clone(), &mut SeededAssigner::new(input.seed), rules, Silent)
    else {
        return;
    };
    assert!(check_invariants(&game).is_empty(), "invariants violated at start");

    for (step, action) in input.actions.iter().take(200).enumerate() {
        let before = game.snapshot();
        match apply(&mut game, &seats, *action) {
            Ok(Progress::Ended(_)) => assert_eq!(game.phase(), Phase::End),
            Ok(Progress::Ongoing) => assert_ne!(game.phase(), Phase::End),
            Err(ActionError::GameOver) => assert_eq!(game.phase(), Phase::End),
            Err(_) => assert_eq!(game.snapshot(), before, "refused action changed state at {step}"),
        }

        let violations = check_invariants(&game);
        assert!(
            violations.is_empty(),
            "Invariants violated after {:?} at step {}: {:?}",
            action,
            step,
            violations
        );
    }
});

fn seat(seats: &[PlayerId], n: u8) -> &PlayerId {
    &seats[usize::from(n) % seats.len()]
}

fn choice(seats: &[PlayerId], n: u8) -> Choice {
    seats
        .get(usize::from(n))
        .map_or(Choice::Nobody, |id| Choice::Player(id.clone()))
}

fn apply(game: &mut Game<Silent>, seats: &[PlayerId], action: FuzzAction) -> Result<Progress, ActionError> {
    match action {
        FuzzAction::Vote { voter, votee, retract } => {
            game.vote(seat(seats, voter), (!retract).then(|| choice(seats, votee)))
        }
        FuzzAction::Target { actor, target, withdraw } => {
            game.target(seat(seats, actor), (!withdraw).then(|| choice(seats, target)))
        }
        FuzzAction::Mafia { actor, target } => game.mafia_target(seat(seats, actor), choice(seats, target)),
        FuzzAction::Reveal { actor } => game.reveal(seat(seats, actor)),
        FuzzAction::Timer => game.timer(),
    }
}
