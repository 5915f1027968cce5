//! Text of everything the engine says.

use std::fmt::Write as _;

use crate::game::{Choice, ContractOutcome, PlayerId, Role, Team, Winner};
use crate::rules::{CopStrength, Disclosure};

pub(crate) fn role_intro(role: Role) -> String {
    let blurb = match role {
        Role::Town => "You have no special ability. Find the mafia.",
        Role::Cop => "Each night, investigate one player.",
        Role::Doctor => "Each night, protect one player from the mafia.",
        Role::Celeb => "During the day you may reveal yourself to everyone.",
        Role::Miller => "You are town, but cops will see you as mafia.",
        Role::Milky => "Each night, deliver milk to one player.",
        Role::Stripper => "Each night, distract one player so their ability fails.",
        Role::Mafia => "Each night, the mafia chooses someone to kill.",
        Role::Godfather => "You lead the mafia. Cops will see you as town.",
        Role::Goon => "You are a mafia foot soldier.",
        Role::Dentist => "Each night, numb one player so they cannot vote tomorrow.",
        Role::Idiot => "You win if the town elects you.",
        Role::Survivor => "You win if you are alive at the end.",
        Role::Guard => "You win if your charge survives.",
        Role::Agent => "You win if your charge dies.",
    };
    format!("You are the {role}. {blurb}")
}

pub(crate) fn contract_intro(role: Role, charge: &PlayerId) -> String {
    match role {
        Role::Guard => format!("Your charge is {charge}. Keep them alive."),
        Role::Agent => format!("Your charge is {charge}. See them dead."),
        _ => String::from("Your contract is with yourself."),
    }
}

pub(crate) fn mafia_roster<'a>(members: impl Iterator<Item = (&'a PlayerId, Role)>) -> String {
    let list: Vec<String> = members.map(|(id, role)| format!("{id} ({role})")).collect();
    format!("The mafia is: {}", list.join(", "))
}

pub(crate) fn known_roles(policy: Disclosure, roles: &[Role]) -> Option<String> {
    match policy {
        Disclosure::Off => None,
        Disclosure::On => {
            let mut sorted = roles.to_vec();
            sorted.sort();
            let names: Vec<&str> = sorted.iter().map(|r| r.name()).collect();
            Some(format!("Roles in this game: {}", names.join(", ")))
        }
        Disclosure::Team => {
            let count = |team: Team| roles.iter().filter(|r| r.team() == team).count();
            Some(format!(
                "Teams in this game: {} town, {} mafia, {} rogue",
                count(Team::Town),
                count(Team::Mafia),
                count(Team::Rogue)
            ))
        }
    }
}

pub(crate) fn day_start(day: u32, alive: usize, majority: usize) -> String {
    format!("Day {day} begins. {alive} players remain; {majority} votes elect.")
}

pub(crate) fn day_resumes(day: u32, alive: usize, majority: usize) -> String {
    format!("Day {day} continues. {alive} players remain; {majority} votes elect.")
}

pub(crate) fn night_start(day: u32) -> String {
    format!("Night {day} falls. Everyone go to sleep.")
}

pub(crate) fn night_prompt(role: Role) -> String {
    format!("Night has fallen. As the {role}, who is your target?")
}

pub(crate) fn mafia_prompt() -> String {
    String::from("Night has fallen. Who will the mafia kill?")
}

pub(crate) fn vote_cast(voter: &PlayerId, choice: &Choice, count: usize, needed: usize) -> String {
    match choice {
        Choice::Player(votee) => format!("{voter} votes for {votee} ({count}/{needed})"),
        Choice::Nobody => format!("{voter} votes for no kill ({count}/{needed})"),
    }
}

pub(crate) fn vote_retracted(voter: &PlayerId) -> String {
    format!("{voter} retracts their vote")
}

pub(crate) fn elected(id: &PlayerId) -> String {
    format!("The town has elected {id}.")
}

pub(crate) fn no_kill_elected() -> String {
    String::from("The town has decided not to kill anyone today.")
}

pub(crate) fn death(id: &PlayerId, role: Role, policy: Disclosure) -> String {
    match policy {
        Disclosure::On => format!("{id} has died. They were the {role}."),
        Disclosure::Team => format!("{id} has died. They were {}.", role.team()),
        Disclosure::Off => format!("{id} has died."),
    }
}

pub(crate) fn dusk(idiot: &PlayerId, voters: &[&PlayerId]) -> String {
    let names: Vec<String> = voters.iter().map(ToString::to_string).collect();
    format!(
        "{idiot} was the Idiot! Before dying they may take one of their voters with them: {}",
        names.join(", ")
    )
}

pub(crate) fn vengeance(idiot: &PlayerId, victim: &PlayerId) -> String {
    format!("{idiot} drags {victim} down with them.")
}

pub(crate) fn vengeance_lapsed(idiot: &PlayerId) -> String {
    format!("{idiot} hesitated and took nobody with them.")
}

pub(crate) fn idiot_victory(idiot: &PlayerId) -> String {
    format!("{idiot} was the Idiot, and getting elected was the plan all along.")
}

pub(crate) fn quiet_night() -> String {
    String::from("Dawn breaks. Nobody died last night.")
}

pub(crate) fn saved_public(target: &PlayerId) -> String {
    format!("Dawn breaks. The mafia attacked {target}, but they were saved!")
}

pub(crate) fn saved_doctor(target: &PlayerId) -> String {
    format!("Your protection saved {target} from the mafia.")
}

pub(crate) fn saved_self() -> String {
    String::from("The mafia came for you last night, but a doctor saved you.")
}

pub(crate) fn killed_at_night(target: &PlayerId) -> String {
    format!("Dawn breaks. {target} was killed in the night.")
}

pub(crate) fn stripped() -> String {
    String::from("You were distracted last night and could not act.")
}

pub(crate) fn milked(target: &PlayerId) -> String {
    format!("{target} received milk in the night.")
}

pub(crate) fn stunned() -> String {
    String::from("Your mouth is numb. You cannot vote today.")
}

pub(crate) fn investigation(target: &PlayerId, role: Role, strength: CopStrength) -> String {
    let seen = role.apparent();
    match strength {
        CopStrength::Role => format!("{target} is the {seen}."),
        CopStrength::Team => format!("{target} is {}.", seen.team()),
        CopStrength::Mafia if seen.is_mafia() => format!("{target} is mafia."),
        CopStrength::Mafia => format!("{target} is not mafia."),
    }
}

pub(crate) fn refocused(role: Role, charge: &PlayerId, holder: &PlayerId) -> String {
    if charge == holder {
        format!("Your charge is dead. You are now the {role}: {}", role_intro(role))
    } else {
        format!("Your charge is dead. You are now the {role} and your new charge is {charge}.")
    }
}

pub(crate) fn target_set(choice: &Choice) -> String {
    format!("You have targeted {choice}.")
}

pub(crate) fn mafia_target_set(actor: &PlayerId, choice: &Choice) -> String {
    format!("{actor} has chosen to kill {choice}.")
}

pub(crate) fn celeb_reveal(id: &PlayerId) -> String {
    format!("{id} reveals themselves as the Celeb!")
}

pub(crate) fn day_expired() -> String {
    String::from("Time is up. The town failed to reach a decision.")
}

pub(crate) fn game_over(winner: &Winner, outcomes: &[ContractOutcome]) -> String {
    let mut text = match winner {
        Winner::Town => String::from("The town wins! Every mafia member is dead."),
        Winner::Mafia => String::from("The mafia wins! The town has lost control."),
        Winner::Idiot(id) => format!("{id} the Idiot wins!"),
    };
    for outcome in outcomes {
        let verdict = if outcome.success { "succeeded" } else { "failed" };
        let _ = write!(
            text,
            "\n{} ({}, charge {}) {verdict}.",
            outcome.holder, outcome.role, outcome.charge
        );
    }
    text
}
