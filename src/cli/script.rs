//! Game scripts.
//!
//! ```text
//! players ann bob cat dan
//! assign ann=Cop bob=Guard:ann cat=Mafia dan=Town
//! vote ann cat        # none retracts, nokill votes for no kill
//! target ann cat      # none withdraws, nobody targets no one
//! mafia cat ann
//! reveal ann
//! timer
//! ```

use super::CliError;
use dawnfall::game::Assignment;
use dawnfall::{Choice, PlayerId, Role};

/// One scripted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Action {
    Vote(PlayerId, Option<Choice>),
    Target(PlayerId, Option<Choice>),
    Mafia(PlayerId, Choice),
    Reveal(PlayerId),
    Timer,
}

/// An action and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Step {
    pub(super) line: usize,
    pub(super) action: Action,
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Script {
    /// Seating order, from the `players` line.
    pub(super) players: Vec<PlayerId>,
    /// Roles for the seeded deal, from `setup` lines.
    pub(super) setup: Vec<Role>,
    /// Fixed deal from `assign` lines: player, role, and charge for
    /// Guards and Agents.
    pub(super) assigned: Vec<(PlayerId, Role, Option<PlayerId>)>,
    pub(super) steps: Vec<Step>,
}

impl Script {
    /// Whether the script only has actions.
    pub(super) fn is_headless(&self) -> bool {
        self.players.is_empty() && self.setup.is_empty() && self.assigned.is_empty()
    }

    /// The fixed deal, if the script has one.
    pub(super) fn assignment(&self) -> Result<Option<Assignment>, CliError> {
        if self.assigned.is_empty() {
            return Ok(None);
        }
        let roles = self.assigned.iter().map(|(id, role, _)| (id.clone(), *role)).collect();
        let mut assignment = Assignment::new(roles);
        for (id, role, charge) in &self.assigned {
            if role.charges_self() {
                assignment = assignment.with_contract(id.clone(), *role, id.clone());
            } else if role.is_contract() {
                let Some(charge) = charge else {
                    return Err(CliError::new(format!("{id}={role} needs a charge, as in {id}={role}:name")));
                };
                assignment = assignment.with_contract(id.clone(), *role, charge.clone());
            }
        }
        Ok(Some(assignment))
    }
}

fn err(line: usize, message: impl std::fmt::Display) -> CliError {
    CliError::new(format!("script line {line}: {message}"))
}

fn role(line: usize, name: &str) -> Result<Role, CliError> {
    name.parse().map_err(|e| err(line, e))
}

fn player(word: &str) -> PlayerId {
    PlayerId::from(word)
}

/// Parse a script. Header lines must come before the first action.
pub(super) fn parse(text: &str) -> Result<Script, CliError> {
    let mut script = Script::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let words: Vec<&str> = content.split_whitespace().collect();
        let Some((&keyword, args)) = words.split_first() else {
            continue;
        };

        let header = matches!(keyword, "players" | "setup" | "assign");
        if header && !script.steps.is_empty() {
            return Err(err(line, format!("{keyword} must come before any action")));
        }

        let action = match (keyword, args) {
            ("players", names) => {
                script.players.extend(names.iter().copied().map(player));
                continue;
            }
            ("setup", roles) => {
                for name in roles {
                    script.setup.push(role(line, name)?);
                }
                continue;
            }
            ("assign", pairs) => {
                for pair in pairs {
                    let Some((id, deal)) = pair.split_once('=') else {
                        return Err(err(line, format!("expected name=Role, got {pair}")));
                    };
                    let (name, charge) = match deal.split_once(':') {
                        Some((name, charge)) => (name, Some(player(charge))),
                        None => (deal, None),
                    };
                    script.assigned.push((player(id), role(line, name)?, charge));
                }
                continue;
            }
            ("vote", [voter, votee]) => Action::Vote(
                player(voter),
                match *votee {
                    "none" => None,
                    "nokill" | "nobody" => Some(Choice::Nobody),
                    id => Some(Choice::Player(player(id))),
                },
            ),
            ("target", [actor, target]) => Action::Target(
                player(actor),
                match *target {
                    "none" => None,
                    "nobody" => Some(Choice::Nobody),
                    id => Some(Choice::Player(player(id))),
                },
            ),
            ("mafia", [actor, target]) => Action::Mafia(
                player(actor),
                match *target {
                    "nobody" => Choice::Nobody,
                    id => Choice::Player(player(id)),
                },
            ),
            ("reveal", [actor]) => Action::Reveal(player(actor)),
            ("timer", []) => Action::Timer,
            _ => return Err(err(line, format!("cannot understand {:?}", content.trim()))),
        };
        script.steps.push(Step { line, action });
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_script() {
        let script = parse(
            "# five players\n\
             players ann bob cat dan eve\n\
             assign ann=Town bob=Guard:ann cat=Mafia dan=idiot eve=Town\n\
             \n\
             vote ann dan   # first vote\n\
             vote bob nokill\n\
             target dan none\n\
             mafia cat nobody\n\
             reveal ann\n\
             timer\n",
        )
        .unwrap();

        assert_eq!(script.players.len(), 5);
        assert_eq!(script.assigned[1], (player("bob"), Role::Guard, Some(player("ann"))));
        assert_eq!(script.steps.len(), 6);
        assert_eq!(
            script.steps[0],
            Step {
                line: 5,
                action: Action::Vote(player("ann"), Some(Choice::Player(player("dan"))))
            }
        );
        assert_eq!(script.steps[1].action, Action::Vote(player("bob"), Some(Choice::Nobody)));
        assert_eq!(script.steps[2].action, Action::Target(player("dan"), None));
        assert_eq!(script.steps[3].action, Action::Mafia(player("cat"), Choice::Nobody));
        assert_eq!(script.steps[5].action, Action::Timer);

        let assignment = script.assignment().unwrap().unwrap();
        assert_eq!(assignment.contracts.len(), 2);
        assert_eq!(assignment.contracts[&player("dan")], (Role::Idiot, player("dan")));
    }

    #[test]
    fn test_headless_script() {
        let script = parse("vote ann bob\ntimer\n").unwrap();
        assert!(script.is_headless());
        assert_eq!(script.assignment().unwrap(), None);
    }

    #[test]
    fn test_errors_name_the_line() {
        let err = parse("players a b c\nvote a\n").unwrap_err();
        assert!(err.to_string().starts_with("script line 2:"));
        let err = parse("timer\nplayers a b c\n").unwrap_err();
        assert!(err.to_string().contains("before any action"));
        let err = parse("setup Mafia Wizard\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_guard_without_charge() {
        let script = parse("players a b c\nassign a=Guard b=Mafia c=Town\n").unwrap();
        assert!(script.assignment().is_err());
    }
}
