//! Rule configuration matrix.
//!
//! Fourteen independent settings, each a closed enumeration. A [`RuleSet`]
//! is built once per game and handed to the engine by value; nothing reads
//! rules from global state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidRule;

/// Declares a rule value enum with its wire names.
macro_rules! rule_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every allowed value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

rule_enum! {
    /// Plain on/off switch.
    Toggle {
        /// Enabled.
        On => "ON",
        /// Disabled.
        Off => "OFF",
    }
}

rule_enum! {
    /// How much role information is published (at start or on death).
    Disclosure {
        /// Exact role.
        On => "ON",
        /// Team only.
        Team => "TEAM",
        /// Nothing.
        Off => "OFF",
    }
}

rule_enum! {
    /// Whether the game opens at night.
    StartNight {
        /// Always start at night.
        On => "ON",
        /// Always start at day.
        Off => "OFF",
        /// Start at night with an odd player count.
        Odd => "ODD",
        /// Start at night with an even player count.
        Even => "EVEN",
    }
}

rule_enum! {
    /// What happens when the town elects the Idiot.
    IdiotVengeance {
        /// The Idiot simply dies.
        Off => "OFF",
        /// Dusk vengeance, then the day resumes.
        Day => "DAY",
        /// Dusk vengeance, then night.
        Kill => "KILL",
        /// The Idiot wins outright.
        Win => "WIN",
    }
}

rule_enum! {
    /// When a stripped player is told about it.
    StripNotice {
        /// Always.
        On => "ON",
        /// When the target has an ability to block.
        Target => "TARGET",
        /// When the strip actually blocked something.
        Useful => "USEFUL",
        /// Never.
        Off => "OFF",
    }
}

rule_enum! {
    /// Detail of a cop investigation.
    CopStrength {
        /// Apparent role.
        Role => "ROLE",
        /// Apparent team.
        Team => "TEAM",
        /// Mafia or not.
        Mafia => "MAFIA",
    }
}

/// The full rule matrix for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Role list published at start.
    pub known_roles: Disclosure,
    /// Role disclosure on death.
    pub reveal_on_death: Disclosure,
    /// Public announcement of a doctor save.
    pub know_if_saved: Toggle,
    /// Saving doctor is told.
    pub know_if_saved_doc: Toggle,
    /// Saved target is told.
    pub know_if_saved_self: Toggle,
    /// Opening phase.
    pub start_night: StartNight,
    /// Guards refocus when their charge dies.
    pub charge_refocus_guard: Toggle,
    /// Agents refocus when their charge dies.
    pub charge_refocus_agent: Toggle,
    /// Idiot election behaviour.
    pub idiot_vengeance: IdiotVengeance,
    /// Strip notification policy.
    pub know_if_stripped: StripNotice,
    /// Milky may not milk itself.
    pub no_milk_self: Toggle,
    /// Investigation detail.
    pub cop_strength: CopStrength,
    /// Mafia members cannot both kill and act.
    pub unique_night_act: Toggle,
    /// Goons may order the kill.
    pub goon_potence: Toggle,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            known_roles: Disclosure::On,
            reveal_on_death: Disclosure::On,
            know_if_saved: Toggle::Off,
            know_if_saved_doc: Toggle::On,
            know_if_saved_self: Toggle::On,
            start_night: StartNight::Off,
            charge_refocus_guard: Toggle::On,
            charge_refocus_agent: Toggle::On,
            idiot_vengeance: IdiotVengeance::Kill,
            know_if_stripped: StripNotice::Useful,
            no_milk_self: Toggle::On,
            cop_strength: CopStrength::Team,
            unique_night_act: Toggle::On,
            goon_potence: Toggle::Off,
        }
    }
}

/// Static description of one rule, for listings.
#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    /// Rule name.
    pub name: &'static str,
    /// Allowed values.
    pub values: &'static [&'static str],
    /// One-line effect.
    pub summary: &'static str,
}

/// Every rule in the matrix.
pub static RULES: [RuleInfo; 14] = [
    RuleInfo {
        name: "known_roles",
        values: &["ON", "TEAM", "OFF"],
        summary: "publish the role list, team counts, or nothing at start",
    },
    RuleInfo {
        name: "reveal_on_death",
        values: &["ON", "TEAM", "OFF"],
        summary: "publish a dead player's role, team, or nothing",
    },
    RuleInfo {
        name: "know_if_saved",
        values: &["ON", "OFF"],
        summary: "announce publicly that the mafia target was saved",
    },
    RuleInfo {
        name: "know_if_saved_doc",
        values: &["ON", "OFF"],
        summary: "tell a doctor their save worked",
    },
    RuleInfo {
        name: "know_if_saved_self",
        values: &["ON", "OFF"],
        summary: "tell the saved player they were attacked",
    },
    RuleInfo {
        name: "start_night",
        values: &["ON", "OFF", "ODD", "EVEN"],
        summary: "open at night always, never, or by player-count parity",
    },
    RuleInfo {
        name: "charge_refocus_guard",
        values: &["ON", "OFF"],
        summary: "a guard whose charge dies takes a new contract",
    },
    RuleInfo {
        name: "charge_refocus_agent",
        values: &["ON", "OFF"],
        summary: "an agent whose charge dies takes a new contract",
    },
    RuleInfo {
        name: "idiot_vengeance",
        values: &["OFF", "DAY", "KILL", "WIN"],
        summary: "an elected idiot dies, avenges then resumes day, avenges then night, or wins",
    },
    RuleInfo {
        name: "know_if_stripped",
        values: &["ON", "TARGET", "USEFUL", "OFF"],
        summary: "when a stripped player is told",
    },
    RuleInfo {
        name: "no_milk_self",
        values: &["ON", "OFF"],
        summary: "forbid a milky from targeting itself",
    },
    RuleInfo {
        name: "cop_strength",
        values: &["ROLE", "TEAM", "MAFIA"],
        summary: "investigations reveal role, team, or mafia membership",
    },
    RuleInfo {
        name: "unique_night_act",
        values: &["ON", "OFF"],
        summary: "a mafia member cannot both order the kill and use its own action",
    },
    RuleInfo {
        name: "goon_potence",
        values: &["ON", "OFF"],
        summary: "goons may order the mafia kill",
    },
];

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T, InvalidRule> {
    value.parse().map_err(|_| InvalidRule {
        name: name.to_string(),
        value: value.to_string(),
    })
}

impl RuleSet {
    /// Set a rule by name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRule`] for an unknown name or a value outside the
    /// rule's enumeration. The set is unchanged on error.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), InvalidRule> {
        match name.trim().to_ascii_lowercase().as_str() {
            "known_roles" => self.known_roles = parse(name, value)?,
            "reveal_on_death" => self.reveal_on_death = parse(name, value)?,
            "know_if_saved" => self.know_if_saved = parse(name, value)?,
            "know_if_saved_doc" => self.know_if_saved_doc = parse(name, value)?,
            "know_if_saved_self" => self.know_if_saved_self = parse(name, value)?,
            "start_night" => self.start_night = parse(name, value)?,
            "charge_refocus_guard" => self.charge_refocus_guard = parse(name, value)?,
            "charge_refocus_agent" => self.charge_refocus_agent = parse(name, value)?,
            "idiot_vengeance" => self.idiot_vengeance = parse(name, value)?,
            "know_if_stripped" => self.know_if_stripped = parse(name, value)?,
            "no_milk_self" => self.no_milk_self = parse(name, value)?,
            "cop_strength" => self.cop_strength = parse(name, value)?,
            "unique_night_act" => self.unique_night_act = parse(name, value)?,
            "goon_potence" => self.goon_potence = parse(name, value)?,
            _ => {
                return Err(InvalidRule {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Current value of a rule, or `None` for an unknown name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static str> {
        let value = match name.trim().to_ascii_lowercase().as_str() {
            "known_roles" => self.known_roles.as_str(),
            "reveal_on_death" => self.reveal_on_death.as_str(),
            "know_if_saved" => self.know_if_saved.as_str(),
            "know_if_saved_doc" => self.know_if_saved_doc.as_str(),
            "know_if_saved_self" => self.know_if_saved_self.as_str(),
            "start_night" => self.start_night.as_str(),
            "charge_refocus_guard" => self.charge_refocus_guard.as_str(),
            "charge_refocus_agent" => self.charge_refocus_agent.as_str(),
            "idiot_vengeance" => self.idiot_vengeance.as_str(),
            "know_if_stripped" => self.know_if_stripped.as_str(),
            "no_milk_self" => self.no_milk_self.as_str(),
            "cop_strength" => self.cop_strength.as_str(),
            "unique_night_act" => self.unique_night_act.as_str(),
            "goon_potence" => self.goon_potence.as_str(),
            _ => return None,
        };
        Some(value)
    }

    /// All `(name, value)` pairs in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        RULES
            .iter()
            .filter_map(move |info| self.get(info.name).map(|value| (info.name, value)))
    }

    /// Whether a game with `player_count` players opens at night.
    #[must_use]
    pub const fn starts_at_night(&self, player_count: usize) -> bool {
        match self.start_night {
            StartNight::On => true,
            StartNight::Off => false,
            StartNight::Odd => player_count % 2 == 1,
            StartNight::Even => player_count % 2 == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut rules = RuleSet::default();
        rules.set("cop_strength", "role").unwrap();
        assert_eq!(rules.cop_strength, CopStrength::Role);
        assert_eq!(rules.get("cop_strength"), Some("ROLE"));

        rules.set("IDIOT_VENGEANCE", " win ").unwrap();
        assert_eq!(rules.idiot_vengeance, IdiotVengeance::Win);
    }

    #[test]
    fn test_invalid_rule_leaves_matrix_unchanged() {
        let mut rules = RuleSet::default();
        let before = rules;

        let err = rules.set("cop_strength", "psychic").unwrap_err();
        assert_eq!(err.name, "cop_strength");
        assert_eq!(rules, before);

        assert!(rules.set("lynch_mode", "ON").is_err());
        assert!(rules.set("no_milk_self", "TEAM").is_err());
        assert_eq!(rules, before);
    }

    #[test]
    fn test_iter_covers_every_rule() {
        let rules = RuleSet::default();
        let pairs: Vec<_> = rules.iter().collect();
        assert_eq!(pairs.len(), 14);
        for (info, (name, value)) in RULES.iter().zip(&pairs) {
            assert_eq!(info.name, *name);
            assert!(info.values.contains(value), "{name}={value}");
        }
    }

    #[test]
    fn test_start_night_parity() {
        let mut rules = RuleSet::default();
        assert!(!rules.starts_at_night(5));

        rules.start_night = StartNight::Odd;
        assert!(rules.starts_at_night(5));
        assert!(!rules.starts_at_night(6));

        rules.start_night = StartNight::Even;
        assert!(rules.starts_at_night(6));

        rules.start_night = StartNight::On;
        assert!(rules.starts_at_night(4));
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let rules: RuleSet =
            serde_json::from_str(r#"{"cop_strength":"MAFIA","goon_potence":"ON"}"#).unwrap();
        assert_eq!(rules.cop_strength, CopStrength::Mafia);
        assert_eq!(rules.goon_potence, Toggle::On);
        assert_eq!(rules.idiot_vengeance, IdiotVengeance::Kill);
    }

    #[test]
    fn test_json_rejects_unknown_value() {
        let result: Result<RuleSet, _> = serde_json::from_str(r#"{"cop_strength":"PSYCHIC"}"#);
        assert!(result.is_err());
    }
}
