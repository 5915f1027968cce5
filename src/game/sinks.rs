//! Output collaborators.
//!
//! The engine only ever writes to these. Delivery is fire-and-forget: a
//! transport that fails to send is expected to deal with it on its own.

use crate::game::PlayerId;

/// Where the engine sends its messages.
pub trait Sinks {
    /// Message every player.
    fn broadcast_main(&mut self, text: &str);

    /// Message the mafia-aligned players.
    fn broadcast_mafia(&mut self, text: &str);

    /// Message one player.
    fn direct_message(&mut self, text: &str, player: &PlayerId);

    /// Cancel any pending phase timeout for this game.
    fn halt_timer(&mut self);
}

impl<S: Sinks + ?Sized> Sinks for &mut S {
    fn broadcast_main(&mut self, text: &str) {
        (**self).broadcast_main(text);
    }

    fn broadcast_mafia(&mut self, text: &str) {
        (**self).broadcast_mafia(text);
    }

    fn direct_message(&mut self, text: &str, player: &PlayerId) {
        (**self).direct_message(text, player);
    }

    fn halt_timer(&mut self) {
        (**self).halt_timer();
    }
}

/// Sinks that drop everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Sinks for Silent {
    fn broadcast_main(&mut self, _text: &str) {}

    fn broadcast_mafia(&mut self, _text: &str) {}

    fn direct_message(&mut self, _text: &str, _player: &PlayerId) {}

    fn halt_timer(&mut self) {}
}

/// A delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Sent to everyone.
    Main(String),
    /// Sent to the mafia channel.
    Mafia(String),
    /// Sent to one player.
    Direct(PlayerId, String),
}

impl Message {
    /// The message body.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Main(text) | Self::Mafia(text) | Self::Direct(_, text) => text,
        }
    }
}

/// Sinks that keep everything in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSinks {
    /// Every message, in delivery order.
    pub messages: Vec<Message>,
    /// How many times the timer was halted.
    pub timer_halts: usize,
}

impl RecordingSinks {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Public messages.
    pub fn main(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| match m {
            Message::Main(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Mafia channel messages.
    pub fn mafia(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| match m {
            Message::Mafia(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Direct messages to `player`.
    pub fn direct<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = &'a str> {
        self.messages.iter().filter_map(move |m| match m {
            Message::Direct(to, text) if to == player => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any message contains `needle`.
    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text().contains(needle))
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.timer_halts = 0;
    }
}

impl Sinks for RecordingSinks {
    fn broadcast_main(&mut self, text: &str) {
        self.messages.push(Message::Main(text.to_string()));
    }

    fn broadcast_mafia(&mut self, text: &str) {
        self.messages.push(Message::Mafia(text.to_string()));
    }

    fn direct_message(&mut self, text: &str, player: &PlayerId) {
        self.messages
            .push(Message::Direct(player.clone(), text.to_string()));
    }

    fn halt_timer(&mut self) {
        self.timer_halts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sinks_filters() {
        let mut sinks = RecordingSinks::new();
        let ann = PlayerId::from("ann");
        sinks.broadcast_main("hello all");
        sinks.broadcast_mafia("hello mafia");
        sinks.direct_message("hello ann", &ann);
        sinks.halt_timer();

        assert_eq!(sinks.main().collect::<Vec<_>>(), ["hello all"]);
        assert_eq!(sinks.mafia().collect::<Vec<_>>(), ["hello mafia"]);
        assert_eq!(sinks.direct(&ann).collect::<Vec<_>>(), ["hello ann"]);
        assert_eq!(sinks.timer_halts, 1);
        assert!(sinks.saw("mafia"));

        sinks.clear();
        assert!(sinks.messages.is_empty());
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn announce<S: Sinks>(mut sinks: S) {
            sinks.broadcast_main("through a reference");
            sinks.halt_timer();
        }

        let mut sinks = RecordingSinks::new();
        announce(&mut sinks);
        assert!(sinks.saw("through a reference"));
        assert_eq!(sinks.timer_halts, 1);
    }
}
