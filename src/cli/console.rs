//! Sinks that print to the terminal.

use dawnfall::game::Sinks;
use dawnfall::PlayerId;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Prints every message with its channel as a prefix.
#[derive(Debug)]
pub(super) struct ConsoleSinks<W: Write> {
    out: W,
    /// Timer halts seen so far.
    pub(super) timer_halts: u32,
}

impl ConsoleSinks<io::Stdout> {
    pub(super) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSinks<W> {
    pub(super) const fn new(out: W) -> Self {
        Self { out, timer_halts: 0 }
    }

    fn emit(&mut self, prefix: &str, text: &str) {
        for line in text.lines() {
            if let Err(e) = writeln!(self.out, "{prefix} {line}") {
                warn!(error = %e, "console write failed");
                return;
            }
        }
    }

    #[cfg(test)]
    pub(super) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sinks for ConsoleSinks<W> {
    fn broadcast_main(&mut self, text: &str) {
        self.emit("[all]", text);
    }

    fn broadcast_mafia(&mut self, text: &str) {
        self.emit("[mafia]", text);
    }

    fn direct_message(&mut self, text: &str, player: &PlayerId) {
        self.emit(&format!("[@{player}]"), text);
    }

    fn halt_timer(&mut self) {
        self.timer_halts += 1;
        debug!(halts = self.timer_halts, "timer halted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_every_line() {
        let mut sinks = ConsoleSinks::new(Vec::new());
        sinks.broadcast_main("one\ntwo");
        sinks.direct_message("psst", &PlayerId::from("ann"));
        sinks.halt_timer();
        assert_eq!(sinks.timer_halts, 1);
        let out = String::from_utf8(sinks.into_inner()).unwrap();
        assert_eq!(out, "[all] one\n[all] two\n[@ann] psst\n");
    }
}
