//! MUD Terminal Type Standard (MTTS) cycling: a client that supports MTTS
//! answers three successive `IAC SB TTYPE SEND` requests with its terminal
//! name, a fixed `MTTS` sentinel, then a repeat of its first answer (or a
//! `MTTS <bitvector>` triplet on capable clients), letting a server detect
//! color/256-color/UTF-8/mouse support without a side channel.

use crate::constants::mtts as bits;

/// Highest number of `SEND` round-trips attempted before giving up on a
/// client that never repeats or sends an `MTTS` reply.
pub const TTYPE_LOOPMAX: u8 = 8;

/// Tracks one client's answers across the TTYPE negotiation loop and
/// resolves them into a terminal name plus an MTTS capability bitmask.
#[derive(Debug, Default, Clone)]
pub struct MttsCycle {
    replies: Vec<String>,
    done: bool,
}

/// The result of a completed MTTS cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalProfile {
    /// The first TTYPE reply, e.g. `"XTERM"` or `"ANSI"`.
    pub terminal_type: Option<String>,
    /// Capability bits decoded from an `MTTS <bitvector>` reply, if any.
    pub mtts: u32,
}

impl TerminalProfile {
    pub fn supports(&self, flag: u32) -> bool {
        self.mtts & flag != 0
    }

    pub fn is_ansi(&self) -> bool {
        self.supports(bits::ANSI)
    }

    pub fn is_vt100(&self) -> bool {
        self.supports(bits::VT100)
    }

    pub fn supports_256_color(&self) -> bool {
        self.supports(bits::COLOR_256)
    }

    pub fn supports_truecolor(&self) -> bool {
        self.supports(bits::TRUECOLOR)
    }
}

impl MttsCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// How many replies have been recorded so far, used by the session to
    /// number `TTYPE0`, `TTYPE1`, ... environment entries as they arrive.
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Whether another `IAC SB TTYPE SEND` should be issued.
    pub fn should_continue(&self) -> bool {
        !self.done && (self.replies.len() as u8) < TTYPE_LOOPMAX
    }

    /// Feeds one TTYPE reply into the cycle, terminating it once the client
    /// repeats an earlier answer, sends an `MTTS` triplet, or the loop bound
    /// is reached.
    pub fn record(&mut self, reply: String) {
        if self.done {
            return;
        }

        let is_mtts = reply.to_ascii_uppercase().starts_with("MTTS ");
        let is_repeat = self.replies.first().is_some_and(|first| first == &reply);

        self.replies.push(reply);

        if is_mtts || is_repeat || self.replies.len() as u8 >= TTYPE_LOOPMAX {
            self.done = true;
        }
    }

    /// Resolves the replies collected so far into a [`TerminalProfile`].
    pub fn profile(&self) -> TerminalProfile {
        let terminal_type = self.replies.first().cloned();
        let mtts = self
            .replies
            .iter()
            .find_map(|reply| reply.to_ascii_uppercase().strip_prefix("MTTS ").map(str::to_owned))
            .and_then(|bitvector| bitvector.trim().parse::<u32>().ok())
            .unwrap_or(0);

        TerminalProfile { terminal_type, mtts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_on_repeat_when_client_has_no_mtts() {
        let mut cycle = MttsCycle::new();
        cycle.record("ANSI".to_string());
        assert!(cycle.should_continue());
        cycle.record("ANSI".to_string());
        assert!(!cycle.should_continue());
        assert!(cycle.is_done());
        assert_eq!(cycle.profile().terminal_type.as_deref(), Some("ANSI"));
        assert_eq!(cycle.profile().mtts, 0);
    }

    #[test]
    fn stops_on_mtts_bitvector_and_decodes_flags() {
        let mut cycle = MttsCycle::new();
        cycle.record("XTERM".to_string());
        cycle.record("XTERM-256COLOR".to_string());
        cycle.record(format!("MTTS {}", bits::ANSI | bits::COLOR_256 | bits::UTF8));
        assert!(cycle.is_done());

        let profile = cycle.profile();
        assert_eq!(profile.terminal_type.as_deref(), Some("XTERM"));
        assert!(profile.is_ansi());
        assert!(profile.supports_256_color());
        assert!(!profile.supports_truecolor());
    }

    #[test]
    fn gives_up_after_loop_max_without_resolution() {
        let mut cycle = MttsCycle::new();
        for i in 0..TTYPE_LOOPMAX {
            cycle.record(format!("TERM-{i}"));
        }
        assert!(cycle.is_done());
        assert!(!cycle.should_continue());
    }
}
