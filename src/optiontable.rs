//! Per-option negotiation state, tracking what we support, what we have
//! enabled, and what we are waiting on a reply for, one [`Entry`] per
//! possible option byte.
//!
//! This mirrors RFC 1143's "Q Method" of option negotiation, which exists
//! to prevent the endless `DO`/`WILL` loops that a naive implementation
//! produces when both sides simultaneously propose the same option.

use std::fmt::{Debug, Formatter};

const TABLE_SIZE: usize = 1 + u8::MAX as usize;

/// A table of every Telnet option's local/remote support and negotiated
/// state, indexed by option byte.
#[derive(Clone)]
pub struct OptionTable {
    options: [Entry; TABLE_SIZE],
}

impl Default for OptionTable {
    fn default() -> Self {
        Self { options: [Entry::default(); TABLE_SIZE] }
    }
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn option(&self, opt: u8) -> &Entry {
        &self.options[opt as usize]
    }

    pub fn option_mut(&mut self, opt: u8) -> &mut Entry {
        &mut self.options[opt as usize]
    }

    /// Declares that we are able to perform `opt` ourselves (an option we
    /// would say `WILL` to).
    pub fn support_local(&mut self, opt: u8) {
        self.option_mut(opt).set_local_support();
    }

    /// Declares that we want the peer to perform `opt` (an option we would
    /// say `DO` to).
    pub fn support_remote(&mut self, opt: u8) {
        self.option_mut(opt).set_remote_support();
    }

    /// Every option currently enabled locally (we are performing it).
    pub fn enabled_locally(&self) -> impl Iterator<Item = u8> + '_ {
        self.options.iter().enumerate().filter(|(_, e)| e.local_enabled()).map(|(i, _)| i as u8)
    }

    /// Every option currently enabled remotely (the peer is performing it).
    pub fn enabled_remotely(&self) -> impl Iterator<Item = u8> + '_ {
        self.options.iter().enumerate().filter(|(_, e)| e.remote_enabled()).map(|(i, _)| i as u8)
    }
}

/// Bitflag state for a single option, packed into one byte: whether we
/// support it locally/remotely, whether it's currently enabled in each
/// direction, and whether a `WILL`/`DO` we sent is still awaiting a reply.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct Entry(u8);

impl Entry {
    /// We are capable of performing this option (would answer `WILL`).
    const SUPPORT_LOCAL: u8 = 1;
    /// We want the peer to perform this option (would answer `DO`).
    const SUPPORT_REMOTE: u8 = 1 << 1;
    /// We are currently performing this option.
    const LOCAL_STATE: u8 = 1 << 2;
    /// The peer is currently performing this option.
    const REMOTE_STATE: u8 = 1 << 3;
    /// We sent `WILL`/`WONT` and are waiting for `DO`/`DONT`.
    const PENDING_LOCAL: u8 = 1 << 4;
    /// We sent `DO`/`DONT` and are waiting for `WILL`/`WONT`.
    const PENDING_REMOTE: u8 = 1 << 5;

    #[must_use]
    pub fn local_support(self) -> bool {
        self.0 & Self::SUPPORT_LOCAL != 0
    }

    pub fn set_local_support(&mut self) {
        self.0 |= Self::SUPPORT_LOCAL;
    }

    #[must_use]
    pub fn remote_support(self) -> bool {
        self.0 & Self::SUPPORT_REMOTE != 0
    }

    pub fn set_remote_support(&mut self) {
        self.0 |= Self::SUPPORT_REMOTE;
    }

    #[must_use]
    pub fn local_enabled(self) -> bool {
        self.0 & Self::LOCAL_STATE != 0
    }

    pub fn set_local_enabled(&mut self, enabled: bool) {
        if enabled {
            self.0 |= Self::LOCAL_STATE;
        } else {
            self.0 &= !Self::LOCAL_STATE;
        }
    }

    #[must_use]
    pub fn remote_enabled(self) -> bool {
        self.0 & Self::REMOTE_STATE != 0
    }

    pub fn set_remote_enabled(&mut self, enabled: bool) {
        if enabled {
            self.0 |= Self::REMOTE_STATE;
        } else {
            self.0 &= !Self::REMOTE_STATE;
        }
    }

    #[must_use]
    pub fn local_pending(self) -> bool {
        self.0 & Self::PENDING_LOCAL != 0
    }

    pub fn set_local_pending(&mut self, pending: bool) {
        if pending {
            self.0 |= Self::PENDING_LOCAL;
        } else {
            self.0 &= !Self::PENDING_LOCAL;
        }
    }

    #[must_use]
    pub fn remote_pending(self) -> bool {
        self.0 & Self::PENDING_REMOTE != 0
    }

    pub fn set_remote_pending(&mut self, pending: bool) {
        if pending {
            self.0 |= Self::PENDING_REMOTE;
        } else {
            self.0 &= !Self::PENDING_REMOTE;
        }
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("local_support", &self.local_support())
            .field("remote_support", &self.remote_support())
            .field("local_enabled", &self.local_enabled())
            .field("remote_enabled", &self.remote_enabled())
            .field("local_pending", &self.local_pending())
            .field("remote_pending", &self.remote_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_local_and_remote_independently() {
        let mut table = OptionTable::new();
        table.support_local(1);
        table.option_mut(1).set_local_enabled(true);

        assert!(table.option(1).local_support());
        assert!(table.option(1).local_enabled());
        assert!(!table.option(1).remote_enabled());
        assert_eq!(table.enabled_locally().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn pending_flags_clear_independently() {
        let mut table = OptionTable::new();
        let entry = table.option_mut(34);
        entry.set_local_pending(true);
        assert!(entry.local_pending());
        entry.set_local_pending(false);
        assert!(!entry.local_pending());
    }
}
