//! The line-editing session built atop a negotiated [`TelnetStream`].
//!
//! Where `TelnetStream` only tracks option/SLC state, `Session` adds
//! everything a real server needs on top of it: a decoded-text layer (via
//! [`crate::charset`]), kludge-mode (no LINEMODE) character-at-a-time line
//! editing using the peer's Special Linemode Characters, MTTS/TTYPE terminal
//! detection, the NEW-ENVIRON variable map, and the deferred
//! negotiation-completion timer a caller awaits before treating the
//! connection as "ready".

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, trace};

use crate::{
    callbacks::Callbacks,
    charset::{Encoding, IncrementalDecoder},
    constants::{CONNECT_DEFERED_MS, CONNECT_MAXWAIT_MS, CONNECT_MINWAIT_MS},
    env::{EnvironmentKind, EnvironmentOperation},
    error::TelnetError,
    event::TelnetEvent,
    linemode::SlcFunction,
    mtts::{MttsCycle, TerminalProfile},
    names::slc_function_name,
    option::TelnetOption,
    stream::{Role, StreamConfig, TelnetStream},
    subnegotiation::SubnegotiationType,
};

/// A line assembled from individual [`TelnetEvent::Character`]s while the
/// connection is in kludge (character-at-a-time, no LINEMODE) mode.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8>,
    /// `Some(digits)` while accumulating a literal-input sequence opened by
    /// `SLC_LNEXT`; `digits` holds the decimal-code prefix seen so far
    /// (empty until the first digit arrives).
    literal: Option<String>,
}

impl LineBuffer {
    fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Pops the last character, if any. Returns whether a character was
    /// actually removed, so the caller can bell on an empty buffer.
    fn erase_character(&mut self) -> bool {
        self.bytes.pop().is_some()
    }

    /// Erases the trailing run of non-space characters, plus the whitespace
    /// that separates it from the rest of the line. Returns whether anything
    /// was actually removed, so the caller can bell when there was no word to
    /// erase.
    fn erase_word(&mut self) -> bool {
        let start_len = self.bytes.len();
        while matches!(self.bytes.last(), Some(b) if b.is_ascii_whitespace()) {
            self.bytes.pop();
        }
        while matches!(self.bytes.last(), Some(b) if !b.is_ascii_whitespace()) {
            self.bytes.pop();
        }
        self.bytes.len() != start_len
    }

    fn erase_line(&mut self) {
        self.bytes.clear();
    }

    fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

/// Whether `byte` is an ordinary printable NVT character - the range that
/// gets appended to the line buffer verbatim rather than ringing the bell.
fn is_printable(byte: u8) -> bool {
    (0x20..0x7f).contains(&byte)
}

/// Construction-time session knobs layered on top of [`StreamConfig`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub stream: StreamConfig,
    pub encoding: Encoding,
    /// Environment variables requested from the peer once NEW-ENVIRON is
    /// negotiated.
    pub requested_env: Vec<EnvironmentKind>,
    pub connect_defered: Duration,
    pub connect_minwait: Duration,
    pub connect_maxwait: Duration,
    /// When set, any in-band byte (not just the negotiated XON character)
    /// resumes writing while output is paused - the `LFLOW_RESTART_ANY`
    /// convention.
    pub xon_any: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stream: StreamConfig::default(),
            encoding: Encoding::default(),
            requested_env: Vec::new(),
            connect_defered: Duration::from_millis(CONNECT_DEFERED_MS),
            connect_minwait: Duration::from_millis(CONNECT_MINWAIT_MS),
            connect_maxwait: Duration::from_millis(CONNECT_MAXWAIT_MS),
            xon_any: false,
        }
    }
}

/// A negotiated session: the option/SLC engine plus the line-editing and
/// terminal-detection state built on top of it.
pub struct Session {
    stream: TelnetStream,
    callbacks: Callbacks,
    decoder: IncrementalDecoder,
    config: SessionConfig,
    line: LineBuffer,
    mtts: MttsCycle,
    terminal: Option<TerminalProfile>,
    naws: Option<(u16, u16)>,
    env: HashMap<String, Vec<u8>>,
    line_callback: Option<Box<dyn FnMut(&str) + Send>>,
    eor_callback: Option<Box<dyn FnMut(&str) + Send>>,
    xmit: bool,
    flow_callback: Option<Box<dyn FnMut(bool) + Send>>,
    /// Set once the first `TTYPE` reply arrives, gating the one-time
    /// extended option slate below.
    advanced: bool,
    /// The previous in-band character fed to [`Session::feed_character`],
    /// used to collapse a `CR LF` or `CR NUL` pair into a single line
    /// delivery.
    last_char: Option<u8>,
    bell_callback: Option<Box<dyn FnMut() + Send>>,
}

impl Session {
    pub fn new(role: Role, config: SessionConfig) -> Self {
        let mut stream_config = config.stream.clone();
        if stream_config.requested_env.is_empty() {
            stream_config.requested_env = config.requested_env.clone();
        }
        let stream = TelnetStream::new(role, stream_config);
        let decoder = IncrementalDecoder::new(config.encoding);
        Self {
            stream,
            callbacks: Callbacks::new(),
            decoder,
            config,
            xmit: true,
            flow_callback: None,
            advanced: false,
            last_char: None,
            bell_callback: None,
            line: LineBuffer::default(),
            mtts: MttsCycle::new(),
            terminal: None,
            naws: None,
            env: HashMap::new(),
            line_callback: None,
            eor_callback: None,
        }
    }

    pub fn stream(&self) -> &TelnetStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut TelnetStream {
        &mut self.stream
    }

    pub fn terminal_profile(&self) -> Option<&TerminalProfile> {
        self.terminal.as_ref()
    }

    pub fn window_size(&self) -> Option<(u16, u16)> {
        self.naws
    }

    /// Whether the peer is currently allowed to transmit; false after an
    /// `SLC_XOFF`/IAC XOFF until resumed.
    pub fn transmitting(&self) -> bool {
        self.xmit
    }

    /// Registers the closure invoked when flow-control state flips: `true`
    /// for `resume_writing`, `false` for `pause_writing`.
    pub fn set_flow_callback(&mut self, callback: impl FnMut(bool) + Send + 'static) {
        self.flow_callback = Some(Box::new(callback));
    }

    /// Registers the closure invoked to ring the bell: a non-printable
    /// character typed in kludge mode, `SLC_EC` with nothing to erase, or
    /// `SLC_EW` with no word to erase.
    pub fn set_bell_callback(&mut self, callback: impl FnMut() + Send + 'static) {
        self.bell_callback = Some(Box::new(callback));
    }

    fn ring_bell(&mut self) {
        if let Some(callback) = self.bell_callback.as_mut() {
            callback();
        }
    }

    fn resume_writing(&mut self) {
        if !self.xmit {
            self.xmit = true;
            if let Some(callback) = self.flow_callback.as_mut() {
                callback(true);
            }
        }
    }

    fn pause_writing(&mut self) {
        if self.xmit {
            self.xmit = false;
            if let Some(callback) = self.flow_callback.as_mut() {
                callback(false);
            }
        }
    }

    /// Whether the first `TTYPE` reply has arrived and the extended option
    /// slate below has been issued.
    pub fn advanced(&self) -> bool {
        self.advanced
    }

    /// Issues the extended option slate a kludge-mode-only client never
    /// asked for, once the first `TTYPE` reply shows the peer is capable of
    /// more than bare `SGA`/`ECHO`.
    fn request_extended_slate(&mut self) {
        self.stream.request_do(TelnetOption::Linemode);
        self.stream.request_will(TelnetOption::Status);
        self.stream.request_will(TelnetOption::Lflow);
        self.stream.request_do(TelnetOption::NewEnviron);
        self.stream.request_will(TelnetOption::Binary);
        self.stream.request_do(TelnetOption::Binary);
        self.stream.request_do(TelnetOption::Tspeed);
        self.stream.request_do(TelnetOption::Xdisploc);
        self.stream.request_do(TelnetOption::Naws);
        self.stream.request_do(TelnetOption::Charset);
        self.stream.request_do(TelnetOption::EndOfRecord);
        self.stream.request_do(TelnetOption::Sndloc);
    }

    pub fn environment(&self) -> &HashMap<String, Vec<u8>> {
        &self.env
    }

    pub fn set_iac_callback(&mut self, command: u8, callback: crate::callbacks::IacCallback) {
        self.callbacks.set_iac_callback(command, callback);
    }

    pub fn set_slc_callback(&mut self, function: SlcFunction, callback: crate::callbacks::SlcCallback) {
        self.callbacks.set_slc_callback(function, callback);
    }

    pub fn set_ext_callback(&mut self, option: TelnetOption, callback: crate::callbacks::ExtCallback) {
        self.callbacks.set_ext_callback(option, callback);
    }

    /// Registers the closure invoked with a completed, decoded line of
    /// input - either a full `Message` from the codec's line-buffered mode,
    /// or a line assembled from kludge-mode character editing.
    pub fn set_line_callback(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.line_callback = Some(Box::new(callback));
    }

    /// Registers the closure invoked when `IAC EOR` delivers the current
    /// line as a prompt record rather than an ordinary newline-terminated
    /// line.
    pub fn set_eor_callback(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.eor_callback = Some(Box::new(callback));
    }

    /// Every outbound event queued by the negotiation engine since the last
    /// call - hand these to the codec/transport to write.
    pub fn drain_outbound(&mut self) -> Vec<TelnetEvent> {
        self.stream.drain_outbound()
    }

    /// Feeds one event decoded off the wire. Only a [`TelnetError::RoleViolation`]
    /// ever escapes this call; everything else is absorbed into session state.
    pub fn feed(&mut self, event: TelnetEvent) -> Result<(), TelnetError> {
        match event {
            TelnetEvent::Character(byte) if self.stream.discarding_input() => {
                trace!(byte, "dropping inband byte pending DO TM reply");
            }
            TelnetEvent::Character(byte) => self.feed_character(byte),
            TelnetEvent::Message(text) => self.complete_line(text.into_bytes()),
            other => {
                for produced in self.stream.receive(other)? {
                    self.handle_produced(produced);
                }
            }
        }
        Ok(())
    }

    fn feed_character(&mut self, byte: u8) {
        if !self.xmit && self.config.xon_any {
            self.resume_writing();
        }

        if let Some(digits) = self.line.literal.take() {
            self.feed_literal(digits, byte);
            return;
        }

        if let Some((function, entry)) = self.stream.slc_table().snoop(byte) {
            let function = SlcFunction::from(function);
            trace!(name = slc_function_name(function), "SLC triggered in-band");
            if entry.modifiers.flush_out {
                self.stream.request_will(TelnetOption::TimingMark);
            }
            match function {
                SlcFunction::Ec => {
                    if !self.line.erase_character() {
                        self.ring_bell();
                    }
                }
                SlcFunction::Ew => {
                    if !self.line.erase_word() {
                        self.ring_bell();
                    }
                }
                SlcFunction::El => self.line.erase_line(),
                SlcFunction::Lnext => self.line.literal = Some(String::new()),
                SlcFunction::Xon => self.resume_writing(),
                SlcFunction::Xoff => self.pause_writing(),
                SlcFunction::Eof | SlcFunction::Susp | SlcFunction::Ip | SlcFunction::Brk
                | SlcFunction::Ao | SlcFunction::Ayt | SlcFunction::Abort => {
                    self.callbacks.dispatch_slc(function);
                    return;
                }
                _ => {}
            }
            self.callbacks.dispatch_slc(function);
            return;
        }

        // A CR immediately followed by LF or NUL is one line terminator, not
        // two - the trailing byte is swallowed rather than starting a new,
        // empty line.
        let after_cr = self.last_char == Some(crate::constants::CR);
        self.last_char = Some(byte);
        if after_cr && (byte == crate::constants::LF || byte == crate::constants::NULL) {
            return;
        }

        if byte == crate::constants::CR || byte == crate::constants::LF {
            let bytes = self.line.take();
            self.complete_line(bytes);
            return;
        }

        if !is_printable(byte) {
            self.ring_bell();
            return;
        }

        self.line.push(byte);
    }

    /// Consumes one byte while literal-input mode (opened by `SLC_LNEXT`) is
    /// active. Control characters and printable characters are taken
    /// verbatim; decimal digits accumulate into a character code, capped at
    /// 255, until three digits have arrived or the value would exceed 255.
    fn feed_literal(&mut self, mut digits: String, byte: u8) {
        if byte < 0x20 {
            self.flush_literal_digits(&digits);
            self.line.push(byte);
            return;
        }

        if byte.is_ascii_digit() {
            digits.push(byte as char);
            let value: u16 = digits.parse().expect("ascii digits only");
            if value >= 255 || digits.len() == 3 {
                self.line.push(value.min(255) as u8);
            } else {
                self.line.literal = Some(digits);
            }
            return;
        }

        self.flush_literal_digits(&digits);
        if byte != crate::constants::CR && byte != crate::constants::LF {
            self.line.push(byte);
        }
    }

    fn flush_literal_digits(&mut self, digits: &str) {
        if digits.is_empty() {
            return;
        }
        if let Ok(value) = digits.parse::<u16>() {
            self.line.push(value.min(255) as u8);
        }
    }

    fn complete_line(&mut self, bytes: Vec<u8>) {
        let text = self.decoder.decode(&bytes);
        debug!(len = text.len(), "line received");
        if let Some(callback) = self.line_callback.as_mut() {
            callback(&text);
        }
    }

    fn handle_produced(&mut self, event: TelnetEvent) {
        match &event {
            TelnetEvent::EndOfRecord => {
                let bytes = self.line.take();
                let text = self.decoder.decode(&bytes);
                debug!(len = text.len(), "line delivered at end-of-record");
                if let Some(callback) = self.eor_callback.as_mut() {
                    callback(&text);
                } else if let Some(callback) = self.line_callback.as_mut() {
                    callback(&text);
                }
            }
            TelnetEvent::Subnegotiate(SubnegotiationType::WindowSize(width, height)) => {
                self.naws = Some((*width, *height));
            }
            TelnetEvent::Subnegotiate(SubnegotiationType::Ttype(name)) => {
                let index = self.mtts.reply_count();
                self.env.insert(format!("TTYPE{index}"), name.clone().into_bytes());
                if index == 1 && !name.to_ascii_uppercase().starts_with("MTTS ") {
                    self.env.insert("TERM".to_string(), name.clone().into_bytes());
                }

                if index == 0 && !self.advanced {
                    self.advanced = true;
                    self.request_extended_slate();
                }

                self.mtts.record(name.clone());
                if self.mtts.should_continue() {
                    self.stream.request_ttype();
                } else {
                    self.terminal = Some(self.mtts.profile());
                }
            }
            TelnetEvent::Subnegotiate(SubnegotiationType::CharsetRequest(charsets)) => {
                if let Some(encoding) =
                    charsets.iter().find_map(|c| Encoding::from_name(c))
                {
                    self.decoder.set_encoding(encoding);
                }
            }
            TelnetEvent::Subnegotiate(SubnegotiationType::Environment(
                EnvironmentOperation::Is(vars) | EnvironmentOperation::Info(vars),
            )) => {
                for (kind, value) in vars {
                    if let (Some(name), Some(value)) = (kind.name(), value) {
                        self.env.insert(name, value.clone());
                    }
                }
            }
            _ => {}
        }

        if let Some(option) = ext_option_for(&event) {
            self.callbacks.dispatch_ext(option, &event);
        }

        if let TelnetEvent::AreYouThere
        | TelnetEvent::InterruptProcess
        | TelnetEvent::AbortOutput
        | TelnetEvent::Break
        | TelnetEvent::EndOfFile
        | TelnetEvent::Suspend
        | TelnetEvent::Abort
        | TelnetEvent::EndOfRecord = &event
        {
            self.callbacks.dispatch_iac(u8::from(&event));
        }
    }

    /// Awaits until option negotiation has settled: every option we asked
    /// the peer about has answered, for at least `connect_minwait`, or
    /// `connect_maxwait` has elapsed regardless.
    pub async fn await_negotiation_settled(&self) {
        let deadline = tokio::time::Instant::now() + self.config.connect_maxwait;
        let mut settled_since: Option<tokio::time::Instant> = None;

        loop {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return;
            }

            let settled = !self.has_pending_negotiation();
            if settled {
                let since = *settled_since.get_or_insert(now);
                if now.saturating_duration_since(since) >= self.config.connect_minwait {
                    return;
                }
            } else {
                settled_since = None;
            }

            tokio::time::sleep(self.config.connect_defered).await;
        }
    }

    fn has_pending_negotiation(&self) -> bool {
        (0u16..256).any(|byte| {
            let entry = self.stream.options().option(byte as u8);
            entry.local_pending() || entry.remote_pending()
        })
    }
}

fn ext_option_for(event: &TelnetEvent) -> Option<TelnetOption> {
    match event {
        TelnetEvent::Subnegotiate(SubnegotiationType::WindowSize(_, _)) => Some(TelnetOption::Naws),
        TelnetEvent::Subnegotiate(SubnegotiationType::Ttype(_) | SubnegotiationType::TtypeSend) => {
            Some(TelnetOption::Ttype)
        }
        TelnetEvent::Subnegotiate(SubnegotiationType::Tspeed(_, _) | SubnegotiationType::TspeedSend) => {
            Some(TelnetOption::Tspeed)
        }
        TelnetEvent::Subnegotiate(
            SubnegotiationType::Xdisploc(_) | SubnegotiationType::XdislocSend,
        ) => Some(TelnetOption::Xdisploc),
        TelnetEvent::Subnegotiate(SubnegotiationType::Sndloc(_) | SubnegotiationType::SndlocSend) => {
            Some(TelnetOption::Sndloc)
        }
        TelnetEvent::Subnegotiate(SubnegotiationType::Environment(_)) => {
            Some(TelnetOption::NewEnviron)
        }
        TelnetEvent::Subnegotiate(
            SubnegotiationType::CharsetRequest(_)
            | SubnegotiationType::CharsetAccepted(_)
            | SubnegotiationType::CharsetRejected
            | SubnegotiationType::CharsetTTableRejected,
        ) => Some(TelnetOption::Charset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut session = Session::new(Role::Server, SessionConfig::default());
        session.stream_mut().support_local(TelnetOption::Echo);
        session
    }

    #[test]
    fn kludge_mode_erase_character_edits_the_buffer() {
        let mut session = session();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_line_callback(move |line| *seen_clone.lock().unwrap() = line.to_string());

        for byte in b"helly" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        // erase the trailing 'y', then finish the word and line
        session.feed(TelnetEvent::Character(0x7f)).unwrap();
        for byte in b"o" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*seen.lock().unwrap(), "hello");
    }

    fn collect_lines(session: &mut Session) -> std::sync::Arc<std::sync::Mutex<Vec<String>>> {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_line_callback(move |line| seen_clone.lock().unwrap().push(line.to_string()));
        seen
    }

    #[test]
    fn bare_cr_delivers_exactly_one_line() {
        let mut session = session();
        let seen = collect_lines(&mut session);

        for byte in b"hi" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::CR)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["hi".to_string()]);
    }

    #[test]
    fn bare_lf_delivers_exactly_one_line() {
        let mut session = session();
        let seen = collect_lines(&mut session);

        for byte in b"hi" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["hi".to_string()]);
    }

    #[test]
    fn cr_lf_delivers_exactly_one_line() {
        let mut session = session();
        let seen = collect_lines(&mut session);

        for byte in b"hi" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::CR)).unwrap();
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["hi".to_string()]);
    }

    #[test]
    fn cr_nul_delivers_exactly_one_line_and_does_not_corrupt_the_next() {
        let mut session = session();
        let seen = collect_lines(&mut session);

        for byte in b"hi" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::CR)).unwrap();
        session.feed(TelnetEvent::Character(crate::constants::NULL)).unwrap();

        for byte in b"there" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["hi".to_string(), "there".to_string()]);
    }

    #[test]
    fn erase_character_on_empty_buffer_rings_bell() {
        let mut session = session();
        let rings = std::sync::Arc::new(std::sync::Mutex::new(0));
        let rings_clone = std::sync::Arc::clone(&rings);
        session.set_bell_callback(move || *rings_clone.lock().unwrap() += 1);

        session.feed(TelnetEvent::Character(0x7f)).unwrap(); // DEL, SLC_EC, buffer is empty

        assert_eq!(*rings.lock().unwrap(), 1);
    }

    #[test]
    fn erase_word_with_nothing_to_erase_rings_bell() {
        let mut session = session();
        let rings = std::sync::Arc::new(std::sync::Mutex::new(0));
        let rings_clone = std::sync::Arc::clone(&rings);
        session.set_bell_callback(move || *rings_clone.lock().unwrap() += 1);

        session.feed(TelnetEvent::Character(0x17)).unwrap(); // ^W, SLC_EW, buffer is empty

        assert_eq!(*rings.lock().unwrap(), 1);
    }

    #[test]
    fn non_printable_character_rings_bell_instead_of_buffering() {
        let mut session = session();
        let seen = collect_lines(&mut session);
        let rings = std::sync::Arc::new(std::sync::Mutex::new(0));
        let rings_clone = std::sync::Arc::clone(&rings);
        session.set_bell_callback(move || *rings_clone.lock().unwrap() += 1);

        session.feed(TelnetEvent::Character(0x07)).unwrap(); // BEL is not an assigned SLC byte here
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*rings.lock().unwrap(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
    }

    #[test]
    fn literal_next_decimal_code_emits_single_byte() {
        let mut session = session();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_line_callback(move |line| *seen_clone.lock().unwrap() = line.as_bytes().to_vec());

        session.feed(TelnetEvent::Character(0x16)).unwrap(); // ^V, SLC_LNEXT
        for byte in b"065" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*seen.lock().unwrap(), b"A"); // decimal 65 == 'A'
    }

    #[test]
    fn literal_next_printable_is_taken_verbatim() {
        let mut session = session();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_line_callback(move |line| *seen_clone.lock().unwrap() = line.as_bytes().to_vec());

        session.feed(TelnetEvent::Character(0x16)).unwrap(); // ^V, SLC_LNEXT
        session.feed(TelnetEvent::Character(b'x')).unwrap();
        session.feed(TelnetEvent::Character(crate::constants::LF)).unwrap();

        assert_eq!(*seen.lock().unwrap(), b"x");
    }

    #[test]
    fn xoff_then_xon_pauses_and_resumes_writing() {
        let mut session = session();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_flow_callback(move |resumed| seen_clone.lock().unwrap().push(resumed));

        session.feed(TelnetEvent::Character(0x13)).unwrap(); // ^S, SLC_XOFF
        assert!(!session.transmitting());
        session.feed(TelnetEvent::Character(0x11)).unwrap(); // ^Q, SLC_XON
        assert!(session.transmitting());

        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn xon_any_resumes_writing_on_any_byte() {
        let mut session = Session::new(Role::Server, SessionConfig { xon_any: true, ..SessionConfig::default() });
        session.stream_mut().support_local(TelnetOption::Echo);

        session.feed(TelnetEvent::Character(0x13)).unwrap(); // ^S, SLC_XOFF
        assert!(!session.transmitting());
        session.feed(TelnetEvent::Character(b'x')).unwrap();
        assert!(session.transmitting());
    }

    #[test]
    fn first_ttype_reply_issues_extended_option_slate() {
        let mut session = session();
        session
            .feed(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype("XTERM".to_string())))
            .unwrap();

        assert!(session.advanced());
        let queued = session.drain_outbound();
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Linemode)));
        assert!(queued.contains(&TelnetEvent::Will(TelnetOption::Status)));
        assert!(queued.contains(&TelnetEvent::Will(TelnetOption::Lflow)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::NewEnviron)));
        assert!(queued.contains(&TelnetEvent::Will(TelnetOption::Binary)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Binary)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Tspeed)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Xdisploc)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Naws)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Charset)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::EndOfRecord)));
        assert!(queued.contains(&TelnetEvent::Do(TelnetOption::Sndloc)));
    }

    #[test]
    fn mtts_cycle_stops_on_repeat() {
        let mut session = session();
        session
            .feed(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype("ANSI".to_string())))
            .unwrap();
        session
            .feed(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype("ANSI".to_string())))
            .unwrap();
        assert_eq!(session.terminal_profile().unwrap().terminal_type.as_deref(), Some("ANSI"));
    }

    #[test]
    fn ttype_cycle_populates_ttype0_and_term_env_entries() {
        let mut session = session();
        session
            .feed(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype("XTERM".to_string())))
            .unwrap();
        session
            .feed(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype(
                "xterm-256color".to_string(),
            )))
            .unwrap();
        session
            .feed(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype("MTTS 41".to_string())))
            .unwrap();

        assert_eq!(session.environment().get("TTYPE0"), Some(&b"XTERM".to_vec()));
        assert_eq!(session.environment().get("TERM"), Some(&b"xterm-256color".to_vec()));
        let profile = session.terminal_profile().unwrap();
        assert!(profile.is_ansi());
        assert_eq!(profile.mtts, 41);
    }

    #[test]
    fn naws_updates_window_size() {
        let mut session = session();
        session.feed(TelnetEvent::Subnegotiate(SubnegotiationType::WindowSize(80, 24))).unwrap();
        assert_eq!(session.window_size(), Some((80, 24)));
    }

    #[test]
    fn server_propagates_role_violation() {
        let mut session = session();
        let result = session.feed(TelnetEvent::Subnegotiate(SubnegotiationType::Environment(
            EnvironmentOperation::Send(Vec::new()),
        )));
        assert!(matches!(result, Err(TelnetError::RoleViolation(_))));
    }

    #[test]
    fn data_mark_requests_timing_mark_and_discards_inband_bytes() {
        let mut session = session();
        session.feed(TelnetEvent::DataMark).unwrap();

        assert!(session.stream().options().option(TelnetOption::TimingMark.into()).remote_pending());
        assert!(session.drain_outbound().contains(&TelnetEvent::Do(TelnetOption::TimingMark)));
        assert!(session.stream.discarding_input());

        let seen = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_line_callback(move |line| *seen_clone.lock().unwrap() = line.to_string());

        for byte in b"hello\n" {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), "", "bytes received while TM is pending must be dropped");
    }

    #[test]
    fn end_of_record_flushes_the_line_via_the_eor_callback() {
        let mut session = session();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
        let seen_clone = std::sync::Arc::clone(&seen);
        session.set_eor_callback(move |line| *seen_clone.lock().unwrap() = line.to_string());

        for byte in b"prompt> " {
            session.feed(TelnetEvent::Character(*byte)).unwrap();
        }
        session.feed(TelnetEvent::EndOfRecord).unwrap();

        assert_eq!(*seen.lock().unwrap(), "prompt> ");
    }

    #[test]
    fn slc_flushout_character_requests_will_timing_mark() {
        let mut session = session();
        // ^C is SLC_IP in the BSD default table, which carries FLUSHOUT.
        session.feed(TelnetEvent::Character(0x03)).unwrap();

        assert!(session.stream().options().option(TelnetOption::TimingMark.into()).local_pending());
        assert!(session.drain_outbound().contains(&TelnetEvent::Will(TelnetOption::TimingMark)));
    }
}
