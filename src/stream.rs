//! The synchronous, transport-agnostic Telnet option-negotiation engine.
//!
//! [`TelnetStream`] owns no socket and does no I/O: it is fed [`TelnetEvent`]s
//! decoded off the wire by [`crate::codec::TelnetCodec`] (or any other
//! source), updates its [`OptionTable`]/[`SlcTable`] bookkeeping, and queues
//! the events that should be written back. [`crate::session::Session`] drives
//! it and adds line editing on top.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::{
    constants::{BINARY, SLC_MAXSIZE},
    env::EnvironmentOperation,
    error::TelnetError,
    event::TelnetEvent,
    forwardmask::{Forwardmask, ForwardMaskOption},
    linemode::{Dispatch, LinemodeDescriptor, SlcEntry, SlcReconcileOutcome, SlcTable},
    option::TelnetOption,
    optiontable::OptionTable,
    subnegotiation::{LineModeOption, StatusEntry, SubnegotiationType},
};

/// Which side of the connection a [`TelnetStream`] is playing.
///
/// Only [`Role::Server`] behavior is required by this crate; [`Role::Client`]
/// exists so the option table and role-violation checks are not hardcoded,
/// matching the reference server this engine is modeled on, which is also
/// parameterized by role even though it only ever runs as a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

/// Construction-time knobs for a [`TelnetStream`]: which SLC tabset to start
/// from and the default LINEMODE mode byte to advertise.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub max_sb_size: usize,
    pub max_slc_size: usize,
    pub linemode: LinemodeDescriptor,
    pub slc_table: SlcTable,
    /// Variable names requested from the peer once it agrees (`WILL
    /// NEW-ENVIRON`) to report its environment.
    pub requested_env: Vec<crate::env::EnvironmentKind>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_sb_size: crate::constants::SB_MAXSIZE,
            max_slc_size: SLC_MAXSIZE,
            linemode: LinemodeDescriptor::default(),
            slc_table: SlcTable::bsd(),
            requested_env: Vec::new(),
        }
    }
}

/// The option/SLC negotiation engine. Feed it decoded [`TelnetEvent`]s with
/// [`TelnetStream::receive`]; drain the events it wants written back to the
/// peer with [`TelnetStream::drain_outbound`].
pub struct TelnetStream {
    role: Role,
    config: StreamConfig,
    options: OptionTable,
    slc: SlcTable,
    linemode: LinemodeDescriptor,
    forwardmask: Option<Forwardmask>,
    outbound: VecDeque<TelnetEvent>,
}

impl TelnetStream {
    pub fn new(role: Role, config: StreamConfig) -> Self {
        let slc = config.slc_table;
        let linemode = config.linemode;
        Self {
            role,
            config,
            options: OptionTable::new(),
            slc,
            linemode,
            forwardmask: None,
            outbound: VecDeque::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub fn slc_table(&self) -> &SlcTable {
        &self.slc
    }

    pub fn forwardmask(&self) -> Option<&Forwardmask> {
        self.forwardmask.as_ref()
    }

    /// Declares that we are able to perform `option` ourselves.
    pub fn support_local(&mut self, option: TelnetOption) {
        self.options.support_local(option.into());
    }

    /// Declares that we expect the peer to perform `option`.
    pub fn support_remote(&mut self, option: TelnetOption) {
        self.options.support_remote(option.into());
    }

    fn queue(&mut self, event: TelnetEvent) {
        self.outbound.push_back(event);
    }

    /// Removes and returns every event queued for the peer since the last
    /// call. The caller (codec or session) is responsible for writing these.
    pub fn drain_outbound(&mut self) -> Vec<TelnetEvent> {
        self.outbound.drain(..).collect()
    }

    /// Initiates negotiation of `option` as something we want to perform.
    /// No-op if we have already announced `WILL` and are waiting on a reply.
    pub fn request_will(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);
        if entry.local_enabled() || entry.local_pending() {
            return;
        }
        entry.set_local_pending(true);
        self.queue(TelnetEvent::Will(option));
    }

    pub fn request_wont(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);
        if !entry.local_enabled() && !entry.local_pending() {
            return;
        }
        entry.set_local_pending(true);
        entry.set_local_enabled(false);
        self.queue(TelnetEvent::Wont(option));
    }

    /// Initiates negotiation requesting the peer perform `option`.
    pub fn request_do(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);
        if entry.remote_enabled() || entry.remote_pending() {
            return;
        }
        entry.set_remote_pending(true);
        self.queue(TelnetEvent::Do(option));
    }

    pub fn request_dont(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);
        if !entry.remote_enabled() && !entry.remote_pending() {
            return;
        }
        entry.set_remote_pending(true);
        entry.set_remote_enabled(false);
        self.queue(TelnetEvent::Dont(option));
    }

    /// Feeds one decoded [`TelnetEvent`] into the engine. Returns any
    /// higher-level events the caller (typically `Session`) should act on -
    /// this is usually the same event handed in, but subnegotiations may be
    /// consumed entirely (e.g. a LINEMODE SLC exchange) or rejected outright
    /// for violating the negotiated role.
    pub fn receive(&mut self, event: TelnetEvent) -> Result<Vec<TelnetEvent>, TelnetError> {
        match event {
            TelnetEvent::Do(option) => {
                self.handle_do(option);
                Ok(Vec::new())
            }
            TelnetEvent::Dont(option) => {
                self.handle_dont(option);
                Ok(Vec::new())
            }
            TelnetEvent::Will(option) => {
                self.handle_will(option);
                Ok(Vec::new())
            }
            TelnetEvent::Wont(option) => {
                self.handle_wont(option);
                Ok(Vec::new())
            }
            TelnetEvent::Subnegotiate(sub) => self.handle_subnegotiation(sub),
            TelnetEvent::DataMark => {
                self.handle_data_mark();
                Ok(Vec::new())
            }
            other => Ok(vec![other]),
        }
    }

    /// `IAC DM` marks the data position of a TCP urgent-data ("synch")
    /// event. This engine does not implement urgent-data discarding at the
    /// socket layer; it only recognizes the marker and, per RFC 860, replies
    /// `IAC DO TM` once. Until the peer answers with `WILL TM`/`WONT TM`,
    /// [`TelnetStream::discarding_input`] reports true so the caller can
    /// silently drop inband bytes in the meantime.
    fn handle_data_mark(&mut self) {
        debug!("received DATA-MARK");
        self.request_do(TelnetOption::TimingMark);
    }

    /// True while a `DO TM` we sent is still unanswered - inband bytes
    /// arriving in this window should be silently dropped rather than
    /// treated as ordinary data.
    pub fn discarding_input(&self) -> bool {
        self.options.option(TelnetOption::TimingMark.into()).remote_pending()
    }

    /// RFC 1143 Q-method bookkeeping for a received `WILL`: the peer proposes
    /// to start performing an option locally (on its side).
    fn handle_will(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);

        if entry.remote_enabled() {
            return; // already on, ignore per RFC 1143
        }

        if entry.remote_pending() {
            entry.set_remote_pending(false);
            entry.set_remote_enabled(true);
            debug!(?option, "peer confirmed WILL");
        } else if entry.remote_support() {
            entry.set_remote_enabled(true);
            self.queue(TelnetEvent::Do(option));
            debug!(?option, "agreeing to peer's WILL");
        } else {
            self.queue(TelnetEvent::Dont(option));
            trace!(?option, "refusing unsupported WILL");
        }

        if !self.options.option(byte).remote_enabled() {
            return;
        }

        // Several options get an immediate follow-up subnegotiation the
        // moment the peer agrees to perform them, rather than waiting for
        // the application layer to ask.
        match option {
            TelnetOption::Linemode => self.begin_linemode_negotiation(),
            TelnetOption::Status => self.request_status(),
            TelnetOption::Lflow => {
                self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::Lflow(
                    crate::constants::LFLOW_RESTART_ANY,
                )));
            }
            TelnetOption::NewEnviron if !self.config.requested_env.is_empty() => {
                self.request_environment(self.config.requested_env.clone());
            }
            TelnetOption::Charset => self.request_charset(),
            TelnetOption::Xdisploc => self.request_xdisploc(),
            TelnetOption::Ttype => self.request_ttype(),
            TelnetOption::Tspeed => self.request_tspeed(),
            _ => {}
        }
    }

    fn handle_wont(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);
        let was_enabled = entry.remote_enabled();

        if entry.remote_pending() {
            entry.set_remote_pending(false);
            entry.set_remote_enabled(false);
        } else if was_enabled {
            entry.set_remote_enabled(false);
            self.queue(TelnetEvent::Dont(option));
        }
        debug!(?option, "peer stopped performing option");
    }

    /// RFC 1143 bookkeeping for a received `DO`: the peer asks us to start
    /// performing an option ourselves.
    fn handle_do(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);

        if entry.local_enabled() {
            return;
        }

        if entry.local_pending() {
            entry.set_local_pending(false);
            entry.set_local_enabled(true);
            debug!(?option, "peer confirmed our WILL");
        } else if entry.local_support() {
            entry.set_local_enabled(true);
            self.queue(TelnetEvent::Will(option));
            debug!(?option, "agreeing to peer's DO");
        } else {
            self.queue(TelnetEvent::Wont(option));
            trace!(?option, "refusing unsupported DO");
        }

        match option {
            TelnetOption::Status if self.options.option(byte).local_enabled() => {
                // A peer asking us to perform STATUS expects to see our
                // current negotiated state right away, not just the WILL.
                let status = self.send_status();
                self.queue(TelnetEvent::Subnegotiate(status));
            }
            _ => {}
        }
    }

    fn handle_dont(&mut self, option: TelnetOption) {
        let byte = option.into();
        let entry = self.options.option_mut(byte);
        let was_enabled = entry.local_enabled();

        if entry.local_pending() {
            entry.set_local_pending(false);
            entry.set_local_enabled(false);
        } else if was_enabled {
            entry.set_local_enabled(false);
            self.queue(TelnetEvent::Wont(option));
        }
        debug!(?option, "peer refused option locally");
    }

    fn begin_linemode_negotiation(&mut self) {
        self.request_linemode_mode();

        let triples: Vec<(Dispatch, char)> = self
            .slc
            .supported()
            .map(|(func, entry)| {
                let modifiers: u8 = entry.modifiers.into();
                let dispatch = Dispatch::from((func, modifiers));
                (dispatch, entry.value as char)
            })
            .collect();
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(LineModeOption::SLC(
            triples,
        ))));
    }

    fn handle_subnegotiation(
        &mut self,
        sub: SubnegotiationType,
    ) -> Result<Vec<TelnetEvent>, TelnetError> {
        match sub {
            SubnegotiationType::LineMode(option) => {
                self.handle_linemode(option);
                Ok(Vec::new())
            }
            SubnegotiationType::Environment(op) => self.handle_environment(op),
            SubnegotiationType::StatusSend => {
                let status = self.send_status();
                self.queue(TelnetEvent::Subnegotiate(status));
                Ok(Vec::new())
            }
            other => Ok(vec![TelnetEvent::Subnegotiate(other)]),
        }
    }

    fn handle_linemode(&mut self, option: LineModeOption) {
        match option {
            LineModeOption::Mode(mode) => {
                self.linemode = LinemodeDescriptor::from(mode);
                if !self.linemode.ack() {
                    let acked = LinemodeDescriptor::new(
                        mode | crate::constants::LINEMODE_ACK,
                    );
                    self.linemode = acked;
                    self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(
                        LineModeOption::Mode(acked.as_byte()),
                    )));
                }
            }
            LineModeOption::SLC(triples) => {
                let mut reply_size = 0usize;
                let mut replies = Vec::new();
                for (dispatch, value) in triples {
                    let func: u8 = dispatch.function.into();
                    let entry = SlcEntry::from((dispatch.modifiers.into(), value as u8));

                    match self.slc.reconcile(func, entry) {
                        SlcReconcileOutcome::None => {}
                        SlcReconcileOutcome::ResendDefaults => {
                            self.slc = SlcTable::bsd();
                            replies = self
                                .slc
                                .supported()
                                .map(|(f, e)| {
                                    (Dispatch::from((f, e.modifiers.into())), e.value as char)
                                })
                                .collect();
                            break;
                        }
                        SlcReconcileOutcome::ResendCurrent => {
                            replies = self
                                .slc
                                .supported()
                                .map(|(f, e)| {
                                    (Dispatch::from((f, e.modifiers.into())), e.value as char)
                                })
                                .collect();
                            break;
                        }
                        SlcReconcileOutcome::Reply(f, e) => {
                            reply_size += 3;
                            if reply_size > self.config.max_slc_size {
                                warn!(max = self.config.max_slc_size, "SLC reply buffer overflow");
                                break;
                            }
                            replies.push((Dispatch::from((f, e.modifiers.into())), e.value as char));
                        }
                    }
                }

                if !replies.is_empty() {
                    self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(
                        LineModeOption::SLC(replies),
                    )));
                }

                self.request_forwardmask();
            }
            LineModeOption::ForwardMask(ForwardMaskOption::Will | ForwardMaskOption::Wont) => {}
            LineModeOption::ForwardMask(ForwardMaskOption::Do(mask)) => {
                // The peer only legitimately sends us a forward mask if we
                // asked for one; we don't request one from the peer, so
                // treat this as informational only.
                self.forwardmask = Some(mask);
            }
            LineModeOption::ForwardMask(_) => {}
            LineModeOption::Unknown(_, _) => {}
        }
    }

    fn binary_mode(&self) -> bool {
        self.options.option(BINARY).local_enabled() || self.options.option(BINARY).remote_enabled()
    }

    fn handle_environment(
        &mut self,
        op: EnvironmentOperation,
    ) -> Result<Vec<TelnetEvent>, TelnetError> {
        match op {
            EnvironmentOperation::Send(_) if self.role == Role::Server => {
                Err(TelnetError::RoleViolation(
                    "server received NEW-ENVIRON SEND, which only a server may send".to_string(),
                ))
            }
            other => Ok(vec![TelnetEvent::Subnegotiate(SubnegotiationType::Environment(other))]),
        }
    }

    /// Requests the peer's terminal type via `IAC SB TTYPE SEND`.
    pub fn request_ttype(&mut self) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::TtypeSend));
    }

    pub fn request_tspeed(&mut self) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::TspeedSend));
    }

    pub fn request_xdisploc(&mut self) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::XdislocSend));
    }

    pub fn request_sndloc(&mut self) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::SndlocSend));
    }

    pub fn request_status(&mut self) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::StatusSend));
    }

    /// Intentionally a no-op: a peer-initiated `CHARSET REQUEST` is answered
    /// elsewhere, but this engine never initiates one itself. Kept as a
    /// named method so the public surface lists a `request_*()` helper
    /// alongside the other options, even though CHARSET has nothing to send
    /// until the peer asks first.
    pub fn request_charset(&mut self) {}

    pub fn request_environment(&mut self, vars: Vec<crate::env::EnvironmentKind>) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::Environment(
            EnvironmentOperation::Send(vars),
        )));
    }

    /// Re-sends our current LINEMODE mode byte to the peer.
    pub fn request_linemode_mode(&mut self) {
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(
            LineModeOption::Mode(self.linemode.as_byte()),
        )));
    }

    /// Re-derives and re-sends our forward mask from the live SLC table.
    pub fn request_forwardmask(&mut self) {
        let forwardmask = self.slc.forwardmask(self.binary_mode(), false);
        self.forwardmask = Some(forwardmask.clone());
        self.queue(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(
            LineModeOption::ForwardMask(ForwardMaskOption::Do(forwardmask)),
        )));
    }

    /// Builds an `IAC SB STATUS IS ...` report of every option we have an
    /// opinion about, in the order: options we are performing/refusing
    /// locally, then options we expect/don't expect the peer to perform.
    fn send_status(&self) -> SubnegotiationType {
        let mut entries = Vec::new();
        for byte in [
            TelnetOption::Echo, TelnetOption::SuppressGoAhead, TelnetOption::Naws,
            TelnetOption::Linemode, TelnetOption::Ttype, TelnetOption::Tspeed,
            TelnetOption::Xdisploc, TelnetOption::NewEnviron, TelnetOption::Sndloc,
            TelnetOption::Charset, TelnetOption::Binary, TelnetOption::Lflow,
            TelnetOption::TimingMark, TelnetOption::EndOfRecord,
        ] {
            let raw: u8 = byte.into();
            let entry = self.options.option(raw);
            if entry.local_support() || entry.local_enabled() {
                entries.push(StatusEntry::Local(byte, entry.local_enabled()));
            }
            if entry.remote_support() || entry.remote_enabled() {
                entries.push(StatusEntry::Remote(byte, entry.remote_enabled()));
            }
        }
        SubnegotiationType::Status(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> TelnetStream {
        let mut stream = TelnetStream::new(Role::Server, StreamConfig::default());
        stream.support_local(TelnetOption::Echo);
        stream.support_local(TelnetOption::SuppressGoAhead);
        stream.support_remote(TelnetOption::Naws);
        stream
    }

    #[test]
    fn agrees_to_supported_do() {
        let mut stream = server();
        stream.receive(TelnetEvent::Do(TelnetOption::Echo)).unwrap();
        assert!(stream.options().option(TelnetOption::Echo.into()).local_enabled());
        assert_eq!(stream.drain_outbound(), vec![TelnetEvent::Will(TelnetOption::Echo)]);
    }

    #[test]
    fn refuses_unsupported_do() {
        let mut stream = server();
        stream.receive(TelnetEvent::Do(TelnetOption::Binary)).unwrap();
        assert!(!stream.options().option(TelnetOption::Binary.into()).local_enabled());
        assert_eq!(stream.drain_outbound(), vec![TelnetEvent::Wont(TelnetOption::Binary)]);
    }

    #[test]
    fn does_not_resend_will_once_enabled() {
        let mut stream = server();
        stream.receive(TelnetEvent::Do(TelnetOption::Echo)).unwrap();
        stream.drain_outbound();
        stream.request_will(TelnetOption::Echo);
        assert!(stream.drain_outbound().is_empty());
    }

    #[test]
    fn completes_request_will_round_trip() {
        let mut stream = server();
        stream.request_will(TelnetOption::SuppressGoAhead);
        assert_eq!(stream.drain_outbound(), vec![TelnetEvent::Will(TelnetOption::SuppressGoAhead)]);
        stream.receive(TelnetEvent::Do(TelnetOption::SuppressGoAhead)).unwrap();
        assert!(stream.options().option(TelnetOption::SuppressGoAhead.into()).local_enabled());
        assert!(stream.drain_outbound().is_empty());
    }

    #[test]
    fn server_rejects_environ_send() {
        let mut stream = server();
        let result = stream.receive(TelnetEvent::Subnegotiate(SubnegotiationType::Environment(
            EnvironmentOperation::Send(Vec::new()),
        )));
        assert!(matches!(result, Err(TelnetError::RoleViolation(_))));
    }

    #[test]
    fn do_status_queues_will_and_immediate_status_is() {
        let mut stream = server();
        stream.support_local(TelnetOption::Status);
        stream.receive(TelnetEvent::Do(TelnetOption::Status)).unwrap();
        let out = stream.drain_outbound();
        assert_eq!(out[0], TelnetEvent::Will(TelnetOption::Status));
        assert!(matches!(
            out[1],
            TelnetEvent::Subnegotiate(SubnegotiationType::Status(_))
        ));
    }

    #[test]
    fn status_send_queues_status_is() {
        let mut stream = server();
        stream.receive(TelnetEvent::Do(TelnetOption::Echo)).unwrap();
        stream.drain_outbound();
        stream.receive(TelnetEvent::Subnegotiate(SubnegotiationType::StatusSend)).unwrap();
        let out = stream.drain_outbound();
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            TelnetEvent::Subnegotiate(SubnegotiationType::Status(_))
        ));
    }

    #[test]
    fn linemode_slc_negotiation_yields_forwardmask() {
        let mut stream = server();
        stream.support_remote(TelnetOption::Linemode);
        stream.receive(TelnetEvent::Will(TelnetOption::Linemode)).unwrap();
        stream.drain_outbound();

        let func = crate::constants::SLC_EC;
        let dispatch = Dispatch::from((func, crate::constants::SLC_VALUE));
        stream
            .receive(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(LineModeOption::SLC(
                vec![(dispatch, 0x08 as char)],
            ))))
            .unwrap();

        assert!(stream.forwardmask().is_some());
    }

    #[test]
    fn peer_agreeing_to_ttype_triggers_send() {
        let mut stream = server();
        stream.support_remote(TelnetOption::Ttype);
        stream.request_do(TelnetOption::Ttype);
        assert_eq!(stream.drain_outbound(), vec![TelnetEvent::Do(TelnetOption::Ttype)]);

        stream.receive(TelnetEvent::Will(TelnetOption::Ttype)).unwrap();
        assert_eq!(
            stream.drain_outbound(),
            vec![TelnetEvent::Subnegotiate(SubnegotiationType::TtypeSend)]
        );
    }

    #[test]
    fn peer_agreeing_to_new_environ_sends_requested_vars() {
        let mut stream = server();
        stream.support_remote(TelnetOption::NewEnviron);
        stream.config.requested_env = vec![crate::env::EnvironmentKind::WellKnown(Some(
            crate::env::WellKnownVariable::Display,
        ))];
        stream.request_do(TelnetOption::NewEnviron);
        stream.drain_outbound();

        stream.receive(TelnetEvent::Will(TelnetOption::NewEnviron)).unwrap();
        let out = stream.drain_outbound();
        assert_eq!(out.len(), 1);
        assert!(matches!(
            &out[0],
            TelnetEvent::Subnegotiate(SubnegotiationType::Environment(EnvironmentOperation::Send(vars)))
                if vars.len() == 1
        ));
    }

    #[test]
    fn request_forwardmask_resends_without_changing_slc_state() {
        let mut stream = server();
        stream.support_remote(TelnetOption::Linemode);
        stream.receive(TelnetEvent::Will(TelnetOption::Linemode)).unwrap();
        stream.drain_outbound();

        stream.request_forwardmask();
        let out = stream.drain_outbound();
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(LineModeOption::ForwardMask(_)))
        ));
    }

    #[test]
    fn request_charset_is_a_documented_no_op() {
        let mut stream = server();
        stream.request_charset();
        assert!(stream.drain_outbound().is_empty());
    }
}
