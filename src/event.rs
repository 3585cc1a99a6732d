use crate::{
    constants::{
        ABORT_CMD, AO, AYT, BRK, DM, DO, DONT, EC, EL, EOF_CMD, EOR_CMD, GA, IP, NOP, SB,
        SUSP_CMD, WILL, WONT,
    },
    option::TelnetOption,
    subnegotiation::SubnegotiationType,
};

/// Represents all Telnet events supported by this crate.
#[derive(Debug, PartialEq, Eq)]
pub enum TelnetEvent {
    Character(u8),
    Message(String),
    /// A message to be written verbatim, without a trailing CRLF appended.
    RawMessage(String),
    Do(TelnetOption),
    Will(TelnetOption),
    Dont(TelnetOption),
    Wont(TelnetOption),
    Subnegotiate(SubnegotiationType),
    GoAhead,
    Nop,
    /// `IAC EOR` sent as a bare command (as opposed to negotiating the
    /// `TELOPT_EOR` option) - used by MUD and DET clients as a prompt marker.
    EndOfRecord,
    /// Interrupt Process.
    InterruptProcess,
    /// Abort Output.
    AbortOutput,
    /// Are You There.
    AreYouThere,
    /// Erase Character.
    EraseCharacter,
    /// Erase Line.
    EraseLine,
    /// Break.
    Break,
    /// End of file (as sent by some line-mode clients, e.g. ^D).
    EndOfFile,
    /// Suspend process (as sent by some line-mode clients, e.g. ^Z).
    Suspend,
    /// Abort, as a bare IAC command (as opposed to the `SLC_ABORT` function).
    Abort,
    /// Data Mark - marks the data position of a Synch event. Recognized but
    /// urgent-data discarding is not implemented; receiving this replies
    /// `IAC DO TM`.
    DataMark,
}

impl TelnetEvent {
    /// The number of bytes this event occupies in the subnegotiation buffer
    /// it was decoded from. Negotiation and command events are always
    /// decoded whole, so this only meaningfully varies for `Subnegotiate`.
    pub fn len(&self) -> usize {
        match self {
            TelnetEvent::Subnegotiate(sb) => sb.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&TelnetEvent> for u8 {
    fn from(event: &TelnetEvent) -> Self {
        match event {
            TelnetEvent::Message(_) | TelnetEvent::RawMessage(_) => 0x00,
            TelnetEvent::Do(_) => DO,
            TelnetEvent::Will(_) => WILL,
            TelnetEvent::Dont(_) => DONT,
            TelnetEvent::Wont(_) => WONT,
            TelnetEvent::Subnegotiate(_) => SB,
            TelnetEvent::Character(byte) => *byte,
            TelnetEvent::GoAhead => GA,
            TelnetEvent::Nop => NOP,
            TelnetEvent::EndOfRecord => EOR_CMD,
            TelnetEvent::InterruptProcess => IP,
            TelnetEvent::AbortOutput => AO,
            TelnetEvent::AreYouThere => AYT,
            TelnetEvent::EraseCharacter => EC,
            TelnetEvent::EraseLine => EL,
            TelnetEvent::Break => BRK,
            TelnetEvent::EndOfFile => EOF_CMD,
            TelnetEvent::Suspend => SUSP_CMD,
            TelnetEvent::Abort => ABORT_CMD,
            TelnetEvent::DataMark => DM,
        }
    }
}

impl From<TelnetEvent> for u8 {
    fn from(event: TelnetEvent) -> Self {
        u8::from(&event)
    }
}
