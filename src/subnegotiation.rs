use bytes::Bytes;

use crate::constants::{LINEMODE_FORWARD_MASK, LINEMODE_SLC, MODE};
use crate::env::EnvironmentOperation;
use crate::forwardmask::ForwardMaskOption;
use crate::linemode::Dispatch;
use crate::option::TelnetOption;

/// Represents all Telnet subnegotiation events supported by this crate.
#[derive(Debug, PartialEq, Eq)]
pub enum SubnegotiationType {
    /// A subnegotiation for the window size, where the first value is the width
    /// and the second value is the height. The values are in characters.
    WindowSize(u16, u16),
    /// Indicates an intent to begin CHARSET subnegotiation. This can only be
    /// sent after receiving a DO CHARSET after sending a WILL CHARSET (in any
    /// order).
    CharsetRequest(Vec<Bytes>),
    /// Indicates that the receiver has accepted the charset request.
    CharsetAccepted(Bytes),
    /// Indicates that the receiver acknowledges the charset request, but will
    /// not use any of the requested characters.
    CharsetRejected,
    /// Indicates that the receiver acknowledges a TTABLE-IS message, but is
    /// unable to handle it. This will terminate subnegotiation.
    CharsetTTableRejected,
    LineMode(LineModeOption),
    /// `IAC SB NEW-ENVIRON ...` - an IS/SEND/INFO environment variable exchange.
    Environment(EnvironmentOperation),
    /// The client's answer to `IAC DO TTYPE` / `IAC SB TTYPE SEND`.
    Ttype(String),
    /// `IAC SB TSPEED IS <transmit>,<receive>`, both in baud.
    Tspeed(u32, u32),
    /// `IAC SB XDISPLOC IS <host>:<display>`.
    Xdisploc(String),
    /// `IAC SB SNDLOC IS <location>`.
    Sndloc(String),
    /// `IAC SB STATUS IS ...` - the peer's report of its negotiated options.
    Status(Vec<StatusEntry>),
    /// `IAC SB TTYPE SEND` - a request that the peer report its terminal type.
    TtypeSend,
    /// `IAC SB TSPEED SEND` - a request that the peer report its line speed.
    TspeedSend,
    /// `IAC SB XDISPLOC SEND` - a request that the peer report its X display location.
    XdislocSend,
    /// `IAC SB SNDLOC SEND` - a request that the peer report its DET location.
    SndlocSend,
    /// `IAC SB STATUS SEND` - a request that the peer report the status of
    /// every negotiated option.
    StatusSend,
    /// `IAC SB LFLOW <mode>` - informs the peer how XON/XOFF should restart
    /// output (RFC 1372's `LFLOW_OFF`/`LFLOW_ON`/`LFLOW_RESTART_ANY`/
    /// `LFLOW_RESTART_XON`).
    Lflow(u8),
    /// A subnegotiation for an unknown option.
    Unknown(TelnetOption, Bytes),
}

/// One line of an `IAC SB STATUS IS` report: the reported state of a single
/// option, from the reporting side's point of view.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatusEntry {
    /// We are performing (`WILL`) or refusing (`WONT`) this option locally.
    Local(TelnetOption, bool),
    /// We expect (`DO`) or do not expect (`DONT`) the peer to perform this option.
    Remote(TelnetOption, bool),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LineModeOption {
    Mode(u8),
    SLC(Vec<(Dispatch, char)>),
    ForwardMask(ForwardMaskOption),
    Unknown(u8, Bytes),
}

impl From<u8> for LineModeOption {
    fn from(value: u8) -> Self {
        match value {
            MODE => LineModeOption::Mode(0),
            LINEMODE_SLC => LineModeOption::SLC(Vec::new()),
            LINEMODE_FORWARD_MASK => LineModeOption::ForwardMask(ForwardMaskOption::Unknown(0)),
            _ => LineModeOption::Unknown(value, Bytes::new()),
        }
    }
}

impl SubnegotiationType {
    /// Returns the length (in bytes) of the subnegotiation data.
    /// This _does not_ include the IAC SB and IAC SE bytes, _nor_ the single
    /// byte that represents the option.
    pub fn len(&self) -> usize {
        match self {
            SubnegotiationType::WindowSize(_, _) => 4,
            SubnegotiationType::CharsetRequest(vec) => {
                // 1 separator per charset, as the list starts with one.
                let mut len = vec.len();

                for bytes in vec {
                    len += bytes.len();
                }
                // add one more for the subnegotation sub-option (i.e.
                // CHARSET_REQUEST)
                len + 1
            }
            SubnegotiationType::CharsetAccepted(charset) => {
                // add one more for the subnegotation sub-option (i.e.
                // CHARSET_ACCEPTED)
                charset.len() + 1
            }
            SubnegotiationType::CharsetRejected => 1,
            SubnegotiationType::CharsetTTableRejected => 1,
            SubnegotiationType::LineMode(mode) => {
                match mode {
                    LineModeOption::SLC(triples) => {
                        // Mode byte plus length of triples
                        triples.len() * 3 + 1
                    }
                    LineModeOption::Mode(_) => 2,
                    LineModeOption::ForwardMask(ForwardMaskOption::Do(mask)) => {
                        2 + mask.as_bytes().len()
                    }
                    LineModeOption::ForwardMask(_) => 2,
                    LineModeOption::Unknown(_, data) => 1 + data.len(),
                }
            }
            // These are approximate wire lengths, used only for buffer
            // pre-sizing; the codec derives the authoritative length from the
            // IAC SE terminator.
            SubnegotiationType::Environment(_) => 1,
            SubnegotiationType::Ttype(s) => 1 + s.len(),
            SubnegotiationType::Tspeed(_, _) => 1,
            SubnegotiationType::Xdisploc(s) => 1 + s.len(),
            SubnegotiationType::Sndloc(s) => 1 + s.len(),
            SubnegotiationType::Status(_) => 1,
            SubnegotiationType::TtypeSend
            | SubnegotiationType::TspeedSend
            | SubnegotiationType::XdislocSend
            | SubnegotiationType::SndlocSend
            | SubnegotiationType::StatusSend => 1,
            SubnegotiationType::Lflow(_) => 1,
            SubnegotiationType::Unknown(_, bytes) => bytes.len(),
        }
    }

    /// Returns true if the subnegotiation data has a length (in bytes) of 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
