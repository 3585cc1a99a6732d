use thiserror::Error;

/// Errors that can occur while negotiating or decoding a Telnet stream.
///
/// Only [`TelnetError::RoleViolation`] is ever returned to a caller of
/// [`crate::stream::TelnetStream`] - every other variant is raised internally,
/// logged via `tracing`, and absorbed into a state change rather than
/// propagated, matching the behavior of the reference server this crate is
/// modeled on.
#[derive(Debug, Error)]
pub enum TelnetError {
    /// The peer sent a negotiation or subnegotiation sequence that only the
    /// opposite role may legally send (for example, a client-only `IAC SB
    /// NEW-ENVIRON SEND` arriving at a server).
    #[error("role violation: {0}")]
    RoleViolation(String),

    /// A subnegotiation buffer grew past its configured limit before an `IAC
    /// SE` terminator arrived.
    #[error("subnegotiation buffer exceeded {max} bytes")]
    SbOverflow { max: usize },

    /// The pending SLC triplet buffer grew past its configured limit.
    #[error("SLC buffer exceeded {max} bytes")]
    SlcOverflow { max: usize },

    /// The codec could not frame a well-formed Telnet event from the bytes
    /// on the wire.
    #[error("codec failure: {0}")]
    Codec(String),

    /// An I/O error bubbled up from the underlying transport.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<String> for TelnetError {
    fn from(message: String) -> Self {
        TelnetError::Codec(message)
    }
}
