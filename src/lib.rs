#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

// RFC 854 `<https://tools.ietf.org/html/rfc854>`
//
// Originally based off of https://github.com/jtenner/telnet_codec, which has
// been archived.

/// Callback registries for IAC commands, SLC functions, and extended options.
pub mod callbacks;
/// Incremental text decoding for the session's negotiated CHARSET.
pub mod charset;
/// The `tokio-util` codec that frames raw bytes into [`event::TelnetEvent`]s.
pub mod codec;
/// Various byte or byte sequences used in the Telnet protocol.
pub mod constants;
/// Environment variable (NEW-ENVIRON) encoding and decoding.
pub mod env;
/// Codec and Io errors that may occur while processing Telnet events.
pub mod error;
/// Top-level Telnet events, such as Message, Do, Will, and Subnegotiation.
pub mod event;
/// LINEMODE forward mask construction and representation.
pub mod forwardmask;
/// LINEMODE mode byte and Special Linemode Character (SLC) negotiation.
pub mod linemode;
/// MUD Terminal Type Standard (MTTS) terminal-type cycling.
pub mod mtts;
/// Human-readable protocol byte names, for diagnostic logging only.
pub mod names;
/// Telnet options such as Echo, GoAhead, and SuppressGoAhead.
pub mod option;
/// Per-option local/remote/pending negotiation state.
pub mod optiontable;
/// The line-editing session built atop a negotiated [`TelnetOption`] set.
pub mod session;
/// The synchronous, byte-driven negotiation engine underlying the codec.
pub mod stream;
/// Telnet subnegotiation options.
pub mod subnegotiation;

pub use codec::TelnetCodec;
