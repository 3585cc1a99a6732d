//! A minimal incremental text decoder for the session's negotiated CHARSET.
//!
//! This crate does not depend on an encoding library - `original_source`'s
//! reference server falls back to a hand-rolled decoder when no MIME
//! charset library is available, and nothing else in this corpus (e.g. the
//! zero-dependency `telnet-negotiation` crate in the BBS example) reaches
//! for one either, so the same approach is used here: a small incremental
//! UTF-8 decoder with a byte-for-byte Latin-1/ASCII fallback.

/// The text encodings this crate can decode. Anything else negotiated via
/// CHARSET falls back to [`Encoding::Latin1`], matching the reference
/// server's behavior of substituting a safe default and notifying the peer
/// rather than failing the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the Unicode code point of the same
    /// value, so decoding never fails.
    Latin1,
    /// US-ASCII: bytes above 0x7F are replaced with `U+FFFD`.
    Ascii,
}

impl Encoding {
    /// Matches a CHARSET name (case-insensitively) to a supported encoding,
    /// per RFC 2066's IANA charset naming.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        let name = std::str::from_utf8(name).ok()?.trim();
        match () {
            _ if name.eq_ignore_ascii_case("UTF-8") || name.eq_ignore_ascii_case("UTF8") => {
                Some(Encoding::Utf8)
            }
            _ if name.eq_ignore_ascii_case("ISO-8859-1") || name.eq_ignore_ascii_case("LATIN1") => {
                Some(Encoding::Latin1)
            }
            _ if name.eq_ignore_ascii_case("US-ASCII") || name.eq_ignore_ascii_case("ASCII") => {
                Some(Encoding::Ascii)
            }
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Ascii => "US-ASCII",
        }
    }
}

/// Decodes bytes into text across multiple calls, buffering an incomplete
/// multi-byte sequence at the end of one call until more bytes arrive -
/// mirroring the persistent incremental-decoder object the reference server
/// keeps open for the lifetime of a connection rather than re-decoding from
/// scratch on every read.
#[derive(Debug, Default)]
pub struct IncrementalDecoder {
    encoding: Encoding,
    pending: Vec<u8>,
}

impl IncrementalDecoder {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding, pending: Vec::new() }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Switches the decoder's encoding, discarding any buffered partial
    /// sequence - a mid-stream encoding change invalidates it regardless.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
        self.pending.clear();
    }

    /// Decodes as much of `bytes` as forms complete characters, appending
    /// any undecodable tail to the internal buffer for the next call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        match self.encoding {
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Encoding::Ascii => {
                bytes.iter().map(|&b| if b < 0x80 { b as char } else { '\u{FFFD}' }).collect()
            }
            Encoding::Utf8 => self.decode_utf8(bytes),
        }
    }

    fn decode_utf8(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut text = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    return text;
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    text.push_str(std::str::from_utf8(&self.pending[..valid_len]).unwrap());

                    match err.error_len() {
                        // A genuinely invalid byte sequence - replace it and
                        // keep decoding the rest.
                        Some(len) => {
                            text.push('\u{FFFD}');
                            self.pending.drain(..valid_len + len);
                        }
                        // The tail might be an in-progress multi-byte
                        // character - stop here and wait for more bytes.
                        None => {
                            self.pending.drain(..valid_len);
                            return text;
                        }
                    }
                }
            }
        }
    }
}
