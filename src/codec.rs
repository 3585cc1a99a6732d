//! The `tokio-util` [`Decoder`]/[`Encoder`] pair that frames raw bytes off
//! the wire into [`TelnetEvent`]s and back. This is the only layer that
//! touches a raw byte buffer - IAC escaping, subnegotiation framing, and the
//! SGA "kludge mode" line-buffering are all decided here. Everything above
//! it (`stream::TelnetStream`, `session::Session`) works in terms of events.

use std::mem;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    constants::{
        ABORT_CMD, AO, AYT, BRK, CHARSET, CHARSET_ACCEPTED, CHARSET_REJECTED, CHARSET_REQUEST,
        CHARSET_TTABLE_REJECTED, DM, DO, DONT, EC, EL, ENVIRON, EOF_CMD, EOR_CMD, GA, IAC, IP, IS,
        LINEMODE, NAWS, NOP, REMOTE_FLOW_CONTROL, SB, SE, SEND, SNDLOC, STATUS, SUSP_CMD, TSPEED,
        TTYPE, WILL, WONT, XDISPLOC,
    },
    env::decode_env,
    error::TelnetError,
    event::TelnetEvent,
    option::TelnetOption,
    subnegotiation::{StatusEntry, SubnegotiationType},
};

type Result<T> = std::result::Result<T, TelnetError>;

/// Implements a Tokio codec for the Telnet protocol, along with MUD-specific
/// extension protocols such as GMCP. You should never have to interact with
/// this directly - `session::Session` drives it for you.
#[derive(Debug)]
pub struct TelnetCodec {
    pub sga: bool,
    max_buffer_length: usize,
    buffer: Vec<u8>,
}

impl TelnetCodec {
    #[must_use]
    pub fn new(max_buffer_length: usize) -> Self {
        TelnetCodec { sga: false, max_buffer_length, buffer: Vec::new() }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = TelnetError;

    fn decode(&mut self, buffer: &mut BytesMut) -> Result<Option<Self::Item>> {
        let mut byte_index = 0;

        if self.sga && !self.buffer.is_empty() {
            let buf = mem::take(&mut self.buffer);
            let result = String::from_utf8_lossy(&buf[..]);

            return Ok(Some(TelnetEvent::Message(result.to_string())));
        }

        if buffer.is_empty() {
            return Ok(None);
        }

        if self.sga {
            return Ok(decode_suppress_go_ahead(&mut byte_index, buffer));
        }

        Ok(decode_bytes(self, &mut byte_index, buffer))
    }
}

impl Encoder<TelnetEvent> for TelnetCodec {
    type Error = TelnetError;

    fn encode(&mut self, event: TelnetEvent, buffer: &mut BytesMut) -> Result<()> {
        match event {
            TelnetEvent::Do(option) => encode_negotiate(DO, option, buffer),
            TelnetEvent::Dont(option) => encode_negotiate(DONT, option, buffer),
            TelnetEvent::Will(option) => encode_negotiate(WILL, option, buffer),
            TelnetEvent::Wont(option) => encode_negotiate(WONT, option, buffer),
            TelnetEvent::Subnegotiate(sb_type) => encode_sb(sb_type, buffer),
            TelnetEvent::Message(msg) => encode_message(msg, buffer),
            TelnetEvent::RawMessage(msg) => encode_raw_message(msg, buffer),
            TelnetEvent::Character(byte) => {
                if byte == IAC {
                    buffer.extend([IAC, IAC]);
                } else {
                    buffer.put_u8(byte);
                }
            }
            TelnetEvent::GoAhead
            | TelnetEvent::Nop
            | TelnetEvent::EndOfRecord
            | TelnetEvent::InterruptProcess
            | TelnetEvent::AbortOutput
            | TelnetEvent::AreYouThere
            | TelnetEvent::EraseCharacter
            | TelnetEvent::EraseLine
            | TelnetEvent::Break
            | TelnetEvent::EndOfFile
            | TelnetEvent::Suspend
            | TelnetEvent::Abort
            | TelnetEvent::DataMark => {
                buffer.extend([IAC, u8::from(&event)]);
            }
        }

        Ok(())
    }
}

fn decode_negotiate(byte_index: usize, buffer: &mut BytesMut, option: u8) -> Option<TelnetEvent> {
    if byte_index + 2 >= buffer.len() {
        return None;
    }

    let byte = buffer[byte_index + 2];
    buffer.advance(byte_index + 3);
    match option {
        WILL => Some(TelnetEvent::Will(byte.into())),
        WONT => Some(TelnetEvent::Wont(byte.into())),
        DO => Some(TelnetEvent::Do(byte.into())),
        DONT => Some(TelnetEvent::Dont(byte.into())),
        _ => None,
    }
}

fn decode_suppress_go_ahead(byte_index: &mut usize, buffer: &mut BytesMut) -> Option<TelnetEvent> {
    match buffer[0] {
        IAC => {
            if 1 >= buffer.len() {
                return None;
            }

            match buffer[*byte_index + 1] {
                IAC => {
                    buffer.advance(2);
                    Some(TelnetEvent::Character(IAC))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn decode_negotiate_about_window_size(subvec: &[u8]) -> Option<TelnetEvent> {
    match subvec.len() {
        4 => {
            let result = SubnegotiationType::WindowSize(
                (u16::from(subvec[0]) << 8) | u16::from(subvec[1]),
                (u16::from(subvec[2]) << 8) | u16::from(subvec[3]),
            );
            Some(TelnetEvent::Subnegotiate(result))
        }
        _ => None,
    }
}

fn decode_charset(subvec: &[u8]) -> Option<TelnetEvent> {
    if subvec.is_empty() {
        return None;
    }

    match subvec[0] {
        CHARSET_REQUEST => {
            if subvec.len() == 1 {
                return None;
            }

            let separator = subvec[1];
            let charsets: Vec<_> =
                subvec[2..].split(|&x| x == separator).map(|x| Bytes::from(x.to_vec())).collect();

            if charsets.is_empty() {
                return None;
            }

            let result = SubnegotiationType::CharsetRequest(charsets);
            Some(TelnetEvent::Subnegotiate(result))
        }
        CHARSET_ACCEPTED => {
            let result = SubnegotiationType::CharsetAccepted(Bytes::from(subvec[1..].to_vec()));
            Some(TelnetEvent::Subnegotiate(result))
        }
        CHARSET_REJECTED => {
            let result = SubnegotiationType::CharsetRejected;
            Some(TelnetEvent::Subnegotiate(result))
        }
        CHARSET_TTABLE_REJECTED => {
            let result = SubnegotiationType::CharsetTTableRejected;
            Some(TelnetEvent::Subnegotiate(result))
        }
        _ => None,
    }
}

/// Decodes a `TTYPE`/`TSPEED`/`XDISPLOC`/`SNDLOC`-shaped subnegotiation,
/// which all share the `IS <data>` / `SEND` grammar of RFC 1091/1079/1096.
fn decode_is_or_send<T>(subvec: &[u8], on_is: impl FnOnce(&[u8]) -> Option<T>) -> Option<Is<T>> {
    match subvec.first().copied() {
        Some(IS) => on_is(&subvec[1..]).map(Is::Is),
        Some(SEND) => Some(Is::Send),
        _ => None,
    }
}

enum Is<T> {
    Is(T),
    Send,
}

fn decode_ttype(subvec: &[u8]) -> Option<TelnetEvent> {
    match decode_is_or_send(subvec, |rest| Some(String::from_utf8_lossy(rest).to_string()))? {
        Is::Is(name) => Some(TelnetEvent::Subnegotiate(SubnegotiationType::Ttype(name))),
        Is::Send => Some(TelnetEvent::Subnegotiate(SubnegotiationType::TtypeSend)),
    }
}

fn decode_tspeed(subvec: &[u8]) -> Option<TelnetEvent> {
    match decode_is_or_send(subvec, |rest| {
        let rest = String::from_utf8_lossy(rest);
        let (tx, rx) = rest.split_once(',')?;
        Some((tx.trim().parse::<u32>().ok()?, rx.trim().parse::<u32>().ok()?))
    })? {
        Is::Is((tx, rx)) => Some(TelnetEvent::Subnegotiate(SubnegotiationType::Tspeed(tx, rx))),
        Is::Send => Some(TelnetEvent::Subnegotiate(SubnegotiationType::TspeedSend)),
    }
}

fn decode_xdisploc(subvec: &[u8]) -> Option<TelnetEvent> {
    match decode_is_or_send(subvec, |rest| Some(String::from_utf8_lossy(rest).to_string()))? {
        Is::Is(loc) => Some(TelnetEvent::Subnegotiate(SubnegotiationType::Xdisploc(loc))),
        Is::Send => Some(TelnetEvent::Subnegotiate(SubnegotiationType::XdislocSend)),
    }
}

fn decode_sndloc(subvec: &[u8]) -> Option<TelnetEvent> {
    if subvec == [SEND] {
        return Some(TelnetEvent::Subnegotiate(SubnegotiationType::SndlocSend));
    }
    let loc = String::from_utf8_lossy(subvec).to_string();
    Some(TelnetEvent::Subnegotiate(SubnegotiationType::Sndloc(loc)))
}

fn decode_status(subvec: &[u8]) -> Option<TelnetEvent> {
    match subvec.first().copied()? {
        SEND => Some(TelnetEvent::Subnegotiate(SubnegotiationType::StatusSend)),
        IS => {
            let mut entries = Vec::new();
            let mut chunks = subvec[1..].chunks_exact(2);
            for pair in &mut chunks {
                let option = TelnetOption::from(pair[1]);
                let entry = match pair[0] {
                    WILL => StatusEntry::Local(option, true),
                    WONT => StatusEntry::Local(option, false),
                    DO => StatusEntry::Remote(option, true),
                    DONT => StatusEntry::Remote(option, false),
                    _ => return None,
                };
                entries.push(entry);
            }
            if !chunks.remainder().is_empty() {
                return None;
            }
            Some(TelnetEvent::Subnegotiate(SubnegotiationType::Status(entries)))
        }
        _ => None,
    }
}

fn decode_lflow(subvec: &[u8]) -> Option<TelnetEvent> {
    let mode = *subvec.first()?;
    Some(TelnetEvent::Subnegotiate(SubnegotiationType::Lflow(mode)))
}

fn decode_linemode(subvec: &[u8]) -> Option<TelnetEvent> {
    use crate::constants::{LINEMODE_FORWARD_MASK, LINEMODE_SLC, MODE};
    use crate::forwardmask::{Forwardmask, ForwardMaskOption};
    use crate::linemode::Dispatch;
    use crate::subnegotiation::LineModeOption;

    let (suboption, rest) = subvec.split_first()?;
    let option = match *suboption {
        MODE => LineModeOption::Mode(*rest.first()?),
        LINEMODE_SLC => {
            let triples = rest
                .chunks_exact(3)
                .map(|triple| (Dispatch::from((triple[0], triple[1])), triple[2] as char))
                .collect();
            LineModeOption::SLC(triples)
        }
        LINEMODE_FORWARD_MASK => {
            if rest.is_empty() {
                LineModeOption::ForwardMask(ForwardMaskOption::Dont)
            } else {
                LineModeOption::ForwardMask(ForwardMaskOption::Do(Forwardmask::new(
                    rest.to_vec(),
                    false,
                )))
            }
        }
        other => LineModeOption::Unknown(other, Bytes::from(rest.to_vec())),
    };

    Some(TelnetEvent::Subnegotiate(SubnegotiationType::LineMode(option)))
}

fn decode_unknown(option: u8, subvec: Vec<u8>) -> TelnetEvent {
    TelnetEvent::Subnegotiate(SubnegotiationType::Unknown(option.into(), Bytes::from(subvec)))
}

fn decode_next_byte(codec: &mut TelnetCodec, buffer_size: &mut usize, byte: u8) {
    if buffer_size < &mut codec.max_buffer_length {
        codec.buffer.push(byte);
        *buffer_size += 1;
    }
}

fn decode_subnegotiation_end(
    invalid: bool,
    buffer: &mut BytesMut,
    subvec: Vec<u8>,
    option: u8,
    consumed: usize,
) -> Option<TelnetEvent> {
    if invalid {
        buffer.advance(consumed);
        return None;
    }

    let recognized = match option {
        NAWS => decode_negotiate_about_window_size(&subvec),
        CHARSET => decode_charset(&subvec),
        TTYPE => decode_ttype(&subvec),
        TSPEED => decode_tspeed(&subvec),
        XDISPLOC => decode_xdisploc(&subvec),
        SNDLOC => decode_sndloc(&subvec),
        STATUS => decode_status(&subvec),
        ENVIRON => decode_env(&subvec),
        LINEMODE => decode_linemode(&subvec),
        REMOTE_FLOW_CONTROL => decode_lflow(&subvec),
        _ => None,
    };

    let opt = recognized.or_else(|| Some(decode_unknown(option, subvec)));
    buffer.advance(consumed);
    opt
}

fn decode_bytes(
    codec: &mut TelnetCodec,
    byte_index: &mut usize,
    buffer: &mut BytesMut,
) -> Option<TelnetEvent> {
    let mut codec_buffer_size = codec.buffer.len();

    loop {
        if *byte_index >= buffer.len() {
            return None;
        }

        // Handle matches against the first byte in the buffer.
        match buffer[*byte_index] {
            IAC => {
                if *byte_index + 1 >= buffer.len() {
                    return None;
                }

                // Handle matches against the second byte in the buffer.
                match buffer[*byte_index + 1] {
                    IAC => {
                        if codec.buffer.len() < codec.max_buffer_length {
                            codec.buffer.push(IAC);
                            codec_buffer_size += 1;
                        }

                        *byte_index += 1;
                    }
                    DO => return decode_negotiate(*byte_index, buffer, DO),
                    DONT => return decode_negotiate(*byte_index, buffer, DONT),
                    WILL => return decode_negotiate(*byte_index, buffer, WILL),
                    WONT => return decode_negotiate(*byte_index, buffer, WONT),
                    SB => {
                        if *byte_index + 2 >= buffer.len() {
                            buffer.advance(*byte_index + 2);
                            return None;
                        }

                        let start = *byte_index;
                        let opt = buffer[*byte_index + 2];

                        *byte_index += 3;

                        let mut subvec: Vec<u8> = Vec::new();
                        let mut invalid = false;

                        loop {
                            if *byte_index > buffer.len() {
                                buffer.advance(start);
                                return None;
                            }

                            // Handle matches against the third byte in the
                            // buffer. This is for subnegotiation.
                            match buffer[*byte_index] {
                                IAC => {
                                    if *byte_index + 1 > buffer.len() {
                                        return None;
                                    }

                                    // Handle matches against the fourth byte in
                                    // the buffer. This is the final byte in the
                                    // buffer.
                                    match buffer[*byte_index + 1] {
                                        SE => {
                                            let consumed = *byte_index + 2;
                                            return decode_subnegotiation_end(
                                                invalid, buffer, subvec, opt, consumed,
                                            )
                                        }
                                        IAC => subvec.push(IAC),
                                        _ => invalid = true,
                                    }

                                    *byte_index += 1;
                                }
                                _ => {
                                    if subvec.len() >= crate::constants::SB_MAXSIZE {
                                        if !invalid {
                                            tracing::warn!(
                                                max = crate::constants::SB_MAXSIZE,
                                                "subnegotiation buffer exceeded, discarding"
                                            );
                                        }
                                        invalid = true;
                                    } else {
                                        subvec.push(buffer[*byte_index]);
                                    }
                                }
                            }

                            *byte_index += 1;
                        }
                    }
                    NOP => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::Nop);
                    }
                    GA => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::GoAhead);
                    }
                    DM => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::DataMark);
                    }
                    BRK => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::Break);
                    }
                    IP => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::InterruptProcess);
                    }
                    AO => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::AbortOutput);
                    }
                    AYT => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::AreYouThere);
                    }
                    EC => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::EraseCharacter);
                    }
                    EL => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::EraseLine);
                    }
                    EOF_CMD => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::EndOfFile);
                    }
                    SUSP_CMD => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::Suspend);
                    }
                    ABORT_CMD => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::Abort);
                    }
                    EOR_CMD => {
                        buffer.advance(*byte_index + 2);
                        return Some(TelnetEvent::EndOfRecord);
                    }
                    _ => {
                        // Unrecognized command byte after IAC - drop both
                        // bytes rather than leaking the command byte into the
                        // data stream.
                        buffer.advance(*byte_index + 2);
                        return None;
                    }
                }
            }
            b'\n' => {
                let mut codec_buffer = mem::take(&mut codec.buffer);
                if codec_buffer.ends_with(&[b'\r']) {
                    codec_buffer.pop();
                    buffer.advance(*byte_index + 1);

                    let result = String::from_utf8_lossy(&codec_buffer[..]);
                    return Some(TelnetEvent::Message(result.to_string()));
                }

                decode_next_byte(codec, &mut codec_buffer_size, buffer[*byte_index]);
            }
            _ => decode_next_byte(codec, &mut codec_buffer_size, buffer[*byte_index]),
        };

        *byte_index += 1;
    }
}

fn encode_negotiate(opt: u8, subopt: TelnetOption, buf: &mut BytesMut) {
    buf.reserve(3);
    buf.put_u8(IAC);

    match opt {
        DO => buf.put_u8(DO),
        DONT => buf.put_u8(DONT),
        WILL => buf.put_u8(WILL),
        WONT => buf.put_u8(WONT),
        _ => unreachable!(),
    }

    buf.put_u8(subopt.into());
}

/// Writes `data` to `buffer`, doubling any `IAC` byte so it is not mistaken
/// for the start of a Telnet command.
fn extend_escaped(buffer: &mut BytesMut, data: &[u8]) {
    buffer.reserve(data.len());
    for &byte in data {
        if byte == IAC {
            buffer.extend([IAC, IAC]);
        } else {
            buffer.put_u8(byte);
        }
    }
}

fn encode_linemode(mode: crate::subnegotiation::LineModeOption, buffer: &mut BytesMut) {
    use crate::constants::{LINEMODE, LINEMODE_FORWARD_MASK, LINEMODE_SLC, MODE};
    use crate::forwardmask::ForwardMaskOption;
    use crate::subnegotiation::LineModeOption;

    buffer.extend([IAC, SB, LINEMODE]);
    match mode {
        LineModeOption::Mode(byte) => buffer.extend([MODE, byte]),
        LineModeOption::SLC(triples) => {
            buffer.put_u8(LINEMODE_SLC);
            for (dispatch, value) in triples {
                let (function, modifiers): (u8, u8) = dispatch.into();
                buffer.extend([function, modifiers, value as u8]);
            }
        }
        LineModeOption::ForwardMask(ForwardMaskOption::Do(mask)) => {
            buffer.put_u8(LINEMODE_FORWARD_MASK);
            buffer.extend(mask.as_bytes());
        }
        LineModeOption::ForwardMask(_) => buffer.put_u8(LINEMODE_FORWARD_MASK),
        LineModeOption::Unknown(suboption, data) => {
            buffer.put_u8(suboption);
            extend_escaped(buffer, &data);
        }
    }
    buffer.extend([IAC, SE]);
}

fn encode_sb(sb: SubnegotiationType, buffer: &mut BytesMut) {
    match sb {
        SubnegotiationType::WindowSize(width, height) => {
            buffer.reserve(9);
            buffer.extend([IAC, SB, NAWS]);
            buffer.put_u16(width);
            buffer.put_u16(height);
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::CharsetRequest(charsets) => {
            let charset_lens = charsets.iter().map(|c| c.len()).sum::<usize>();
            let spaces = charsets.len().saturating_sub(1);

            buffer.reserve(7 + charset_lens + spaces);
            let sep = b' ';
            buffer.extend([IAC, SB, CHARSET, CHARSET_REQUEST, sep]);

            for (i, charset) in charsets.iter().enumerate() {
                buffer.extend(charset);
                if i < charsets.len() - 1 {
                    buffer.put_u8(sep);
                }
            }

            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::CharsetAccepted(charset) => {
            buffer.reserve(6 + charset.len());
            buffer.extend([IAC, SB, CHARSET, CHARSET_ACCEPTED]);
            buffer.extend(charset);
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::CharsetRejected => {
            buffer.reserve(6);
            buffer.extend([IAC, SB, CHARSET, CHARSET_REJECTED, IAC, SE]);
        }
        SubnegotiationType::CharsetTTableRejected => {
            buffer.reserve(6);
            buffer.extend([IAC, SB, CHARSET, CHARSET_TTABLE_REJECTED, IAC, SE]);
        }
        SubnegotiationType::LineMode(mode) => encode_linemode(mode, buffer),
        SubnegotiationType::Environment(op) => {
            buffer.extend([IAC, SB, ENVIRON]);
            crate::env::encode_env_op(op, buffer);
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::Ttype(name) => {
            buffer.extend([IAC, SB, TTYPE, IS]);
            extend_escaped(buffer, name.as_bytes());
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::TtypeSend => buffer.extend([IAC, SB, TTYPE, SEND, IAC, SE]),
        SubnegotiationType::Tspeed(tx, rx) => {
            buffer.extend([IAC, SB, TSPEED, IS]);
            extend_escaped(buffer, format!("{tx},{rx}").as_bytes());
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::TspeedSend => buffer.extend([IAC, SB, TSPEED, SEND, IAC, SE]),
        SubnegotiationType::Xdisploc(loc) => {
            buffer.extend([IAC, SB, XDISPLOC, IS]);
            extend_escaped(buffer, loc.as_bytes());
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::XdislocSend => buffer.extend([IAC, SB, XDISPLOC, SEND, IAC, SE]),
        SubnegotiationType::Sndloc(loc) => {
            buffer.extend([IAC, SB, SNDLOC]);
            extend_escaped(buffer, loc.as_bytes());
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::SndlocSend => buffer.extend([IAC, SB, SNDLOC, SEND, IAC, SE]),
        SubnegotiationType::Status(entries) => {
            buffer.extend([IAC, SB, STATUS, IS]);
            for entry in entries {
                match entry {
                    crate::subnegotiation::StatusEntry::Local(option, true) => {
                        buffer.extend([WILL, option.into()]);
                    }
                    crate::subnegotiation::StatusEntry::Local(option, false) => {
                        buffer.extend([WONT, option.into()]);
                    }
                    crate::subnegotiation::StatusEntry::Remote(option, true) => {
                        buffer.extend([DO, option.into()]);
                    }
                    crate::subnegotiation::StatusEntry::Remote(option, false) => {
                        buffer.extend([DONT, option.into()]);
                    }
                }
            }
            buffer.extend([IAC, SE]);
        }
        SubnegotiationType::StatusSend => buffer.extend([IAC, SB, STATUS, SEND, IAC, SE]),
        SubnegotiationType::Lflow(mode) => {
            buffer.extend([IAC, SB, REMOTE_FLOW_CONTROL, mode, IAC, SE]);
        }
        SubnegotiationType::Unknown(option, bytes) => {
            let mut bytes_buffer_size = bytes.len() + 5;

            for byte in &bytes {
                if *byte == IAC {
                    bytes_buffer_size += 1;
                }
            }

            buffer.reserve(bytes_buffer_size);

            // IAC SUB OPTION
            buffer.extend([IAC, SB, option.into()]);

            // Write to the buffer
            for byte in &bytes {
                if *byte == IAC {
                    buffer.extend([IAC, IAC]);
                } else {
                    buffer.put_u8(*byte);
                }
            }

            // IAC SUBNEGOTIATION END
            buffer.extend([IAC, SE]);
        }
    }
}

fn encode_raw_message(message: String, buffer: &mut BytesMut) {
    let bytes = Bytes::from(message);
    let mut bytes_buffer_size = bytes.len();

    for byte in &bytes {
        if *byte == IAC {
            bytes_buffer_size += 1;
        }
    }

    buffer.reserve(bytes_buffer_size);

    for byte in &bytes {
        if *byte == IAC {
            buffer.extend([IAC, IAC]);
        }
        buffer.put_u8(*byte);
    }
}

fn encode_message(message: String, buffer: &mut BytesMut) {
    encode_raw_message(message, buffer);

    if !buffer.ends_with(b"\r\n") {
        buffer.reserve(2);
        buffer.extend([b'\r', b'\n']);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TelnetCodec, BytesMut) {
        let codec = TelnetCodec::new(16);
        let buffer = BytesMut::new();
        (codec, buffer)
    }

    mod test_decode {
        use super::*;

        #[test]
        fn test_sga_true() {
            let (mut codec, mut buffer) = setup();
            codec.sga = true;

            // when both the codec's internal buffer, and the input buffer are
            // empty, there's nothing going on.
            assert!(codec.decode(&mut buffer).unwrap().is_none());

            // when the codec's internal buffer is not empty, clear it out and
            // send it as a message
            codec.buffer.extend([b'h', b'i', b'y', b'a', b' ', 0xf0, 0x9f, 0x98, 0x81]);
            assert_eq!(
                codec.decode(&mut buffer).unwrap().unwrap(),
                TelnetEvent::Message("hiya 😁".to_string())
            );
            assert!(codec.buffer.is_empty());

            // when the codec's internal buffer is empty, and the input buffer
            // has data, decode as a SuppressGoAhead
            buffer.extend([IAC]);
            assert!(codec.decode(&mut buffer).unwrap().is_none());
            assert!(codec.buffer.is_empty());
            assert_eq!(buffer.as_ref(), &[IAC]);
            buffer.extend([IAC]); // Add a second, as two are interpreted as a single IAC
            assert_eq!(codec.decode(&mut buffer).unwrap().unwrap(), TelnetEvent::Character(IAC));
            assert!(codec.buffer.is_empty());
            assert!(buffer.is_empty());

            // Ignore IAC followed by non-IAC
            buffer.extend([IAC, WILL]);
            assert!(codec.decode(&mut buffer).unwrap().is_none());
            assert!(codec.buffer.is_empty());
            assert_eq!(buffer.as_ref(), &[IAC, WILL]);

            // Ignore non-IAC followed by IAC
            buffer.extend([WILL, IAC]);
            assert!(codec.decode(&mut buffer).unwrap().is_none());
            assert!(codec.buffer.is_empty());
            assert_eq!(buffer.as_ref(), &[IAC, WILL, WILL, IAC]); // previous stuff is still there
        }

        mod test_sga_false {
            use super::*;

            #[test]
            fn test_buffer_starts_with_newline() {
                let (mut codec, mut buffer) = setup();

                codec.buffer.extend([b'c', b'o', b'o', b'l', b'!', b'\r']);
                buffer.extend([b'\n', b'y', b'e', b's']);

                // when the newline completes a \r\n sequence, send the contents
                // of the codec's internal buffer as a message
                assert_eq!(
                    codec.decode(&mut buffer).unwrap().unwrap(),
                    TelnetEvent::Message("cool!".to_string())
                );
                assert!(codec.buffer.is_empty());
                assert_eq!(buffer.as_ref(), &[b'y', b'e', b's']);

                // When the character does not complete a \r\n sequence, and is
                // not IAC, append it to the codec's internal buffer, but do not
                // remove it from the input buffer.
                assert_eq!(codec.decode(&mut buffer).unwrap(), None);
                assert_eq!(&codec.buffer, &[b'y', b'e', b's']);
                assert_eq!(buffer.as_ref(), &[b'y', b'e', b's']);
            }

            mod test_iac {
                use super::*;
                use crate::constants::ECHO;

                #[test]
                fn test_double_iac() {
                    let (mut codec, mut buffer) = setup();

                    // a doubled IAC on the wire is interpreted as a single byte
                    // of data
                    buffer.extend([IAC, IAC]);
                    assert_eq!(codec.decode(&mut buffer).unwrap(), None);
                    assert_eq!(&codec.buffer, &[IAC]);
                    assert_eq!(buffer.as_ref(), &[IAC, IAC]);
                }

                #[test]
                fn test_do() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, DO, ECHO]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Do(TelnetOption::Echo)
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_dont() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, DONT, ECHO]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Dont(TelnetOption::Echo)
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_will() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, WILL, ECHO]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Will(TelnetOption::Echo)
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_wont() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, WONT, ECHO]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Wont(TelnetOption::Echo)
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_nop() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, NOP]);
                    assert_eq!(codec.decode(&mut buffer).unwrap(), Some(TelnetEvent::Nop));
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_bare_commands_decode_and_consume() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, crate::constants::AYT]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap(),
                        Some(TelnetEvent::AreYouThere)
                    );
                    assert!(buffer.is_empty());

                    buffer.extend([IAC, crate::constants::IP]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap(),
                        Some(TelnetEvent::InterruptProcess)
                    );

                    buffer.extend([IAC, crate::constants::DM]);
                    assert_eq!(codec.decode(&mut buffer).unwrap(), Some(TelnetEvent::DataMark));

                    buffer.extend([IAC, crate::constants::EOR_CMD]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap(),
                        Some(TelnetEvent::EndOfRecord)
                    );
                }

                #[test]
                fn test_sb_naws() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, NAWS, 0x00, 0x50, 0x00, 0x50, IAC, SE]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::WindowSize(80, 80))
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_sb_charset_request() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, CHARSET, CHARSET_REQUEST, b' ']);
                    buffer.extend("UTF-8".bytes());
                    buffer.put_u8(b' ');
                    buffer.extend("US-ASCII".bytes());
                    buffer.extend([IAC, SE]);

                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::CharsetRequest(vec![
                            Bytes::from("UTF-8"),
                            Bytes::from("US-ASCII")
                        ]))
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_sb_charset_accepted() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, CHARSET, CHARSET_ACCEPTED]);
                    buffer.extend("UTF-8".bytes());
                    buffer.extend([IAC, SE]);

                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::CharsetAccepted(
                            Bytes::from("UTF-8")
                        ))
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_sb_charset_rejected() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, CHARSET, CHARSET_REJECTED, IAC, SE]);

                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::CharsetRejected)
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_sb_charset_ttable_rejected() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, CHARSET, CHARSET_TTABLE_REJECTED, IAC, SE]);

                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::CharsetTTableRejected)
                    );
                    assert!(codec.buffer.is_empty());
                    assert!(buffer.is_empty());
                }

                #[test]
                fn test_sb_ttype_send() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, TTYPE, SEND, IAC, SE]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::TtypeSend)
                    );
                }

                #[test]
                fn test_sb_status_send_and_is() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, STATUS, SEND, IAC, SE]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::StatusSend)
                    );

                    buffer.extend([IAC, SB, STATUS, IS, WILL, ECHO, DO, NAWS, IAC, SE]);
                    assert_eq!(
                        codec.decode(&mut buffer).unwrap().unwrap(),
                        TelnetEvent::Subnegotiate(SubnegotiationType::Status(vec![
                            StatusEntry::Local(TelnetOption::Echo, true),
                            StatusEntry::Remote(TelnetOption::Naws, true),
                        ]))
                    );
                }

                #[test]
                fn test_oversized_subnegotiation_is_discarded() {
                    let (mut codec, mut buffer) = setup();

                    buffer.extend([IAC, SB, NAWS]);
                    buffer.extend(vec![0u8; crate::constants::SB_MAXSIZE + 16]);
                    buffer.extend([IAC, SE]);

                    assert_eq!(codec.decode(&mut buffer).unwrap(), None);
                    assert!(buffer.is_empty());
                }
            }
        }
    }

    mod test_encode {
        use crate::constants::ECHO;
        use super::*;

        #[test]
        fn test_message() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Message("hiya 😁".to_string()), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), b"hiya \xF0\x9F\x98\x81\r\n");

            let (mut codec, mut buffer) = setup();
            let msg = "this message is larger than the max buffer length".to_string();
            assert!(msg.len() > codec.max_buffer_length);
            codec.encode(TelnetEvent::Message(msg), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), b"this message is larger than the max buffer length\r\n");
        }

        #[test]
        fn test_raw_message() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::RawMessage("hiya 😁".to_string()), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), b"hiya \xF0\x9F\x98\x81");
        }

        #[test]
        fn test_do() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Do(TelnetOption::Echo), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, DO, ECHO]);
        }

        #[test]
        fn test_dont() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Dont(TelnetOption::Echo), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, DONT, ECHO]);
        }

        #[test]
        fn test_will() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Will(TelnetOption::Echo), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, WILL, ECHO]);
        }

        #[test]
        fn test_wont() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Wont(TelnetOption::Echo), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, WONT, ECHO]);
        }

        #[test]
        fn test_sb_naws() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::WindowSize(80, 80)), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, SB, NAWS, 0x00, 0x50, 0x00, 0x50, IAC, SE]);
        }

        #[test]
        fn test_sb_charset_request() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::CharsetRequest(vec![
                Bytes::from("UTF-8"),
                Bytes::from("US-ASCII")
            ])), &mut buffer).unwrap();
            assert_eq!(&buffer.as_ref()[0..=4], &[IAC, SB, CHARSET, CHARSET_REQUEST, b' ']);
            assert_eq!(&buffer.as_ref()[5..], b"UTF-8 US-ASCII\xFF\xF0" as &[u8]);
        }

        #[test]
        fn test_sb_charset_accepted() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::CharsetAccepted(Bytes::from("UTF-8"))), &mut buffer).unwrap();
            assert_eq!(&buffer.as_ref()[0..=3], &[IAC, SB, CHARSET, CHARSET_ACCEPTED]);
            assert_eq!(&buffer.as_ref()[4..], b"UTF-8\xFF\xF0" as &[u8]);
        }

        #[test]
        fn test_sb_charset_rejected() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::CharsetRejected), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, SB, CHARSET, CHARSET_REJECTED, IAC, SE]);
        }

        #[test]
        fn test_sb_charset_ttable_rejected() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::CharsetTTableRejected), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, SB, CHARSET, CHARSET_TTABLE_REJECTED, IAC, SE]);
        }

        #[test]
        fn test_sb_ttype_send() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::TtypeSend), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, SB, TTYPE, SEND, IAC, SE]);
        }

        #[test]
        fn test_sb_status_send() {
            let (mut codec, mut buffer) = setup();
            codec.encode(TelnetEvent::Subnegotiate(SubnegotiationType::StatusSend), &mut buffer).unwrap();
            assert_eq!(buffer.as_ref(), &[IAC, SB, STATUS, SEND, IAC, SE]);
        }
    }
}
