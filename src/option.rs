use crate::constants::{
    BINARY, CHARSET, ECHO, GA, GMCP, LINEMODE, LOGOUT, MCCP2, MSP, MSSP, MXP,
    NAWS, REMOTE_FLOW_CONTROL, SGA, SNDLOC, STATUS, TELOPT_EOR, TIMING_MARK, TSPEED, TTYPE,
    XDISPLOC,
};
use crate::constants::ENVIRON as NEW_ENVIRON;

/// Represents all Telnet options recognized by this crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TelnetOption {
    /// Echo a message back to the other side
    Echo,
    /// Indicates that the receiver may now send data to the sender.
    ///
    /// This is used in half-duplex connections, where the sender and receiver
    /// cannot send data at the same time. If you want bi-directional data
    /// transfer, you must set `SuppressGoAhead` on the sender and receiver
    /// sides.
    GoAhead,
    /// Indicates that the communication stream will be bi-directional.
    ///
    /// This must be set on both sides of the data stream independently, even
    /// though it is expected that if one side sets it, the other side will also
    /// set it.
    ///
    /// See <https://datatracker.ietf.org/doc/html/rfc858> for more information.
    SuppressGoAhead,
    /// Indicates how EOR (End Of Record) is handled between a sender and
    /// receiver. Typically this is marked by Carrige Return and Line Feed. In
    /// systems that have a different EOR marker, this option can be used to
    /// change the EOR marker.
    ///
    /// Like SuppressGoAhead, this must be set on both sides of the data stream
    /// independently - even though it is expected that if one side sets it, the
    /// other side will also set it.
    ///
    /// See <https://datatracker.ietf.org/doc/html/rfc885> for more information.
    EndOfRecord,
    Charset,
    MCCP2,
    GMCP,
    MSSP,
    MSP,
    MXP,
    /// RFC 1184/1116 line editing and Special Linemode Character negotiation.
    Linemode,
    /// RFC 1073 Negotiate About Window Size.
    Naws,
    /// RFC 859 STATUS.
    Status,
    /// RFC 860 Timing Mark.
    TimingMark,
    /// RFC 1372 remote flow control (LFLOW).
    Lflow,
    /// RFC 1091 TERMINAL-TYPE.
    Ttype,
    /// RFC 1079 TERMINAL SPEED.
    Tspeed,
    /// RFC 1096 X Display Location.
    Xdisploc,
    /// RFC 1572 NEW-ENVIRON.
    NewEnviron,
    /// RFC 779 Data Entry Terminal location.
    Sndloc,
    /// RFC 727 force logout.
    Logout,
    /// RFC 856 binary transmission.
    Binary,
    /// A generic marker indicating an unknown option.
    Unknown(u8),
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        match byte {
            ECHO => TelnetOption::Echo,
            GA => TelnetOption::GoAhead,
            SGA => TelnetOption::SuppressGoAhead,
            TELOPT_EOR => TelnetOption::EndOfRecord,
            CHARSET => TelnetOption::Charset,
            MCCP2 => TelnetOption::MCCP2,
            GMCP => TelnetOption::GMCP,
            MSSP => TelnetOption::MSSP,
            MSP => TelnetOption::MSP,
            MXP => TelnetOption::MXP,
            LINEMODE => TelnetOption::Linemode,
            NAWS => TelnetOption::Naws,
            STATUS => TelnetOption::Status,
            TIMING_MARK => TelnetOption::TimingMark,
            REMOTE_FLOW_CONTROL => TelnetOption::Lflow,
            TTYPE => TelnetOption::Ttype,
            TSPEED => TelnetOption::Tspeed,
            XDISPLOC => TelnetOption::Xdisploc,
            NEW_ENVIRON => TelnetOption::NewEnviron,
            SNDLOC => TelnetOption::Sndloc,
            LOGOUT => TelnetOption::Logout,
            BINARY => TelnetOption::Binary,
            _ => TelnetOption::Unknown(byte),
        }
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        match option {
            TelnetOption::Echo => ECHO,
            TelnetOption::GoAhead => GA,
            TelnetOption::SuppressGoAhead => SGA,
            TelnetOption::EndOfRecord => TELOPT_EOR,
            TelnetOption::Charset => CHARSET,
            TelnetOption::MCCP2 => MCCP2,
            TelnetOption::GMCP => GMCP,
            TelnetOption::MSSP => MSSP,
            TelnetOption::MSP => MSP,
            TelnetOption::MXP => MXP,
            TelnetOption::Linemode => LINEMODE,
            TelnetOption::Naws => NAWS,
            TelnetOption::Status => STATUS,
            TelnetOption::TimingMark => TIMING_MARK,
            TelnetOption::Lflow => REMOTE_FLOW_CONTROL,
            TelnetOption::Ttype => TTYPE,
            TelnetOption::Tspeed => TSPEED,
            TelnetOption::Xdisploc => XDISPLOC,
            TelnetOption::NewEnviron => NEW_ENVIRON,
            TelnetOption::Sndloc => SNDLOC,
            TelnetOption::Logout => LOGOUT,
            TelnetOption::Binary => BINARY,
            TelnetOption::Unknown(byte) => byte,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_known_options() {
        for byte in [
            ECHO, GA, SGA, TELOPT_EOR, CHARSET, LINEMODE, NAWS, STATUS, TIMING_MARK,
            REMOTE_FLOW_CONTROL, TTYPE, TSPEED, XDISPLOC, NEW_ENVIRON, SNDLOC, LOGOUT, BINARY,
        ] {
            let option = TelnetOption::from(byte);
            assert!(!matches!(option, TelnetOption::Unknown(_)));
            assert_eq!(u8::from(option), byte);
        }
    }

    #[test]
    fn unknown_option_roundtrips_its_byte() {
        let option = TelnetOption::from(99);
        assert_eq!(option, TelnetOption::Unknown(99));
        assert_eq!(u8::from(option), 99);
    }
}
