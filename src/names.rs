//! Human-readable names for protocol bytes, used only in `tracing` output.
//! Nothing here affects wire behavior.

use crate::constants::{
    ABORT_CMD, AO, AYT, BRK, DM, EC, EL, EOF_CMD, EOR_CMD, GA, IAC, IP, NOP, SE, SUSP_CMD,
};
use crate::linemode::SlcFunction;

/// Names a bare IAC command byte (the second byte after `IAC`), for logging.
pub fn iac_command_name(byte: u8) -> &'static str {
    match byte {
        IAC => "IAC",
        GA => "GA",
        NOP => "NOP",
        SE => "SE",
        DM => "DM",
        BRK => "BRK",
        IP => "IP",
        AO => "AO",
        AYT => "AYT",
        EC => "EC",
        EOF_CMD => "EOF",
        SUSP_CMD => "SUSP",
        ABORT_CMD => "ABORT",
        EOR_CMD => "EOR",
        EL => "EL",
        _ => "UNKNOWN",
    }
}

/// Names a Special Linemode Character function, for logging.
pub fn slc_function_name(function: SlcFunction) -> &'static str {
    match function {
        SlcFunction::Synch => "SLC_SYNCH",
        SlcFunction::Brk => "SLC_BRK",
        SlcFunction::Ip => "SLC_IP",
        SlcFunction::Ao => "SLC_AO",
        SlcFunction::Ayt => "SLC_AYT",
        SlcFunction::Eor => "SLC_EOR",
        SlcFunction::Abort => "SLC_ABORT",
        SlcFunction::Eof => "SLC_EOF",
        SlcFunction::Susp => "SLC_SUSP",
        SlcFunction::Ec => "SLC_EC",
        SlcFunction::El => "SLC_EL",
        SlcFunction::Ew => "SLC_EW",
        SlcFunction::Rp => "SLC_RP",
        SlcFunction::Lnext => "SLC_LNEXT",
        SlcFunction::Xon => "SLC_XON",
        SlcFunction::Xoff => "SLC_XOFF",
        SlcFunction::Forw1 => "SLC_FORW1",
        SlcFunction::Forw2 => "SLC_FORW2",
        SlcFunction::Unknown(_) => "SLC_UNKNOWN",
        _ => "SLC_MISC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_commands() {
        assert_eq!(iac_command_name(AYT), "AYT");
        assert_eq!(iac_command_name(0x01), "UNKNOWN");
    }

    #[test]
    fn names_known_slc_functions() {
        assert_eq!(slc_function_name(SlcFunction::Ec), "SLC_EC");
        assert_eq!(slc_function_name(SlcFunction::Unknown(200)), "SLC_UNKNOWN");
    }
}
