//! Callback registries a [`crate::session::Session`] consults when it
//! recognizes a bare IAC command, a Special Linemode Character, or an
//! extended option event, letting an application hook specific behavior
//! (e.g. "what to do on `AYT`") without the session knowing about it.

use std::collections::HashMap;

use crate::event::TelnetEvent;
use crate::linemode::SlcFunction;
use crate::option::TelnetOption;

/// A callback invoked when a bare IAC command (`AYT`, `IP`, `BRK`, ...)
/// arrives.
pub type IacCallback = Box<dyn FnMut() + Send>;

/// A callback invoked when a Special Linemode Character fires, either from
/// an in-band keyboard byte or an explicit `editing_received` dispatch.
pub type SlcCallback = Box<dyn FnMut(SlcFunction) + Send>;

/// A callback invoked when an extended option produces a decoded event
/// (NAWS, NEW-ENVIRON, TTYPE, TSPEED, XDISPLOC, CHARSET, ...).
pub type ExtCallback = Box<dyn FnMut(&TelnetEvent) + Send>;

/// Dispatch tables keyed by IAC command byte, SLC function, and extended
/// option, consulted by the session as events are decoded off the wire.
#[derive(Default)]
pub struct Callbacks {
    iac: HashMap<u8, IacCallback>,
    slc: HashMap<SlcFunction, SlcCallback>,
    ext: HashMap<TelnetOption, ExtCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_iac_callback(&mut self, command: u8, callback: IacCallback) {
        self.iac.insert(command, callback);
    }

    pub fn set_slc_callback(&mut self, function: SlcFunction, callback: SlcCallback) {
        self.slc.insert(function, callback);
    }

    pub fn set_ext_callback(&mut self, option: TelnetOption, callback: ExtCallback) {
        self.ext.insert(option, callback);
    }

    /// Invokes the registered callback for `command`, if any. Returns
    /// whether a callback fired.
    pub fn dispatch_iac(&mut self, command: u8) -> bool {
        if let Some(callback) = self.iac.get_mut(&command) {
            callback();
            true
        } else {
            false
        }
    }

    pub fn dispatch_slc(&mut self, function: SlcFunction) -> bool {
        if let Some(callback) = self.slc.get_mut(&function) {
            callback(function);
            true
        } else {
            false
        }
    }

    pub fn dispatch_ext(&mut self, option: TelnetOption, event: &TelnetEvent) -> bool {
        if let Some(callback) = self.ext.get_mut(&option) {
            callback(event);
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("iac_commands", &self.iac.keys().collect::<Vec<_>>())
            .field("slc_functions", &self.slc.keys().collect::<Vec<_>>())
            .field("ext_options", &self.ext.keys().collect::<Vec<_>>())
            .finish()
    }
}
