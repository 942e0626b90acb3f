//! Mode switch mappings: the Fan-only and Dry toggles.
//!
//! Fan and Dry have no thermostat representation, so they ride on two
//! plain Switch services. A switch is "on" when the unit is powered in
//! exactly that mode.

use crate::hvac::{Mode, Power};

pub fn switch_on(power: Power, mode: Mode, switch_mode: Mode) -> bool {
    power == Power::On && mode == switch_mode
}

/// Driver commands for a switch write. Turning a switch on powers the
/// unit up in that mode; turning it off powers down and hands the mode
/// back to Auto so the thermostat owns the unit again.
pub fn apply_switch(on: bool, switch_mode: Mode) -> (Power, Mode) {
    if on {
        (Power::On, switch_mode)
    } else {
        (Power::Off, Mode::Auto)
    }
}
