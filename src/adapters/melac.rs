//! Vendor MEL-AC driver adapter (FFI).
//!
//! The CN105 serial driver is a vendored C component: it owns the UART,
//! packet framing, CRC and retry logic, and keeps its own synced copy of
//! the unit parameters. This adapter is the typed veneer over its API —
//! [`HvacPort`](crate::app::ports::HvacPort) getters/setters plus the
//! event-callback trampoline that feeds the lock-free queue in
//! [`events`](crate::events).
//!
//! Everything here is `target_os = "espidf"` only; host builds use
//! [`SimulatedHvac`](crate::hvac::sim::SimulatedHvac) instead.

#[cfg(target_os = "espidf")]
use core::ffi::c_void;

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use crate::app::ports::HvacPort;
#[cfg(target_os = "espidf")]
use crate::events::push_event;
#[cfg(target_os = "espidf")]
use crate::hvac::{FanSpeed, HvacEvent, Mode, Power, VaneHoriz, VaneVert};

#[cfg(target_os = "espidf")]
unsafe extern "C" {
    fn mel_ac_start(uart_no: i32) -> bool;
    fn mel_ac_set_event_handler(
        handler: Option<unsafe extern "C" fn(ev: u8, arg: *mut c_void)>,
        arg: *mut c_void,
    );

    fn mel_ac_get_power() -> u8;
    fn mel_ac_get_mode() -> u8;
    fn mel_ac_get_fan() -> u8;
    fn mel_ac_get_vane_vert() -> u8;
    fn mel_ac_get_vane_horiz() -> u8;
    fn mel_ac_get_setpoint() -> f32;
    fn mel_ac_get_room_temperature() -> f32;
    fn mel_ac_get_connected() -> bool;
    fn mel_ac_get_operating() -> bool;

    fn mel_ac_set_power(power: u8);
    fn mel_ac_set_mode(mode: u8);
    fn mel_ac_set_fan(fan: u8);
    fn mel_ac_set_vane_vert(vane: u8);
    fn mel_ac_set_vane_horiz(vane: u8);
    fn mel_ac_set_setpoint(celsius: f32);
}

/// Driver event callback — runs on the component's UART task. Only the
/// event kind crosses into Rust; handlers re-read parameters when the
/// main loop drains the queue.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn on_driver_event(ev: u8, _arg: *mut c_void) {
    match HvacEvent::from_raw(ev) {
        Some(event) => {
            if !push_event(event) {
                warn!("event queue full, dropped {:?}", event);
            }
        }
        None => warn!("unknown driver event {}", ev),
    }
}

/// Typed handle to the vendored driver. Zero-sized — the component keeps
/// all state; constructing the handle is what registers the callback.
#[cfg(target_os = "espidf")]
pub struct MelAcDriver {
    _private: (),
}

#[cfg(target_os = "espidf")]
impl MelAcDriver {
    /// Start the driver on `uart_no` and hook the event callback.
    pub fn start(uart_no: i32) -> Result<Self, &'static str> {
        // SAFETY: called once from the main task before the UART task
        // exists; the handler stays registered for the process lifetime.
        unsafe {
            mel_ac_set_event_handler(Some(on_driver_event), core::ptr::null_mut());
            if !mel_ac_start(uart_no) {
                return Err("MEL-AC driver start failed");
            }
        }
        Ok(Self { _private: () })
    }
}

#[cfg(target_os = "espidf")]
impl HvacPort for MelAcDriver {
    fn power(&self) -> Power {
        Power::from_raw(unsafe { mel_ac_get_power() }).unwrap_or(Power::Off)
    }

    fn mode(&self) -> Mode {
        Mode::from_raw(unsafe { mel_ac_get_mode() }).unwrap_or(Mode::Auto)
    }

    fn fan(&self) -> FanSpeed {
        FanSpeed::from_raw(unsafe { mel_ac_get_fan() }).unwrap_or(FanSpeed::Auto)
    }

    fn vane_vert(&self) -> VaneVert {
        VaneVert::from_raw(unsafe { mel_ac_get_vane_vert() }).unwrap_or(VaneVert::Auto)
    }

    fn vane_horiz(&self) -> VaneHoriz {
        VaneHoriz::from_raw(unsafe { mel_ac_get_vane_horiz() }).unwrap_or(VaneHoriz::Auto)
    }

    fn setpoint(&self) -> f32 {
        unsafe { mel_ac_get_setpoint() }
    }

    fn room_temperature(&self) -> f32 {
        unsafe { mel_ac_get_room_temperature() }
    }

    fn connected(&self) -> bool {
        unsafe { mel_ac_get_connected() }
    }

    fn operating(&self) -> bool {
        unsafe { mel_ac_get_operating() }
    }

    fn set_power(&mut self, power: Power) {
        unsafe { mel_ac_set_power(power as u8) }
    }

    fn set_mode(&mut self, mode: Mode) {
        unsafe { mel_ac_set_mode(mode as u8) }
    }

    fn set_fan(&mut self, fan: FanSpeed) {
        unsafe { mel_ac_set_fan(fan as u8) }
    }

    fn set_vane_vert(&mut self, vane: VaneVert) {
        unsafe { mel_ac_set_vane_vert(vane as u8) }
    }

    fn set_vane_horiz(&mut self, vane: VaneHoriz) {
        unsafe { mel_ac_set_vane_horiz(vane as u8) }
    }

    fn set_setpoint(&mut self, celsius: f32) {
        unsafe { mel_ac_set_setpoint(celsius) }
    }
}
