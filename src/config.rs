//! System configuration and persisted preferences.
//!
//! [`SystemConfig`] holds the boot-time tunables (LED wiring, blink
//! feedback durations, heartbeat cadence). It is compiled in and never
//! persisted — the only state this accessory stores is the single
//! display-unit byte in [`AccessoryPrefs`].

use serde::{Deserialize, Serialize};

use crate::hap::chars::TemperatureDisplayUnits;

/// The persisted accessory preference blob.
///
/// Kept deliberately tiny: controllers own everything else. Encoded with
/// postcard into NVS; an unknown or truncated blob resets to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryPrefs {
    /// Unit the Current Temperature characteristic is displayed in.
    pub display_units: TemperatureDisplayUnits,
}

/// Boot-time system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Status LED ---
    /// GPIO driving the activity LED.
    pub led_gpio: i32,
    /// Most dev boards wire the LED between VCC and the pin.
    pub led_active_low: bool,

    // --- Blink feedback durations (milliseconds) ---
    /// Pulse when the unit accepts a parameter write.
    pub blink_update_ms: u16,
    /// Pulse when the unit reports changed parameters.
    pub blink_sync_ms: u16,
    /// Pulse on a room temperature report.
    pub blink_room_ms: u16,

    // --- Timing ---
    /// Uptime/heap heartbeat log interval (seconds).
    pub heartbeat_secs: u32,
    /// Main loop poll interval (milliseconds).
    pub loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            led_gpio: 2,
            led_active_low: true,

            blink_update_ms: 100,
            blink_sync_ms: 30,
            blink_room_ms: 10,

            heartbeat_secs: 1,
            loop_interval_ms: 50,
        }
    }
}

impl SystemConfig {
    /// Range-check the tunables. Rejects values that would wedge the
    /// main loop or turn the LED into a constant light.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.blink_update_ms == 0 || self.blink_update_ms > 5_000 {
            return Err("blink_update_ms must be 1–5000");
        }
        if self.blink_sync_ms == 0 || self.blink_sync_ms > 5_000 {
            return Err("blink_sync_ms must be 1–5000");
        }
        if self.blink_room_ms == 0 || self.blink_room_ms > 5_000 {
            return Err("blink_room_ms must be 1–5000");
        }
        if self.heartbeat_secs == 0 {
            return Err("heartbeat_secs must be > 0");
        }
        if !(10..=1_000).contains(&self.loop_interval_ms) {
            return Err("loop_interval_ms must be 10–1000");
        }
        Ok(())
    }
}
