//! Drivers — the little hardware this accessory owns directly.
//!
//! The serial link and the HomeKit radio side live in vendor components;
//! the only peripheral this crate drives itself is the activity LED.

pub mod blink;
pub mod status_led;
