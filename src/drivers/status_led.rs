//! Activity LED driver.
//!
//! Generic over [`embedded_hal::digital::OutputPin`] so the firmware can
//! hand it an ESP-IDF pin driver and tests can hand it a recording fake.
//! Handles the active-low wiring common on dev boards (LED between VCC
//! and the pin).

use embedded_hal::digital::OutputPin;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap a pin; the LED starts dark.
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            lit: false,
        };
        led.set(false);
        led
    }

    /// Drive the LED. Pin errors are ignored — there is nothing to do
    /// about a failed GPIO write on a status light.
    pub fn set(&mut self, lit: bool) {
        let high = lit != self.active_low;
        let _ = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.lit = lit;
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
