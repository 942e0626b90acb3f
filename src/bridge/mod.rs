//! The translation table between the two vocabularies.
//!
//! Every function in this module is a pure, O(1) mapping from driver
//! parameters to HAP characteristic values or back. No I/O, no state —
//! the [`AccessoryService`](crate::app::service::AccessoryService) owns
//! sequencing and notification fan-out; this layer owns only *what* a
//! value translates to.
//!
//! The mappings are deliberately asymmetric in places (e.g. both
//! `FanSpeed::Auto` and `FanSpeed::Turbo` read back as 100% rotation);
//! they reproduce the shipped behaviour of the accessory, not an
//! idealized round-trip.

pub mod fan;
pub mod modes;
pub mod thermostat;
pub mod vanes;
