//! Application core — pure bridge logic, zero I/O.
//!
//! This module owns the accessory's behaviour: characteristic read/write
//! dispatch, driver event fan-out, and the persisted display-unit
//! preference. All interaction with the outside world (vendor driver,
//! HAP stack, NVS) happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without hardware or vendor
//! components.

pub mod ports;
pub mod service;
