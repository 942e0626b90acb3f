//! melhap firmware library.
//!
//! Bridges a Mitsubishi Electric air conditioner (vendor CN105 serial
//! driver, linked as an external component) to a HomeKit accessory
//! (vendor HAP stack, likewise external). This crate owns the part in
//! between: the HAP attribute database, the HVAC parameter model, and
//! the bidirectional mapping between the two vocabularies.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod bridge;
pub mod config;
pub mod events;
pub mod hap;
pub mod hvac;

pub mod adapters;
pub mod drivers;
