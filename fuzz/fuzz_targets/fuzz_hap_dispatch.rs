//! Fuzz target: characteristic read/write dispatch
//!
//! Drives arbitrary `(iid, raw value)` pairs through the IID lookup and
//! the accessory service — the same path the vendor stack's trampolines
//! take — and verifies that no input sequence panics the dispatch.
//!
//! Invariants checked:
//! - No panics for any IID / value sequence
//! - Reads succeed whatever state earlier writes left behind
//! - Discrete characteristics always read inside their declared range
//!
//! cargo fuzz run fuzz_hap_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use melhap::app::ports::{ConfigError, ConfigPort, NotificationSink};
use melhap::app::service::AccessoryService;
use melhap::config::AccessoryPrefs;
use melhap::hap::db::{ATTRIBUTE_DB, CharacteristicId, Format, ServiceId};
use melhap::hap::HapValue;
use melhap::hvac::sim::SimulatedHvac;

struct NullSink;

impl NotificationSink for NullSink {
    fn raise(&mut self, _service: ServiceId, _characteristic: CharacteristicId) {}
}

struct NullPrefs;

impl ConfigPort for NullPrefs {
    fn load(&self) -> Result<AccessoryPrefs, ConfigError> {
        Ok(AccessoryPrefs::default())
    }

    fn save(&self, _prefs: &AccessoryPrefs) -> Result<(), ConfigError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let mut svc = AccessoryService::new();
    svc.set_server_running(true);
    let mut hvac = SimulatedHvac::connected();
    let cfg = NullPrefs;
    let mut sink = NullSink;

    // Each 10-byte chunk is one stack callback: u16 IID + f64 payload.
    for chunk in data.chunks_exact(10) {
        let iid = u64::from(u16::from_le_bytes([chunk[0], chunk[1]]));
        let raw = f64::from_le_bytes(chunk[2..10].try_into().unwrap());

        let Some(id) = CharacteristicId::from_iid(iid) else {
            continue;
        };

        let value = match id.descriptor().format {
            Format::Bool => HapValue::Bool(raw != 0.0),
            Format::UInt8 => HapValue::U8(raw as u8),
            Format::Int => HapValue::Int(raw as i32),
            Format::Float => HapValue::Float(raw as f32),
        };
        let _ = svc.write(id, value, &mut hvac, &cfg, &mut sink);

        // The whole table must stay readable, and every discrete
        // characteristic must stay inside its advertised range.
        for desc in ATTRIBUTE_DB {
            let read = svc.read(desc.id, &hvac).expect("read after write");
            let Some(range) = desc.range else { continue };
            let discrete = match read {
                HapValue::U8(v) => Some(f32::from(v)),
                HapValue::Int(v) => Some(v as f32),
                HapValue::Bool(_) | HapValue::Float(_) => None,
            };
            if let Some(v) = discrete {
                assert!(
                    v >= range.min && v <= range.max,
                    "{:?} read {} outside [{}, {}]",
                    desc.id,
                    v,
                    range.min,
                    range.max
                );
            }
        }
    }
});
