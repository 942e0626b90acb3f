//! Fuzz target: preference blob decoding
//!
//! Feeds arbitrary byte sequences to the decoder behind `ConfigPort::load`
//! and verifies that a flash blob of any shape — truncated, oversized,
//! leftovers from an older firmware — can never panic the boot path.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Any blob the decoder accepts holds a legal display unit
//! - Accepted blobs survive a re-encode/re-decode round trip
//!
//! cargo fuzz run fuzz_prefs_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use melhap::config::AccessoryPrefs;
use melhap::hap::chars::TemperatureDisplayUnits;

fuzz_target!(|data: &[u8]| {
    let Ok(prefs) = postcard::from_bytes::<AccessoryPrefs>(data) else {
        return;
    };

    assert!(
        matches!(
            prefs.display_units,
            TemperatureDisplayUnits::Celsius | TemperatureDisplayUnits::Fahrenheit
        ),
        "decoder accepted an out-of-vocabulary display unit"
    );

    let bytes = postcard::to_allocvec(&prefs).expect("re-encode of accepted blob");
    let back: AccessoryPrefs = postcard::from_bytes(&bytes).expect("re-decode of own encoding");
    assert_eq!(prefs, back);
});
