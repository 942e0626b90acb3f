//! Accessory identity derived from the ESP32 factory MAC address.
//!
//! Produces a stable, human-readable name in the form `MEL-XXYYZZ`
//! (last 3 bytes of the 6-byte MAC in uppercase hex). This name is:
//! - Deterministic across reboots (factory-burned eFuse MAC)
//! - The accessory's HomeKit display name and serial number
//! - The mDNS hostname in lowercase (`melhap-xxyyzz.local`)

/// Fixed-size accessory name: "MEL-XXYYZZ".
pub type AccessoryName = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Accessory name from the last 3 MAC bytes, e.g. `MEL-EFCAFE`.
pub fn accessory_name(mac: &MacAddress) -> AccessoryName {
    let mut name = AccessoryName::new();
    use core::fmt::Write;
    let _ = write!(name, "MEL-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    name
}

/// mDNS hostname, e.g. `melhap-efcafe`.
pub fn hostname(mac: &MacAddress) -> heapless::String<24> {
    let mut name = heapless::String::<24>::new();
    use core::fmt::Write;
    let _ = write!(name, "melhap-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}
