//! Port traits — the hexagonal boundary between bridge logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AccessoryService (domain)
//! ```
//!
//! Driven adapters (the vendor HVAC driver, the HAP stack's notification
//! surface, NVS storage) implement these traits. The
//! [`AccessoryService`](super::service::AccessoryService) consumes them
//! via generics at call sites, so the bridge core never touches FFI or
//! flash directly.

use crate::config::AccessoryPrefs;
use crate::hap::db::{CharacteristicId, ServiceId};
use crate::hvac::{FanSpeed, Mode, Power, VaneHoriz, VaneVert};

// ───────────────────────────────────────────────────────────────
// HVAC driver port (driven adapter: vendor serial driver ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The vendor driver's parameter surface.
///
/// Getters return the driver's last-synced view of the unit; setters
/// queue a parameter write that the driver applies on its next exchange.
/// All calls are O(1) and non-blocking. The only failure the bridge can
/// observe is `connected() == false` — the driver keeps retrying the
/// serial handshake on its own.
pub trait HvacPort {
    fn power(&self) -> Power;
    fn mode(&self) -> Mode;
    fn fan(&self) -> FanSpeed;
    fn vane_vert(&self) -> VaneVert;
    fn vane_horiz(&self) -> VaneHoriz;
    /// Target temperature in °C.
    fn setpoint(&self) -> f32;
    /// Measured room temperature in °C.
    fn room_temperature(&self) -> f32;
    fn connected(&self) -> bool;
    fn operating(&self) -> bool;

    fn set_power(&mut self, power: Power);
    fn set_mode(&mut self, mode: Mode);
    fn set_fan(&mut self, fan: FanSpeed);
    fn set_vane_vert(&mut self, vane: VaneVert);
    fn set_vane_horiz(&mut self, vane: VaneHoriz);
    fn set_setpoint(&mut self, celsius: f32);
}

// ───────────────────────────────────────────────────────────────
// Notification port (domain → HAP stack)
// ───────────────────────────────────────────────────────────────

/// The domain raises characteristic-changed events through this port;
/// the adapter forwards them to the vendor stack, which fans them out to
/// subscribed controllers.
pub trait NotificationSink {
    fn raise(&mut self, service: ServiceId, characteristic: CharacteristicId);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persisted preference)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the accessory preference blob.
pub trait ConfigPort {
    /// Load preferences from persistent storage.
    /// Returns [`AccessoryPrefs::default()`] if nothing is stored.
    fn load(&self) -> Result<AccessoryPrefs, ConfigError>;

    /// Persist preferences.
    fn save(&self, prefs: &AccessoryPrefs) -> Result<(), ConfigError>;

    /// Erase the preference namespace (factory reset).
    fn reset(&mut self) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (adapter ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Namespaced key-value blob storage (NVS on device, in-memory on host).
/// Writes are atomic — ESP-IDF NVS commits guarantee this natively.
pub trait StoragePort {
    /// Read a value. Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No preference blob found in storage (first boot).
    NotFound,
    /// Stored blob failed the deserialization check.
    Corrupted,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "preferences not found"),
            Self::Corrupted => write!(f, "preferences corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
