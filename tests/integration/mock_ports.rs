//! Mock port implementations for integration tests.
//!
//! Records every raised notification and persisted preference so tests
//! can assert on the full interaction history without vendor components.

use std::cell::RefCell;

use melhap::app::ports::{ConfigError, ConfigPort, NotificationSink};
use melhap::config::AccessoryPrefs;
use melhap::hap::db::{CharacteristicId, ServiceId};

// ── Notification recorder ─────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub raised: Vec<(ServiceId, CharacteristicId)>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn characteristics(&self) -> Vec<CharacteristicId> {
        self.raised.iter().map(|(_, c)| *c).collect()
    }

    pub fn count_for(&self, id: CharacteristicId) -> usize {
        self.raised.iter().filter(|(_, c)| *c == id).count()
    }

    pub fn clear(&mut self) {
        self.raised.clear();
    }
}

impl NotificationSink for RecordingSink {
    fn raise(&mut self, service: ServiceId, characteristic: CharacteristicId) {
        self.raised.push((service, characteristic));
    }
}

// ── Preference store ──────────────────────────────────────────

/// In-memory ConfigPort. `fail_saves` simulates a worn-out flash.
#[derive(Default)]
pub struct MemPrefs {
    pub stored: RefCell<Option<AccessoryPrefs>>,
    pub fail_saves: bool,
}

#[allow(dead_code)]
impl MemPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stored(prefs: AccessoryPrefs) -> Self {
        Self {
            stored: RefCell::new(Some(prefs)),
            fail_saves: false,
        }
    }

    pub fn stored(&self) -> Option<AccessoryPrefs> {
        *self.stored.borrow()
    }
}

impl ConfigPort for MemPrefs {
    fn load(&self) -> Result<AccessoryPrefs, ConfigError> {
        (*self.stored.borrow()).ok_or(ConfigError::NotFound)
    }

    fn save(&self, prefs: &AccessoryPrefs) -> Result<(), ConfigError> {
        if self.fail_saves {
            return Err(ConfigError::IoError);
        }
        *self.stored.borrow_mut() = Some(*prefs);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ConfigError> {
        *self.stored.borrow_mut() = None;
        Ok(())
    }
}
