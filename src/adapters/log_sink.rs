//! Log-based notification sink adapter.
//!
//! Implements [`NotificationSink`] by writing every raised
//! characteristic-changed event to the logger. Used on host builds and
//! during early boot, before the HAP stack adapter takes over.

use log::info;

use crate::app::ports::NotificationSink;
use crate::hap::db::{CharacteristicId, ServiceId};

/// Adapter that logs every raised notification.
pub struct LogNotificationSink;

impl LogNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for LogNotificationSink {
    fn raise(&mut self, service: ServiceId, characteristic: CharacteristicId) {
        info!(
            "NOTIFY | {} | {:?} (iid {:#06x})",
            service.name(),
            characteristic,
            characteristic.iid()
        );
    }
}
