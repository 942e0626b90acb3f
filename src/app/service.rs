//! Accessory service — the hexagonal core.
//!
//! [`AccessoryService`] owns the persisted display-unit preference and
//! the dispatch between the HAP stack and the vendor driver:
//!
//! ```text
//!  HAP stack ──▶ ┌──────────────────────────┐ ──▶ NotificationSink
//!  (read/write)  │     AccessoryService     │
//!  HvacPort  ◀───│  bridge mapping tables   │
//!  (driver)  ───▶└──────────────────────────┘
//! ```
//!
//! Reads are pure lookups through the [`bridge`](crate::bridge) tables.
//! Writes translate a characteristic value into driver parameter sets
//! and raise the notification fan-out the shipped accessory raises.
//! Driver events arrive through [`handle_event`](AccessoryService::handle_event).

use log::{debug, info, warn};

use crate::bridge::{fan, modes, thermostat, vanes};
use crate::config::AccessoryPrefs;
use crate::hap::chars::{
    Active, SlatType, SwingMode, TargetFanState, TargetHeatingCoolingState,
    TemperatureDisplayUnits,
};
use crate::hap::db::{CharacteristicId, ServiceId};
use crate::hap::{HapError, HapValue};
use crate::hvac::{HvacEvent, Mode, Power};

use super::ports::{ConfigPort, HvacPort, NotificationSink};

// ───────────────────────────────────────────────────────────────
// Notification fan-out groups
// ───────────────────────────────────────────────────────────────
//
// One group per service, mirroring the shipped accessory's fan-out
// helpers. A write to one characteristic re-notifies its whole group
// because a single driver parameter feeds several characteristics.

const THERMOSTAT_GROUP: [CharacteristicId; 3] = [
    CharacteristicId::CurrentHeatingCoolingState,
    CharacteristicId::TargetHeatingCoolingState,
    CharacteristicId::TargetTemperature,
];

// After a target-state write the target state itself is skipped — the
// controller just set it and echoing it back confuses the Home app.
const THERMOSTAT_AFTER_TARGET_WRITE: [CharacteristicId; 2] = [
    CharacteristicId::CurrentHeatingCoolingState,
    CharacteristicId::TargetTemperature,
];

const FAN_GROUP: [CharacteristicId; 4] = [
    CharacteristicId::FanActive,
    CharacteristicId::FanCurrentState,
    CharacteristicId::FanTargetState,
    CharacteristicId::FanRotationSpeed,
];

const VANE_VERT_GROUP: [CharacteristicId; 4] = [
    CharacteristicId::VaneVertSwingMode,
    CharacteristicId::VaneVertCurrentState,
    CharacteristicId::VaneVertCurrentTilt,
    CharacteristicId::VaneVertTargetTilt,
];

const VANE_HORIZ_GROUP: [CharacteristicId; 4] = [
    CharacteristicId::VaneHorizSwingMode,
    CharacteristicId::VaneHorizCurrentState,
    CharacteristicId::VaneHorizCurrentTilt,
    CharacteristicId::VaneHorizTargetTilt,
];

const MODE_FAN_GROUP: [CharacteristicId; 1] = [CharacteristicId::ModeFanOn];

const MODE_DRY_GROUP: [CharacteristicId; 1] = [CharacteristicId::ModeDryOn];

const STATUS_ACTIVE_GROUP: [CharacteristicId; 6] = [
    CharacteristicId::ThermostatStatusActive,
    CharacteristicId::FanStatusActive,
    CharacteristicId::VaneVertStatusActive,
    CharacteristicId::VaneHorizStatusActive,
    CharacteristicId::ModeFanStatusActive,
    CharacteristicId::ModeDryStatusActive,
];

fn raise_group(sink: &mut impl NotificationSink, group: &[CharacteristicId]) {
    for id in group {
        sink.raise(id.service(), *id);
    }
}

// ───────────────────────────────────────────────────────────────
// LED feedback
// ───────────────────────────────────────────────────────────────

/// Activity-LED pulse requested by a driver event. The main loop maps
/// each kind to its configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedFeedback {
    /// The unit accepted a parameter write.
    Update,
    /// The unit reported changed parameters.
    Sync,
    /// The unit reported a room temperature.
    Room,
}

// ───────────────────────────────────────────────────────────────
// AccessoryService
// ───────────────────────────────────────────────────────────────

/// The accessory's application state and dispatch logic.
pub struct AccessoryService {
    prefs: AccessoryPrefs,
    /// Whether the HAP server is up — notifications raised before the
    /// stack starts would dereference a dead server on the C side.
    server_running: bool,
}

impl Default for AccessoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessoryService {
    pub fn new() -> Self {
        Self {
            prefs: AccessoryPrefs::default(),
            server_running: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load the persisted preference blob; a missing or corrupt blob
    /// falls back to defaults (Celsius).
    pub fn load_prefs(&mut self, cfg: &impl ConfigPort) {
        match cfg.load() {
            Ok(prefs) => {
                info!("Preferences loaded: {:?}", prefs.display_units);
                self.prefs = prefs;
            }
            Err(e) => {
                warn!("Preference load failed ({}), using defaults", e);
                self.prefs = AccessoryPrefs::default();
            }
        }
    }

    /// Purge the preference namespace and restore defaults (the
    /// app-side half of a factory reset; the stack wipes pairings).
    pub fn factory_reset(&mut self, cfg: &mut impl ConfigPort) {
        if let Err(e) = cfg.reset() {
            warn!("Preference purge failed: {}", e);
        }
        self.prefs = AccessoryPrefs::default();
        info!("Factory reset: preferences cleared");
    }

    pub fn set_server_running(&mut self, running: bool) {
        self.server_running = running;
    }

    pub fn prefs(&self) -> AccessoryPrefs {
        self.prefs
    }

    pub fn display_units(&self) -> TemperatureDisplayUnits {
        self.prefs.display_units
    }

    // ── Characteristic reads ──────────────────────────────────

    /// Service a characteristic read from the HAP stack.
    ///
    /// Reads never fail on a disconnected unit — the stack reports
    /// staleness through the Status Active characteristics instead.
    pub fn read(&self, id: CharacteristicId, hvac: &impl HvacPort) -> Result<HapValue, HapError> {
        use CharacteristicId as C;

        let value = match id {
            C::CurrentTemperature => {
                let shown =
                    thermostat::display_temperature(hvac.room_temperature(), self.prefs.display_units);
                let range = id.descriptor().range.ok_or(HapError::NotFound)?;
                HapValue::Float(range.clamp(shown))
            }
            C::TargetTemperature => {
                let range = id.descriptor().range.ok_or(HapError::NotFound)?;
                HapValue::Float(range.clamp(hvac.setpoint()))
            }
            C::CurrentHeatingCoolingState => HapValue::U8(thermostat::current_state(
                hvac.power(),
                hvac.operating(),
                hvac.mode(),
                hvac.room_temperature(),
                hvac.setpoint(),
            ) as u8),
            C::TargetHeatingCoolingState => {
                HapValue::U8(thermostat::target_state(hvac.power(), hvac.mode()) as u8)
            }
            C::TemperatureDisplayUnits => HapValue::U8(self.prefs.display_units as u8),

            C::ThermostatStatusActive
            | C::FanStatusActive
            | C::VaneVertStatusActive
            | C::VaneHorizStatusActive
            | C::ModeFanStatusActive
            | C::ModeDryStatusActive => HapValue::Bool(hvac.connected()),

            C::VaneVertCurrentState => HapValue::U8(vanes::vert_slat_state(hvac.vane_vert()) as u8),
            C::VaneVertType => HapValue::U8(SlatType::Vertical as u8),
            C::VaneVertCurrentTilt | C::VaneVertTargetTilt => {
                HapValue::Int(vanes::vert_tilt_angle(hvac.vane_vert()))
            }
            C::VaneVertSwingMode => HapValue::U8(vanes::vert_swing_mode(hvac.vane_vert()) as u8),

            C::VaneHorizCurrentState => {
                HapValue::U8(vanes::horiz_slat_state(hvac.vane_horiz()) as u8)
            }
            C::VaneHorizType => HapValue::U8(SlatType::Horizontal as u8),
            C::VaneHorizCurrentTilt | C::VaneHorizTargetTilt => {
                HapValue::Int(vanes::horiz_tilt_angle(hvac.vane_horiz()))
            }
            C::VaneHorizSwingMode => HapValue::U8(vanes::horiz_swing_mode(hvac.vane_horiz()) as u8),

            C::FanActive => HapValue::U8(fan::active(hvac.power()) as u8),
            C::FanCurrentState => HapValue::U8(fan::current_fan_state(hvac.power()) as u8),
            C::FanTargetState => {
                HapValue::U8(fan::target_fan_state(hvac.power(), hvac.fan()) as u8)
            }
            C::FanRotationSpeed => {
                HapValue::Float(fan::rotation_percent(hvac.power(), hvac.fan()))
            }

            C::ModeFanOn => {
                HapValue::Bool(modes::switch_on(hvac.power(), hvac.mode(), Mode::Fan))
            }
            C::ModeDryOn => {
                HapValue::Bool(modes::switch_on(hvac.power(), hvac.mode(), Mode::Dry))
            }
        };

        debug!("read {:?}: {:?}", id, value);
        Ok(value)
    }

    // ── Characteristic writes ─────────────────────────────────

    /// Service a characteristic write from the HAP stack.
    ///
    /// Every write requires the serial link to be up. Parameter writes
    /// other than mode/power changes additionally require the unit to be
    /// powered on — the shipped accessory silently ignores them
    /// otherwise, and controllers rely on the follow-up notifications to
    /// re-sync their sliders.
    pub fn write(
        &mut self,
        id: CharacteristicId,
        value: HapValue,
        hvac: &mut impl HvacPort,
        cfg: &impl ConfigPort,
        sink: &mut impl NotificationSink,
    ) -> Result<(), HapError> {
        use CharacteristicId as C;

        info!("write {:?}: {:?}", id, value);

        if !hvac.connected() {
            return Err(HapError::InvalidState);
        }

        match id {
            C::TargetTemperature => {
                let celsius = value.as_f32().ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    hvac.set_setpoint(celsius);
                }
                sink.raise(ServiceId::Thermostat, C::TargetTemperature);
            }

            C::TargetHeatingCoolingState => {
                let target = value
                    .as_u8()
                    .and_then(TargetHeatingCoolingState::from_u8)
                    .ok_or(HapError::InvalidValue)?;
                let (power, mode) = thermostat::apply_target_state(target, hvac.mode());
                hvac.set_power(power);
                hvac.set_mode(mode);

                raise_group(sink, &FAN_GROUP);
                raise_group(sink, &THERMOSTAT_AFTER_TARGET_WRITE);
                raise_group(sink, &MODE_FAN_GROUP);
                raise_group(sink, &MODE_DRY_GROUP);
            }

            C::TemperatureDisplayUnits => {
                let units = value
                    .as_u8()
                    .and_then(TemperatureDisplayUnits::from_u8)
                    .ok_or(HapError::InvalidValue)?;
                if self.prefs.display_units != units {
                    self.prefs.display_units = units;
                    if let Err(e) = cfg.save(&self.prefs) {
                        warn!("Preference save failed: {}", e);
                    }
                    sink.raise(ServiceId::Thermostat, C::TemperatureDisplayUnits);
                    sink.raise(ServiceId::Thermostat, C::CurrentTemperature);
                }
            }

            C::FanActive => {
                // Power is owned by the thermostat and mode switches; the
                // fan service only re-syncs its own characteristics.
                value
                    .as_u8()
                    .and_then(Active::from_u8)
                    .ok_or(HapError::InvalidValue)?;
                raise_group(sink, &FAN_GROUP);
            }

            C::FanTargetState => {
                let target = value
                    .as_u8()
                    .and_then(TargetFanState::from_u8)
                    .ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    hvac.set_fan(fan::fan_for_target_state(target));
                }
                raise_group(sink, &FAN_GROUP);
            }

            C::FanRotationSpeed => {
                let percent = value.as_f32().ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    if let Some(speed) = fan::fan_for_rotation(percent) {
                        hvac.set_fan(speed);
                    }
                }
                raise_group(sink, &FAN_GROUP);
            }

            C::VaneVertTargetTilt => {
                let angle = value.as_i32().ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    hvac.set_vane_vert(vanes::vert_for_tilt(angle));
                }
                raise_group(sink, &VANE_VERT_GROUP);
            }

            C::VaneVertSwingMode => {
                let mode = value
                    .as_u8()
                    .and_then(SwingMode::from_u8)
                    .ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    hvac.set_vane_vert(vanes::vert_for_swing(mode));
                }
                raise_group(sink, &VANE_VERT_GROUP);
            }

            C::VaneHorizTargetTilt => {
                let angle = value.as_i32().ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    hvac.set_vane_horiz(vanes::horiz_for_tilt(angle));
                }
                raise_group(sink, &VANE_HORIZ_GROUP);
            }

            C::VaneHorizSwingMode => {
                let mode = value
                    .as_u8()
                    .and_then(SwingMode::from_u8)
                    .ok_or(HapError::InvalidValue)?;
                if hvac.power() == Power::On {
                    hvac.set_vane_horiz(vanes::horiz_for_swing(mode));
                }
                raise_group(sink, &VANE_HORIZ_GROUP);
            }

            C::ModeFanOn => {
                let on = value.as_bool().ok_or(HapError::InvalidValue)?;
                let (power, mode) = modes::apply_switch(on, Mode::Fan);
                hvac.set_power(power);
                hvac.set_mode(mode);

                raise_group(sink, &THERMOSTAT_GROUP);
                raise_group(sink, &FAN_GROUP);
                raise_group(sink, &MODE_FAN_GROUP);
                raise_group(sink, &MODE_DRY_GROUP);
            }

            C::ModeDryOn => {
                let on = value.as_bool().ok_or(HapError::InvalidValue)?;
                let (power, mode) = modes::apply_switch(on, Mode::Dry);
                hvac.set_power(power);
                hvac.set_mode(mode);

                raise_group(sink, &THERMOSTAT_GROUP);
                raise_group(sink, &FAN_GROUP);
                raise_group(sink, &MODE_FAN_GROUP);
                raise_group(sink, &MODE_DRY_GROUP);
            }

            // Read-only characteristics never reach the write path.
            _ => return Err(HapError::InvalidValue),
        }

        Ok(())
    }

    // ── Driver events ─────────────────────────────────────────

    /// React to a vendor driver event: log it, raise the matching
    /// notifications, and tell the caller which LED pulse (if any) the
    /// event earns. LED feedback is returned even while the HAP server
    /// is down — the link to the unit is alive either way.
    pub fn handle_event(
        &mut self,
        event: HvacEvent,
        hvac: &impl HvacPort,
        sink: &mut impl NotificationSink,
    ) -> Option<LedFeedback> {
        match event {
            HvacEvent::Initialized => {
                info!("HVAC driver initialized");
                None
            }
            HvacEvent::Connected => {
                info!("HVAC connected: {}", hvac.connected());
                if self.notifications_allowed() {
                    raise_group(sink, &STATUS_ACTIVE_GROUP);
                }
                None
            }
            HvacEvent::ConnectError => {
                warn!("HVAC connect error");
                None
            }
            HvacEvent::OperatingChanged => {
                info!("HVAC operating: {}", hvac.operating());
                if self.notifications_allowed() {
                    sink.raise(
                        ServiceId::Thermostat,
                        CharacteristicId::CurrentHeatingCoolingState,
                    );
                }
                None
            }
            HvacEvent::ParamsChanged => {
                if self.notifications_allowed() {
                    raise_group(sink, &THERMOSTAT_GROUP);
                    raise_group(sink, &FAN_GROUP);
                    raise_group(sink, &VANE_VERT_GROUP);
                    raise_group(sink, &VANE_HORIZ_GROUP);
                    raise_group(sink, &MODE_FAN_GROUP);
                    raise_group(sink, &MODE_DRY_GROUP);
                }
                Some(LedFeedback::Sync)
            }
            HvacEvent::RoomTempChanged => {
                info!("Room temperature: {:.1}", hvac.room_temperature());
                if self.notifications_allowed() {
                    sink.raise(ServiceId::Thermostat, CharacteristicId::CurrentTemperature);
                }
                Some(LedFeedback::Room)
            }
            HvacEvent::ParamsSet => {
                info!("Parameters applied by the unit");
                Some(LedFeedback::Update)
            }
            HvacEvent::ParamsNotSet => {
                warn!("Unit rejected parameter write");
                None
            }
            HvacEvent::PacketWrite | HvacEvent::PacketRead => {
                debug!("serial exchange: {:?}", event);
                None
            }
            HvacEvent::PacketReadError => {
                warn!("Packet checksum error");
                None
            }
            HvacEvent::Timer => None,
        }
    }

    fn notifications_allowed(&self) -> bool {
        if !self.server_running {
            warn!("HAP server is not running, skipping accessory update");
            return false;
        }
        true
    }
}
