//! Thermostat service mappings: heating/cooling state and temperatures.

use crate::hap::chars::{
    CurrentHeatingCoolingState, TargetHeatingCoolingState, TemperatureDisplayUnits,
};
use crate::hvac::{Mode, Power};

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Room temperature as shown by the Current Temperature characteristic.
///
/// Follows the shipped accessory: the value is converted to the persisted
/// display unit before being clamped against the characteristic range.
pub fn display_temperature(room_celsius: f32, units: TemperatureDisplayUnits) -> f32 {
    match units {
        TemperatureDisplayUnits::Celsius => room_celsius,
        TemperatureDisplayUnits::Fahrenheit => celsius_to_fahrenheit(room_celsius),
    }
}

/// What the unit is doing right now, as HomeKit understands it.
///
/// Off whenever the unit is powered down or reports itself idle. In Auto
/// the direction is inferred by comparing room temperature against the
/// setpoint. Fan and Dry have no thermostat representation and read Off.
pub fn current_state(
    power: Power,
    operating: bool,
    mode: Mode,
    room_celsius: f32,
    setpoint_celsius: f32,
) -> CurrentHeatingCoolingState {
    if power == Power::Off || !operating {
        return CurrentHeatingCoolingState::Off;
    }
    match mode {
        Mode::Cool => CurrentHeatingCoolingState::Cool,
        Mode::Heat => CurrentHeatingCoolingState::Heat,
        Mode::Auto => {
            if room_celsius > setpoint_celsius {
                CurrentHeatingCoolingState::Cool
            } else if room_celsius < setpoint_celsius {
                CurrentHeatingCoolingState::Heat
            } else {
                CurrentHeatingCoolingState::Off
            }
        }
        Mode::Fan | Mode::Dry => CurrentHeatingCoolingState::Off,
    }
}

/// The mode the user asked for, as HomeKit understands it.
pub fn target_state(power: Power, mode: Mode) -> TargetHeatingCoolingState {
    if power == Power::Off {
        return TargetHeatingCoolingState::Off;
    }
    match mode {
        Mode::Auto => TargetHeatingCoolingState::Auto,
        Mode::Cool => TargetHeatingCoolingState::Cool,
        Mode::Heat => TargetHeatingCoolingState::Heat,
        Mode::Fan | Mode::Dry => TargetHeatingCoolingState::Off,
    }
}

/// Driver commands for a Target Heating Cooling State write.
///
/// Returns the power and mode to apply. Writing Off while the unit is in
/// Fan or Dry keeps power on: those modes belong to the mode switches and
/// read as thermostat-Off anyway, so a controller syncing its cached Off
/// must not kill them.
pub fn apply_target_state(
    value: TargetHeatingCoolingState,
    current_mode: Mode,
) -> (Power, Mode) {
    let power = match value {
        TargetHeatingCoolingState::Off => {
            if current_mode == Mode::Dry || current_mode == Mode::Fan {
                Power::On
            } else {
                Power::Off
            }
        }
        _ => Power::On,
    };
    let mode = match value {
        TargetHeatingCoolingState::Auto => Mode::Auto,
        TargetHeatingCoolingState::Cool => Mode::Cool,
        TargetHeatingCoolingState::Heat => Mode::Heat,
        TargetHeatingCoolingState::Off => current_mode,
    };
    (power, mode)
}
