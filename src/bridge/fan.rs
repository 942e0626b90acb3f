//! Fan service mappings: rotation speed percentage and fan states.

use crate::hap::chars::{Active, CurrentFanState, TargetFanState};
use crate::hvac::{FanSpeed, Power};

/// Fan speed step as a Rotation Speed percentage.
///
/// The characteristic uses 25% steps. Quiet sits at 0% (distinguishable
/// from off only via the Active characteristic) and both Auto and Turbo
/// read 100% — the driver has more steps than the slider.
pub fn rotation_percent(power: Power, fan: FanSpeed) -> f32 {
    if power == Power::Off {
        return 0.0;
    }
    match fan {
        FanSpeed::Quiet => 0.0,
        FanSpeed::Low => 25.0,
        FanSpeed::Med => 50.0,
        FanSpeed::High => 75.0,
        FanSpeed::Auto | FanSpeed::Turbo => 100.0,
    }
}

/// Fan speed step for a Rotation Speed write.
///
/// Only the exact 25% grid points select a step; anything else (a stack
/// that ignored the step constraint) returns `None` and leaves the
/// driver state untouched.
pub fn fan_for_rotation(percent: f32) -> Option<FanSpeed> {
    match percent as u8 {
        0 => Some(FanSpeed::Quiet),
        25 => Some(FanSpeed::Low),
        50 => Some(FanSpeed::Med),
        75 => Some(FanSpeed::High),
        100 => Some(FanSpeed::Turbo),
        _ => None,
    }
}

pub fn active(power: Power) -> Active {
    match power {
        Power::On => Active::Active,
        Power::Off => Active::Inactive,
    }
}

pub fn current_fan_state(power: Power) -> CurrentFanState {
    match power {
        Power::On => CurrentFanState::BlowingAir,
        Power::Off => CurrentFanState::Inactive,
    }
}

/// Auto only when the unit is powered and the fan step is Auto; a powered
/// unit on any fixed step — and a powered-down unit — reads Manual.
pub fn target_fan_state(power: Power, fan: FanSpeed) -> TargetFanState {
    if power == Power::Off {
        return TargetFanState::Manual;
    }
    if fan == FanSpeed::Auto {
        TargetFanState::Auto
    } else {
        TargetFanState::Manual
    }
}

/// Fan speed step for a Target Fan State write. Switching to Manual
/// parks the fan at Med until the user picks a speed.
pub fn fan_for_target_state(value: TargetFanState) -> FanSpeed {
    match value {
        TargetFanState::Auto => FanSpeed::Auto,
        TargetFanState::Manual => FanSpeed::Med,
    }
}
