//! HAP characteristic value vocabularies.
//!
//! Wire values are fixed by the HomeKit spec; the enums here exist so the
//! mapping layer never handles bare integers. `from_u8` rejects values
//! outside the characteristic's valid range (the stack enforces the range
//! too, but a rejected value must never reach the driver).

use serde::{Deserialize, Serialize};

/// Current Heating Cooling State (read-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CurrentHeatingCoolingState {
    Off = 0,
    Heat = 1,
    Cool = 2,
}

/// Target Heating Cooling State (read/write).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TargetHeatingCoolingState {
    Off = 0,
    Heat = 1,
    Cool = 2,
    Auto = 3,
}

/// Temperature Display Units — the single persisted preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TemperatureDisplayUnits {
    #[default]
    Celsius = 0,
    Fahrenheit = 1,
}

/// Current Slat State (read-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CurrentSlatState {
    Fixed = 0,
    Jammed = 1,
    Swinging = 2,
}

/// Slat Type (static per service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SlatType {
    Horizontal = 0,
    Vertical = 1,
}

/// Swing Mode (read/write).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SwingMode {
    Disabled = 0,
    Enabled = 1,
}

/// Active (fan service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Active {
    Inactive = 0,
    Active = 1,
}

/// Current Fan State (read-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CurrentFanState {
    Inactive = 0,
    Idle = 1,
    BlowingAir = 2,
}

/// Target Fan State (read/write).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TargetFanState {
    Manual = 0,
    Auto = 1,
}

impl TargetHeatingCoolingState {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::Heat),
            2 => Some(Self::Cool),
            3 => Some(Self::Auto),
            _ => None,
        }
    }
}

impl TemperatureDisplayUnits {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Celsius),
            1 => Some(Self::Fahrenheit),
            _ => None,
        }
    }
}

impl SwingMode {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Disabled),
            1 => Some(Self::Enabled),
            _ => None,
        }
    }
}

impl Active {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Inactive),
            1 => Some(Self::Active),
            _ => None,
        }
    }
}

impl TargetFanState {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Manual),
            1 => Some(Self::Auto),
            _ => None,
        }
    }
}
