//! Accessory attribute database.
//!
//! Static description of every service and characteristic the accessory
//! exposes, with the same stable IIDs as the shipped attribute table: one
//! 0x0N30 block per service, characteristic IIDs at fixed offsets inside
//! the block. Controllers cache the database against these IIDs, so they
//! must never change between firmware versions.
//!
//! The vendor HAP stack consumes this table at startup; the service layer
//! uses it for constraint clamping and IID → characteristic dispatch.

/// Accessory instance ID (single-accessory bridge).
pub const ACCESSORY_AID: u64 = 1;

/// HAP accessory category: Air Conditioner.
pub const ACCESSORY_CATEGORY: u8 = 21;

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// The six application services of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceId {
    /// Primary thermostat (temperature + heat/cool mode).
    Thermostat,
    /// Wide vane (left/right airflow), exposed as a Slat service.
    VaneVert,
    /// Up/down vane, exposed as a Slat service.
    VaneHoriz,
    /// Fan speed control (fan v2 service).
    Fan,
    /// "Fan only" mode toggle, exposed as a Switch.
    ModeFan,
    /// "Dry" mode toggle, exposed as a Switch.
    ModeDry,
}

/// HAP service type backing a [`ServiceId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Thermostat,
    Slat,
    Fan,
    Switch,
}

impl ServiceId {
    pub const ALL: [ServiceId; 6] = [
        Self::Thermostat,
        Self::VaneVert,
        Self::VaneHoriz,
        Self::Fan,
        Self::ModeFan,
        Self::ModeDry,
    ];

    /// Service instance ID (base of the service's IID block).
    pub const fn iid(self) -> u64 {
        match self {
            Self::Thermostat => 0x0130,
            Self::VaneVert => 0x0230,
            Self::VaneHoriz => 0x0330,
            Self::Fan => 0x0430,
            Self::ModeFan => 0x0530,
            Self::ModeDry => 0x0630,
        }
    }

    pub const fn kind(self) -> ServiceKind {
        match self {
            Self::Thermostat => ServiceKind::Thermostat,
            Self::VaneVert | Self::VaneHoriz => ServiceKind::Slat,
            Self::Fan => ServiceKind::Fan,
            Self::ModeFan | Self::ModeDry => ServiceKind::Switch,
        }
    }

    /// Only the thermostat shows up as the accessory's primary service.
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Thermostat)
    }

    /// User-visible service name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thermostat => "Thermostat",
            Self::VaneVert => "Wide vane",
            Self::VaneHoriz => "Vane",
            Self::Fan => "Fan",
            Self::ModeFan => "Fan mode",
            Self::ModeDry => "Dry mode",
        }
    }
}

// ---------------------------------------------------------------------------
// Characteristics
// ---------------------------------------------------------------------------

/// Every application characteristic in the database.
///
/// Service signature and name characteristics are handled inside the
/// vendor stack and do not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacteristicId {
    // Thermostat
    CurrentTemperature,
    TargetTemperature,
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    TemperatureDisplayUnits,
    ThermostatStatusActive,

    // Wide vane (Slat)
    VaneVertCurrentState,
    VaneVertType,
    VaneVertCurrentTilt,
    VaneVertTargetTilt,
    VaneVertSwingMode,
    VaneVertStatusActive,

    // Up/down vane (Slat)
    VaneHorizCurrentState,
    VaneHorizType,
    VaneHorizCurrentTilt,
    VaneHorizTargetTilt,
    VaneHorizSwingMode,
    VaneHorizStatusActive,

    // Fan
    FanActive,
    FanCurrentState,
    FanTargetState,
    FanRotationSpeed,
    FanStatusActive,

    // Mode switches
    ModeFanOn,
    ModeFanStatusActive,
    ModeDryOn,
    ModeDryStatusActive,
}

/// Wire format of a characteristic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bool,
    UInt8,
    Int,
    Float,
}

/// Numeric constraints (min/max/step), shared across formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp a value into `[min, max]` (the read-side guard the original
    /// handlers apply to temperatures).
    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// One row of the attribute database.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub id: CharacteristicId,
    pub service: ServiceId,
    pub iid: u64,
    pub format: Format,
    pub readable: bool,
    pub writable: bool,
    pub notifies: bool,
    pub range: Option<Range>,
}

const fn desc(
    id: CharacteristicId,
    service: ServiceId,
    iid: u64,
    format: Format,
    writable: bool,
    notifies: bool,
    range: Option<Range>,
) -> Descriptor {
    Descriptor {
        id,
        service,
        iid,
        format,
        readable: true,
        writable,
        notifies,
        range,
    }
}

/// The full table. Order is service-major, matching IID order.
pub static ATTRIBUTE_DB: &[Descriptor] = &[
    // ── Thermostat (0x0130) ───────────────────────────────────
    desc(
        CharacteristicId::CurrentTemperature,
        ServiceId::Thermostat,
        0x0134,
        Format::Float,
        false,
        true,
        Some(Range::new(-50.0, 50.0, 0.1)),
    ),
    desc(
        CharacteristicId::TargetTemperature,
        ServiceId::Thermostat,
        0x0135,
        Format::Float,
        true,
        true,
        Some(Range::new(16.0, 31.0, 0.5)),
    ),
    desc(
        CharacteristicId::CurrentHeatingCoolingState,
        ServiceId::Thermostat,
        0x0136,
        Format::UInt8,
        false,
        true,
        Some(Range::new(0.0, 2.0, 1.0)),
    ),
    desc(
        CharacteristicId::TargetHeatingCoolingState,
        ServiceId::Thermostat,
        0x0137,
        Format::UInt8,
        true,
        true,
        Some(Range::new(0.0, 3.0, 1.0)),
    ),
    desc(
        CharacteristicId::TemperatureDisplayUnits,
        ServiceId::Thermostat,
        0x013A,
        Format::UInt8,
        true,
        true,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::ThermostatStatusActive,
        ServiceId::Thermostat,
        0x013B,
        Format::Bool,
        false,
        true,
        None,
    ),
    // ── Wide vane (0x0230) ────────────────────────────────────
    desc(
        CharacteristicId::VaneVertCurrentState,
        ServiceId::VaneVert,
        0x0233,
        Format::UInt8,
        false,
        true,
        Some(Range::new(0.0, 2.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneVertType,
        ServiceId::VaneVert,
        0x0234,
        Format::UInt8,
        false,
        false,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneVertCurrentTilt,
        ServiceId::VaneVert,
        0x0235,
        Format::Int,
        false,
        true,
        Some(Range::new(-90.0, 90.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneVertTargetTilt,
        ServiceId::VaneVert,
        0x0236,
        Format::Int,
        true,
        true,
        Some(Range::new(-90.0, 90.0, 45.0)),
    ),
    desc(
        CharacteristicId::VaneVertSwingMode,
        ServiceId::VaneVert,
        0x0237,
        Format::UInt8,
        true,
        true,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneVertStatusActive,
        ServiceId::VaneVert,
        0x0238,
        Format::Bool,
        false,
        true,
        None,
    ),
    // ── Up/down vane (0x0330) ─────────────────────────────────
    desc(
        CharacteristicId::VaneHorizCurrentState,
        ServiceId::VaneHoriz,
        0x0333,
        Format::UInt8,
        false,
        true,
        Some(Range::new(0.0, 2.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneHorizType,
        ServiceId::VaneHoriz,
        0x0334,
        Format::UInt8,
        false,
        false,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneHorizCurrentTilt,
        ServiceId::VaneHoriz,
        0x0335,
        Format::Int,
        false,
        true,
        Some(Range::new(-90.0, 90.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneHorizTargetTilt,
        ServiceId::VaneHoriz,
        0x0336,
        Format::Int,
        true,
        true,
        Some(Range::new(-90.0, 90.0, 45.0)),
    ),
    desc(
        CharacteristicId::VaneHorizSwingMode,
        ServiceId::VaneHoriz,
        0x0337,
        Format::UInt8,
        true,
        true,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::VaneHorizStatusActive,
        ServiceId::VaneHoriz,
        0x0338,
        Format::Bool,
        false,
        true,
        None,
    ),
    // ── Fan (0x0430) ──────────────────────────────────────────
    desc(
        CharacteristicId::FanActive,
        ServiceId::Fan,
        0x0433,
        Format::UInt8,
        true,
        true,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::FanCurrentState,
        ServiceId::Fan,
        0x0434,
        Format::UInt8,
        false,
        true,
        Some(Range::new(0.0, 2.0, 1.0)),
    ),
    desc(
        CharacteristicId::FanTargetState,
        ServiceId::Fan,
        0x0435,
        Format::UInt8,
        true,
        true,
        Some(Range::new(0.0, 1.0, 1.0)),
    ),
    desc(
        CharacteristicId::FanRotationSpeed,
        ServiceId::Fan,
        0x0436,
        Format::Float,
        true,
        true,
        Some(Range::new(0.0, 100.0, 25.0)),
    ),
    desc(
        CharacteristicId::FanStatusActive,
        ServiceId::Fan,
        0x0437,
        Format::Bool,
        false,
        true,
        None,
    ),
    // ── Mode switches (0x0530 / 0x0630) ───────────────────────
    desc(
        CharacteristicId::ModeFanOn,
        ServiceId::ModeFan,
        0x0533,
        Format::Bool,
        true,
        true,
        None,
    ),
    desc(
        CharacteristicId::ModeFanStatusActive,
        ServiceId::ModeFan,
        0x0534,
        Format::Bool,
        false,
        true,
        None,
    ),
    desc(
        CharacteristicId::ModeDryOn,
        ServiceId::ModeDry,
        0x0633,
        Format::Bool,
        true,
        true,
        None,
    ),
    desc(
        CharacteristicId::ModeDryStatusActive,
        ServiceId::ModeDry,
        0x0634,
        Format::Bool,
        false,
        true,
        None,
    ),
];

impl CharacteristicId {
    /// Database row for this characteristic.
    pub fn descriptor(self) -> &'static Descriptor {
        // The table covers every variant; the scan is over a fixed-size
        // constant table.
        ATTRIBUTE_DB
            .iter()
            .find(|d| d.id == self)
            .expect("attribute database covers every characteristic")
    }

    pub fn service(self) -> ServiceId {
        self.descriptor().service
    }

    pub fn iid(self) -> u64 {
        self.descriptor().iid
    }

    /// Reverse lookup used by the FFI read/write trampolines.
    pub fn from_iid(iid: u64) -> Option<Self> {
        ATTRIBUTE_DB.iter().find(|d| d.iid == iid).map(|d| d.id)
    }
}
