//! Vendor HVAC driver model.
//!
//! Parameter vocabulary of the Mitsubishi CN105 serial driver. The driver
//! itself (packet framing, CRC, UART scheduling) is an external vendor
//! component; this crate sees it only through the
//! [`HvacPort`](crate::app::ports::HvacPort) trait and the [`HvacEvent`]
//! callback vocabulary below.
//!
//! Naming note: the driver calls the left/right "wide vane" `vane_vert`
//! and the up/down vane `vane_horiz`. That vendor convention is kept here
//! so the FFI boundary stays greppable against the component headers; the
//! HomeKit-facing services carry the human names ("Wide vane" / "Vane").

pub mod sim;

// ---------------------------------------------------------------------------
// Unit parameters
// ---------------------------------------------------------------------------

/// Unit power. Raw values match the vendor component's enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Power {
    Off = 0,
    On = 1,
}

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Heat = 1,
    Dry = 2,
    Cool = 3,
    Fan = 7,
    Auto = 8,
}

/// Fan speed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FanSpeed {
    Auto = 0,
    Quiet = 1,
    Low = 2,
    Med = 3,
    High = 5,
    Turbo = 6,
}

/// Wide-vane (left/right airflow) position. `vane_vert` in the vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VaneVert {
    Auto = 0,
    Leftest = 1,
    Left = 2,
    Center = 3,
    Right = 4,
    Rightest = 5,
    LeftRight = 8,
    Swing = 12,
}

/// Up/down vane position. `vane_horiz` in the vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VaneHoriz {
    Auto = 0,
    Pos1 = 1,
    Pos2 = 2,
    Pos3 = 3,
    Pos4 = 4,
    Pos5 = 5,
    Swing = 7,
}

impl Power {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            _ => None,
        }
    }
}

impl Mode {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Heat),
            2 => Some(Self::Dry),
            3 => Some(Self::Cool),
            7 => Some(Self::Fan),
            8 => Some(Self::Auto),
            _ => None,
        }
    }
}

impl FanSpeed {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Auto),
            1 => Some(Self::Quiet),
            2 => Some(Self::Low),
            3 => Some(Self::Med),
            5 => Some(Self::High),
            6 => Some(Self::Turbo),
            _ => None,
        }
    }
}

impl VaneVert {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Auto),
            1 => Some(Self::Leftest),
            2 => Some(Self::Left),
            3 => Some(Self::Center),
            4 => Some(Self::Right),
            5 => Some(Self::Rightest),
            8 => Some(Self::LeftRight),
            12 => Some(Self::Swing),
            _ => None,
        }
    }
}

impl VaneHoriz {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Auto),
            1 => Some(Self::Pos1),
            2 => Some(Self::Pos2),
            3 => Some(Self::Pos3),
            4 => Some(Self::Pos4),
            5 => Some(Self::Pos5),
            7 => Some(Self::Swing),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Full parameter snapshot
// ---------------------------------------------------------------------------

/// Point-in-time copy of every unit parameter the driver tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvacState {
    pub power: Power,
    pub mode: Mode,
    pub fan: FanSpeed,
    pub vane_vert: VaneVert,
    pub vane_horiz: VaneHoriz,
    /// Target temperature in °C.
    pub setpoint: f32,
    /// Measured room temperature in °C.
    pub room_temperature: f32,
    /// Serial link to the unit is up and the handshake completed.
    pub connected: bool,
    /// Compressor/fan actually running (reported by the unit).
    pub operating: bool,
}

impl Default for HvacState {
    fn default() -> Self {
        Self {
            power: Power::Off,
            mode: Mode::Auto,
            fan: FanSpeed::Auto,
            vane_vert: VaneVert::Auto,
            vane_horiz: VaneHoriz::Auto,
            setpoint: 21.0,
            room_temperature: 21.0,
            connected: false,
            operating: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Driver callback vocabulary
// ---------------------------------------------------------------------------

/// Events delivered asynchronously by the vendor driver.
///
/// Discriminants are stable — the lock-free queue in
/// [`events`](crate::events) stores them as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HvacEvent {
    /// Driver finished its UART/handshake setup.
    Initialized = 0,
    /// Connection to the unit established or lost.
    Connected = 1,
    /// Handshake with the unit failed.
    ConnectError = 2,
    /// The unit started or stopped actively heating/cooling.
    OperatingChanged = 3,
    /// One or more unit parameters changed (mode, fan, vanes, setpoint).
    ParamsChanged = 4,
    /// Measured room temperature changed.
    RoomTempChanged = 5,
    /// A parameter write was accepted by the unit.
    ParamsSet = 6,
    /// A parameter write was rejected by the unit.
    ParamsNotSet = 7,
    /// Raw packet sent to the unit (debug visibility only).
    PacketWrite = 8,
    /// Raw packet received from the unit (debug visibility only).
    PacketRead = 9,
    /// A received packet failed its checksum.
    PacketReadError = 10,
    /// Driver poll timer tick.
    Timer = 11,
}

impl HvacEvent {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Initialized),
            1 => Some(Self::Connected),
            2 => Some(Self::ConnectError),
            3 => Some(Self::OperatingChanged),
            4 => Some(Self::ParamsChanged),
            5 => Some(Self::RoomTempChanged),
            6 => Some(Self::ParamsSet),
            7 => Some(Self::ParamsNotSet),
            8 => Some(Self::PacketWrite),
            9 => Some(Self::PacketRead),
            10 => Some(Self::PacketReadError),
            11 => Some(Self::Timer),
            _ => None,
        }
    }
}
