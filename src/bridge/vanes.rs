//! Slat service mappings: vane positions as tilt angles and swing modes.
//!
//! Both vanes expose five discrete positions on a −90°..90° tilt scale
//! (45° steps on the write side). Swing is a separate characteristic;
//! while swinging, the tilt reads 0°.

use crate::hap::chars::{CurrentSlatState, SwingMode};
use crate::hvac::{VaneHoriz, VaneVert};

// ── Wide vane (left/right, `vane_vert` in the driver) ─────────

pub fn vert_tilt_angle(vane: VaneVert) -> i32 {
    match vane {
        VaneVert::Leftest => -90,
        VaneVert::Left => -45,
        VaneVert::Right => 45,
        VaneVert::Rightest => 90,
        VaneVert::Auto | VaneVert::LeftRight | VaneVert::Center | VaneVert::Swing => 0,
    }
}

/// Position for a target tilt write. The stack's 45° step constraint
/// makes the five grid angles the only expected inputs; anything else
/// centers the vane.
pub fn vert_for_tilt(angle: i32) -> VaneVert {
    match angle {
        -90 => VaneVert::Leftest,
        -45 => VaneVert::Left,
        0 => VaneVert::Center,
        45 => VaneVert::Right,
        90 => VaneVert::Rightest,
        _ => VaneVert::Center,
    }
}

pub fn vert_slat_state(vane: VaneVert) -> CurrentSlatState {
    if vane == VaneVert::Swing {
        CurrentSlatState::Swinging
    } else {
        CurrentSlatState::Fixed
    }
}

pub fn vert_swing_mode(vane: VaneVert) -> SwingMode {
    if vane == VaneVert::Swing {
        SwingMode::Enabled
    } else {
        SwingMode::Disabled
    }
}

/// Disabling swing hands the vane back to Auto rather than a fixed
/// position — the tilt write is the way to pin it.
pub fn vert_for_swing(mode: SwingMode) -> VaneVert {
    match mode {
        SwingMode::Enabled => VaneVert::Swing,
        SwingMode::Disabled => VaneVert::Auto,
    }
}

// ── Up/down vane (`vane_horiz` in the driver) ─────────────────

pub fn horiz_tilt_angle(vane: VaneHoriz) -> i32 {
    match vane {
        VaneHoriz::Pos1 => -90,
        VaneHoriz::Pos2 => -45,
        VaneHoriz::Pos4 => 45,
        VaneHoriz::Pos5 => 90,
        VaneHoriz::Auto | VaneHoriz::Pos3 | VaneHoriz::Swing => 0,
    }
}

pub fn horiz_for_tilt(angle: i32) -> VaneHoriz {
    match angle {
        -90 => VaneHoriz::Pos1,
        -45 => VaneHoriz::Pos2,
        0 => VaneHoriz::Pos3,
        45 => VaneHoriz::Pos4,
        90 => VaneHoriz::Pos5,
        _ => VaneHoriz::Auto,
    }
}

pub fn horiz_slat_state(vane: VaneHoriz) -> CurrentSlatState {
    if vane == VaneHoriz::Swing {
        CurrentSlatState::Swinging
    } else {
        CurrentSlatState::Fixed
    }
}

pub fn horiz_swing_mode(vane: VaneHoriz) -> SwingMode {
    if vane == VaneHoriz::Swing {
        SwingMode::Enabled
    } else {
        SwingMode::Disabled
    }
}

pub fn horiz_for_swing(mode: SwingMode) -> VaneHoriz {
    match mode {
        SwingMode::Enabled => VaneHoriz::Swing,
        SwingMode::Disabled => VaneHoriz::Auto,
    }
}
