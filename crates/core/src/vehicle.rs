//! Mock vehicle state: six independent sub-records, each small enough to
//! replace wholesale. Nothing here talks to real hardware; the records
//! exist so command executors have something observable to mutate.
//!
//! Bounds live next to the fields they constrain. Executors never write a
//! value outside these ranges.

use serde::{Deserialize, Serialize};

/// Air-conditioning bounds and defaults.
pub const TEMP_MIN: u8 = 16;
pub const TEMP_MAX: u8 = 32;
pub const TEMP_DEFAULT: u8 = 24;
pub const FAN_MIN: u8 = 1;
pub const FAN_MAX: u8 = 5;
pub const FAN_DEFAULT: u8 = 3;

/// Seat position range.
pub const SEAT_MIN: u8 = 1;
pub const SEAT_MAX: u8 = 5;

/// The three window positions the voice UI distinguishes.
pub const WINDOW_CLOSED: u8 = 0;
pub const WINDOW_HALF: u8 = 50;
pub const WINDOW_OPEN: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateState {
    pub on: bool,
    pub temperature: u8,
    pub fan_speed: u8,
}

impl Default for ClimateState {
    fn default() -> Self {
        Self {
            on: false,
            temperature: TEMP_DEFAULT,
            fan_speed: FAN_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    pub position: u8,
    pub heating: bool,
}

impl Default for SeatState {
    fn default() -> Self {
        Self {
            position: 3,
            heating: false,
        }
    }
}

/// All cabin windows move together in this demo; the phrase list only
/// ever addresses 车窗 collectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub openness: u8,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            openness: WINDOW_CLOSED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub headlights: bool,
    pub ambient: bool,
    pub ambient_color: String,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            headlights: false,
            ambient: false,
            ambient_color: "白色".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorState {
    pub locked: bool,
    pub trunk_open: bool,
}

impl Default for DoorState {
    fn default() -> Self {
        Self {
            locked: true,
            trunk_open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub running: bool,
    pub fuel_percent: u8,
    pub range_km: u16,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            running: false,
            fuel_percent: 65,
            range_km: 420,
        }
    }
}

/// The whole simulated vehicle. Executors replace one sub-record at a
/// time; there are no cross-field invariants beyond the per-field bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    pub climate: ClimateState,
    pub seat: SeatState,
    pub windows: WindowState,
    pub lights: LightState,
    pub doors: DoorState,
    pub engine: EngineState,
}
