//! The command taxonomy: everything the assistant can be asked to do.
//!
//! A `Command` is the immutable value produced by the intent classifier and
//! consumed exactly once by an executor. It carries the specific command
//! type, its category (which picks the executor), and any auxiliary
//! parameters extracted from the utterance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Top-level command families. The category decides which executor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    Media,
    Vehicle,
    System,
    Query,
    Unknown,
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandCategory::Media => write!(f, "media"),
            CommandCategory::Vehicle => write!(f, "vehicle"),
            CommandCategory::System => write!(f, "system"),
            CommandCategory::Query => write!(f, "query"),
            CommandCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// Every command the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    // Media
    PlayMusic,
    PauseMusic,
    NextTrack,
    PrevTrack,
    VolumeUp,
    VolumeDown,
    VolumeSet,
    // Vehicle: climate
    AcOn,
    AcOff,
    TempUp,
    TempDown,
    TempSet,
    FanUp,
    FanDown,
    // Vehicle: seat
    SeatUp,
    SeatDown,
    SeatHeatOn,
    SeatHeatOff,
    // Vehicle: windows
    WindowOpen,
    WindowClose,
    WindowHalf,
    // Vehicle: lights
    HeadlightOn,
    HeadlightOff,
    AmbientOn,
    AmbientOff,
    AmbientColor,
    // Vehicle: doors
    DoorLock,
    DoorUnlock,
    TrunkOpen,
    TrunkClose,
    // Vehicle: engine
    EngineStart,
    EngineStop,
    // System settings
    BrightnessUp,
    BrightnessDown,
    BluetoothOn,
    BluetoothOff,
    WifiOn,
    WifiOff,
    // Queries
    QueryTime,
    QueryWeather,
    QueryRange,
    QueryVehicleStatus,
    // Fallback
    Unknown,
}

impl CommandType {
    /// The category this command belongs to.
    pub fn category(&self) -> CommandCategory {
        use CommandType::*;
        match self {
            PlayMusic | PauseMusic | NextTrack | PrevTrack | VolumeUp | VolumeDown | VolumeSet => {
                CommandCategory::Media
            }
            AcOn | AcOff | TempUp | TempDown | TempSet | FanUp | FanDown | SeatUp | SeatDown
            | SeatHeatOn | SeatHeatOff | WindowOpen | WindowClose | WindowHalf | HeadlightOn
            | HeadlightOff | AmbientOn | AmbientOff | AmbientColor | DoorLock | DoorUnlock
            | TrunkOpen | TrunkClose | EngineStart | EngineStop => CommandCategory::Vehicle,
            BrightnessUp | BrightnessDown | BluetoothOn | BluetoothOff | WifiOn | WifiOff => {
                CommandCategory::System
            }
            QueryTime | QueryWeather | QueryRange | QueryVehicleStatus => CommandCategory::Query,
            Unknown => CommandCategory::Unknown,
        }
    }
}

/// Parameter key for a numeric value ("温度调到24度" → `"24"`).
pub const PARAM_VALUE: &str = "value";
/// Parameter key for an ambient-light color name.
pub const PARAM_COLOR: &str = "color";
/// Parameter key for a city name in weather queries.
pub const PARAM_CITY: &str = "city";

/// A classified user intent plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub command_type: CommandType,
    pub category: CommandCategory,
    pub params: HashMap<String, String>,
}

impl Command {
    /// Builds a command with no parameters; the category is derived from
    /// the command type.
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            category: command_type.category(),
            params: HashMap::new(),
        }
    }

    /// Builds a command with a single parameter.
    pub fn with_param(command_type: CommandType, key: &str, value: impl Into<String>) -> Self {
        let mut cmd = Self::new(command_type);
        cmd.params.insert(key.to_string(), value.into());
        cmd
    }

    /// The fallback command for utterances no rule matched.
    pub fn unknown() -> Self {
        Self::new(CommandType::Unknown)
    }

    /// Looks up a parameter by key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses the numeric `"value"` parameter, if present and well formed.
    pub fn numeric_value(&self) -> Option<u32> {
        self.param(PARAM_VALUE).and_then(|v| v.parse().ok())
    }
}

/// Terminal value of one command execution. Errors are returned, not
/// thrown; nothing propagates out of the command layer as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum CommandResult {
    Success(String),
    Error(String),
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        CommandResult::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        CommandResult::Error(message.into())
    }

    /// The human-readable reply text, regardless of outcome.
    pub fn message(&self) -> &str {
        match self {
            CommandResult::Success(m) | CommandResult::Error(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping_covers_all_families() {
        assert_eq!(CommandType::PlayMusic.category(), CommandCategory::Media);
        assert_eq!(CommandType::VolumeSet.category(), CommandCategory::Media);
        assert_eq!(CommandType::AcOn.category(), CommandCategory::Vehicle);
        assert_eq!(CommandType::EngineStop.category(), CommandCategory::Vehicle);
        assert_eq!(CommandType::BluetoothOn.category(), CommandCategory::System);
        assert_eq!(CommandType::QueryWeather.category(), CommandCategory::Query);
        assert_eq!(CommandType::Unknown.category(), CommandCategory::Unknown);
    }

    #[test]
    fn test_command_construction() {
        let cmd = Command::new(CommandType::AcOn);
        assert_eq!(cmd.category, CommandCategory::Vehicle);
        assert!(cmd.params.is_empty());

        let cmd = Command::with_param(CommandType::TempSet, PARAM_VALUE, "24");
        assert_eq!(cmd.param(PARAM_VALUE), Some("24"));
        assert_eq!(cmd.numeric_value(), Some(24));
    }

    #[test]
    fn test_numeric_value_rejects_garbage() {
        let cmd = Command::with_param(CommandType::TempSet, PARAM_VALUE, "很高");
        assert_eq!(cmd.numeric_value(), None);

        let cmd = Command::new(CommandType::TempSet);
        assert_eq!(cmd.numeric_value(), None);
    }

    #[test]
    fn test_result_accessors() {
        let ok = CommandResult::success("空调已打开");
        assert!(ok.is_success());
        assert_eq!(ok.message(), "空调已打开");

        let err = CommandResult::error("没有听清");
        assert!(!err.is_success());
        assert_eq!(format!("{}", err), "没有听清");
    }

    #[test]
    fn test_result_serialization() {
        let ok = CommandResult::success("已完成");
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, r#"{"outcome":"success","message":"已完成"}"#);

        let back: CommandResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ok);
    }

    #[test]
    fn test_command_type_serialization() {
        let json = serde_json::to_string(&CommandType::WindowHalf).unwrap();
        assert_eq!(json, r#""window_half""#);
        let back: CommandType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CommandType::WindowHalf);
    }
}
