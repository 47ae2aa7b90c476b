//! Command execution against the mock state.
//!
//! One executor per category. Every executor follows the same discipline:
//! read the current sub-record, check preconditions, clamp numeric targets
//! to the declared bounds, detect no-op transitions (already at the bound,
//! already in the requested state) and answer those with an informational
//! message without touching state, and otherwise replace the sub-record
//! wholesale and describe the new value.

mod media;
mod query;
mod system;
mod vehicle;

use crate::command::{Command, CommandCategory, CommandResult};
use crate::media::MediaState;
use crate::system::SystemSettings;
use crate::vehicle::VehicleState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Greeting appended to a fresh session's dialog.
pub const WELCOME: &str = "您好，我是您的车载语音助手，有什么可以帮您？";

/// Reply for input no rule matched. Guidance, not an error.
pub const GUIDANCE: &str =
    "抱歉，我没有听懂。您可以试试对我说：打开空调、播放音乐、车窗开一半，或者问我今天天气怎么样。";

/// The assistant's whole world: the simulated vehicle, media player, and
/// head-unit settings. One instance per session, defaults at creation,
/// alive for the session lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assistant {
    pub vehicle: VehicleState,
    pub media: MediaState,
    pub system: SystemSettings,
}

impl Assistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes one classified command. Never panics; invalid
    /// preconditions and bad parameters come back as `Error` values.
    pub fn execute(&mut self, command: &Command) -> CommandResult {
        let result = match command.category {
            CommandCategory::Media => media::execute(&mut self.media, command),
            CommandCategory::Vehicle => vehicle::execute(&mut self.vehicle, command),
            CommandCategory::System => system::execute(&mut self.system, command),
            CommandCategory::Query => query::execute(&self.vehicle, command),
            CommandCategory::Unknown => CommandResult::success(GUIDANCE),
        };
        debug!(
            command = ?command.command_type,
            success = result.is_success(),
            "command executed"
        );
        result
    }

    /// Classify + execute in one step: the path every utterance takes.
    pub fn handle_text(&mut self, text: &str) -> (Command, CommandResult) {
        let command = crate::intent::parse(text);
        let result = self.execute(&command);
        (command, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandType;

    #[test]
    fn test_unknown_input_returns_guidance_not_error() {
        let mut assistant = Assistant::new();
        let (cmd, result) = assistant.handle_text("讲个笑话");
        assert_eq!(cmd.command_type, CommandType::Unknown);
        assert!(result.is_success());
        assert_eq!(result.message(), GUIDANCE);
    }

    #[test]
    fn test_handle_text_end_to_end() {
        let mut assistant = Assistant::new();
        let (cmd, result) = assistant.handle_text("打开空调");
        assert_eq!(cmd.command_type, CommandType::AcOn);
        assert!(result.is_success());
        assert!(assistant.vehicle.climate.on);
        assert!(result.message().contains("24度"));
    }

    #[test]
    fn test_dispatch_routes_every_category() {
        let mut assistant = Assistant::new();
        assert!(assistant.handle_text("播放音乐").1.is_success());
        assert!(assistant.handle_text("打开大灯").1.is_success());
        assert!(assistant.handle_text("打开蓝牙").1.is_success());
        assert!(assistant.handle_text("现在几点了").1.is_success());
    }
}
