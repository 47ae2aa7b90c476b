//! Executor for the system category: brightness, bluetooth, wifi. Stands
//! in for the platform settings calls of the original head unit.

use crate::command::{Command, CommandResult, CommandType};
use crate::system::{BRIGHTNESS_MAX, BRIGHTNESS_MIN, BRIGHTNESS_STEP, SystemSettings};

pub(super) fn execute(state: &mut SystemSettings, command: &Command) -> CommandResult {
    match command.command_type {
        CommandType::BrightnessUp => brightness_step(state, 1),
        CommandType::BrightnessDown => brightness_step(state, -1),
        CommandType::BluetoothOn => bluetooth(state, true),
        CommandType::BluetoothOff => bluetooth(state, false),
        CommandType::WifiOn => wifi(state, true),
        CommandType::WifiOff => wifi(state, false),
        _ => CommandResult::error("这个指令不归系统设置管"),
    }
}

fn brightness_step(state: &mut SystemSettings, direction: i8) -> CommandResult {
    let current = state.brightness;
    if direction > 0 && current >= BRIGHTNESS_MAX {
        return CommandResult::success("亮度已经是最高了");
    }
    if direction < 0 && current <= BRIGHTNESS_MIN {
        return CommandResult::success("亮度已经是最低了");
    }
    let mut next = state.clone();
    next.brightness = if direction > 0 {
        current.saturating_add(BRIGHTNESS_STEP).min(BRIGHTNESS_MAX)
    } else {
        current.saturating_sub(BRIGHTNESS_STEP).max(BRIGHTNESS_MIN)
    };
    let message = format!("亮度已调到{}%", next.brightness);
    *state = next;
    CommandResult::success(message)
}

fn bluetooth(state: &mut SystemSettings, on: bool) -> CommandResult {
    if state.bluetooth == on {
        return CommandResult::success(if on { "蓝牙已经打开了" } else { "蓝牙已经是关闭状态" });
    }
    let mut next = state.clone();
    next.bluetooth = on;
    *state = next;
    CommandResult::success(if on { "蓝牙已打开" } else { "蓝牙已关闭" })
}

fn wifi(state: &mut SystemSettings, on: bool) -> CommandResult {
    if state.wifi == on {
        return CommandResult::success(if on {
            "WiFi已经打开了"
        } else {
            "WiFi已经是关闭状态"
        });
    }
    let mut next = state.clone();
    next.wifi = on;
    *state = next;
    CommandResult::success(if on { "WiFi已打开" } else { "WiFi已关闭" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_clamps_at_both_ends() {
        let mut state = SystemSettings::default();
        for _ in 0..10 {
            execute(&mut state, &Command::new(CommandType::BrightnessUp));
            assert!(state.brightness <= BRIGHTNESS_MAX);
        }
        assert_eq!(state.brightness, BRIGHTNESS_MAX);

        for _ in 0..20 {
            execute(&mut state, &Command::new(CommandType::BrightnessDown));
            assert!(state.brightness >= BRIGHTNESS_MIN);
        }
        assert_eq!(state.brightness, BRIGHTNESS_MIN);

        let snapshot = state.clone();
        let result = execute(&mut state, &Command::new(CommandType::BrightnessDown));
        assert!(result.message().contains("最低"));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_bluetooth_toggle_is_idempotent() {
        let mut state = SystemSettings::default();
        execute(&mut state, &Command::new(CommandType::BluetoothOn));
        assert!(state.bluetooth);

        let again = execute(&mut state, &Command::new(CommandType::BluetoothOn));
        assert!(again.message().contains("已经"));
        assert!(state.bluetooth);
    }

    #[test]
    fn test_wifi_defaults_on() {
        let mut state = SystemSettings::default();
        let result = execute(&mut state, &Command::new(CommandType::WifiOn));
        assert!(result.message().contains("已经"));

        execute(&mut state, &Command::new(CommandType::WifiOff));
        assert!(!state.wifi);
    }
}
