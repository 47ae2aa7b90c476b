//! Rule-based intent classification.
//!
//! `parse` is a pure function from free text to a [`Command`]. The
//! pipeline is fixed: idiomatic expressions first, then category keyword
//! gating, then a per-category rule tree built from substring containment
//! and simple co-occurrence checks. Ties are broken by table and branch
//! order; there is no scoring and no model.

pub mod extract;
pub mod lexicon;

pub use lexicon::{QUICK_ACTIONS, QuickAction};

use crate::command::{
    Command, CommandCategory, CommandType, PARAM_CITY, PARAM_COLOR, PARAM_VALUE,
};
use lexicon::{
    CLOSE_WORDS, DEFAULT_CITY, DEFAULT_COLOR, DOWN_WORDS, OPEN_WORDS, SET_WORDS, UP_WORDS,
    contains_any, match_category, match_idiom,
};

/// Classifies one utterance. Never fails: unmatched input becomes
/// [`Command::unknown`].
pub fn parse(text: &str) -> Command {
    let text = text.trim();
    if text.is_empty() {
        return Command::unknown();
    }
    // Lowercasing only affects latin letters ("WiFi"); the Chinese
    // phrase tables are untouched by it.
    let text = text.to_lowercase();

    if let Some(command_type) = match_idiom(&text) {
        return Command::new(command_type);
    }

    match match_category(&text) {
        Some(CommandCategory::Media) => parse_media(&text),
        Some(CommandCategory::Vehicle) => parse_vehicle(&text),
        Some(CommandCategory::System) => parse_system(&text),
        Some(CommandCategory::Query) => parse_query(&text),
        _ => Command::unknown(),
    }
}

fn parse_media(text: &str) -> Command {
    if contains_any(text, &["下一首", "换一首", "切歌"]) {
        return Command::new(CommandType::NextTrack);
    }
    if text.contains("上一首") {
        return Command::new(CommandType::PrevTrack);
    }
    if contains_any(text, &["音量", "声音"]) {
        if contains_any(text, SET_WORDS) {
            if let Some(value) = extract::extract_number(text) {
                return Command::with_param(CommandType::VolumeSet, PARAM_VALUE, value.to_string());
            }
        }
        if contains_any(text, UP_WORDS) {
            return Command::new(CommandType::VolumeUp);
        }
        if contains_any(text, DOWN_WORDS) {
            return Command::new(CommandType::VolumeDown);
        }
        return Command::unknown();
    }
    if contains_any(text, &["暂停", "停止"]) {
        return Command::new(CommandType::PauseMusic);
    }
    if contains_any(text, &["播放", "听", "放"]) {
        return Command::new(CommandType::PlayMusic);
    }
    Command::unknown()
}

fn parse_vehicle(text: &str) -> Command {
    // Temperature before the bare 空调 branch so that "空调温度调到26度"
    // lands on the temperature rules.
    if text.contains("温度") {
        if contains_any(text, SET_WORDS) {
            if let Some(value) = extract::extract_number(text) {
                return Command::with_param(CommandType::TempSet, PARAM_VALUE, value.to_string());
            }
        }
        if contains_any(text, UP_WORDS) {
            return Command::new(CommandType::TempUp);
        }
        if contains_any(text, DOWN_WORDS) {
            return Command::new(CommandType::TempDown);
        }
        return Command::unknown();
    }
    if contains_any(text, &["风速", "风量"]) {
        if contains_any(text, UP_WORDS) {
            return Command::new(CommandType::FanUp);
        }
        if contains_any(text, DOWN_WORDS) {
            return Command::new(CommandType::FanDown);
        }
        return Command::unknown();
    }
    if text.contains("空调") {
        if contains_any(text, OPEN_WORDS) {
            return Command::new(CommandType::AcOn);
        }
        if contains_any(text, CLOSE_WORDS) {
            return Command::new(CommandType::AcOff);
        }
        // "空调调高一点" reads as a temperature request.
        if contains_any(text, UP_WORDS) {
            return Command::new(CommandType::TempUp);
        }
        if contains_any(text, DOWN_WORDS) {
            return Command::new(CommandType::TempDown);
        }
        return Command::unknown();
    }
    if contains_any(text, &["座椅", "坐椅"]) {
        if text.contains("加热") {
            if contains_any(text, CLOSE_WORDS) {
                return Command::new(CommandType::SeatHeatOff);
            }
            return Command::new(CommandType::SeatHeatOn);
        }
        if contains_any(text, UP_WORDS) {
            return Command::new(CommandType::SeatUp);
        }
        if contains_any(text, DOWN_WORDS) {
            return Command::new(CommandType::SeatDown);
        }
        return Command::unknown();
    }
    if contains_any(text, &["车窗", "窗户"]) {
        if text.contains("一半") {
            return Command::new(CommandType::WindowHalf);
        }
        if contains_any(text, OPEN_WORDS) || text.contains("降下") {
            return Command::new(CommandType::WindowOpen);
        }
        if contains_any(text, CLOSE_WORDS) || text.contains("升起") {
            return Command::new(CommandType::WindowClose);
        }
        return Command::unknown();
    }
    if text.contains("氛围灯") {
        let wants_color =
            text.contains("颜色") || contains_any(text, SET_WORDS) || extract::extract_color(text).is_some();
        if wants_color {
            let color = extract::extract_color(text).unwrap_or(DEFAULT_COLOR);
            return Command::with_param(CommandType::AmbientColor, PARAM_COLOR, color);
        }
        if contains_any(text, CLOSE_WORDS) {
            return Command::new(CommandType::AmbientOff);
        }
        if contains_any(text, OPEN_WORDS) {
            return Command::new(CommandType::AmbientOn);
        }
        return Command::unknown();
    }
    if contains_any(text, &["大灯", "车灯"]) {
        if contains_any(text, CLOSE_WORDS) {
            return Command::new(CommandType::HeadlightOff);
        }
        if contains_any(text, OPEN_WORDS) {
            return Command::new(CommandType::HeadlightOn);
        }
        return Command::unknown();
    }
    if contains_any(text, &["后备箱", "尾箱"]) {
        if contains_any(text, CLOSE_WORDS) {
            return Command::new(CommandType::TrunkClose);
        }
        if contains_any(text, OPEN_WORDS) {
            return Command::new(CommandType::TrunkOpen);
        }
        return Command::unknown();
    }
    // 解锁 before the generic 锁 check: "解锁车门" contains both.
    if text.contains("解锁") {
        return Command::new(CommandType::DoorUnlock);
    }
    if contains_any(text, &["车门", "锁车", "上锁"]) {
        if text.contains("锁") {
            return Command::new(CommandType::DoorLock);
        }
        return Command::unknown();
    }
    if contains_any(text, &["发动机", "引擎", "点火", "熄火"]) {
        if contains_any(text, &["熄火", "关闭", "关掉"]) {
            return Command::new(CommandType::EngineStop);
        }
        if contains_any(text, &["点火", "启动", "打开"]) {
            return Command::new(CommandType::EngineStart);
        }
        return Command::unknown();
    }
    Command::unknown()
}

fn parse_system(text: &str) -> Command {
    if contains_any(text, &["亮度", "屏幕"]) {
        if contains_any(text, UP_WORDS) || text.contains("亮一点") {
            return Command::new(CommandType::BrightnessUp);
        }
        if contains_any(text, DOWN_WORDS) || text.contains("暗一点") {
            return Command::new(CommandType::BrightnessDown);
        }
        return Command::unknown();
    }
    if text.contains("蓝牙") {
        if contains_any(text, CLOSE_WORDS) {
            return Command::new(CommandType::BluetoothOff);
        }
        if contains_any(text, OPEN_WORDS) {
            return Command::new(CommandType::BluetoothOn);
        }
        return Command::unknown();
    }
    if contains_any(text, &["wifi", "无线"]) {
        if contains_any(text, CLOSE_WORDS) {
            return Command::new(CommandType::WifiOff);
        }
        if contains_any(text, OPEN_WORDS) {
            return Command::new(CommandType::WifiOn);
        }
        return Command::unknown();
    }
    Command::unknown()
}

fn parse_query(text: &str) -> Command {
    if text.contains("天气") {
        let city = extract::extract_city(text).unwrap_or(DEFAULT_CITY);
        return Command::with_param(CommandType::QueryWeather, PARAM_CITY, city);
    }
    if contains_any(text, &["几点", "时间"]) {
        return Command::new(CommandType::QueryTime);
    }
    if contains_any(text, &["油量", "续航"]) {
        return Command::new(CommandType::QueryRange);
    }
    if contains_any(text, &["车况", "状态"]) {
        return Command::new(CommandType::QueryVehicleStatus);
    }
    Command::unknown()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_quick_action_classifies() {
        for action in QUICK_ACTIONS {
            let cmd = parse(action.phrase);
            assert_ne!(
                cmd.command_type,
                CommandType::Unknown,
                "quick action fell through to unknown: {}",
                action.phrase
            );
        }
    }

    #[test]
    fn test_idioms_win_over_category_rules() {
        assert_eq!(parse("今天好热").command_type, CommandType::TempDown);
        assert_eq!(parse("好冷啊").command_type, CommandType::TempUp);
        assert_eq!(parse("太吵了").command_type, CommandType::VolumeDown);
        assert_eq!(parse("车里闷死了").command_type, CommandType::WindowOpen);
    }

    #[test]
    fn test_climate_commands() {
        assert_eq!(parse("打开空调").command_type, CommandType::AcOn);
        assert_eq!(parse("把空调关掉").command_type, CommandType::AcOff);
        assert_eq!(parse("温度调高一点").command_type, CommandType::TempUp);
        assert_eq!(parse("降低温度").command_type, CommandType::TempDown);
        assert_eq!(parse("风速调大").command_type, CommandType::FanUp);

        let cmd = parse("温度调到26度");
        assert_eq!(cmd.command_type, CommandType::TempSet);
        assert_eq!(cmd.numeric_value(), Some(26));

        let cmd = parse("空调温度调到二十四度");
        assert_eq!(cmd.command_type, CommandType::TempSet);
        assert_eq!(cmd.numeric_value(), Some(24));
    }

    #[test]
    fn test_media_commands() {
        assert_eq!(parse("播放音乐").command_type, CommandType::PlayMusic);
        assert_eq!(parse("暂停播放").command_type, CommandType::PauseMusic);
        assert_eq!(parse("下一首").command_type, CommandType::NextTrack);
        assert_eq!(parse("上一首歌").command_type, CommandType::PrevTrack);
        assert_eq!(parse("声音小一点").command_type, CommandType::VolumeDown);

        let cmd = parse("音量调到50");
        assert_eq!(cmd.command_type, CommandType::VolumeSet);
        assert_eq!(cmd.numeric_value(), Some(50));
    }

    #[test]
    fn test_body_commands() {
        assert_eq!(parse("车窗开一半").command_type, CommandType::WindowHalf);
        assert_eq!(parse("打开车窗").command_type, CommandType::WindowOpen);
        assert_eq!(parse("关上窗户").command_type, CommandType::WindowClose);
        assert_eq!(parse("打开座椅加热").command_type, CommandType::SeatHeatOn);
        assert_eq!(parse("座椅调高一点").command_type, CommandType::SeatUp);
        assert_eq!(parse("锁定车门").command_type, CommandType::DoorLock);
        assert_eq!(parse("解锁车门").command_type, CommandType::DoorUnlock);
        assert_eq!(parse("打开后备箱").command_type, CommandType::TrunkOpen);
        assert_eq!(parse("启动发动机").command_type, CommandType::EngineStart);
        assert_eq!(parse("熄火").command_type, CommandType::EngineStop);
    }

    #[test]
    fn test_light_commands_extract_color() {
        assert_eq!(parse("打开大灯").command_type, CommandType::HeadlightOn);
        assert_eq!(parse("打开氛围灯").command_type, CommandType::AmbientOn);

        let cmd = parse("氛围灯调成紫色");
        assert_eq!(cmd.command_type, CommandType::AmbientColor);
        assert_eq!(cmd.param(PARAM_COLOR), Some("紫色"));

        // No color named: the hard-coded default applies.
        let cmd = parse("换个氛围灯颜色");
        assert_eq!(cmd.command_type, CommandType::AmbientColor);
        assert_eq!(cmd.param(PARAM_COLOR), Some(DEFAULT_COLOR));
    }

    #[test]
    fn test_system_commands() {
        assert_eq!(parse("亮度调高一点").command_type, CommandType::BrightnessUp);
        assert_eq!(parse("屏幕暗一点").command_type, CommandType::BrightnessDown);
        assert_eq!(parse("打开蓝牙").command_type, CommandType::BluetoothOn);
        assert_eq!(parse("关闭WiFi").command_type, CommandType::WifiOff);
    }

    #[test]
    fn test_query_commands() {
        assert_eq!(parse("现在几点了").command_type, CommandType::QueryTime);
        assert_eq!(parse("查看车辆状态").command_type, CommandType::QueryVehicleStatus);
        assert_eq!(parse("剩余续航多少").command_type, CommandType::QueryRange);

        let cmd = parse("上海今天天气怎么样");
        assert_eq!(cmd.command_type, CommandType::QueryWeather);
        assert_eq!(cmd.param(PARAM_CITY), Some("上海"));

        let cmd = parse("今天天气怎么样");
        assert_eq!(cmd.param(PARAM_CITY), Some(DEFAULT_CITY));
    }

    #[test]
    fn test_unmatched_input_is_unknown() {
        for text in ["讲个笑话", "", "   ", "帮我订个酒店"] {
            let cmd = parse(text);
            assert_eq!(cmd.command_type, CommandType::Unknown);
            assert_eq!(cmd.category, CommandCategory::Unknown);
        }
    }
}
