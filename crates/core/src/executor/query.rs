//! Read-only query executor: time, canned weather, range, and a vehicle
//! status summary. Queries never mutate state.

use crate::command::{Command, CommandResult, CommandType, PARAM_CITY};
use crate::vehicle::{VehicleState, WINDOW_CLOSED, WINDOW_HALF};
use chrono::{DateTime, Local, Timelike};

/// Canned per-city forecast: (city, condition, low, high). The demo has
/// no weather service behind it.
const WEATHER: &[(&str, &str, i8, i8)] = &[
    ("北京", "晴", 20, 28),
    ("上海", "多云", 22, 30),
    ("广州", "小雨", 25, 31),
    ("深圳", "阵雨", 26, 32),
    ("杭州", "晴", 21, 29),
    ("南京", "多云", 22, 29),
    ("成都", "阴", 19, 26),
    ("武汉", "晴", 23, 31),
    ("重庆", "多云", 24, 32),
    ("西安", "晴", 20, 29),
];

pub(super) fn execute(state: &VehicleState, command: &Command) -> CommandResult {
    match command.command_type {
        CommandType::QueryTime => CommandResult::success(format_time(Local::now())),
        CommandType::QueryWeather => weather(command),
        CommandType::QueryRange => range(state),
        CommandType::QueryVehicleStatus => CommandResult::success(status_summary(state)),
        _ => CommandResult::error("这个指令不归查询管"),
    }
}

pub(crate) fn format_time(now: DateTime<Local>) -> String {
    format!("现在是{}点{:02}分", now.hour(), now.minute())
}

fn weather(command: &Command) -> CommandResult {
    let Some(city) = command.param(PARAM_CITY) else {
        return CommandResult::error("没有听清要查询哪个城市");
    };
    match WEATHER.iter().find(|(name, _, _, _)| *name == city) {
        Some((name, condition, low, high)) => CommandResult::success(format!(
            "{}今天{}，气温{}到{}度",
            name, condition, low, high
        )),
        None => CommandResult::error(format!("暂时查不到{}的天气", city)),
    }
}

fn range(state: &VehicleState) -> CommandResult {
    CommandResult::success(format!(
        "剩余油量{}%，预计还能行驶{}公里",
        state.engine.fuel_percent, state.engine.range_km
    ))
}

fn status_summary(state: &VehicleState) -> String {
    let engine = if state.engine.running {
        "发动机运转中"
    } else {
        "发动机已熄火"
    };
    let doors = if state.doors.locked {
        "车门已上锁"
    } else {
        "车门未上锁"
    };
    let windows = match state.windows.openness {
        WINDOW_CLOSED => "车窗已关闭",
        WINDOW_HALF => "车窗开了一半",
        _ => "车窗全开",
    };
    let climate = if state.climate.on {
        format!(
            "空调{}度{}档",
            state.climate.temperature, state.climate.fan_speed
        )
    } else {
        "空调关闭".to_string()
    };
    format!(
        "当前车况：{}，{}，{}，{}，剩余油量{}%，预计续航{}公里",
        engine, doors, windows, climate, state.engine.fuel_percent, state.engine.range_km
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_time() {
        let t = Local.with_ymd_and_hms(2025, 3, 14, 9, 5, 0).unwrap();
        assert_eq!(format_time(t), "现在是9点05分");
    }

    #[test]
    fn test_weather_known_city() {
        let state = VehicleState::default();
        let cmd = Command::with_param(CommandType::QueryWeather, PARAM_CITY, "上海");
        let result = execute(&state, &cmd);
        assert!(result.is_success());
        assert!(result.message().contains("上海"));
        assert!(result.message().contains("22到30度"));
    }

    #[test]
    fn test_weather_unknown_city_errors() {
        let state = VehicleState::default();
        let cmd = Command::with_param(CommandType::QueryWeather, PARAM_CITY, "拉萨");
        let result = execute(&state, &cmd);
        assert!(!result.is_success());
    }

    #[test]
    fn test_status_summary_reflects_state() {
        let mut state = VehicleState::default();
        let summary = status_summary(&state);
        assert!(summary.contains("发动机已熄火"));
        assert!(summary.contains("车门已上锁"));
        assert!(summary.contains("空调关闭"));

        state.engine.running = true;
        state.climate.on = true;
        let summary = status_summary(&state);
        assert!(summary.contains("发动机运转中"));
        assert!(summary.contains("空调24度3档"));
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let state = VehicleState::default();
        let snapshot = state.clone();
        execute(&state, &Command::new(CommandType::QueryRange));
        execute(&state, &Command::new(CommandType::QueryVehicleStatus));
        assert_eq!(state, snapshot);
    }
}
