//! Executor for the vehicle category: climate, seat, windows, lights,
//! doors, engine.

use crate::command::{Command, CommandResult, CommandType, PARAM_COLOR};
use crate::vehicle::{
    ClimateState, FAN_MAX, FAN_MIN, TEMP_MAX, TEMP_MIN, VehicleState, WINDOW_CLOSED, WINDOW_HALF,
    WINDOW_OPEN,
};

const AC_OFF_ERROR: &str = "空调还没有打开，请先打开空调";

pub(super) fn execute(state: &mut VehicleState, command: &Command) -> CommandResult {
    match command.command_type {
        CommandType::AcOn => ac_on(state),
        CommandType::AcOff => ac_off(state),
        CommandType::TempUp => temp_step(state, 1),
        CommandType::TempDown => temp_step(state, -1),
        CommandType::TempSet => temp_set(state, command),
        CommandType::FanUp => fan_step(state, 1),
        CommandType::FanDown => fan_step(state, -1),
        CommandType::SeatUp => seat_step(state, 1),
        CommandType::SeatDown => seat_step(state, -1),
        CommandType::SeatHeatOn => seat_heat(state, true),
        CommandType::SeatHeatOff => seat_heat(state, false),
        CommandType::WindowOpen => window_to(state, WINDOW_OPEN),
        CommandType::WindowClose => window_to(state, WINDOW_CLOSED),
        CommandType::WindowHalf => window_to(state, WINDOW_HALF),
        CommandType::HeadlightOn => headlights(state, true),
        CommandType::HeadlightOff => headlights(state, false),
        CommandType::AmbientOn => ambient(state, true),
        CommandType::AmbientOff => ambient(state, false),
        CommandType::AmbientColor => ambient_color(state, command),
        CommandType::DoorLock => doors(state, true),
        CommandType::DoorUnlock => doors(state, false),
        CommandType::TrunkOpen => trunk(state, true),
        CommandType::TrunkClose => trunk(state, false),
        CommandType::EngineStart => engine(state, true),
        CommandType::EngineStop => engine(state, false),
        _ => CommandResult::error("这个指令不归车辆控制管"),
    }
}

fn ac_on(state: &mut VehicleState) -> CommandResult {
    if state.climate.on {
        return CommandResult::success("空调已经开着了");
    }
    // Powering on resets to the comfort defaults.
    let next = ClimateState {
        on: true,
        ..ClimateState::default()
    };
    let message = format!(
        "空调已打开，温度{}度，风速{}档",
        next.temperature, next.fan_speed
    );
    state.climate = next;
    CommandResult::success(message)
}

fn ac_off(state: &mut VehicleState) -> CommandResult {
    if !state.climate.on {
        return CommandResult::success("空调已经是关闭状态");
    }
    let mut next = state.climate.clone();
    next.on = false;
    state.climate = next;
    CommandResult::success("空调已关闭")
}

fn temp_step(state: &mut VehicleState, delta: i8) -> CommandResult {
    if !state.climate.on {
        return CommandResult::error(AC_OFF_ERROR);
    }
    let current = state.climate.temperature;
    if delta > 0 && current >= TEMP_MAX {
        return CommandResult::success(format!("温度已经是最高的{}度了", TEMP_MAX));
    }
    if delta < 0 && current <= TEMP_MIN {
        return CommandResult::success(format!("温度已经是最低的{}度了", TEMP_MIN));
    }
    let mut next = state.climate.clone();
    next.temperature = current.saturating_add_signed(delta).clamp(TEMP_MIN, TEMP_MAX);
    let message = format!("温度已调到{}度", next.temperature);
    state.climate = next;
    CommandResult::success(message)
}

fn temp_set(state: &mut VehicleState, command: &Command) -> CommandResult {
    if !state.climate.on {
        return CommandResult::error(AC_OFF_ERROR);
    }
    let Some(target) = command.numeric_value() else {
        return CommandResult::error("没有听清要设置的温度");
    };
    if target < TEMP_MIN as u32 || target > TEMP_MAX as u32 {
        return CommandResult::error(format!(
            "只能设置{}到{}度之间的温度",
            TEMP_MIN, TEMP_MAX
        ));
    }
    let target = target as u8;
    if state.climate.temperature == target {
        return CommandResult::success(format!("温度已经是{}度了", target));
    }
    let mut next = state.climate.clone();
    next.temperature = target;
    state.climate = next;
    CommandResult::success(format!("温度已调到{}度", target))
}

fn fan_step(state: &mut VehicleState, delta: i8) -> CommandResult {
    if !state.climate.on {
        return CommandResult::error(AC_OFF_ERROR);
    }
    let current = state.climate.fan_speed;
    if delta > 0 && current >= FAN_MAX {
        return CommandResult::success(format!("风速已经是最大{}档了", FAN_MAX));
    }
    if delta < 0 && current <= FAN_MIN {
        return CommandResult::success(format!("风速已经是最小{}档了", FAN_MIN));
    }
    let mut next = state.climate.clone();
    next.fan_speed = current.saturating_add_signed(delta).clamp(FAN_MIN, FAN_MAX);
    let message = format!("风速已调到{}档", next.fan_speed);
    state.climate = next;
    CommandResult::success(message)
}

fn seat_step(state: &mut VehicleState, delta: i8) -> CommandResult {
    use crate::vehicle::{SEAT_MAX, SEAT_MIN};
    let current = state.seat.position;
    if delta > 0 && current >= SEAT_MAX {
        return CommandResult::success("座椅已经调到最高了");
    }
    if delta < 0 && current <= SEAT_MIN {
        return CommandResult::success("座椅已经调到最低了");
    }
    let mut next = state.seat.clone();
    next.position = current.saturating_add_signed(delta).clamp(SEAT_MIN, SEAT_MAX);
    let message = format!("座椅已调到{}档", next.position);
    state.seat = next;
    CommandResult::success(message)
}

fn seat_heat(state: &mut VehicleState, on: bool) -> CommandResult {
    if state.seat.heating == on {
        return CommandResult::success(if on {
            "座椅加热已经打开了"
        } else {
            "座椅加热已经是关闭状态"
        });
    }
    let mut next = state.seat.clone();
    next.heating = on;
    state.seat = next;
    CommandResult::success(if on { "座椅加热已打开" } else { "座椅加热已关闭" })
}

fn window_to(state: &mut VehicleState, target: u8) -> CommandResult {
    if state.windows.openness == target {
        return CommandResult::success(match target {
            WINDOW_OPEN => "车窗已经全部打开了",
            WINDOW_HALF => "车窗已经开了一半",
            _ => "车窗已经是关闭状态",
        });
    }
    state.windows = crate::vehicle::WindowState { openness: target };
    CommandResult::success(match target {
        WINDOW_OPEN => "车窗已打开",
        WINDOW_HALF => "车窗已开到一半",
        _ => "车窗已关闭",
    })
}

fn headlights(state: &mut VehicleState, on: bool) -> CommandResult {
    if state.lights.headlights == on {
        return CommandResult::success(if on { "大灯已经开着了" } else { "大灯已经是关闭状态" });
    }
    let mut next = state.lights.clone();
    next.headlights = on;
    state.lights = next;
    CommandResult::success(if on { "大灯已打开" } else { "大灯已关闭" })
}

fn ambient(state: &mut VehicleState, on: bool) -> CommandResult {
    if state.lights.ambient == on {
        return CommandResult::success(if on {
            "氛围灯已经开着了"
        } else {
            "氛围灯已经是关闭状态"
        });
    }
    let mut next = state.lights.clone();
    next.ambient = on;
    state.lights = next;
    CommandResult::success(if on { "氛围灯已打开" } else { "氛围灯已关闭" })
}

fn ambient_color(state: &mut VehicleState, command: &Command) -> CommandResult {
    if !state.lights.ambient {
        return CommandResult::error("氛围灯还没有打开，请先打开氛围灯");
    }
    let Some(color) = command.param(PARAM_COLOR) else {
        return CommandResult::error("没有听清要调成什么颜色");
    };
    if state.lights.ambient_color == color {
        return CommandResult::success(format!("氛围灯已经是{}了", color));
    }
    let mut next = state.lights.clone();
    next.ambient_color = color.to_string();
    state.lights = next;
    CommandResult::success(format!("氛围灯已调成{}", color))
}

fn doors(state: &mut VehicleState, locked: bool) -> CommandResult {
    if state.doors.locked == locked {
        return CommandResult::success(if locked {
            "车门已经锁好了"
        } else {
            "车门已经是解锁状态"
        });
    }
    let mut next = state.doors.clone();
    next.locked = locked;
    state.doors = next;
    CommandResult::success(if locked { "车门已上锁" } else { "车门已解锁" })
}

fn trunk(state: &mut VehicleState, open: bool) -> CommandResult {
    if state.doors.trunk_open == open {
        return CommandResult::success(if open {
            "后备箱已经是打开状态"
        } else {
            "后备箱已经是关闭状态"
        });
    }
    let mut next = state.doors.clone();
    next.trunk_open = open;
    state.doors = next;
    CommandResult::success(if open { "后备箱已打开" } else { "后备箱已关闭" })
}

fn engine(state: &mut VehicleState, running: bool) -> CommandResult {
    if state.engine.running == running {
        return CommandResult::success(if running {
            "发动机已经在运转了"
        } else {
            "发动机已经是熄火状态"
        });
    }
    let mut next = state.engine.clone();
    next.running = running;
    state.engine = next;
    CommandResult::success(if running { "发动机已启动" } else { "发动机已熄火" })
}
