//! Executor for the media category: mock player transport and volume.

use crate::command::{Command, CommandResult, CommandType};
use crate::media::{MediaState, PLAYLIST, VOLUME_MAX, VOLUME_MIN, VOLUME_STEP};

const NOT_PLAYING_ERROR: &str = "还没有播放音乐，请先说播放音乐";

pub(super) fn execute(state: &mut MediaState, command: &Command) -> CommandResult {
    match command.command_type {
        CommandType::PlayMusic => play(state),
        CommandType::PauseMusic => pause(state),
        CommandType::NextTrack => skip(state, 1),
        CommandType::PrevTrack => skip(state, -1),
        CommandType::VolumeUp => volume_step(state, 1),
        CommandType::VolumeDown => volume_step(state, -1),
        CommandType::VolumeSet => volume_set(state, command),
        _ => CommandResult::error("这个指令不归媒体播放管"),
    }
}

fn play(state: &mut MediaState) -> CommandResult {
    if state.playing {
        return CommandResult::success("已经在播放音乐了");
    }
    let mut next = state.clone();
    next.playing = true;
    let message = format!("正在为您播放：{}", next.current_track());
    *state = next;
    CommandResult::success(message)
}

fn pause(state: &mut MediaState) -> CommandResult {
    if !state.playing {
        return CommandResult::success("音乐已经是暂停状态");
    }
    let mut next = state.clone();
    next.playing = false;
    *state = next;
    CommandResult::success("音乐已暂停")
}

fn skip(state: &mut MediaState, direction: i8) -> CommandResult {
    if !state.playing {
        return CommandResult::error(NOT_PLAYING_ERROR);
    }
    let len = PLAYLIST.len();
    let mut next = state.clone();
    next.track_index = if direction > 0 {
        (state.track_index + 1) % len
    } else {
        (state.track_index + len - 1) % len
    };
    let message = format!("已切换到：{}", next.current_track());
    *state = next;
    CommandResult::success(message)
}

fn volume_step(state: &mut MediaState, direction: i8) -> CommandResult {
    let current = state.volume;
    if direction > 0 && current >= VOLUME_MAX {
        return CommandResult::success("音量已经是最大了");
    }
    if direction < 0 && current <= VOLUME_MIN {
        return CommandResult::success("音量已经是最小了");
    }
    let mut next = state.clone();
    next.volume = if direction > 0 {
        current.saturating_add(VOLUME_STEP).min(VOLUME_MAX)
    } else {
        current.saturating_sub(VOLUME_STEP)
    };
    let message = format!("音量已调到{}", next.volume);
    *state = next;
    CommandResult::success(message)
}

fn volume_set(state: &mut MediaState, command: &Command) -> CommandResult {
    let Some(target) = command.numeric_value() else {
        return CommandResult::error("没有听清要设置的音量");
    };
    if target > VOLUME_MAX as u32 {
        return CommandResult::error(format!(
            "音量只能设置在{}到{}之间",
            VOLUME_MIN, VOLUME_MAX
        ));
    }
    let target = target as u8;
    if state.volume == target {
        return CommandResult::success(format!("音量已经是{}了", target));
    }
    let mut next = state.clone();
    next.volume = target;
    *state = next;
    CommandResult::success(format!("音量已调到{}", target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PARAM_VALUE;

    #[test]
    fn test_play_then_play_again_is_idempotent() {
        let mut state = MediaState::default();
        let first = execute(&mut state, &Command::new(CommandType::PlayMusic));
        assert!(first.message().contains(PLAYLIST[0]));
        assert!(state.playing);

        let snapshot = state.clone();
        let second = execute(&mut state, &Command::new(CommandType::PlayMusic));
        assert!(second.message().contains("已经"));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_skip_requires_playback() {
        let mut state = MediaState::default();
        let result = execute(&mut state, &Command::new(CommandType::NextTrack));
        assert!(!result.is_success());

        execute(&mut state, &Command::new(CommandType::PlayMusic));
        let result = execute(&mut state, &Command::new(CommandType::NextTrack));
        assert!(result.is_success());
        assert_eq!(state.track_index, 1);
    }

    #[test]
    fn test_prev_wraps_around() {
        let mut state = MediaState {
            playing: true,
            ..Default::default()
        };
        execute(&mut state, &Command::new(CommandType::PrevTrack));
        assert_eq!(state.track_index, PLAYLIST.len() - 1);
    }

    #[test]
    fn test_volume_steps_clamp() {
        let mut state = MediaState::default();
        for _ in 0..20 {
            execute(&mut state, &Command::new(CommandType::VolumeUp));
            assert!(state.volume <= VOLUME_MAX);
        }
        assert_eq!(state.volume, VOLUME_MAX);

        let snapshot = state.clone();
        let result = execute(&mut state, &Command::new(CommandType::VolumeUp));
        assert!(result.message().contains("最大"));
        assert_eq!(state, snapshot);

        for _ in 0..20 {
            execute(&mut state, &Command::new(CommandType::VolumeDown));
        }
        assert_eq!(state.volume, VOLUME_MIN);
    }

    #[test]
    fn test_volume_set_validates_range() {
        let mut state = MediaState::default();
        let cmd = Command::with_param(CommandType::VolumeSet, PARAM_VALUE, "150");
        let result = execute(&mut state, &cmd);
        assert!(!result.is_success());
        assert_eq!(state.volume, 30);

        let cmd = Command::with_param(CommandType::VolumeSet, PARAM_VALUE, "50");
        let result = execute(&mut state, &cmd);
        assert!(result.is_success());
        assert_eq!(state.volume, 50);
    }
}
