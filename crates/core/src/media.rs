//! Mock media player. The playlist is fixed; playback is a flag and an
//! index, which is all the voice commands can observe.

use serde::{Deserialize, Serialize};

pub const VOLUME_MIN: u8 = 0;
pub const VOLUME_MAX: u8 = 100;
pub const VOLUME_STEP: u8 = 10;
pub const VOLUME_DEFAULT: u8 = 30;

/// The canned playlist the demo cycles through.
pub const PLAYLIST: &[&str] = &[
    "晴天 - 周杰伦",
    "平凡之路 - 朴树",
    "夜空中最亮的星 - 逃跑计划",
    "成都 - 赵雷",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaState {
    pub playing: bool,
    pub volume: u8,
    pub track_index: usize,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            playing: false,
            volume: VOLUME_DEFAULT,
            track_index: 0,
        }
    }
}

impl MediaState {
    /// Name of the track the player currently points at.
    pub fn current_track(&self) -> &'static str {
        PLAYLIST[self.track_index % PLAYLIST.len()]
    }
}
