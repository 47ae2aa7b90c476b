//! Mock head-unit system settings. In the original app these were calls
//! into the platform settings service; here they are plain fields.

use serde::{Deserialize, Serialize};

pub const BRIGHTNESS_MIN: u8 = 10;
pub const BRIGHTNESS_MAX: u8 = 100;
pub const BRIGHTNESS_STEP: u8 = 10;
pub const BRIGHTNESS_DEFAULT: u8 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub brightness: u8,
    pub bluetooth: bool,
    pub wifi: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            brightness: BRIGHTNESS_DEFAULT,
            bluetooth: false,
            wifi: true,
        }
    }
}
