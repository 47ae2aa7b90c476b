//! The phrase lists the classifier matches against. These strings are the
//! behavioral contract of the assistant; changing one changes what users
//! can say.

use crate::command::{CommandCategory, CommandType};
use serde::Serialize;

/// Idiomatic expressions mapped straight to a command, checked before any
/// category gating. Substring containment, first match wins.
pub const IDIOMS: &[(&str, CommandType)] = &[
    ("好热", CommandType::TempDown),
    ("有点热", CommandType::TempDown),
    ("好冷", CommandType::TempUp),
    ("有点冷", CommandType::TempUp),
    ("太吵", CommandType::VolumeDown),
    ("听不清", CommandType::VolumeUp),
    ("我要听歌", CommandType::PlayMusic),
    ("来点音乐", CommandType::PlayMusic),
    ("放首歌", CommandType::PlayMusic),
    ("安静一下", CommandType::PauseMusic),
    ("别放了", CommandType::PauseMusic),
    ("闷死了", CommandType::WindowOpen),
    ("透透气", CommandType::WindowOpen),
    ("看不清屏幕", CommandType::BrightnessUp),
    ("出发", CommandType::EngineStart),
    ("到家了", CommandType::EngineStop),
];

pub const MEDIA_KEYWORDS: &[&str] = &[
    "音乐", "播放", "暂停", "音量", "声音", "一首", "切歌", "歌",
];

pub const VEHICLE_KEYWORDS: &[&str] = &[
    "空调", "温度", "风速", "风量", "车窗", "窗户", "座椅", "大灯", "车灯", "氛围灯", "车门",
    "锁车", "解锁", "上锁", "后备箱", "尾箱", "发动机", "引擎", "点火", "熄火",
];

pub const SYSTEM_KEYWORDS: &[&str] = &["亮度", "屏幕", "蓝牙", "wifi", "无线"];

pub const QUERY_KEYWORDS: &[&str] = &["天气", "几点", "时间", "油量", "续航", "车况", "状态"];

/// Words that push an adjustable property up or down.
pub const UP_WORDS: &[&str] = &["调高", "升高", "调大", "高一点", "大一点", "加大", "增大"];
pub const DOWN_WORDS: &[&str] = &["调低", "降低", "调小", "低一点", "小一点", "减小"];

/// Words that introduce an absolute target ("调到24度").
pub const SET_WORDS: &[&str] = &["调到", "设到", "设置到", "调成", "设为", "调整到"];

pub const OPEN_WORDS: &[&str] = &["打开", "开启"];
pub const CLOSE_WORDS: &[&str] = &["关闭", "关掉", "关上"];

/// First match wins, scanned in order; the value is the canonical name
/// used in replies and stored state.
pub const COLORS: &[(&str, &str)] = &[
    ("红", "红色"),
    ("橙", "橙色"),
    ("黄", "黄色"),
    ("绿", "绿色"),
    ("青", "青色"),
    ("蓝", "蓝色"),
    ("紫", "紫色"),
    ("粉", "粉色"),
    ("白", "白色"),
];

pub const DEFAULT_COLOR: &str = "蓝色";

pub const CITIES: &[&str] = &[
    "北京", "上海", "广州", "深圳", "杭州", "南京", "成都", "武汉", "重庆", "西安",
];

pub const DEFAULT_CITY: &str = "北京";

/// A supported phrase surfaced as a quick-action button in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    /// The exact phrase sent through the classifier when tapped.
    pub phrase: &'static str,
    /// Short group label for the button grid.
    pub label: &'static str,
}

/// Everything the UI offers as a one-tap command. Each phrase must
/// classify to a non-Unknown command; a test enforces this.
pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction { phrase: "打开空调", label: "空调" },
    QuickAction { phrase: "关闭空调", label: "空调" },
    QuickAction { phrase: "温度调高一点", label: "空调" },
    QuickAction { phrase: "温度调低一点", label: "空调" },
    QuickAction { phrase: "播放音乐", label: "媒体" },
    QuickAction { phrase: "暂停播放", label: "媒体" },
    QuickAction { phrase: "下一首", label: "媒体" },
    QuickAction { phrase: "音量调大一点", label: "媒体" },
    QuickAction { phrase: "打开车窗", label: "车窗" },
    QuickAction { phrase: "车窗开一半", label: "车窗" },
    QuickAction { phrase: "关闭车窗", label: "车窗" },
    QuickAction { phrase: "打开座椅加热", label: "座椅" },
    QuickAction { phrase: "锁定车门", label: "车门" },
    QuickAction { phrase: "打开大灯", label: "灯光" },
    QuickAction { phrase: "氛围灯调成蓝色", label: "灯光" },
    QuickAction { phrase: "打开蓝牙", label: "系统" },
    QuickAction { phrase: "亮度调高一点", label: "系统" },
    QuickAction { phrase: "今天天气怎么样", label: "查询" },
    QuickAction { phrase: "现在几点了", label: "查询" },
    QuickAction { phrase: "查看车辆状态", label: "查询" },
    QuickAction { phrase: "剩余续航多少", label: "查询" },
];

/// Scans the idiom table; first containment match wins.
pub fn match_idiom(text: &str) -> Option<CommandType> {
    IDIOMS
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, cmd)| *cmd)
}

/// Category keyword gating, in the fixed order media → vehicle → system
/// → query.
pub fn match_category(text: &str) -> Option<CommandCategory> {
    let tables = [
        (CommandCategory::Media, MEDIA_KEYWORDS),
        (CommandCategory::Vehicle, VEHICLE_KEYWORDS),
        (CommandCategory::System, SYSTEM_KEYWORDS),
        (CommandCategory::Query, QUERY_KEYWORDS),
    ];
    tables
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
}

/// True if the text contains any of the given words.
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idiom_first_match_wins() {
        assert_eq!(match_idiom("今天好热啊"), Some(CommandType::TempDown));
        assert_eq!(match_idiom("车里闷死了"), Some(CommandType::WindowOpen));
        assert_eq!(match_idiom("把空调打开"), None);
    }

    #[test]
    fn test_category_gating_order() {
        assert_eq!(match_category("播放音乐"), Some(CommandCategory::Media));
        assert_eq!(match_category("打开空调"), Some(CommandCategory::Vehicle));
        assert_eq!(match_category("打开蓝牙"), Some(CommandCategory::System));
        assert_eq!(match_category("今天天气怎么样"), Some(CommandCategory::Query));
        assert_eq!(match_category("随便说点什么"), None);
    }

    #[test]
    fn test_quick_action_phrases_hit_a_category_or_idiom() {
        for action in QUICK_ACTIONS {
            assert!(
                match_idiom(action.phrase).is_some() || match_category(action.phrase).is_some(),
                "quick action not matched by lexicon: {}",
                action.phrase
            );
        }
    }
}
