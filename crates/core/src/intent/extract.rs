//! Auxiliary parameter extraction: numbers (digits or spoken Chinese
//! numerals), color names, city names.

use super::lexicon::{CITIES, COLORS};
use regex::Regex;
use std::sync::LazyLock;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern"));

/// Pulls the first number out of an utterance. Arabic digits win over
/// spoken numerals when both appear.
pub fn extract_number(text: &str) -> Option<u32> {
    if let Some(m) = DIGITS_RE.find(text) {
        return m.as_str().parse().ok();
    }
    first_numeral_run(text).and_then(parse_chinese_numeral)
}

/// First maximal run of Chinese numeral characters in the text.
fn first_numeral_run(text: &str) -> Option<String> {
    let mut run = String::new();
    for c in text.chars() {
        if is_numeral_char(c) {
            run.push(c);
        } else if !run.is_empty() {
            break;
        }
    }
    if run.is_empty() { None } else { Some(run) }
}

fn is_numeral_char(c: char) -> bool {
    matches!(
        c,
        '零' | '一' | '二' | '两' | '三' | '四' | '五' | '六' | '七' | '八' | '九' | '十' | '百'
    )
}

fn numeral_digit(c: char) -> Option<u32> {
    match c {
        '零' => Some(0),
        '一' => Some(1),
        '二' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Parses the small spoken numerals that show up in commands: 八, 十六,
/// 二十四, 三十, 一百. Anything fancier is out of scope for a command
/// vocabulary of temperatures and volume levels.
fn parse_chinese_numeral(run: String) -> Option<u32> {
    if run == "百" || run == "一百" {
        return Some(100);
    }
    if let Some(pos) = run.find('十') {
        let (left, right) = run.split_at(pos);
        let right = &right['十'.len_utf8()..];
        let tens = if left.is_empty() {
            1
        } else {
            let mut chars = left.chars();
            let d = numeral_digit(chars.next()?)?;
            if chars.next().is_some() {
                return None;
            }
            d
        };
        let ones = if right.is_empty() {
            0
        } else {
            let mut chars = right.chars();
            let d = numeral_digit(chars.next()?)?;
            if chars.next().is_some() {
                return None;
            }
            d
        };
        return Some(tens * 10 + ones);
    }
    // Plain digit sequence, read positionally: 二四 → 24.
    run.chars()
        .try_fold(0u32, |acc, c| Some(acc * 10 + numeral_digit(c)?))
}

/// First color named in the text, as its canonical two-character name.
pub fn extract_color(text: &str) -> Option<&'static str> {
    COLORS
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, name)| *name)
}

/// First known city named in the text.
pub fn extract_city(text: &str) -> Option<&'static str> {
    CITIES.iter().find(|city| text.contains(*city)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_number("温度调到24度"), Some(24));
        assert_eq!(extract_number("音量调到50"), Some(50));
        assert_eq!(extract_number("没有数字"), None);
    }

    #[test]
    fn test_extract_spoken_numerals() {
        assert_eq!(extract_number("温度调到二十四度"), Some(24));
        assert_eq!(extract_number("温度调到十六度"), Some(16));
        assert_eq!(extract_number("风速调到两档"), Some(2));
        assert_eq!(extract_number("温度调到三十度"), Some(30));
        assert_eq!(extract_number("音量调到一百"), Some(100));
        assert_eq!(extract_number("温度调到八度"), Some(8));
    }

    #[test]
    fn test_digits_win_over_numerals() {
        assert_eq!(extract_number("温度从二十调到26度"), Some(26));
    }

    #[test]
    fn test_extract_color() {
        assert_eq!(extract_color("氛围灯调成蓝色"), Some("蓝色"));
        assert_eq!(extract_color("换成紫色的灯"), Some("紫色"));
        assert_eq!(extract_color("换个颜色"), None);
    }

    #[test]
    fn test_extract_city() {
        assert_eq!(extract_city("上海今天天气怎么样"), Some("上海"));
        assert_eq!(extract_city("今天天气怎么样"), None);
    }
}
