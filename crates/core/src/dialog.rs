//! The chat transcript: user utterances and assistant replies, append-only.
//! Nothing is ever edited or removed except by a full clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogRole {
    User,
    Assistant,
}

impl fmt::Display for DialogRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogRole::User => write!(f, "user"),
            DialogRole::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogMessage {
    pub role: DialogRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl DialogMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: DialogRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: DialogRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only message log for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogLog {
    messages: Vec<DialogMessage>,
}

impl DialogLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: DialogMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[DialogMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The only supported deletion: drop the whole transcript.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_display_lowercase() {
        assert_eq!(format!("{}", DialogRole::User), "user");
        assert_eq!(format!("{}", DialogRole::Assistant), "assistant");
    }

    #[test]
    fn test_log_appends_in_order() {
        let mut log = DialogLog::new();
        log.push(DialogMessage::user("打开空调"));
        log.push(DialogMessage::assistant("空调已打开"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].role, DialogRole::User);
        assert_eq!(log.messages()[1].role, DialogRole::Assistant);
        assert_eq!(log.messages()[1].text, "空调已打开");
    }

    #[test]
    fn test_clear_empties_the_log() {
        let mut log = DialogLog::new();
        log.push(DialogMessage::user("你好"));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_message_serialization_keeps_role_tag() {
        let msg = DialogMessage::user("现在几点了");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"user""#));
        let back: DialogMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
