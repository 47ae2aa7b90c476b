//! API Models
//!
//! Wire-level data structures for the REST surface: session records,
//! command payloads, and their `utoipa` schemas for the generated OpenAPI
//! documentation. Domain types (vehicle state, dialog messages) live in
//! `cabin-core`; the views here exist so the HTTP contract is explicit.

use cabin_core::{CommandCategory, CommandType, DialogMessage, VehicleState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Ended,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Ended => write!(f, "ended"),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct Session {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = String, example = "active")]
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One chat bubble as the HTTP client sees it.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct DialogMessageView {
    #[schema(example = "user")]
    pub role: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&DialogMessage> for DialogMessageView {
    fn from(msg: &DialogMessage) -> Self {
        Self {
            role: msg.role.to_string(),
            text: msg.text.clone(),
            timestamp: msg.timestamp,
        }
    }
}

/// Free text to run through the classifier, from typed input or a
/// quick-action button.
#[derive(Deserialize, ToSchema)]
pub struct CommandPayload {
    #[schema(example = "打开空调")]
    pub text: String,
}

/// Outcome of one executed command.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct CommandResponse {
    #[schema(value_type = String, example = "ac_on")]
    pub command_type: CommandType,
    #[schema(value_type = String, example = "vehicle")]
    pub category: CommandCategory,
    pub success: bool,
    #[schema(example = "空调已打开，温度24度，风速3档")]
    pub reply: String,
    #[schema(value_type = Object)]
    pub vehicle: VehicleState,
}

/// Vehicle snapshot response; the state shape is owned by `cabin-core`.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct VehicleStateView {
    #[schema(value_type = Object)]
    pub vehicle: VehicleState,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSessionStatusPayload {
    #[schema(example = "ended")]
    pub status: SessionStatus,
}

/// A supported phrase surfaced as a one-tap button.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct QuickActionView {
    #[schema(example = "打开空调")]
    pub phrase: String,
    #[schema(example = "空调")]
    pub label: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::DialogMessage;

    #[test]
    fn test_session_status_serialization() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Ended).unwrap(),
            "\"ended\""
        );

        let back: SessionStatus = serde_json::from_str("\"ended\"").unwrap();
        assert_eq!(back, SessionStatus::Ended);
    }

    #[test]
    fn test_session_status_display() {
        assert_eq!(format!("{}", SessionStatus::Active), "active");
        assert_eq!(format!("{}", SessionStatus::Ended), "ended");
    }

    #[test]
    fn test_session_serialization_round_trip() {
        let session = Session {
            id: Uuid::new_v4(),
            status: SessionStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("active"));

        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, session.id);
        assert_eq!(back.status, session.status);
    }

    #[test]
    fn test_dialog_message_view_mapping() {
        let msg = DialogMessage::assistant("空调已打开");
        let view = DialogMessageView::from(&msg);
        assert_eq!(view.role, "assistant");
        assert_eq!(view.text, "空调已打开");
        assert_eq!(view.timestamp, msg.timestamp);
    }

    #[test]
    fn test_command_payload_requires_text() {
        let payload: CommandPayload = serde_json::from_str(r#"{"text": "打开空调"}"#).unwrap();
        assert_eq!(payload.text, "打开空调");

        let missing: Result<CommandPayload, _> = serde_json::from_str("{}");
        assert!(missing.is_err());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Session not found".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"message":"Session not found"}"#
        );
    }

    #[test]
    fn test_invalid_status_deserialization() {
        let result: Result<SessionStatus, _> = serde_json::from_str("\"paused\"");
        assert!(result.is_err());
    }
}
