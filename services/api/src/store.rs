//! Session Store
//!
//! All session state lives in this process: created at session start,
//! alive for the session, never persisted. The store keeps
//! one `Assistant` and one `DialogLog` per session behind a `RwLock`; the
//! assistant itself is shared as `Arc<Mutex<_>>` so an active WebSocket
//! session and the REST handlers mutate the same state.

use crate::models::{Session, SessionStatus};
use cabin_core::{Assistant, DialogLog, DialogMessage, VehicleState, WELCOME};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

struct SessionEntry {
    session: Session,
    assistant: Arc<Mutex<Assistant>>,
    dialog: DialogLog,
}

/// In-memory session registry.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with a fresh assistant and the welcome message
    /// already in its dialog.
    pub async fn create_session(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let mut dialog = DialogLog::new();
        dialog.push(DialogMessage::assistant(WELCOME));

        let entry = SessionEntry {
            session: session.clone(),
            assistant: Arc::new(Mutex::new(Assistant::new())),
            dialog,
        };
        self.sessions.write().await.insert(session.id, entry);
        session
    }

    pub async fn get_session(&self, session_id: Uuid) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|e| e.session.clone())
    }

    /// All sessions, most recent first.
    pub async fn list_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .await
            .values()
            .map(|e| e.session.clone())
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }

    /// Shared handle to a session's assistant, for the WebSocket loop.
    pub async fn assistant(&self, session_id: Uuid) -> Option<Arc<Mutex<Assistant>>> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|e| e.assistant.clone())
    }

    pub async fn add_message(&self, session_id: Uuid, message: DialogMessage) -> Option<()> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&session_id)?;
        entry.dialog.push(message);
        entry.session.updated_at = Utc::now();
        Some(())
    }

    pub async fn get_messages(&self, session_id: Uuid) -> Option<Vec<DialogMessage>> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|e| e.dialog.messages().to_vec())
    }

    /// The only supported deletion: wipe the whole transcript.
    pub async fn clear_messages(&self, session_id: Uuid) -> Option<()> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&session_id)?;
        entry.dialog.clear();
        entry.session.updated_at = Utc::now();
        Some(())
    }

    pub async fn update_session_status(
        &self,
        session_id: Uuid,
        status: SessionStatus,
    ) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&session_id)?;
        entry.session.status = status;
        entry.session.updated_at = Utc::now();
        Some(entry.session.clone())
    }

    pub async fn vehicle_state(&self, session_id: Uuid) -> Option<VehicleState> {
        let assistant = self.assistant(session_id).await?;
        let snapshot = assistant.lock().await.vehicle.clone();
        Some(snapshot)
    }

    /// Runs one utterance through classify + execute, recording both
    /// sides of the exchange in the dialog. Returns the command, its
    /// result, and the vehicle snapshot after execution.
    pub async fn execute_command(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Option<(cabin_core::Command, cabin_core::CommandResult, VehicleState)> {
        let assistant = self.assistant(session_id).await?;

        let (command, result, snapshot) = {
            let mut assistant = assistant.lock().await;
            let (command, result) = assistant.handle_text(text);
            (command, result, assistant.vehicle.clone())
        };

        self.add_message(session_id, DialogMessage::user(text)).await?;
        self.add_message(session_id, DialogMessage::assistant(result.message()))
            .await?;

        Some((command, result, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::{CommandType, DialogRole};

    #[tokio::test]
    async fn test_create_session_seeds_welcome_message() {
        let store = SessionStore::new();
        let session = store.create_session().await;

        let messages = store.get_messages(session.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, DialogRole::Assistant);
        assert_eq!(messages[0].text, WELCOME);
    }

    #[tokio::test]
    async fn test_list_sessions_most_recent_first() {
        let store = SessionStore::new();
        let first = store.create_session().await;
        let second = store.create_session().await;

        let sessions = store.list_sessions().await;
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].created_at >= sessions[1].created_at);
        assert!(sessions.iter().any(|s| s.id == first.id));
        assert!(sessions.iter().any(|s| s.id == second.id));
    }

    #[tokio::test]
    async fn test_unknown_session_yields_none() {
        let store = SessionStore::new();
        assert!(store.get_session(Uuid::new_v4()).await.is_none());
        assert!(store.get_messages(Uuid::new_v4()).await.is_none());
        assert!(store.execute_command(Uuid::new_v4(), "打开空调").await.is_none());
    }

    #[tokio::test]
    async fn test_execute_command_mutates_shared_state_and_dialog() {
        let store = SessionStore::new();
        let session = store.create_session().await;

        let (command, result, snapshot) =
            store.execute_command(session.id, "打开空调").await.unwrap();
        assert_eq!(command.command_type, CommandType::AcOn);
        assert!(result.is_success());
        assert!(snapshot.climate.on);

        // welcome + user + assistant
        let messages = store.get_messages(session.id).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, DialogRole::User);
        assert_eq!(messages[1].text, "打开空调");
        assert_eq!(messages[2].text, result.message());

        // The vehicle endpoint sees the same state.
        let vehicle = store.vehicle_state(session.id).await.unwrap();
        assert!(vehicle.climate.on);
    }

    #[tokio::test]
    async fn test_clear_messages_wipes_transcript() {
        let store = SessionStore::new();
        let session = store.create_session().await;
        store.execute_command(session.id, "打开空调").await.unwrap();

        store.clear_messages(session.id).await.unwrap();
        assert!(store.get_messages(session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_session_status() {
        let store = SessionStore::new();
        let session = store.create_session().await;

        let updated = store
            .update_session_status(session.id, SessionStatus::Ended)
            .await
            .unwrap();
        assert_eq!(updated.status, SessionStatus::Ended);
        assert!(updated.updated_at >= session.updated_at);
    }
}
