//! One utterance through the assistant: classify, execute, record, reply.

use crate::{
    state::AppState,
    ws::{
        protocol::ServerMessage,
        provider::SpeechCommand,
        session::send_msg,
    },
};
use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::info;
use uuid::Uuid;

/// Handles a single user utterance, typed or transcribed.
///
/// This involves:
/// 1.  Running the text through the classifier and the matching executor.
/// 2.  Recording both sides of the exchange in the session dialog.
/// 3.  Pushing the new vehicle snapshot and the reply to the client.
/// 4.  Optionally handing the reply text to the speech provider for
///     synthesis.
pub async fn handle_command_cycle(
    state: &Arc<AppState>,
    session_id: Uuid,
    text: &str,
    socket_tx: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
    speech_tx: &Option<mpsc::Sender<SpeechCommand>>,
) -> Result<()> {
    let Some((command, result, vehicle)) = state.store.execute_command(session_id, text).await
    else {
        let mut sink = socket_tx.lock().await;
        send_msg(
            &mut sink,
            ServerMessage::Error {
                message: format!("Session '{}' no longer exists", session_id),
            },
        )
        .await?;
        return Ok(());
    };

    info!(
        command = ?command.command_type,
        category = %command.category,
        success = result.is_success(),
        "Utterance handled"
    );

    {
        let mut sink = socket_tx.lock().await;
        send_msg(&mut sink, ServerMessage::StateUpdate { state: vehicle }).await?;
        send_msg(
            &mut sink,
            ServerMessage::Reply {
                text: result.message().to_string(),
                success: result.is_success(),
            },
        )
        .await?;
    }

    // Voice replies go through the provider; the markers and audio come
    // back as speech events.
    if let Some(tx) = speech_tx {
        let _ = tx
            .send(SpeechCommand::Speak(result.message().to_string()))
            .await;
    }

    Ok(())
}
