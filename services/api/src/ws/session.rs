//! Manages the WebSocket connection lifecycle for an assistant session.

use super::{
    cycle::handle_command_cycle,
    protocol::{ClientMessage, ServerMessage},
    provider::{self, SpeechCommand, SpeechEvent},
};
use crate::state::AppState;
use anyhow::{Context, Result, anyhow};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use cabin_core::{DialogMessage, VehicleState};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tracing::{Instrument, debug, error, info, instrument, warn};
use uuid::Uuid;

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
///
/// Performs the initial handshake (the first message must be `init` with
/// an existing session id) and then spawns the session loop.
#[instrument(name = "ws_session", skip_all, fields(session_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let temp_id: u32 = rand::random();
    tracing::Span::current().record("session_id", temp_id.to_string().as_str());
    info!("New WebSocket connection. Awaiting initialization...");

    let (socket_tx, mut socket_rx) = socket.split();
    let socket_tx = Arc::new(Mutex::new(socket_tx));

    let init_result = match socket_rx.next().await {
        Some(Ok(Message::Text(text))) => initialize_session(&text, &state).await,
        Some(Ok(_)) => Err(anyhow!("First message was not a text `init` message.")),
        _ => {
            info!("Client disconnected before sending init message.");
            return;
        }
    };

    let (session_id, vehicle_state, history) = match init_result {
        Ok(parts) => parts,
        Err(e) => {
            // If initialization fails, send an error and terminate.
            error!("Session initialization failed: {:?}", e);
            let mut sink = socket_tx.lock().await;
            let _ = send_msg(
                &mut sink,
                ServerMessage::Error {
                    message: e.to_string(),
                },
            )
            .await;
            return;
        }
    };
    tracing::Span::current().record("session_id", session_id.to_string().as_str());

    // Confirm success and hand the client its starting state.
    if send_msg(
        &mut *socket_tx.lock().await,
        ServerMessage::Initialized {
            session_id,
            vehicle_state,
            history,
        },
    )
    .await
    .is_err()
    {
        error!("Failed to send Initialized message to client.");
        return;
    }

    // Run the session loop in a separate, instrumented task.
    let session_span = tracing::info_span!("assistant_runtime", %session_id);
    tokio::spawn(
        async move {
            if let Err(e) = run_session(state, socket_tx, socket_rx, session_id).await {
                error!(error = ?e, "Session terminated with error.");
            }
            info!("Session finished.");
        }
        .instrument(session_span),
    );
}

/// Parses the `init` message and loads the session's current state.
async fn initialize_session(
    init_text: &str,
    state: &Arc<AppState>,
) -> Result<(Uuid, VehicleState, Vec<DialogMessage>)> {
    let init_msg: ClientMessage = serde_json::from_str(init_text)?;
    let ClientMessage::Init { session_id } = init_msg else {
        return Err(anyhow!("First message must be `init`"));
    };
    let session_id = session_id.context("`session_id` is required for `init`")?;

    let vehicle_state = state
        .store
        .vehicle_state(session_id)
        .await
        .context("Session not found")?;
    let history = state
        .store
        .get_messages(session_id)
        .await
        .context("Session not found")?;
    info!("Attached to existing session");
    Ok((session_id, vehicle_state, history))
}

/// The main event loop for an active WebSocket session.
///
/// One utterance is processed to completion before the next begins: the
/// command cycle runs inline, and user messages arriving while a spoken
/// reply is in flight are dropped.
async fn run_session(
    state: Arc<AppState>,
    socket_tx: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    mut socket_rx: SplitStream<WebSocket>,
    session_id: Uuid,
) -> Result<()> {
    let mut speech_tx: Option<mpsc::Sender<SpeechCommand>> = None;
    let mut speech_rx: Option<mpsc::Receiver<SpeechEvent>> = None;
    let mut speech_handle: Option<JoinHandle<()>> = None;
    let mut speaking = false;

    loop {
        tokio::select! {
            // Handle messages from the client WebSocket.
            msg_result = socket_rx.next() => {
                match msg_result {
                    Some(Ok(ws_msg)) => match ws_msg {
                        Message::Text(text) => {
                            if let Ok(msg) = serde_json::from_str::<ClientMessage>(&text) {
                                match msg {
                                    ClientMessage::UserMessage { text } => {
                                        if speaking {
                                            debug!("Ignoring input while a spoken reply is in flight.");
                                        } else {
                                            handle_command_cycle(&state, session_id, &text, &socket_tx, &speech_tx).await?;
                                        }
                                    }
                                    ClientMessage::SetVoiceEnabled { enabled } => {
                                        if enabled {
                                            if let Some(handle) = speech_handle.take() { handle.abort(); }
                                            let (tx, rx, handle) = provider::start_speech_provider(state.config.clone());
                                            speech_tx = Some(tx);
                                            speech_rx = Some(rx);
                                            speech_handle = Some(handle);
                                            info!(provider = ?state.config.speech_provider, "Voice enabled; speech provider started.");
                                        } else {
                                            if let Some(handle) = speech_handle.take() {
                                                handle.abort();
                                                info!("Aborted speech provider task.");
                                            }
                                            speech_tx = None;
                                            speech_rx = None;
                                            speaking = false;
                                            info!("Voice disabled by client.");
                                        }
                                    }
                                    ClientMessage::AudioEnd => {
                                        if let Some(tx) = &speech_tx {
                                            let _ = tx.send(SpeechCommand::AudioEnd).await;
                                        } else {
                                            warn!("Received audio_end, but no speech provider is active.");
                                        }
                                    }
                                    ClientMessage::Init { .. } => {
                                        warn!("Ignoring unexpected init message post-init.");
                                    }
                                }
                            }
                        },
                        Message::Binary(data) => {
                            if let Some(tx) = &speech_tx {
                                if let Err(e) = tx.send(SpeechCommand::Audio(data.into())).await {
                                    error!("Failed to send audio to provider task: {}", e);
                                }
                            } else {
                                warn!("Received audio data from client, but no speech provider is active.");
                            }
                        },
                        Message::Close(_) => {
                            info!("Client sent close frame. Shutting down session.");
                            break;
                        },
                        Message::Ping(_) | Message::Pong(_) => {},
                    },
                    Some(Err(e)) => {
                        error!("Error receiving from client WebSocket: {:?}", e);
                        break;
                    }
                    None => break,
                }
            },
            // Handle events from the active speech provider.
            event = next_speech_event(&mut speech_rx) => {
                match event {
                    Some(SpeechEvent::Transcription { text, is_final }) => {
                        send_msg(
                            &mut *socket_tx.lock().await,
                            ServerMessage::TranscriptionUpdate { text: text.clone(), is_final },
                        ).await?;
                        if is_final {
                            if speaking {
                                debug!("Ignoring recognized utterance while a spoken reply is in flight.");
                            } else {
                                handle_command_cycle(&state, session_id, &text, &socket_tx, &speech_tx).await?;
                            }
                        }
                    }
                    Some(SpeechEvent::AudioChunk(data)) => {
                        send_msg(&mut *socket_tx.lock().await, ServerMessage::AudioChunk { data }).await?;
                    }
                    Some(SpeechEvent::Speaking) => {
                        speaking = true;
                        send_msg(&mut *socket_tx.lock().await, ServerMessage::SpeakingStart).await?;
                    }
                    Some(SpeechEvent::SpeakingDone) => {
                        speaking = false;
                        send_msg(&mut *socket_tx.lock().await, ServerMessage::SpeakingEnd).await?;
                    }
                    Some(SpeechEvent::Error(message)) => {
                        // Vendor failure: downgrade to a transient error
                        // display, drop voice, and auto-clear after the
                        // configured delay.
                        if let Some(handle) = speech_handle.take() { handle.abort(); }
                        speech_tx = None;
                        speech_rx = None;
                        speaking = false;
                        send_msg(&mut *socket_tx.lock().await, ServerMessage::Error { message }).await?;
                        schedule_error_reset(&state, socket_tx.clone());
                    }
                    Some(SpeechEvent::Closed) | None => {
                        speech_rx = None;
                    }
                }
            },
        }
    }

    // Clean up the provider task on exit.
    if let Some(handle) = speech_handle.take() {
        handle.abort();
    }
    info!("WebSocket connection closed and session terminated.");
    Ok(())
}

/// Next provider event, or pending forever while voice is disabled so the
/// select loop sleeps on the socket alone.
async fn next_speech_event(rx: &mut Option<mpsc::Receiver<SpeechEvent>>) -> Option<SpeechEvent> {
    match rx.as_mut() {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Clears the transient error display after the configured delay.
fn schedule_error_reset(state: &Arc<AppState>, socket_tx: Arc<Mutex<SplitSink<WebSocket, Message>>>) {
    let delay = state.config.feedback_reset;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut sink = socket_tx.lock().await;
        let _ = send_msg(&mut sink, ServerMessage::ErrorCleared).await;
    });
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
