//! Defines the WebSocket message protocol between the head-unit client
//! and the API server.

use cabin_core::{DialogMessage, VehicleState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from the client to the server. Binary WebSocket frames
/// carry raw PCM16 microphone audio and are not part of this enum.
#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Attaches the socket to an existing session. This must be the first message.
    #[serde(rename = "init")]
    Init {
        /// The unique identifier of the session to attach to.
        session_id: Option<Uuid>,
    },
    /// A typed (or quick-action) utterance from the user.
    #[serde(rename = "user_message")]
    UserMessage { text: String },
    /// Toggles voice input/output.
    #[serde(rename = "set_voice_enabled")]
    SetVoiceEnabled { enabled: bool },
    /// Marks the end of the current spoken utterance.
    #[serde(rename = "audio_end")]
    AudioEnd,
}

/// Messages sent from the server to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms successful attachment and provides the initial state.
    Initialized {
        session_id: Uuid,
        vehicle_state: VehicleState,
        history: Vec<DialogMessage>,
    },
    /// Pushes the vehicle snapshot after a command executed.
    StateUpdate { state: VehicleState },
    /// The assistant's reply to one utterance.
    Reply { text: String, success: bool },
    /// An update on the user's speech-to-text transcription.
    TranscriptionUpdate { text: String, is_final: bool },
    /// A chunk of audio data (base64 encoded PCM16) for the spoken reply.
    AudioChunk { data: String },
    /// The spoken reply has started playing.
    SpeakingStart,
    /// The spoken reply has finished.
    SpeakingEnd,
    /// A transient error to display.
    Error { message: String },
    /// The transient error display should reset.
    ErrorCleared,
}
