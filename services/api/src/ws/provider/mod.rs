//! The speech-vendor boundary: recognition and synthesis run as a
//! provider task the session loop talks to over channels. The core never
//! sees the vendor; it only receives result text and hands back reply
//! text to speak.

pub mod mock;
pub mod xfyun;

use crate::config::{Config, SpeechProvider};
use bytes::Bytes;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::error;

/// Commands the session loop sends into the active provider task.
#[derive(Debug)]
pub enum SpeechCommand {
    /// A chunk of raw PCM16 microphone audio.
    Audio(Bytes),
    /// The current utterance is over; finish recognition.
    AudioEnd,
    /// Reply text the assistant wants spoken.
    Speak(String),
}

/// Events any provider can emit back to the session loop.
#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// A transcription of the user's speech.
    Transcription { text: String, is_final: bool },
    /// A chunk of synthesized audio (base64 encoded PCM16).
    AudioChunk(String),
    /// Synthesis of a reply has started.
    Speaking,
    /// Synthesis of a reply has finished.
    SpeakingDone,
    /// The provider failed; the session downgrades this to a transient
    /// error display.
    Error(String),
    /// The provider task is done.
    Closed,
}

/// Starts a task for the configured speech provider.
///
/// # Returns
/// A tuple containing:
/// 1. A sender for `SpeechCommand`s into the provider task.
/// 2. A receiver for the provider's `SpeechEvent`s.
/// 3. A `JoinHandle` for the spawned task.
pub fn start_speech_provider(
    config: Arc<Config>,
) -> (
    mpsc::Sender<SpeechCommand>,
    mpsc::Receiver<SpeechEvent>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(128);
    let (event_tx, event_rx) = mpsc::channel(128);

    let handle = tokio::spawn(async move {
        let result = match config.speech_provider {
            SpeechProvider::Mock => mock::run(cmd_rx, event_tx.clone()).await,
            SpeechProvider::Xfyun => xfyun::run(&config, cmd_rx, event_tx.clone()).await,
        };
        if let Err(e) = result {
            error!(provider = ?config.speech_provider, error = ?e, "Speech provider task failed");
            let _ = event_tx
                .send(SpeechEvent::Error(format!("语音服务出错了：{}", e)))
                .await;
        }
    });

    (cmd_tx, event_rx, handle)
}
