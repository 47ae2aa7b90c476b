//! A deterministic, credential-free speech provider for demos and tests.
//!
//! Recognition: buffered audio bytes are interpreted as UTF-8 text on
//! `AudioEnd`, so a test client can "speak" by sending text as binary
//! frames. Synthesis: each `Speak` answers with one silent PCM16 chunk
//! sized to the reply, bracketed by the speaking markers.

use super::{SpeechCommand, SpeechEvent};
use crate::audio;
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

/// Playback time budgeted per character of reply text.
const MILLIS_PER_CHAR: u32 = 50;

pub async fn run(
    mut rx: mpsc::Receiver<SpeechCommand>,
    events: mpsc::Sender<SpeechEvent>,
) -> Result<()> {
    let mut pending: Vec<u8> = Vec::new();

    while let Some(command) = rx.recv().await {
        match command {
            SpeechCommand::Audio(data) => {
                pending.extend_from_slice(&data);
            }
            SpeechCommand::AudioEnd => {
                let text = String::from_utf8_lossy(&pending).trim().to_string();
                pending.clear();
                if text.is_empty() {
                    debug!("Utterance ended with no audio; ignoring.");
                    continue;
                }
                events
                    .send(SpeechEvent::Transcription {
                        text,
                        is_final: true,
                    })
                    .await?;
            }
            SpeechCommand::Speak(text) => {
                events.send(SpeechEvent::Speaking).await?;
                let millis = MILLIS_PER_CHAR * text.chars().count().max(1) as u32;
                let chunk = audio::encode_i16(&audio::silence(millis));
                events.send(SpeechEvent::AudioChunk(chunk)).await?;
                events.send(SpeechEvent::SpeakingDone).await?;
            }
        }
    }

    events.send(SpeechEvent::Closed).await.ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_audio_bytes_become_a_final_transcription() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let task = tokio::spawn(run(cmd_rx, event_tx));

        cmd_tx
            .send(SpeechCommand::Audio("打开".as_bytes().to_vec().into()))
            .await
            .unwrap();
        cmd_tx
            .send(SpeechCommand::Audio("空调".as_bytes().to_vec().into()))
            .await
            .unwrap();
        cmd_tx.send(SpeechCommand::AudioEnd).await.unwrap();

        match event_rx.recv().await.unwrap() {
            SpeechEvent::Transcription { text, is_final } => {
                assert_eq!(text, "打开空调");
                assert!(is_final);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        drop(cmd_tx);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_speak_brackets_audio_with_markers() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let task = tokio::spawn(run(cmd_rx, event_tx));

        cmd_tx
            .send(SpeechCommand::Speak("空调已打开".to_string()))
            .await
            .unwrap();

        assert!(matches!(
            event_rx.recv().await.unwrap(),
            SpeechEvent::Speaking
        ));
        match event_rx.recv().await.unwrap() {
            SpeechEvent::AudioChunk(data) => assert!(!data.is_empty()),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            SpeechEvent::SpeakingDone
        ));

        drop(cmd_tx);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_empty_utterance_is_ignored() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let task = tokio::spawn(run(cmd_rx, event_tx));

        cmd_tx.send(SpeechCommand::AudioEnd).await.unwrap();
        drop(cmd_tx);

        // The only event is the final Closed marker.
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            SpeechEvent::Closed
        ));
        task.await.unwrap().unwrap();
    }
}
