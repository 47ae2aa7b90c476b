//! iFlytek realtime speech over WebSocket: streaming recognition (IAT)
//! and synthesis (TTS), with the vendor's HMAC-SHA256 signed handshake.
//!
//! The recognition connection is opened lazily on the first audio frame
//! of an utterance and torn down after the final result; synthesis opens
//! one short-lived connection per spoken reply.

use super::{SpeechCommand, SpeechEvent};
use crate::{audio, config::Config};
use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message as WsMessage,
};
use tracing::{info, warn};

const IAT_HOST: &str = "iat-api.xfyun.cn";
const IAT_PATH: &str = "/v2/iat";
const TTS_HOST: &str = "tts-api.xfyun.cn";
const TTS_PATH: &str = "/v2/tts";

/// Frame status markers in the vendor protocol.
const STATUS_FIRST: u8 = 0;
const STATUS_CONTINUE: u8 = 1;
const STATUS_LAST: u8 = 2;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Credentials {
    app_id: String,
    api_key: String,
    api_secret: String,
}

fn credentials(config: &Config) -> Result<Credentials> {
    Ok(Credentials {
        app_id: config
            .xfyun_app_id
            .clone()
            .context("xfyun app id not configured")?,
        api_key: config
            .xfyun_api_key
            .clone()
            .context("xfyun api key not configured")?,
        api_secret: config
            .xfyun_api_secret
            .clone()
            .context("xfyun api secret not configured")?,
    })
}

/// Runs the provider loop: audio in, transcriptions and synthesized
/// replies out.
pub async fn run(
    config: &Config,
    mut rx: mpsc::Receiver<SpeechCommand>,
    events: mpsc::Sender<SpeechEvent>,
) -> Result<()> {
    let creds = credentials(config)?;
    let mut iat: Option<WsStream> = None;
    let mut transcript = String::new();

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(SpeechCommand::Audio(data)) => {
                    let first = iat.is_none();
                    if first {
                        iat = Some(connect_iat(&creds).await?);
                        transcript.clear();
                    }
                    let status = if first { STATUS_FIRST } else { STATUS_CONTINUE };
                    let frame = audio_frame(&creds, &data, status);
                    if let Some(stream) = iat.as_mut() {
                        stream
                            .send(WsMessage::Text(serde_json::to_string(&frame)?.into()))
                            .await
                            .context("Failed to send audio frame")?;
                    }
                }
                Some(SpeechCommand::AudioEnd) => {
                    if let Some(stream) = iat.as_mut() {
                        let frame = audio_frame(&creds, &[], STATUS_LAST);
                        stream
                            .send(WsMessage::Text(serde_json::to_string(&frame)?.into()))
                            .await
                            .context("Failed to send end-of-utterance frame")?;
                    }
                }
                Some(SpeechCommand::Speak(text)) => {
                    speak(&creds, &text, &events).await?;
                }
                None => break,
            },
            message = next_message(&mut iat) => match message {
                Some(Ok(WsMessage::Text(text))) => {
                    let response: IatResponse = serde_json::from_str(&text)
                        .context("Unparseable recognition response")?;
                    if response.code != 0 {
                        return Err(anyhow!(
                            "recognition error {}: {}",
                            response.code,
                            response.message
                        ));
                    }
                    if let Some(data) = response.data {
                        if let Some(result) = data.result {
                            for word in result.ws {
                                for candidate in word.cw {
                                    transcript.push_str(&candidate.w);
                                }
                            }
                        }
                        let is_final = data.status == STATUS_LAST;
                        events
                            .send(SpeechEvent::Transcription {
                                text: transcript.clone(),
                                is_final,
                            })
                            .await?;
                        if is_final {
                            // The vendor closes the stream after the last
                            // result; the next utterance reconnects.
                            iat = None;
                        }
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    iat = None;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = ?e, "Recognition stream error; dropping connection");
                    iat = None;
                }
            },
        }
    }

    events.send(SpeechEvent::Closed).await.ok();
    Ok(())
}

/// Next frame from the recognition stream, or pending forever while no
/// connection is open (so the select loop sleeps on commands alone).
async fn next_message(
    iat: &mut Option<WsStream>,
) -> Option<Result<WsMessage, tokio_tungstenite::tungstenite::Error>> {
    match iat.as_mut() {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

async fn connect_iat(creds: &Credentials) -> Result<WsStream> {
    let url = signed_url(IAT_HOST, IAT_PATH, &creds.api_key, &creds.api_secret, Utc::now())?;
    let (stream, _) = connect_async(url.as_str())
        .await
        .context("Failed to connect to recognition WebSocket")?;
    info!("Connected to speech recognition endpoint.");
    Ok(stream)
}

/// Opens one synthesis connection, streams the audio chunks through, and
/// closes it again.
async fn speak(creds: &Credentials, text: &str, events: &mpsc::Sender<SpeechEvent>) -> Result<()> {
    let url = signed_url(TTS_HOST, TTS_PATH, &creds.api_key, &creds.api_secret, Utc::now())?;
    let (mut stream, _) = connect_async(url.as_str())
        .await
        .context("Failed to connect to synthesis WebSocket")?;

    let request = TtsRequest {
        common: CommonField {
            app_id: &creds.app_id,
        },
        business: TtsBusiness {
            aue: "raw",
            auf: "audio/L16;rate=16000",
            vcn: "xiaoyan",
            tte: "UTF8",
        },
        data: TtsText {
            status: STATUS_LAST,
            text: base64::engine::general_purpose::STANDARD.encode(text.as_bytes()),
        },
    };
    stream
        .send(WsMessage::Text(serde_json::to_string(&request)?.into()))
        .await
        .context("Failed to send synthesis request")?;

    events.send(SpeechEvent::Speaking).await?;
    while let Some(message) = stream.next().await {
        match message.context("Synthesis stream error")? {
            WsMessage::Text(text) => {
                let response: TtsResponse =
                    serde_json::from_str(&text).context("Unparseable synthesis response")?;
                if response.code != 0 {
                    return Err(anyhow!(
                        "synthesis error {}: {}",
                        response.code,
                        response.message
                    ));
                }
                if let Some(data) = response.data {
                    if let Some(chunk) = data.audio {
                        events.send(SpeechEvent::AudioChunk(chunk)).await?;
                    }
                    if data.status == STATUS_LAST {
                        break;
                    }
                }
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }
    events.send(SpeechEvent::SpeakingDone).await?;
    stream.close(None).await.ok();
    Ok(())
}

fn audio_frame<'a>(creds: &'a Credentials, data: &[u8], status: u8) -> IatRequest<'a> {
    let (common, business) = if status == STATUS_FIRST {
        (
            Some(CommonField {
                app_id: &creds.app_id,
            }),
            Some(IatBusiness {
                language: "zh_cn",
                domain: "iat",
                accent: "mandarin",
                vad_eos: 3000,
            }),
        )
    } else {
        (None, None)
    };
    IatRequest {
        common,
        business,
        data: IatAudio {
            status,
            format: "audio/L16;rate=16000",
            encoding: "raw",
            audio: audio::encode_pcm(data),
        },
    }
}

/// Builds the signed connection URL the vendor expects: HMAC-SHA256 over
/// the host, date, and request line, wrapped in a base64 authorization
/// parameter.
fn signed_url(
    host: &str,
    path: &str,
    api_key: &str,
    api_secret: &str,
    date: DateTime<Utc>,
) -> Result<String> {
    let date = date.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    let origin = format!("host: {}\ndate: {}\nGET {} HTTP/1.1", host, date, path);

    let mut mac = Hmac::<Sha256>::new_from_slice(api_secret.as_bytes())
        .map_err(|_| anyhow!("invalid api secret"))?;
    mac.update(origin.as_bytes());
    let signature = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    let authorization_origin = format!(
        "api_key=\"{}\", algorithm=\"hmac-sha256\", headers=\"host date request-line\", signature=\"{}\"",
        api_key, signature
    );
    let authorization =
        base64::engine::general_purpose::STANDARD.encode(authorization_origin.as_bytes());

    Ok(format!(
        "wss://{}{}?authorization={}&date={}&host={}",
        host,
        path,
        encode_component(&authorization),
        encode_component(&date),
        host
    ))
}

/// Minimal percent-encoding for URL query components.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[derive(Serialize)]
struct CommonField<'a> {
    app_id: &'a str,
}

#[derive(Serialize)]
struct IatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    common: Option<CommonField<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business: Option<IatBusiness<'a>>,
    data: IatAudio<'a>,
}

#[derive(Serialize)]
struct IatBusiness<'a> {
    language: &'a str,
    domain: &'a str,
    accent: &'a str,
    vad_eos: u32,
}

#[derive(Serialize)]
struct IatAudio<'a> {
    status: u8,
    format: &'a str,
    encoding: &'a str,
    audio: String,
}

#[derive(Deserialize)]
struct IatResponse {
    code: i32,
    message: String,
    data: Option<IatData>,
}

#[derive(Deserialize)]
struct IatData {
    status: u8,
    result: Option<IatResult>,
}

#[derive(Deserialize)]
struct IatResult {
    ws: Vec<IatWord>,
}

#[derive(Deserialize)]
struct IatWord {
    cw: Vec<IatCandidate>,
}

#[derive(Deserialize)]
struct IatCandidate {
    w: String,
}

#[derive(Serialize)]
struct TtsRequest<'a> {
    common: CommonField<'a>,
    business: TtsBusiness<'a>,
    data: TtsText,
}

#[derive(Serialize)]
struct TtsBusiness<'a> {
    aue: &'a str,
    auf: &'a str,
    vcn: &'a str,
    tte: &'a str,
}

#[derive(Serialize)]
struct TtsText {
    status: u8,
    text: String,
}

#[derive(Deserialize)]
struct TtsResponse {
    code: i32,
    message: String,
    data: Option<TtsData>,
}

#[derive(Deserialize)]
struct TtsData {
    status: u8,
    audio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn creds() -> Credentials {
        Credentials {
            app_id: "app".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_signed_url_is_deterministic() {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = signed_url(IAT_HOST, IAT_PATH, "key", "secret", date).unwrap();
        let b = signed_url(IAT_HOST, IAT_PATH, "key", "secret", date).unwrap();
        assert_eq!(a, b);

        assert!(a.starts_with("wss://iat-api.xfyun.cn/v2/iat?authorization="));
        assert!(a.contains("&host=iat-api.xfyun.cn"));
        // The RFC1123 date is percent-encoded.
        assert!(a.contains("&date=Sat%2C%2001%20Jun%202024"));
    }

    #[test]
    fn test_signed_url_depends_on_secret() {
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = signed_url(IAT_HOST, IAT_PATH, "key", "secret", date).unwrap();
        let b = signed_url(IAT_HOST, IAT_PATH, "key", "other-secret", date).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_first_audio_frame_carries_session_setup() {
        let creds = creds();
        let frame = audio_frame(&creds, &[0u8, 1, 2, 3], STATUS_FIRST);
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains(r#""app_id":"app""#));
        assert!(json.contains(r#""accent":"mandarin""#));
        assert!(json.contains(r#""status":0"#));
    }

    #[test]
    fn test_continuation_frame_is_audio_only() {
        let creds = creds();
        let frame = audio_frame(&creds, &[0u8, 1], STATUS_CONTINUE);
        let json = serde_json::to_string(&frame).unwrap();
        assert!(!json.contains("app_id"));
        assert!(!json.contains("business"));
        assert!(json.contains(r#""status":1"#));
    }

    #[test]
    fn test_iat_response_parsing() {
        let json = r#"{
            "code": 0,
            "message": "success",
            "data": {
                "status": 2,
                "result": { "ws": [ {"cw": [{"w": "打开"}]}, {"cw": [{"w": "空调"}]} ] }
            }
        }"#;
        let response: IatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.code, 0);
        let data = response.data.unwrap();
        assert_eq!(data.status, STATUS_LAST);
        let words: String = data
            .result
            .unwrap()
            .ws
            .iter()
            .flat_map(|w| w.cw.iter())
            .map(|c| c.w.as_str())
            .collect();
        assert_eq!(words, "打开空调");
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("abc-123._~"), "abc-123._~");
        assert_eq!(encode_component("a b,c:d"), "a%20b%2Cc%3Ad");
        assert_eq!(encode_component("="), "%3D");
    }
}
