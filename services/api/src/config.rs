use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported speech providers for recognition and synthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechProvider {
    /// Deterministic, credential-free stand-in for demos and tests.
    Mock,
    /// iFlytek realtime ASR/TTS over WebSocket.
    Xfyun,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub speech_provider: SpeechProvider,
    pub xfyun_app_id: Option<String>,
    pub xfyun_api_key: Option<String>,
    pub xfyun_api_secret: Option<String>,
    pub log_level: Level,
    /// How long a transient error stays on screen before the UI resets.
    pub feedback_reset: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str =
            std::env::var("SPEECH_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let speech_provider = match provider_str.to_lowercase().as_str() {
            "xfyun" => SpeechProvider::Xfyun,
            _ => SpeechProvider::Mock,
        };

        let xfyun_app_id = std::env::var("XFYUN_APP_ID").ok();
        let xfyun_api_key = std::env::var("XFYUN_API_KEY").ok();
        let xfyun_api_secret = std::env::var("XFYUN_API_SECRET").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let feedback_reset_ms = match std::env::var("FEEDBACK_RESET_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "FEEDBACK_RESET_MS".to_string(),
                    format!("'{}' is not a number of milliseconds", raw),
                )
            })?,
            Err(_) => 3000,
        };

        if speech_provider == SpeechProvider::Xfyun {
            // The vendor credentials are opaque strings; all three legs are
            // needed for the signed handshake.
            for (value, name) in [
                (&xfyun_app_id, "XFYUN_APP_ID"),
                (&xfyun_api_key, "XFYUN_API_KEY"),
                (&xfyun_api_secret, "XFYUN_API_SECRET"),
            ] {
                if value.is_none() {
                    return Err(ConfigError::MissingVar(format!(
                        "{} must be set for 'xfyun' provider",
                        name
                    )));
                }
            }
        }

        Ok(Self {
            bind_address,
            speech_provider,
            xfyun_app_id,
            xfyun_api_key,
            xfyun_api_secret,
            log_level,
            feedback_reset: Duration::from_millis(feedback_reset_ms),
        })
    }
}
