use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CHARS: usize = 500;
pub const DEFAULT_MIN_AUDIO_BYTES: usize = 1024;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub webhook: WebhookConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

/// Where the webhook lives and how to reach its two endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Base URL; endpoint paths are appended after stripping trailing slashes
    pub base_url: String,
    /// Path of the query endpoint
    pub query_path: String,
    /// Path of the transcription endpoint; voice input is unavailable without it
    pub transcribe_path: Option<String>,
    /// Request timeout; the transport default applies when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            query_path: crate::client::DEFAULT_QUERY_PATH.to_string(),
            transcribe_path: Some(crate::client::DEFAULT_TRANSCRIBE_PATH.to_string()),
            timeout_seconds: None,
        }
    }
}

/// Limits applied before anything is sent.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Longest accepted message, in characters
    pub max_chars: usize,
    /// Recordings below this size are treated as empty
    pub min_audio_bytes: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            min_audio_bytes: DEFAULT_MIN_AUDIO_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_limits() {
        let config = AppConfig::default();
        assert_eq!(config.input.max_chars, 500);
        assert_eq!(config.input.min_audio_bytes, 1024);
        assert_eq!(config.webhook.query_path, "query");
        assert_eq!(config.webhook.transcribe_path.as_deref(), Some("transcribe"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let toml = r#"
            [webhook]
            base_url = "https://hooks.example.com/webhook"

            [input]
            max_chars = 200
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.webhook.base_url, "https://hooks.example.com/webhook");
        assert_eq!(config.webhook.query_path, "query");
        assert_eq!(config.input.max_chars, 200);
        assert_eq!(config.input.min_audio_bytes, 1024);
    }

    #[test]
    fn transcription_can_be_disabled() {
        let json = r#"{"transcribe_path": null}"#;
        let config: WebhookConfig = serde_json::from_str(json).unwrap();
        assert!(config.transcribe_path.is_none());
    }
}
