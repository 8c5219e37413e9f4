//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub chat_model: Option<String>,
    pub transcription_model: Option<String>,
    pub advisory_limit: Option<String>,
    pub language: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            api_base: Some("https://api.openai.com/v1".to_string()),
            chat_model: Some("gpt-4o-mini".to_string()),
            transcription_model: Some("whisper-1".to_string()),
            advisory_limit: Some("5m".to_string()),
            language: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            api_base: other.api_base.or(self.api_base),
            chat_model: other.chat_model.or(self.chat_model),
            transcription_model: other.transcription_model.or(self.transcription_model),
            advisory_limit: other.advisory_limit.or(self.advisory_limit),
            language: other.language.or(self.language),
        }
    }

    /// Get api_base, or the public endpoint if not set
    pub fn api_base_or_default(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
    }

    /// Get chat_model, or the default model if not set
    pub fn chat_model_or_default(&self) -> &str {
        self.chat_model.as_deref().unwrap_or("gpt-4o-mini")
    }

    /// Get transcription_model, or the default model if not set
    pub fn transcription_model_or_default(&self) -> &str {
        self.transcription_model.as_deref().unwrap_or("whisper-1")
    }

    /// Get advisory_limit as parsed Duration, or default if not set/invalid
    pub fn advisory_limit_or_default(&self) -> Duration {
        self.advisory_limit
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_advisory_limit)
    }
}
