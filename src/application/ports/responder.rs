//! Support responder port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::VoiceNote;
use crate::domain::support::SupportPrompt;

/// Responder errors. Any of these triggers the rule-based fallback.
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty reply from the API")]
    EmptyReply,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Result of transcribing a voice note
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Recognized text
    pub text: String,
    /// Audio duration in seconds, when the API reports it
    pub duration_secs: Option<f64>,
    /// Detected language, when the API reports it
    pub language: Option<String>,
}

/// Port for the external transcription + response pipeline
#[async_trait]
pub trait SupportResponder: Send + Sync {
    /// Transcribe a voice note to text.
    async fn transcribe(&self, note: &VoiceNote) -> Result<Transcript, ResponderError>;

    /// Generate a supportive reply to a message.
    ///
    /// # Arguments
    /// * `message` - The user's message text
    /// * `prompt` - The system prompt guiding the responder
    async fn respond(&self, message: &str, prompt: &SupportPrompt)
        -> Result<String, ResponderError>;
}
