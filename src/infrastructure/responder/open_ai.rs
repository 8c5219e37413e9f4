//! OpenAI-compatible responder adapter
//!
//! Talks to any OpenAI-style API: chat completions for supportive
//! replies and audio transcriptions for voice notes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ResponderError, SupportResponder, Transcript};
use crate::domain::recording::VoiceNote;
use crate::domain::support::SupportPrompt;

/// Default chat model
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default transcription model
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default API base URL
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Sampling temperature for supportive replies
const TEMPERATURE: f32 = 0.7;

// Request types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

// Response types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    duration: Option<f64>,
    language: Option<String>,
}

/// OpenAI-compatible support responder
pub struct OpenAiResponder {
    api_key: String,
    api_base: String,
    chat_model: String,
    transcription_model: String,
    client: reqwest::Client,
}

impl OpenAiResponder {
    /// Create a new responder with the given API key and default models
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (for compatible gateways)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the chat model
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Override the transcription model
    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// Build the chat completions URL
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Build the audio transcriptions URL
    fn transcription_url(&self) -> String {
        format!("{}/audio/transcriptions", self.api_base)
    }

    /// Build the chat request body
    fn build_chat_request(&self, message: &str, prompt: &SupportPrompt) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.content().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
            temperature: TEMPERATURE,
        }
    }

    /// Extract the reply text from a chat response
    fn extract_reply(response: &ChatCompletionResponse) -> Option<String> {
        let content = response
            .choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Map non-success HTTP statuses to responder errors
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ResponderError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ResponderError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ResponderError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ResponderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl SupportResponder for OpenAiResponder {
    async fn transcribe(&self, note: &VoiceNote) -> Result<Transcript, ResponderError> {
        let part = reqwest::multipart::Part::bytes(note.data().to_vec())
            .file_name(format!("voice.{}", note.format().extension()))
            .mime_str(note.format().as_str())
            .map_err(|e| ResponderError::RequestFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(self.transcription_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ResponderError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::ParseError(e.to_string()))?;

        let text = parsed.text.trim().to_string();
        if text.is_empty() {
            return Err(ResponderError::EmptyReply);
        }

        Ok(Transcript {
            text,
            duration_secs: parsed.duration,
            language: parsed.language,
        })
    }

    async fn respond(
        &self,
        message: &str,
        prompt: &SupportPrompt,
    ) -> Result<String, ResponderError> {
        let body = self.build_chat_request(message, prompt);

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ResponderError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::ParseError(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(ResponderError::ApiError(error.message));
        }

        Self::extract_reply(&parsed).ok_or(ResponderError::EmptyReply)
    }
}
