//! Support exchange use case
//!
//! Sends the user's message through the AI responder and falls back to
//! the rule-based canned reply whenever the responder fails. The
//! exchange itself never fails: there is always a reply.

use crate::domain::recording::VoiceNote;
use crate::domain::support::{classify, fallback_reply, RiskLevel, SupportPrompt};

use super::ports::{SupportResponder, Transcript};

/// Notice prepended to the fallback when a voice note could not be
/// transcribed
const VOICE_UNPROCESSED_NOTICE: &str =
    "I couldn't listen to your voice message just now, but I'm still here.";

/// Which path produced the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// The AI responder answered
    Assistant,
    /// The responder failed; the rule-based reply was used
    Fallback,
}

/// Output of one support exchange
#[derive(Debug, Clone)]
pub struct ExchangeOutput {
    /// Transcription of the voice note, when the exchange started from one
    pub transcript: Option<Transcript>,
    /// The supportive reply text
    pub reply: String,
    /// Which path produced the reply
    pub source: ReplySource,
    /// Risk classification of the user's message
    pub risk: RiskLevel,
    /// Human-readable cause when the fallback path was taken
    pub fallback_cause: Option<String>,
}

/// One support exchange: user message in, supportive reply out
pub struct SupportExchangeUseCase<R>
where
    R: SupportResponder,
{
    responder: R,
    prompt: SupportPrompt,
}

impl<R> SupportExchangeUseCase<R>
where
    R: SupportResponder,
{
    /// Create a new use case instance
    pub fn new(responder: R, prompt: SupportPrompt) -> Self {
        Self { responder, prompt }
    }

    /// Respond to a typed message
    pub async fn respond_to_text(&self, message: &str) -> ExchangeOutput {
        let risk = classify(message);

        match self.responder.respond(message, &self.prompt).await {
            Ok(reply) => ExchangeOutput {
                transcript: None,
                reply,
                source: ReplySource::Assistant,
                risk,
                fallback_cause: None,
            },
            Err(e) => ExchangeOutput {
                transcript: None,
                reply: fallback_reply(message).to_string(),
                source: ReplySource::Fallback,
                risk,
                fallback_cause: Some(e.to_string()),
            },
        }
    }

    /// Respond to a voice message: transcribe first, then reply to the
    /// recognized text. A transcription failure falls back with the
    /// generic supportive reply, since there is no text to classify.
    pub async fn respond_to_voice(&self, note: &VoiceNote) -> ExchangeOutput {
        match self.responder.transcribe(note).await {
            Ok(transcript) => {
                let mut output = self.respond_to_text(&transcript.text).await;
                output.transcript = Some(transcript);
                output
            }
            Err(e) => ExchangeOutput {
                transcript: None,
                reply: format!("{} {}", VOICE_UNPROCESSED_NOTICE, fallback_reply("")),
                source: ReplySource::Fallback,
                risk: RiskLevel::Low,
                fallback_cause: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ResponderError;
    use crate::domain::recording::AudioFormat;
    use async_trait::async_trait;

    struct MockResponder {
        respond_result: Result<String, ResponderError>,
        transcribe_result: Result<Transcript, ResponderError>,
    }

    impl MockResponder {
        fn answering(reply: &str) -> Self {
            Self {
                respond_result: Ok(reply.to_string()),
                transcribe_result: Ok(Transcript {
                    text: "transcribed text".to_string(),
                    duration_secs: Some(2.5),
                    language: Some("english".to_string()),
                }),
            }
        }

        fn unreachable() -> Self {
            Self {
                respond_result: Err(ResponderError::RequestFailed("connection refused".into())),
                transcribe_result: Err(ResponderError::RequestFailed(
                    "connection refused".into(),
                )),
            }
        }
    }

    #[async_trait]
    impl SupportResponder for MockResponder {
        async fn transcribe(&self, _note: &VoiceNote) -> Result<Transcript, ResponderError> {
            self.transcribe_result.clone()
        }

        async fn respond(
            &self,
            _message: &str,
            _prompt: &SupportPrompt,
        ) -> Result<String, ResponderError> {
            self.respond_result.clone()
        }
    }

    fn use_case(responder: MockResponder) -> SupportExchangeUseCase<MockResponder> {
        SupportExchangeUseCase::new(responder, SupportPrompt::default())
    }

    #[tokio::test]
    async fn text_exchange_uses_assistant_reply() {
        let exchange = use_case(MockResponder::answering("I hear you."));
        let output = exchange.respond_to_text("I had a good day").await;

        assert_eq!(output.reply, "I hear you.");
        assert_eq!(output.source, ReplySource::Assistant);
        assert_eq!(output.risk, RiskLevel::Low);
        assert!(output.transcript.is_none());
        assert!(output.fallback_cause.is_none());
    }

    #[tokio::test]
    async fn responder_failure_falls_back_to_canned_reply() {
        let exchange = use_case(MockResponder::unreachable());
        let output = exchange.respond_to_text("he hit me and also scared me").await;

        assert_eq!(output.source, ReplySource::Fallback);
        assert_eq!(output.risk, RiskLevel::High);
        assert_eq!(output.reply, crate::domain::support::fallback_reply("he hit me"));
        assert!(output
            .fallback_cause
            .as_deref()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn risk_is_classified_even_when_assistant_answers() {
        let exchange = use_case(MockResponder::answering("Stay safe."));
        let output = exchange
            .respond_to_text("He isolated me and controls my money")
            .await;

        assert_eq!(output.source, ReplySource::Assistant);
        assert_eq!(output.risk, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn voice_exchange_carries_the_transcript() {
        let exchange = use_case(MockResponder::answering("I'm listening."));
        let note = VoiceNote::new(vec![1, 2, 3], AudioFormat::Webm);
        let output = exchange.respond_to_voice(&note).await;

        let transcript = output.transcript.unwrap();
        assert_eq!(transcript.text, "transcribed text");
        assert_eq!(output.source, ReplySource::Assistant);
    }

    #[tokio::test]
    async fn transcription_failure_falls_back_with_notice() {
        let exchange = use_case(MockResponder::unreachable());
        let note = VoiceNote::new(vec![1, 2, 3], AudioFormat::Webm);
        let output = exchange.respond_to_voice(&note).await;

        assert_eq!(output.source, ReplySource::Fallback);
        assert_eq!(output.risk, RiskLevel::Low);
        assert!(output.transcript.is_none());
        assert!(output.reply.contains("voice message"));
    }
}
