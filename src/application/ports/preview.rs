//! Preview playback port

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::VoiceNote;

/// Errors that can occur during preview playback
#[derive(Error, Debug)]
pub enum PreviewError {
    /// The note's encoding could not be decoded for playback
    #[error("Cannot decode audio for preview: {0}")]
    DecodeFailed(String),

    /// No audio output device available
    #[error("Audio output not available: {0}")]
    OutputUnavailable(String),
}

/// Port trait for previewing a finalized voice note before sending
#[async_trait]
pub trait PreviewPlayer: Send + Sync {
    /// Start playing the note from the beginning
    async fn play(&self, note: &VoiceNote) -> Result<(), PreviewError>;

    /// Stop playback and release the playback resource.
    /// Idempotent; a no-op when nothing is playing.
    fn stop(&self);
}
