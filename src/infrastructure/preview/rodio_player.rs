//! Rodio-based preview playback adapter
//!
//! Plays a finalized voice note through the default output device.
//! Playback runs on a blocking thread; stop() bumps a generation
//! counter that the playback loop watches.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{PreviewError, PreviewPlayer};
use crate::domain::recording::VoiceNote;

/// Preview player implementation using rodio
pub struct RodioPreviewPlayer {
    /// Bumped on every stop/new play; stale playback loops exit
    generation: Arc<AtomicUsize>,
}

impl RodioPreviewPlayer {
    /// Create a new rodio-based preview player
    pub fn new() -> Self {
        Self {
            generation: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for RodioPreviewPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreviewPlayer for RodioPreviewPlayer {
    async fn play(&self, note: &VoiceNote) -> Result<(), PreviewError> {
        // A silent (empty) note is valid; there is just nothing to hear
        if note.size_bytes() == 0 {
            return Ok(());
        }

        let source = Decoder::new(Cursor::new(note.data().to_vec()))
            .map_err(|e| PreviewError::DecodeFailed(e.to_string()))?;

        let generation = Arc::clone(&self.generation);
        let my_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

        tokio::task::spawn_blocking(move || {
            // The output stream must outlive playback, so it lives here
            let (_stream, stream_handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(PreviewError::OutputUnavailable(e.to_string())));
                    return;
                }
            };

            let sink = match Sink::try_new(&stream_handle) {
                Ok(sink) => sink,
                Err(e) => {
                    let _ = ready_tx.send(Err(PreviewError::OutputUnavailable(e.to_string())));
                    return;
                }
            };

            sink.append(source);
            let _ = ready_tx.send(Ok(()));

            while generation.load(Ordering::SeqCst) == my_generation && !sink.empty() {
                std::thread::sleep(Duration::from_millis(50));
            }

            sink.stop();
        });

        ready_rx
            .await
            .map_err(|_| PreviewError::OutputUnavailable("Playback task ended early".into()))?
    }

    fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::AudioFormat;

    #[tokio::test]
    async fn empty_note_plays_as_silence() {
        let player = RodioPreviewPlayer::new();
        let note = VoiceNote::new(Vec::new(), AudioFormat::Flac);
        assert!(player.play(&note).await.is_ok());
    }

    #[tokio::test]
    async fn undecodable_note_reports_decode_failure() {
        let player = RodioPreviewPlayer::new();
        let note = VoiceNote::new(vec![0xDE, 0xAD, 0xBE, 0xEF], AudioFormat::Flac);
        let err = player.play(&note).await.unwrap_err();
        assert!(matches!(err, PreviewError::DecodeFailed(_)));
    }

    #[test]
    fn stop_without_playback_is_a_noop() {
        let player = RodioPreviewPlayer::new();
        player.stop();
        player.stop();
    }
}
