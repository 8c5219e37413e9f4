//! Capture port interfaces

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::recording::{AudioFormat, VoiceNote};

/// Capture errors.
/// Every variant leaves the session idle and retryable; none holds
/// on to an acquired device.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Audio capture is not supported in this environment")]
    CapabilityUnsupported,

    #[error("Microphone permission was denied. Please allow microphone access and try again.")]
    PermissionDenied,

    #[error("No microphone device was found")]
    DeviceNotFound,

    #[error("Failed to access the microphone: {0}")]
    AcquisitionFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Capture preferences requested at device acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePrefs {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub sample_rate: u32,
}

impl Default for CapturePrefs {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            sample_rate: 44100,
        }
    }
}

/// Fragment delivery callback type. Invoked by the backend zero or
/// more times with encoded audio fragments during active capture.
pub type FragmentSink = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Handle to an acquired capture device.
/// Owned exclusively by the session driver until stop or release.
#[async_trait]
pub trait CaptureHandle: Send {
    /// Suspend fragment delivery without releasing the device
    fn pause(&self);

    /// Resume fragment delivery after a pause
    fn resume(&self);

    /// Cease capture, flush pending fragments through the sink, and
    /// release the device. Returns only once capture has confirmed
    /// stopped, so no fragment can arrive afterwards.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Best-effort release from cancel/teardown paths. Safe to call
    /// at any time, including after stop. Never fails.
    fn release(&mut self);
}

/// Port for microphone capture
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Whether this runtime can capture audio at all. Checked before
    /// any device access is requested.
    fn is_supported(&self) -> bool;

    /// Whether the backend can produce the given encoding
    fn supports_format(&self, format: AudioFormat) -> bool;

    /// Acquire the capture device and begin delivering fragments to
    /// the sink.
    ///
    /// # Arguments
    /// * `prefs` - Capture preferences (echo cancellation, noise
    ///   suppression, sample rate)
    /// * `sink` - Fragment delivery callback
    ///
    /// # Returns
    /// A handle controlling the device, or a distinguishable error
    async fn acquire(
        &self,
        prefs: CapturePrefs,
        sink: FragmentSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError>;

    /// Produce the final artifact from the ordered fragment sequence,
    /// tagged with the negotiated format.
    fn finalize(&self, fragments: Vec<Vec<u8>>, format: AudioFormat) -> VoiceNote;
}
