//! Cross-platform microphone capture backend using cpal
//!
//! The cpal::Stream is not thread-safe, so a dedicated capture thread
//! owns it and is controlled through atomics. Fragments cross into the
//! async world through the driver's event queue only.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};

use super::flac::encode_to_flac;
use crate::application::ports::{
    CaptureBackend, CaptureError, CaptureHandle, CapturePrefs, FragmentSink,
};
use crate::domain::recording::{AudioFormat, VoiceNote};

/// Microphone capture backend using cpal.
///
/// Fragments are raw mono i16 little-endian PCM; finalization encodes
/// the concatenated capture to FLAC at the device's actual rate.
/// Echo-cancellation and noise-suppression preferences are accepted but
/// cpal exposes no toggles for them; they are honored by backends that
/// can.
pub struct CpalCaptureBackend {
    /// Device sample rate of the most recent acquisition
    sample_rate: Arc<AtomicU32>,
}

impl CpalCaptureBackend {
    /// Create a new cpal-based capture backend
    pub fn new() -> Self {
        Self {
            sample_rate: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::DeviceNotFound)
    }

    /// Get a suitable input configuration, preferring the requested
    /// sample rate and mono over stereo
    fn get_input_config(
        device: &cpal::Device,
        preferred_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| map_access_error(&e.to_string()))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            // Only consider i16 or f32 formats
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= preferred_rate
                && config.max_sample_rate().0 >= preferred_rate;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    // Prefer mono over stereo
                    let fewer_channels = config.channels() < current.channels();
                    // Prefer configs that include the requested rate
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > preferred_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(CaptureError::AcquisitionFailed(
            "No suitable input config found".into(),
        ))?;

        // Use the requested rate if supported, otherwise the minimum
        let sample_rate = if config_range.min_sample_rate().0 <= preferred_rate
            && config_range.max_sample_rate().0 >= preferred_rate
        {
            SampleRate(preferred_rate)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix stereo to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Convert mono i16 samples to a little-endian byte fragment
    fn samples_to_fragment(samples: &[i16]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    /// Reassemble i16 samples from concatenated little-endian fragments
    fn fragments_to_samples(fragments: &[Vec<u8>]) -> Vec<i16> {
        let bytes = fragments.concat();
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

impl Default for CpalCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a backend error message to the capture error taxonomy
fn map_access_error(message: &str) -> CaptureError {
    let lowered = message.to_lowercase();
    if lowered.contains("permission") || lowered.contains("denied") {
        CaptureError::PermissionDenied
    } else if lowered.contains("no device") || lowered.contains("not available") {
        CaptureError::DeviceNotFound
    } else {
        CaptureError::AcquisitionFailed(message.to_string())
    }
}

/// Handle to the dedicated capture thread
struct CpalCaptureHandle {
    paused: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    done_rx: Option<std::sync::mpsc::Receiver<()>>,
}

#[async_trait]
impl CaptureHandle for CpalCaptureHandle {
    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.active.store(false, Ordering::SeqCst);

        // Wait for the capture thread to drop the stream; fragments
        // are delivered synchronously from its callback, so once it
        // confirms, none can follow.
        if let Some(done) = self.done_rx.take() {
            tokio::task::spawn_blocking(move || done.recv_timeout(StdDuration::from_secs(2)))
                .await
                .map_err(|e| CaptureError::CaptureFailed(format!("Task join error: {}", e)))?
                .map_err(|_| {
                    CaptureError::CaptureFailed("Capture thread did not confirm stop".into())
                })?;
        }
        Ok(())
    }

    fn release(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.done_rx.take();
    }
}

#[async_trait]
impl CaptureBackend for CpalCaptureBackend {
    fn is_supported(&self) -> bool {
        cpal::default_host().input_devices().is_ok()
    }

    fn supports_format(&self, format: AudioFormat) -> bool {
        format == AudioFormat::Flac
    }

    async fn acquire(
        &self,
        prefs: CapturePrefs,
        sink: FragmentSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        let paused = Arc::new(AtomicBool::new(false));
        let active = Arc::new(AtomicBool::new(true));
        let sample_rate_slot = Arc::clone(&self.sample_rate);

        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        let thread_paused = Arc::clone(&paused);
        let thread_active = Arc::clone(&active);

        std::thread::spawn(move || {
            let setup = (|| -> Result<(cpal::Stream, u32), CaptureError> {
                let device = CpalCaptureBackend::get_input_device()?;
                let (config, sample_format) =
                    CpalCaptureBackend::get_input_config(&device, prefs.sample_rate)?;
                let sample_rate = config.sample_rate.0;
                let channels = config.channels;

                let gate_paused = Arc::clone(&thread_paused);
                let gate_active = Arc::clone(&thread_active);
                let deliver = move |samples: Vec<i16>| {
                    if gate_active.load(Ordering::SeqCst) && !gate_paused.load(Ordering::SeqCst) {
                        let mono = CpalCaptureBackend::stereo_to_mono(&samples, channels);
                        sink(CpalCaptureBackend::samples_to_fragment(&mono));
                    }
                };

                let stream = match sample_format {
                    SampleFormat::I16 => device
                        .build_input_stream(
                            &config,
                            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                                deliver(data.to_vec());
                            },
                            |err| eprintln!("Audio stream error: {}", err),
                            None,
                        )
                        .map_err(|e| map_access_error(&e.to_string()))?,

                    SampleFormat::F32 => device
                        .build_input_stream(
                            &config,
                            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                                let i16_data: Vec<i16> =
                                    data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                deliver(i16_data);
                            },
                            |err| eprintln!("Audio stream error: {}", err),
                            None,
                        )
                        .map_err(|e| map_access_error(&e.to_string()))?,

                    _ => {
                        return Err(CaptureError::AcquisitionFailed(
                            "Unsupported sample format".into(),
                        ))
                    }
                };

                stream
                    .play()
                    .map_err(|e| map_access_error(&e.to_string()))?;

                Ok((stream, sample_rate))
            })();

            match setup {
                Ok((stream, sample_rate)) => {
                    sample_rate_slot.store(sample_rate, Ordering::SeqCst);
                    let _ = ready_tx.send(Ok(()));

                    while thread_active.load(Ordering::SeqCst) {
                        std::thread::sleep(StdDuration::from_millis(50));
                    }

                    drop(stream);
                    let _ = done_tx.send(());
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        ready_rx
            .await
            .map_err(|_| CaptureError::AcquisitionFailed("Capture thread exited early".into()))??;

        Ok(Box::new(CpalCaptureHandle {
            paused,
            active,
            done_rx: Some(done_rx),
        }))
    }

    fn finalize(&self, fragments: Vec<Vec<u8>>, format: AudioFormat) -> VoiceNote {
        if format != AudioFormat::Flac {
            // Pre-encoded fragment delivery: one payload, tagged as-is
            return VoiceNote::from_fragments(fragments, format);
        }

        let samples = Self::fragments_to_samples(&fragments);
        if samples.is_empty() {
            // An empty capture still finalizes to a valid (silent) note
            return VoiceNote::new(Vec::new(), format);
        }

        let sample_rate = match self.sample_rate.load(Ordering::SeqCst) {
            0 => CapturePrefs::default().sample_rate,
            rate => rate,
        };

        match encode_to_flac(&samples, sample_rate) {
            Ok(data) => VoiceNote::new(data, format),
            Err(e) => {
                eprintln!("FLAC encoding failed: {}", e);
                VoiceNote::new(Vec::new(), format)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        let result = CpalCaptureBackend::stereo_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn stereo_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalCaptureBackend::stereo_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]); // Average of each pair
    }

    #[test]
    fn fragment_round_trip() {
        let samples = vec![0i16, -1, 32767, -32768];
        let fragment = CpalCaptureBackend::samples_to_fragment(&samples);
        let recovered = CpalCaptureBackend::fragments_to_samples(&[fragment]);
        assert_eq!(recovered, samples);
    }

    #[test]
    fn supports_only_flac() {
        let backend = CpalCaptureBackend::new();
        assert!(backend.supports_format(AudioFormat::Flac));
        assert!(!backend.supports_format(AudioFormat::Webm));
        assert!(!backend.supports_format(AudioFormat::Ogg));
        assert!(!backend.supports_format(AudioFormat::Wav));
    }

    #[test]
    fn finalize_empty_capture_yields_valid_note() {
        let backend = CpalCaptureBackend::new();
        let note = backend.finalize(vec![], AudioFormat::Flac);
        assert_eq!(note.size_bytes(), 0);
        assert_eq!(note.format(), AudioFormat::Flac);
    }

    #[test]
    fn finalize_encodes_flac() {
        let backend = CpalCaptureBackend::new();
        let samples = vec![0i16; 4410];
        let fragment = CpalCaptureBackend::samples_to_fragment(&samples);
        let note = backend.finalize(vec![fragment], AudioFormat::Flac);
        assert_eq!(note.format(), AudioFormat::Flac);
        assert_eq!(&note.data()[0..4], b"fLaC");
    }

    #[test]
    fn finalize_other_formats_concatenates() {
        let backend = CpalCaptureBackend::new();
        let note = backend.finalize(vec![vec![1, 2], vec![3]], AudioFormat::Webm);
        assert_eq!(note.data(), &[1, 2, 3]);
        assert_eq!(note.format(), AudioFormat::Webm);
    }

    #[test]
    fn access_error_mapping() {
        assert!(matches!(
            map_access_error("Permission denied by the system"),
            CaptureError::PermissionDenied
        ));
        assert!(matches!(
            map_access_error("the requested device is no longer available"),
            CaptureError::DeviceNotFound
        ));
        assert!(matches!(
            map_access_error("something else went wrong"),
            CaptureError::AcquisitionFailed(_)
        ));
    }
}
