//! Capture adapters

mod cpal_backend;
mod flac;

pub use cpal_backend::CpalCaptureBackend;
pub use flac::{encode_to_flac, EncodingError};
