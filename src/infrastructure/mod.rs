//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the microphone, the audio
//! output device, and the AI API.

pub mod capture;
pub mod config;
pub mod preview;
pub mod responder;

// Re-export adapters
pub use capture::CpalCaptureBackend;
pub use config::XdgConfigStore;
pub use preview::RodioPreviewPlayer;
pub use responder::OpenAiResponder;
