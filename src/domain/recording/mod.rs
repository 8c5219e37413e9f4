//! Recording domain module

mod duration;
mod format;
mod session;
mod voice_note;

pub use duration::{Duration, DEFAULT_ADVISORY_LIMIT_SECS};
pub use format::{AudioFormat, PREFERRED_FORMATS};
pub use session::{InvalidTransition, RecorderPhase, RecorderSession, TickReport};
pub use voice_note::VoiceNote;
