//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod record_message;
pub mod respond;

// Re-export use cases
pub use record_message::{
    RecorderCallbacks, RecorderCommand, RecorderCommands, RecorderDriver, RecorderOutcome,
};
pub use respond::{ExchangeOutput, ReplySource, SupportExchangeUseCase};
