//! Responder adapters

mod open_ai;

pub use open_ai::OpenAiResponder;
