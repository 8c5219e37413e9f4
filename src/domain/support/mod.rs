//! Support domain module

mod prompt;
mod reply;
mod risk;

pub use prompt::SupportPrompt;
pub use reply::fallback_reply;
pub use risk::{classify, RiskLevel, HIGH_RISK_TERMS, MEDIUM_RISK_TERMS};
