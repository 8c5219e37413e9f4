//! Keyword-based risk classifier

use std::fmt;

/// Terms that indicate immediate danger: physical violence, weapons,
/// coercion by force. Matched as lowercase substrings, so stems cover
/// their inflections ("isolat" -> isolated/isolating).
pub const HIGH_RISK_TERMS: &[&str] = &[
    "hit",
    "beat",
    "punch",
    "kick",
    "slap",
    "choke",
    "strangle",
    "weapon",
    "gun",
    "knife",
    "kill",
    "threat",
    "rape",
    "assault",
    "force",
];

/// Terms short of the high set: fear, controlling behavior, isolation,
/// verbal intimidation.
pub const MEDIUM_RISK_TERMS: &[&str] = &[
    "scared",
    "afraid",
    "fear",
    "control",
    "isolat",
    "intimidat",
    "humiliat",
    "yell",
    "scream",
    "insult",
    "jealous",
    "monitor",
    "stalk",
    "money",
    "alone",
];

/// Risk tiers for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Get the string identifier for this level
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify free text into a risk tier.
///
/// High-risk terms are checked strictly before medium-risk ones, so a
/// text matching both tiers is High. Total over all inputs: anything
/// unmatched is Low.
pub fn classify(text: &str) -> RiskLevel {
    let lowered = text.to_lowercase();

    if HIGH_RISK_TERMS.iter().any(|term| lowered.contains(term)) {
        return RiskLevel::High;
    }
    if MEDIUM_RISK_TERMS.iter().any(|term| lowered.contains(term)) {
        return RiskLevel::Medium;
    }
    RiskLevel::Low
}
