//! Canned supportive replies for when the AI pipeline is unreachable

use super::risk::{classify, RiskLevel};

/// Reply sent when a message contains high-risk terms
pub const HIGH_RISK_REPLY: &str = "I'm really concerned about your safety right now. What you're describing is serious, and you deserve to be safe. If you are in immediate danger, please call your local emergency number. You can also reach a domestic violence hotline at any time - they are free, confidential, and available 24/7. You don't have to face this alone.";

/// Reply sent when a message contains medium-risk terms
pub const MEDIUM_RISK_REPLY: &str = "What you're describing sounds really difficult, and your feelings are completely valid. Controlling behavior, intimidation, and isolation are forms of abuse, even when no one has been physically hurt. You deserve to feel safe and respected. Would it help to talk through what's been happening?";

/// Reply for help-seeking messages
pub const HELP_SEEKING_REPLY: &str = "It takes real courage to ask for help, and I'm glad you did. A good first step can be talking to a trained advocate at a local support service or hotline - they can help you think through your options without any pressure to decide anything. Whatever you choose, support is available.";

/// Reply for messages about leaving
pub const LEAVING_REPLY: &str = "Thinking about leaving is a big step, and it's one of the moments where planning matters most for your safety. A trained advocate can help you build a safety plan - things like important documents, a safe place to go, and people you trust. You don't have to figure this out by yourself.";

/// Reply for self-blame
pub const SELF_BLAME_REPLY: &str = "Please hear this: what is happening to you is not your fault. No one deserves to be hurt or controlled, no matter what. Abuse is a choice the other person makes, and nothing you did caused it. You deserve kindness and safety.";

/// Reply when children are mentioned
pub const CHILDREN_REPLY: &str = "I can hear how much you care about your children. Wanting to protect them says a lot about you as a parent. Support services can help with safety planning that includes your kids, and talking with an advocate about their wellbeing can take some of that weight off your shoulders.";

/// Default supportive reply
pub const GENERIC_REPLY: &str = "Thank you for sharing that with me. This is a safe, confidential space, and I'm here to listen. Whatever you're going through, you don't have to carry it alone. Is there anything more you'd like to talk about?";

const HELP_SEEKING_TERMS: &[&str] = &["help", "what should i do", "what can i do", "advice"];
const LEAVING_TERMS: &[&str] = &["leave", "leaving", "get out", "move out", "break up", "escape"];
const SELF_BLAME_TERMS: &[&str] = &["my fault", "blame myself", "i deserve", "deserved it", "i caused"];
const CHILDREN_TERMS: &[&str] = &["child", "kids", "my son", "my daughter", "baby"];

/// Select a canned supportive reply for the given message.
///
/// First matching rule wins, in fixed priority order: high risk,
/// medium risk, help-seeking, leaving, self-blame, children mentioned,
/// generic default. Deterministic and total.
pub fn fallback_reply(text: &str) -> &'static str {
    let lowered = text.to_lowercase();

    match classify(text) {
        RiskLevel::High => return HIGH_RISK_REPLY,
        RiskLevel::Medium => return MEDIUM_RISK_REPLY,
        RiskLevel::Low => {}
    }

    let contains_any = |terms: &[&str]| terms.iter().any(|t| lowered.contains(t));

    if contains_any(HELP_SEEKING_TERMS) {
        HELP_SEEKING_REPLY
    } else if contains_any(LEAVING_TERMS) {
        LEAVING_REPLY
    } else if contains_any(SELF_BLAME_TERMS) {
        SELF_BLAME_REPLY
    } else if contains_any(CHILDREN_TERMS) {
        CHILDREN_REPLY
    } else {
        GENERIC_REPLY
    }
}
