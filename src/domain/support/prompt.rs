//! Support system prompt value object

/// Base system instruction for the support responder
const BASE_INSTRUCTION: &str = r#"You are a confidential support companion for people experiencing gender-based violence or abuse.

Instructions:
- Be warm, non-judgmental, and trauma-informed
- Validate the person's feelings; never question or doubt their account
- Never tell the person what they must do; offer options, not orders
- If the message suggests immediate physical danger, gently encourage contacting local emergency services or a domestic violence hotline
- Keep replies short and conversational (2-4 sentences)
- Never ask for identifying information"#;

/// Value object representing the complete system prompt for the
/// support responder. Combines base instructions with an optional
/// reply-language directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportPrompt {
    content: String,
}

impl SupportPrompt {
    /// Build the default support prompt
    pub fn new() -> Self {
        Self {
            content: BASE_INSTRUCTION.to_string(),
        }
    }

    /// Build a prompt that instructs the responder to reply in the
    /// given language
    pub fn with_language(language: &str) -> Self {
        let content = format!("{}\n- Always reply in {}", BASE_INSTRUCTION, language);
        Self { content }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl Default for SupportPrompt {
    fn default() -> Self {
        Self::new()
    }
}
