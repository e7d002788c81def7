//! Persona prompt and exchange construction.

/// Fixed system-role instruction establishing the supportive, non-diagnostic
/// persona. Embedded at compile time.
pub const PERSONA_PROMPT: &str = include_str!("../templates/persona_prompt.txt");

/// Build the two-message exchange sent to the completion provider: the
/// persona instruction as the system message plus the user's text.
#[must_use]
pub fn build_chat_request(user_message: &str) -> genai::chat::ChatRequest {
    genai::chat::ChatRequest::default()
        .with_system(PERSONA_PROMPT.trim())
        .append_message(genai::chat::ChatMessage::user(user_message))
}
