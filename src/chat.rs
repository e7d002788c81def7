use serde::{Deserialize, Serialize};

/// Inbound chat payload.
///
/// `content` is optional at the serde level so that a missing field still
/// deserializes and can be rejected by the handler with the canonical
/// validation error body instead of a framework-generated one.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ChatRequest {
    pub content: Option<String>,
}

/// Outbound chat payload: either the model's generated reply or the
/// fixed fallback string.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ChatResponse {
    pub response: String,
}

impl ChatRequest {
    /// Returns the message text if present and non-empty.
    ///
    /// Whitespace-only content counts as present; only a missing field or an
    /// empty string fails validation.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.content.as_deref().filter(|content| !content.is_empty())
    }
}
