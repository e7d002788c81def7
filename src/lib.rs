//! # chat-relay
//!
//! A library and REST API for relaying chat messages to an AI completion
//! provider with a supportive, non-diagnostic persona.
//!
//! The relay is stateless: each call forwards a single user message together
//! with a fixed persona prompt, and returns the generated reply. Rate-limited
//! provider calls are retried with bounded exponential backoff; every other
//! failure resolves to a fixed fallback reply, so callers never see a raw
//! provider error.
//!
//! ## Features
//!
//! - **Single-message relay**: one user message in, one generated reply out
//! - **Fixed persona**: a compile-time embedded system prompt establishes the
//!   supportive persona on every exchange
//! - **Bounded retry**: rate-limit responses are retried with doubling delay,
//!   everything else falls back immediately
//! - **Flexible AI integration**: any provider supported by the genai crate,
//!   selected by model identifier
//!
//! ## Library Usage
//!
//! To use chat-relay as a library in your Rust application:
//!
//! ```toml
//! [dependencies]
//! chat-relay = { version = "0.1", default-features = false }
//! ```
//!
//! ### Basic Example
//!
//! ```rust,no_run
//! use chat_relay::SupportChatClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = SupportChatClient::new("groq::llama3-8b-8192", "your-api-key");
//!
//!     let reply = client.respond("I feel anxious today").await;
//!     println!("{reply}");
//! }
//! ```
//!
//! ### Custom Retry Policy
//!
//! ```rust,no_run
//! use chat_relay::{RetryPolicy, SupportChatClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = SupportChatClient::with_policy(
//!         "groq::llama3-8b-8192",
//!         "your-api-key",
//!         RetryPolicy::new(5, Duration::from_millis(500)),
//!     );
//!
//!     let reply = client.respond("I had a rough day").await;
//!     println!("{reply}");
//! }
//! ```
//!
//! ## Server Mode
//!
//! To run the REST server, enable the `server` feature (enabled by default)
//! and set `GROQ_API_KEY` in the environment:
//!
//! ```bash
//! cargo run
//! ```
//!
//! The server exposes `POST /chat` and a Swagger UI at `/swagger-ui/`.

// Core modules - always available
pub mod chat;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod prompt;

// Re-export commonly used types for easier access
pub use chat::{ChatRequest, ChatResponse};
pub use error::{ApiError, ErrorResponse, ProviderError};
pub use fetcher::{CompletionBackend, FALLBACK_RESPONSE, GenAiBackend, ResponseFetcher, RetryPolicy};

use std::sync::Arc;

/// A high-level client for supportive chat exchanges.
///
/// Wraps the response fetcher for library users who do not need the HTTP
/// server: construct once with a model and API key, then call
/// [`SupportChatClient::respond`] per message.
///
/// # Example
///
/// ```no_run
/// use chat_relay::SupportChatClient;
///
/// #[tokio::main]
/// async fn main() {
///     let client = SupportChatClient::new("groq::llama3-8b-8192", "your-api-key");
///     let reply = client.respond("I can't sleep lately").await;
///     println!("{reply}");
/// }
/// ```
pub struct SupportChatClient {
    model: String,
    api_key: String,
    policy: RetryPolicy,
}

impl SupportChatClient {
    /// Creates a new `SupportChatClient` with the default retry policy.
    ///
    /// # Arguments
    ///
    /// * `model` - The AI model to use (e.g., `"groq::llama3-8b-8192"`)
    /// * `api_key` - API key for the AI service
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_policy(model, api_key, RetryPolicy::default())
    }

    /// Creates a new `SupportChatClient` with an explicit retry policy.
    #[must_use]
    pub fn with_policy(
        model: impl Into<String>,
        api_key: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            policy,
        }
    }

    /// Fetch a supportive reply for the given user message.
    ///
    /// All provider failures are absorbed: the result is either the model's
    /// generated text or [`FALLBACK_RESPONSE`].
    pub async fn respond(
        &self,
        content: &str,
    ) -> String {
        let backend = GenAiBackend::new(self.model.clone(), self.api_key.clone());
        let fetcher = ResponseFetcher::new(Arc::new(backend), self.policy);

        fetcher.fetch_response(content).await
    }
}
