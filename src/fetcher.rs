//! Response fetcher: forwards a user message to the completion provider and
//! absorbs every failure path into a string result.

use crate::error::ProviderError;
use crate::prompt::build_chat_request;
use async_trait::async_trait;
use genai::ModelIden;
use genai::resolver::{AuthData, AuthResolver};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on generated tokens per reply.
pub const MAX_RESPONSE_TOKENS: u32 = 200;

/// Sampling temperature for generated replies.
pub const RESPONSE_TEMPERATURE: f64 = 0.7;

/// Fixed reply returned when the provider cannot be reached or keeps
/// rate-limiting past the last retry.
pub const FALLBACK_RESPONSE: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again later.";

/// Seam over the completion-provider call so retry behavior is testable
/// without a network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        user_message: &str,
    ) -> Result<String, ProviderError>;
}

/// Production backend over the genai client.
pub struct GenAiBackend {
    client: genai::Client,
    model: String,
}

impl GenAiBackend {
    /// Create a backend for the given model, authenticating every request
    /// with the supplied API key.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let key = api_key.into();
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(key.clone())))
            },
        );
        let client = genai::Client::builder().with_auth_resolver(auth_resolver).build();

        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for GenAiBackend {
    async fn complete(
        &self,
        user_message: &str,
    ) -> Result<String, ProviderError> {
        let chat_request = build_chat_request(user_message);
        let options = genai::chat::ChatOptions::default()
            .with_max_tokens(MAX_RESPONSE_TOKENS)
            .with_temperature(RESPONSE_TEMPERATURE);

        let response = self
            .client
            .exec_chat(&self.model, chat_request, Some(&options))
            .await?;

        response
            .content_text_into_string()
            .ok_or_else(|| ProviderError::Fatal("No response from AI model".to_string()))
    }
}

/// Bounded exponential backoff applied to rate-limited provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles on each further retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(
        max_attempts: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the given zero-based attempt: `base_delay * 2^attempt`.
    #[must_use]
    pub fn backoff_delay(
        &self,
        attempt: u32,
    ) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Fetches a generated reply for a user message.
///
/// Never returns an error: rate-limited calls are retried per the policy and
/// every other failure resolves to [`FALLBACK_RESPONSE`].
#[derive(Clone)]
pub struct ResponseFetcher {
    backend: Arc<dyn CompletionBackend>,
    policy: RetryPolicy,
}

impl ResponseFetcher {
    #[must_use]
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        policy: RetryPolicy,
    ) -> Self {
        Self { backend, policy }
    }

    /// Fetch a reply for the given non-empty user message.
    ///
    /// There is no sleep after the final attempt; exhaustion falls through to
    /// the fallback reply immediately.
    pub async fn fetch_response(
        &self,
        user_message: &str,
    ) -> String {
        for attempt in 0..self.policy.max_attempts {
            match self.backend.complete(user_message).await {
                Ok(text) => {
                    tracing::debug!(attempt = attempt + 1, "Provider returned a reply");
                    return text;
                }
                Err(err) if err.is_rate_limited() => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        error = %err,
                        "Provider rate limited"
                    );

                    if attempt + 1 < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.backoff_delay(attempt)).await;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %err,
                        "Provider request failed, not retrying"
                    );
                    return FALLBACK_RESPONSE.to_string();
                }
            }
        }

        FALLBACK_RESPONSE.to_string()
    }
}
