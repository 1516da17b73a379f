//! Text-generation gateway.
//!
//! [`Gateway::generate`] sends a rendered prompt to a [`CompletionBackend`],
//! retrying transient failures with exponential backoff, then waits out a
//! fixed cooldown and strips any code fence the model wrapped its answer in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::GeminiConfig;

mod error;
mod gemini;

pub use error::{is_retryable_status, GatewayError};
pub use gemini::GeminiBackend;

/// A single request/response exchange with a generative model.
///
/// Implementations make exactly one attempt; retry and cooldown live in
/// [`Gateway`].
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Backend used when no real one can be configured. Every call fails with
/// [`GatewayError::Config`], so stages that need the model report the
/// misconfiguration while stored artifacts stay readable.
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl CompletionBackend for UnavailableBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Config(self.reason.clone()))
    }
}

/// The Gemini backend, or an [`UnavailableBackend`] explaining why it could
/// not be built.
pub fn backend_from_config(config: &GeminiConfig) -> Arc<dyn CompletionBackend> {
    match GeminiBackend::from_config(config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            warn!(error = %e, "generation backend unavailable");
            Arc::new(UnavailableBackend::new(e.to_string()))
        }
    }
}

/// Retry and pacing policy for backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after that.
    pub initial_backoff: Duration,
    /// Delay after every successful call.
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            cooldown: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget with no waiting. Used by tests and offline tooling.
    pub fn immediate() -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            cooldown: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay to wait before attempt `attempt` (1-based). The first attempt
    /// never waits.
    pub fn backoff_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            return None;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        Some(self.initial_backoff.saturating_mul(factor))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Retrying, fence-stripping front end to a [`CompletionBackend`].
#[derive(Clone)]
pub struct Gateway {
    backend: Arc<dyn CompletionBackend>,
    policy: RetryPolicy,
}

impl Gateway {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self::with_policy(backend, RetryPolicy::default())
    }

    pub fn with_policy(backend: Arc<dyn CompletionBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Generate text for `prompt`.
    ///
    /// Transient errors are retried up to the policy's attempt budget; the
    /// last transient error is returned once it is spent. Permanent errors
    /// return immediately.
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let raw = self.complete_with_retry(prompt).await?;
        tokio::time::sleep(self.policy.cooldown).await;
        Ok(strip_code_fence(&raw).to_string())
    }

    async fn complete_with_retry(&self, prompt: &str) -> Result<String, GatewayError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;
        loop {
            match self.attempt(attempt, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "generate: transient backend error, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "generate: giving up");
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self, attempt: u32, prompt: &str) -> Result<String, GatewayError> {
        if let Some(delay) = self.policy.backoff_before(attempt) {
            debug!(attempt, delay_ms = delay.as_millis() as u64, "generate: backing off");
            tokio::time::sleep(delay).await;
        }
        self.backend.complete(prompt).await
    }
}

/// Remove a surrounding Markdown code fence, if there is one.
///
/// ```
/// use ideaplan::gateway::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fence("plain text"), "plain text");
/// ```
///
/// The info string on the opening fence (`json`, `markdown`, ...) is dropped
/// along with the fences. Text that is not fenced is returned untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return text;
    };

    let body = match inner.split_once('\n') {
        Some((first, rest)) if is_info_string(first) => rest,
        _ => inner,
    };
    body.trim()
}

fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}
