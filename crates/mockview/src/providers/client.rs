use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use super::base::{Sleeper, TokioSleeper, Transport};
use super::configs::OpenAiProviderConfig;
use super::openai::OpenAiTransport;
use crate::errors::{CompletionError, CompletionResult, TransientRequestError};
use crate::models::request::CompletionRequest;

/// Total attempts per call: the initial request plus four retries.
pub const MAX_ATTEMPTS: u32 = 5;

const RATE_LIMIT_BASE_MS: u64 = 3000;
const DEFAULT_BASE_MS: u64 = 1000;

/// Delay inserted after `attempt` (1-indexed) failed with `error`.
///
/// Rate limited attempts back off on `2^attempt * 3s`, every other failure on
/// `2^(attempt-1) * 1s`.
pub fn backoff_delay(attempt: u32, error: &TransientRequestError) -> Duration {
    let millis = if error.is_rate_limited() {
        2u64.saturating_pow(attempt).saturating_mul(RATE_LIMIT_BASE_MS)
    } else {
        2u64.saturating_pow(attempt.saturating_sub(1))
            .saturating_mul(DEFAULT_BASE_MS)
    };
    Duration::from_millis(millis)
}

enum RetryState {
    Attempting(u32),
    Waiting { next: u32, delay: Duration },
}

/// Completion client that retries transient failures with backoff.
///
/// `Idle -> Attempting(n) -> Success | Waiting -> Attempting(n+1) | Exhausted`.
/// A failure on the last attempt goes straight to `ExhaustedRetries`.
#[derive(Clone)]
pub struct CompletionClient {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            sleeper,
            api_key,
        }
    }

    /// Client talking to an OpenAI-compatible endpoint with real delays
    pub fn openai(config: OpenAiProviderConfig) -> Result<Self> {
        let api_key = config.api_key.clone();
        let transport = OpenAiTransport::new(config)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(TokioSleeper),
            api_key,
        ))
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        self.complete_until(request, std::future::pending::<()>())
            .await
    }

    /// Same as [`complete`](Self::complete), but gives up with
    /// [`CompletionError::Cancelled`] as soon as `cancel` resolves, whether the
    /// call is waiting on an attempt or on a backoff delay.
    pub async fn complete_until<F>(
        &self,
        request: &CompletionRequest,
        cancel: F,
    ) -> CompletionResult<String>
    where
        F: Future<Output = ()>,
    {
        let api_key = self.credential().ok_or(CompletionError::Configuration)?;
        tokio::pin!(cancel);

        let mut state = RetryState::Attempting(1);
        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    let outcome = tokio::select! {
                        biased;
                        _ = &mut cancel => return Err(CompletionError::Cancelled),
                        outcome = self.transport.send(api_key, request) => outcome,
                    };

                    let error = match outcome {
                        Ok(text) if !text.trim().is_empty() => {
                            debug!(attempt, "completion succeeded");
                            return Ok(text);
                        }
                        Ok(_) => TransientRequestError::empty_completion(),
                        Err(error) => error,
                    };

                    if attempt >= MAX_ATTEMPTS {
                        warn!(attempt, error = %error, "completion retries exhausted");
                        return Err(CompletionError::ExhaustedRetries {
                            attempts: attempt,
                            last: error,
                        });
                    }

                    let delay = backoff_delay(attempt, &error);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "completion attempt failed, retrying"
                    );
                    RetryState::Waiting {
                        next: attempt + 1,
                        delay,
                    }
                }
                RetryState::Waiting { next, delay } => {
                    tokio::select! {
                        biased;
                        _ = &mut cancel => return Err(CompletionError::Cancelled),
                        _ = self.sleeper.sleep(delay) => {}
                    }
                    RetryState::Attempting(next)
                }
            };
        }
    }
}
