use async_trait::async_trait;
use std::time::Duration;

use crate::errors::TransientRequestError;
use crate::models::request::CompletionRequest;

/// Issues one attempt against a chat-completion endpoint (OpenAI, a test double, etc)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request once and return the generated text
    async fn send(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, TransientRequestError>;
}

/// Suspends the current call between retry attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
