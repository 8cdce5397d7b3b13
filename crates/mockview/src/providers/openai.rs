use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::base::Transport;
use super::configs::OpenAiProviderConfig;
use crate::errors::TransientRequestError;
use crate::models::request::CompletionRequest;

pub struct OpenAiTransport {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiTransport {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        )
    }

    fn payload(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.config.model,
            "messages": request.messages(),
            "temperature": request.temperature(),
            "max_tokens": request.max_tokens(),
        })
    }
}

/// Pull `choices[0].message.content` out of a chat completion response
pub fn extract_completion_text(response: &Value) -> Option<String> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(String::from)
}

/// Prefer the API's own `error.message` over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")?
                .get("message")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl Transport for OpenAiTransport {
    async fn send(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, TransientRequestError> {
        let response = self
            .client
            .post(self.url())
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| TransientRequestError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransientRequestError::network(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(TransientRequestError::http(
                status.as_u16(),
                error_message(&body),
            ));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            TransientRequestError::http(status.as_u16(), format!("invalid response body: {}", e))
        })?;

        extract_completion_text(&value).ok_or_else(TransientRequestError::empty_completion)
    }
}
