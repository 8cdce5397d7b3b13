use super::message::ConversationMessage;
use crate::errors::CompletionError;

pub const MAX_TEMPERATURE: f32 = 2.0;

/// Messages plus generation parameters for one logical completion call.
///
/// Fields are private so a request cannot change once it passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    messages: Vec<ConversationMessage>,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(
        messages: Vec<ConversationMessage>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self, CompletionError> {
        if messages.is_empty() {
            return Err(CompletionError::InvalidRequest(
                "at least one message is required".to_string(),
            ));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(CompletionError::InvalidRequest(format!(
                "temperature must be within [0, {}], got {}",
                MAX_TEMPERATURE, temperature
            )));
        }
        if max_tokens == 0 {
            return Err(CompletionError::InvalidRequest(
                "max_tokens must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            messages,
            temperature,
            max_tokens,
        })
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
