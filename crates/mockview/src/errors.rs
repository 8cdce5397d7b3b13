use std::fmt;
use thiserror::Error;

/// Failure of a single attempt against the completion endpoint.
///
/// `status` is the HTTP status when the server answered, `None` for transport
/// level failures (connect, timeout, body read).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct TransientRequestError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransientRequestError {
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// A successful response that carried no generated text.
    pub fn empty_completion() -> Self {
        Self::http(200, "response contained no generated text")
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }
}

impl fmt::Display for TransientRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "network error: {}", self.message),
        }
    }
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("No API credential is configured for the completion endpoint")]
    Configuration,

    #[error("Invalid completion request: {0}")]
    InvalidRequest(String),

    #[error("Completion attempt failed: {0}")]
    Transient(TransientRequestError),

    #[error("Completion failed after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        last: TransientRequestError,
    },

    #[error("Completion was cancelled")]
    Cancelled,
}

pub type CompletionResult<T> = Result<T, CompletionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_display() {
        assert_eq!(
            TransientRequestError::http(429, "slow down").to_string(),
            "HTTP 429: slow down"
        );
        assert_eq!(
            TransientRequestError::network("connection reset").to_string(),
            "network error: connection reset"
        );
    }

    #[test]
    fn test_rate_limit_classification() {
        assert!(TransientRequestError::http(429, "").is_rate_limited());
        assert!(!TransientRequestError::http(503, "").is_rate_limited());
        assert!(!TransientRequestError::network("").is_rate_limited());
        assert!(!TransientRequestError::empty_completion().is_rate_limited());
    }

    #[test]
    fn test_exhausted_wraps_last_error() {
        let err = CompletionError::ExhaustedRetries {
            attempts: 5,
            last: TransientRequestError::http(500, "boom"),
        };
        assert_eq!(
            err.to_string(),
            "Completion failed after 5 attempts: HTTP 500: boom"
        );
    }
}
