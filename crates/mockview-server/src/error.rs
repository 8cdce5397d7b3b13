use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mockview::errors::CompletionError;
use mockview::interview::InterviewError;
use serde::Serialize;
use thiserror::Error;

const BUSY_MESSAGE: &str = "The interviewer is busy right now, please try again in a moment.";
const NOT_CONFIGURED_MESSAGE: &str = "The interviewer is not configured on this server.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Invalid value for {env_var}: {reason}")]
    InvalidValue { env_var: String, reason: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a config field path like `provider.api_key` to `MOCKVIEW_PROVIDER__API_KEY`
pub fn to_env_var(field_path: &str) -> String {
    format!(
        "MOCKVIEW_{}",
        field_path.replace('.', "__").to_uppercase()
    )
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),

    #[error(transparent)]
    Interview(#[from] InterviewError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Interview(err) => match err {
                InterviewError::EmptyInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                InterviewError::Finished(_) => (StatusCode::CONFLICT, err.to_string()),
                InterviewError::Prompt(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
                InterviewError::Completion(CompletionError::Configuration) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    NOT_CONFIGURED_MESSAGE.to_string(),
                ),
                InterviewError::Completion(CompletionError::InvalidRequest(_)) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
                InterviewError::Completion(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, BUSY_MESSAGE.to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse { error })).into_response()
    }
}
