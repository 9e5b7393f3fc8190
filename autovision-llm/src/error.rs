use thiserror::Error;

use autovision_core::Error as CoreError;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("API key not set for provider: {0}")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

impl From<LLMError> for CoreError {
    fn from(err: LLMError) -> Self {
        CoreError::Identification(err.to_string())
    }
}
