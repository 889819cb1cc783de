//! Records-request errors

use thiserror::Error;

/// Result type for records-request generation
pub type RequestResult<T> = Result<T, RequestError>;

/// Records-request generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Records request has no documents")]
    EmptyDocumentList,

    #[error("Invalid records request: {0}")]
    Invalid(String),

    #[error("Records request generation failed: {0}")]
    Generation(String),
}

impl RequestError {
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::EmptyDocumentList => "VREC_REQUEST_EMPTY",
            RequestError::Invalid(_) => "VREC_REQUEST_INVALID",
            RequestError::Generation(_) => "VREC_REQUEST_GENERATION_FAILED",
        }
    }

    /// Generation failures may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, RequestError::Generation(_))
    }
}
