//! Engine errors
//!
//! Every failure surfaced by [`ReconstructionService`](super::ReconstructionService)
//! maps to one of these, each with a stable code and HTTP status.

use thiserror::Error;

use crate::profile::ProfileError;
use crate::records_request::RequestError;
use crate::reference::ReferenceError;
use crate::store::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, EngineError>;

/// Service-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid profile: {0}")]
    Validation(#[from] ProfileError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => EngineError::NotFound { kind, id },
            other => EngineError::Store(other),
        }
    }
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(e) => e.code(),
            EngineError::InvalidInput(_) => "VREC_INVALID_INPUT",
            EngineError::NotFound { .. } => "VREC_NOT_FOUND",
            EngineError::Store(e) => e.code(),
            EngineError::Reference(e) => e.code(),
            EngineError::Request(e) => e.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Validation(_) | EngineError::InvalidInput(_) => 400,
            EngineError::NotFound { .. } => 404,
            EngineError::Store(e) => e.status_code(),
            EngineError::Reference(_) => 422,
            EngineError::Request(e) if e.is_retryable() => 503,
            EngineError::Request(_) => 422,
        }
    }

    /// The caller may retry the same operation
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Store(e) => e.is_retryable(),
            EngineError::Request(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_is_lifted() {
        let err: EngineError = StoreError::not_found("item", "abc").into();
        assert_eq!(
            err,
            EngineError::NotFound {
                kind: "item",
                id: "abc".into()
            }
        );
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_validation_keeps_profile_code() {
        let err: EngineError = ProfileError::MissingField("branch").into();
        assert_eq!(err.status_code(), 400);
        assert!(err.code().starts_with("VREC_PROFILE"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(EngineError::from(StoreError::Backend("locked".into())).is_retryable());
        assert!(EngineError::from(RequestError::Generation("down".into())).is_retryable());
        assert!(!EngineError::InvalidInput("x".into()).is_retryable());
    }
}
