//! Hazard reference dataset errors
//!
//! Reference errors only occur while loading or reloading a dataset. Lookups
//! against a loaded store never fail; an empty result is a valid answer.

use thiserror::Error;

/// Result type for reference dataset operations
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Reference dataset errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Failed to read hazard dataset '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed hazard dataset '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("Invalid hazard entry '{id}': {reason}")]
    InvalidEntry { id: String, reason: String },

    #[error("Duplicate hazard entry id '{0}'")]
    DuplicateEntry(String),
}

impl ReferenceError {
    pub fn invalid_entry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceError::Io { .. } => "VREC_REFERENCE_IO",
            ReferenceError::Malformed { .. } => "VREC_REFERENCE_MALFORMED",
            ReferenceError::InvalidEntry { .. } => "VREC_REFERENCE_INVALID_ENTRY",
            ReferenceError::DuplicateEntry(_) => "VREC_REFERENCE_DUPLICATE_ENTRY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_entry_display() {
        let err = ReferenceError::invalid_entry("bp-balad", "radius tiers not ascending");
        let msg = err.to_string();
        assert!(msg.contains("bp-balad"));
        assert!(msg.contains("ascending"));
        assert_eq!(err.code(), "VREC_REFERENCE_INVALID_ENTRY");
    }
}
