//! Profile validation errors

use thiserror::Error;

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Profile validation errors
///
/// All profile errors reject the request before any state is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Service profile is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Service period ends ({end}) before it starts ({start})")]
    InvertedPeriod { start: String, end: String },

    #[error("Blank {kind} identifier at position {position}")]
    BlankIdentifier { kind: &'static str, position: usize },

    #[error("Duplicate {kind} identifier '{value}'")]
    DuplicateIdentifier { kind: &'static str, value: String },
}

impl ProfileError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ProfileError::MissingField(_) => "VREC_PROFILE_MISSING_FIELD",
            ProfileError::InvertedPeriod { .. } => "VREC_PROFILE_INVERTED_PERIOD",
            ProfileError::BlankIdentifier { .. } => "VREC_PROFILE_BLANK_IDENTIFIER",
            ProfileError::DuplicateIdentifier { .. } => "VREC_PROFILE_DUPLICATE_IDENTIFIER",
        }
    }

    /// Name of the offending profile field
    pub fn field(&self) -> &'static str {
        match self {
            ProfileError::MissingField(field) => field,
            ProfileError::InvertedPeriod { .. } => "service_period",
            ProfileError::BlankIdentifier { kind, .. } => kind,
            ProfileError::DuplicateIdentifier { kind, .. } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            ProfileError::MissingField("branch").code(),
            "VREC_PROFILE_MISSING_FIELD"
        );
        assert_eq!(
            ProfileError::BlankIdentifier {
                kind: "deployments",
                position: 2
            }
            .field(),
            "deployments"
        );
    }

    #[test]
    fn test_display_names_field() {
        let err = ProfileError::MissingField("service_period");
        assert!(err.to_string().contains("service_period"));
    }
}
