//! Profile validation
//!
//! Turns an intake [`ServiceProfile`] into a [`ValidatedProfile`] or rejects
//! it. Checks run in a fixed order so the same malformed profile always
//! reports the same error.

use std::collections::HashSet;

use super::errors::{ProfileError, ProfileResult};
use super::types::{ServiceProfile, ValidatedProfile};

/// Stateless profile validator
pub struct ProfileValidator;

impl ProfileValidator {
    /// Validate a profile.
    ///
    /// Identifiers are trimmed; blank optional occupational codes are treated
    /// as absent.
    pub fn validate(profile: &ServiceProfile) -> ProfileResult<ValidatedProfile> {
        let branch = profile.branch.ok_or(ProfileError::MissingField("branch"))?;
        let period = profile
            .service_period
            .ok_or(ProfileError::MissingField("service_period"))?;

        if !period.is_ordered() {
            return Err(ProfileError::InvertedPeriod {
                start: period.start.to_string(),
                end: period.end.to_string(),
            });
        }

        let primary = normalize_code(profile.primary_occupation.as_deref());
        let secondary = normalize_code(profile.secondary_occupation.as_deref());

        let deployments = Self::normalize_identifiers("deployments", &profile.deployments)?;
        let schools =
            Self::normalize_identifiers("specialized_training", &profile.specialized_training)?;

        Ok(ValidatedProfile::new(
            branch,
            period,
            primary,
            secondary,
            deployments,
            schools,
        ))
    }

    /// Trim identifiers, rejecting blanks and case-insensitive duplicates
    fn normalize_identifiers(kind: &'static str, values: &[String]) -> ProfileResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(values.len());

        for (position, raw) in values.iter().enumerate() {
            let value = raw.trim();
            if value.is_empty() {
                return Err(ProfileError::BlankIdentifier { kind, position });
            }
            if !seen.insert(value.to_lowercase()) {
                return Err(ProfileError::DuplicateIdentifier {
                    kind,
                    value: value.to_string(),
                });
            }
            out.push(value.to_string());
        }

        Ok(out)
    }
}

fn normalize_code(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| c.to_uppercase())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::period::DateRange;
    use crate::profile::Branch;

    fn period() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2001, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2009, 5, 31).unwrap(),
        )
    }

    fn base_profile() -> ServiceProfile {
        ServiceProfile {
            branch: Some(Branch::Army),
            service_period: Some(period()),
            primary_occupation: Some(" 11b ".into()),
            secondary_occupation: Some("".into()),
            deployments: vec!["OIF".into()],
            specialized_training: vec![],
        }
    }

    #[test]
    fn test_valid_profile_normalizes_codes() {
        let validated = ProfileValidator::validate(&base_profile()).unwrap();
        assert_eq!(validated.primary_occupation(), Some("11B"));
        assert_eq!(validated.secondary_occupation(), None);
        assert_eq!(validated.deployments(), &["OIF".to_string()]);
    }

    #[test]
    fn test_missing_branch_rejected() {
        let mut profile = base_profile();
        profile.branch = None;
        assert_eq!(
            ProfileValidator::validate(&profile),
            Err(ProfileError::MissingField("branch"))
        );
    }

    #[test]
    fn test_missing_period_rejected() {
        let mut profile = base_profile();
        profile.service_period = None;
        assert_eq!(
            ProfileValidator::validate(&profile),
            Err(ProfileError::MissingField("service_period"))
        );
    }

    #[test]
    fn test_inverted_period_rejected() {
        let mut profile = base_profile();
        let p = period();
        profile.service_period = Some(DateRange::new(p.end, p.start));
        assert!(matches!(
            ProfileValidator::validate(&profile),
            Err(ProfileError::InvertedPeriod { .. })
        ));
    }

    #[test]
    fn test_blank_deployment_rejected() {
        let mut profile = base_profile();
        profile.deployments.push("  ".into());
        assert_eq!(
            ProfileValidator::validate(&profile),
            Err(ProfileError::BlankIdentifier {
                kind: "deployments",
                position: 1
            })
        );
    }

    #[test]
    fn test_duplicate_school_rejected() {
        let mut profile = base_profile();
        profile.specialized_training = vec!["Airborne".into(), "airborne".into()];
        assert!(matches!(
            ProfileValidator::validate(&profile),
            Err(ProfileError::DuplicateIdentifier { .. })
        ));
    }
}
