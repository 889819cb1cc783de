//! Service profile types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::period::DateRange;

/// Branch of service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Army,
    Navy,
    AirForce,
    MarineCorps,
    CoastGuard,
    SpaceForce,
}

impl Branch {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Army => "army",
            Branch::Navy => "navy",
            Branch::AirForce => "air_force",
            Branch::MarineCorps => "marine_corps",
            Branch::CoastGuard => "coast_guard",
            Branch::SpaceForce => "space_force",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "army" => Some(Branch::Army),
            "navy" => Some(Branch::Navy),
            "air_force" => Some(Branch::AirForce),
            "marine_corps" => Some(Branch::MarineCorps),
            "coast_guard" => Some(Branch::CoastGuard),
            "space_force" => Some(Branch::SpaceForce),
            _ => None,
        }
    }

    /// What the branch calls an occupational specialty code
    pub fn occupation_label(&self) -> &'static str {
        match self {
            Branch::Army | Branch::MarineCorps => "MOS",
            Branch::AirForce | Branch::SpaceForce => "AFSC",
            Branch::Navy | Branch::CoastGuard => "Rating",
        }
    }

    /// Custodian of the branch's active personnel records
    pub fn records_custodian(&self) -> &'static str {
        match self {
            Branch::Army => "Army Human Resources Command",
            Branch::Navy => "Navy Personnel Command",
            Branch::AirForce | Branch::SpaceForce => "Air Force Personnel Center",
            Branch::MarineCorps => "Manpower Management Records and Performance Branch",
            Branch::CoastGuard => "Coast Guard Personnel Service Center",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Service profile as submitted for intake.
///
/// Every field is optional at this stage so that malformed submissions can
/// be rejected with a precise validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceProfile {
    #[serde(default)]
    pub branch: Option<Branch>,

    #[serde(default)]
    pub service_period: Option<DateRange>,

    #[serde(default)]
    pub primary_occupation: Option<String>,

    #[serde(default)]
    pub secondary_occupation: Option<String>,

    /// Deployment identifiers, e.g. operation names
    #[serde(default)]
    pub deployments: Vec<String>,

    /// Specialized school identifiers
    #[serde(default)]
    pub specialized_training: Vec<String>,
}

/// A profile whose mandatory fields have been checked.
///
/// Only [`ProfileValidator`](super::ProfileValidator) constructs these from
/// intake data; the store round-trips them through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedProfile {
    branch: Branch,
    service_period: DateRange,
    primary_occupation: Option<String>,
    secondary_occupation: Option<String>,
    deployments: Vec<String>,
    specialized_training: Vec<String>,
}

impl ValidatedProfile {
    pub(super) fn new(
        branch: Branch,
        service_period: DateRange,
        primary_occupation: Option<String>,
        secondary_occupation: Option<String>,
        deployments: Vec<String>,
        specialized_training: Vec<String>,
    ) -> Self {
        Self {
            branch,
            service_period,
            primary_occupation,
            secondary_occupation,
            deployments,
            specialized_training,
        }
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn service_period(&self) -> DateRange {
        self.service_period
    }

    pub fn primary_occupation(&self) -> Option<&str> {
        self.primary_occupation.as_deref()
    }

    pub fn secondary_occupation(&self) -> Option<&str> {
        self.secondary_occupation.as_deref()
    }

    pub fn deployments(&self) -> &[String] {
        &self.deployments
    }

    pub fn specialized_training(&self) -> &[String] {
        &self.specialized_training
    }

    /// Occupational codes in order: primary, then secondary
    pub fn occupations(&self) -> impl Iterator<Item = &str> {
        self.primary_occupation
            .as_deref()
            .into_iter()
            .chain(self.secondary_occupation.as_deref())
    }

    /// Years of active service
    pub fn active_years(&self) -> f64 {
        self.service_period.years()
    }

    /// Convert back to the intake shape
    pub fn to_profile(&self) -> ServiceProfile {
        ServiceProfile {
            branch: Some(self.branch),
            service_period: Some(self.service_period),
            primary_occupation: self.primary_occupation.clone(),
            secondary_occupation: self.secondary_occupation.clone(),
            deployments: self.deployments.clone(),
            specialized_training: self.specialized_training.clone(),
        }
    }
}
