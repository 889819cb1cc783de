//! Persisted aggregate records

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checklist::{ChecklistCategory, ChecklistItem};
use crate::geo::GeoPoint;
use crate::hazard::{HazardExposure, MatchSubject, OccupationalExposure};
use crate::period::DateRange;
use crate::profile::ValidatedProfile;
use crate::tracker::ReconstructionState;

/// Root record of one reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionRecord {
    pub id: Uuid,
    pub profile: ValidatedProfile,
    #[serde(default)]
    pub veteran_name: Option<String>,
    pub state: ReconstructionState,
    #[serde(default)]
    pub occupational_exposures: Vec<OccupationalExposure>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an assignment is a duty station or a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    DutyStation,
    Deployment,
}

impl AssignmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentKind::DutyStation => "duty_station",
            AssignmentKind::Deployment => "deployment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "duty_station" => Some(AssignmentKind::DutyStation),
            "deployment" => Some(AssignmentKind::Deployment),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A duty station or deployment with its matched exposures.
///
/// `exposures` are written only by the hazard matcher and are replaced as a
/// whole on every re-match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: Uuid,
    pub reconstruction_id: Uuid,
    pub kind: AssignmentKind,
    pub name: String,
    /// Resolved coordinates, when known
    pub location: Option<GeoPoint>,
    /// Free-text address supplied for geocoding
    pub address: Option<String>,
    pub period: DateRange,
    pub exposures: Vec<HazardExposure>,
    /// Reference dataset version the exposures were matched against
    pub reference_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssignmentRecord {
    /// Matcher input for this assignment within `service_period`
    pub fn subject(&self, service_period: DateRange) -> MatchSubject {
        MatchSubject::new(self.name.clone(), self.location, self.period)
            .with_service_period(service_period)
    }
}

/// Recomputed checklist state written in one transaction
#[derive(Debug, Clone, Copy)]
pub struct ChecklistMutation<'a> {
    pub reconstruction_id: Uuid,
    pub state: &'a ReconstructionState,
    /// Categories whose counters changed
    pub categories: &'a [ChecklistCategory],
    /// Items whose fields changed
    pub items: &'a [ChecklistItem],
}
