//! Hazard matching types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::period::DateRange;
use crate::reference::{HazardType, Severity};

/// How strongly the match is documented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(ConfidenceLevel::Low),
            "medium" => Some(ConfidenceLevel::Medium),
            "high" => Some(ConfidenceLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A duty station or deployment presented to the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSubject {
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub period: DateRange,
    /// Service period of the veteran the subject belongs to
    #[serde(default)]
    pub service_period: Option<DateRange>,
}

impl MatchSubject {
    pub fn new(name: impl Into<String>, location: Option<GeoPoint>, period: DateRange) -> Self {
        Self {
            name: name.into(),
            location,
            period,
            service_period: None,
        }
    }

    pub fn with_service_period(mut self, service_period: DateRange) -> Self {
        self.service_period = Some(service_period);
        self
    }

    /// Range checked against era-gated programs: the service period when
    /// known, the subject's own range otherwise
    pub fn era_range(&self) -> DateRange {
        self.service_period.unwrap_or(self.period)
    }

    /// Name before the first `,` or `(`, which drops qualifiers such as
    /// "Balad, Iraq" or "Camp Lejeune (MCB)"
    pub fn base_name(&self) -> &str {
        let end = self
            .name
            .find(|c: char| c == ',' || c == '(')
            .unwrap_or(self.name.len());
        self.name[..end].trim()
    }

    /// Coordinates usable for distance matching
    pub fn usable_location(&self) -> Option<GeoPoint> {
        self.location.filter(GeoPoint::is_valid)
    }
}

/// Derived exposure record for one reference entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardExposure {
    pub hazard_type: HazardType,
    pub reference_id: String,
    /// Reference entry name
    pub source_name: String,
    /// Meters from the site; 0 when matched by name only
    pub distance_m: f64,
    pub exposure_days: u32,
    pub severity: Severity,
    pub presumptive: bool,
    pub program_covered: bool,
    pub confidence: ConfidenceLevel,
    pub citation: String,
}

/// Hazard attached to an occupational specialty code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationalExposure {
    pub code: String,
    pub reference_id: String,
    pub hazard: String,
    pub severity: Severity,
    pub citation: String,
}
