//! Hazard reference dataset types

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::period::DateRange;
use crate::profile::Branch;

use super::errors::{ReferenceError, ReferenceResult};

/// Category of a known hazard zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    /// Open-air combustion-waste disposal site (burn pit)
    CombustionWaste,
    /// Region covered by a presumptive-exposure rule
    PresumptiveRegion,
    /// Historical contaminated-water site
    ContaminatedWater,
    /// Defoliant-exposure program region
    Defoliant,
    /// Nuclear or radiation test site
    RadiationTest,
    /// Installation-specific hazard
    Installation,
}

/// How reference entries of a given type can be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Name match or geospatial match, either suffices
    NameOrGeo,
    /// Name match only; no distance requirement
    NameOnly,
    /// Geospatial match only; names are never consulted
    GeoOnly,
}

impl HazardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardType::CombustionWaste => "combustion_waste",
            HazardType::PresumptiveRegion => "presumptive_region",
            HazardType::ContaminatedWater => "contaminated_water",
            HazardType::Defoliant => "defoliant",
            HazardType::RadiationTest => "radiation_test",
            HazardType::Installation => "installation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "combustion_waste" => Some(HazardType::CombustionWaste),
            "presumptive_region" => Some(HazardType::PresumptiveRegion),
            "contaminated_water" => Some(HazardType::ContaminatedWater),
            "defoliant" => Some(HazardType::Defoliant),
            "radiation_test" => Some(HazardType::RadiationTest),
            "installation" => Some(HazardType::Installation),
            _ => None,
        }
    }

    pub fn match_strategy(&self) -> MatchStrategy {
        match self {
            HazardType::CombustionWaste => MatchStrategy::NameOrGeo,
            HazardType::RadiationTest => MatchStrategy::GeoOnly,
            HazardType::PresumptiveRegion
            | HazardType::ContaminatedWater
            | HazardType::Defoliant
            | HazardType::Installation => MatchStrategy::NameOnly,
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exposure severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Extreme,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Extreme => "extreme",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "extreme" => Some(Severity::Extreme),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity zones around a site, as outer distances in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusTiers {
    pub extreme_m: f64,
    pub high_m: f64,
    pub medium_m: f64,
    pub low_m: f64,
}

impl RadiusTiers {
    /// Severity for a distance, or `None` outside the outermost tier
    pub fn severity_at(&self, distance_m: f64) -> Option<Severity> {
        if distance_m <= self.extreme_m {
            Some(Severity::Extreme)
        } else if distance_m <= self.high_m {
            Some(Severity::High)
        } else if distance_m <= self.medium_m {
            Some(Severity::Medium)
        } else if distance_m <= self.low_m {
            Some(Severity::Low)
        } else {
            None
        }
    }

    fn is_ascending(&self) -> bool {
        self.extreme_m > 0.0
            && self.extreme_m <= self.high_m
            && self.high_m <= self.medium_m
            && self.medium_m <= self.low_m
            && self.low_m.is_finite()
    }
}

/// Matching radius of a geospatially matched entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneRadius {
    /// Multi-tier radii; severity depends on distance
    Tiered(RadiusTiers),
    /// Single radius; severity is the entry default
    Fixed { meters: f64 },
}

impl ZoneRadius {
    /// Distance within which the entry matches at all
    pub fn matching_radius(&self) -> f64 {
        match self {
            ZoneRadius::Tiered(tiers) => tiers.low_m,
            ZoneRadius::Fixed { meters } => *meters,
        }
    }
}

/// One known hazard zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardReferenceEntry {
    pub id: String,
    pub hazard_type: HazardType,
    pub name: String,
    /// Additional name-match keys
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub radius: Option<ZoneRadius>,
    pub active: DateRange,
    pub default_severity: Severity,
    pub presumptive: bool,
    #[serde(default)]
    pub program_covered: bool,
    pub citation: String,
}

impl HazardReferenceEntry {
    /// Name keys: the primary name followed by aliases
    pub fn name_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether this entry can be matched by name
    pub fn is_name_matchable(&self) -> bool {
        self.hazard_type.match_strategy() != MatchStrategy::GeoOnly
    }

    /// Location and matching radius, when the entry can be matched by distance
    pub fn geo_zone(&self) -> Option<(GeoPoint, f64)> {
        if self.hazard_type.match_strategy() == MatchStrategy::NameOnly {
            return None;
        }
        match (self.location, self.radius) {
            (Some(point), Some(radius)) => Some((point, radius.matching_radius())),
            _ => None,
        }
    }

    /// Check the entry's internal consistency
    pub fn validate(&self) -> ReferenceResult<()> {
        let fail = |reason: &str| Err(ReferenceError::invalid_entry(&self.id, reason));

        if self.id.trim().is_empty() {
            return Err(ReferenceError::invalid_entry("<blank>", "entry id is blank"));
        }
        if self.name.trim().is_empty() {
            return fail("name is blank");
        }
        if self.aliases.iter().any(|a| a.trim().is_empty()) {
            return fail("alias is blank");
        }
        if !self.active.is_ordered() {
            return fail("active range ends before it starts");
        }
        if let Some(point) = self.location {
            if !point.is_valid() {
                return fail("location is outside valid coordinate ranges");
            }
        }

        match (self.hazard_type.match_strategy(), self.radius) {
            (MatchStrategy::NameOnly, Some(_)) => {
                return fail("name-matched hazard types take no radius");
            }
            (MatchStrategy::GeoOnly, Some(ZoneRadius::Fixed { meters })) => {
                if self.location.is_none() {
                    return fail("geospatial entry requires a location");
                }
                if !(meters.is_finite() && meters > 0.0) {
                    return fail("fixed radius must be positive");
                }
            }
            (MatchStrategy::GeoOnly, _) => {
                return fail("geospatial-only entry requires a fixed radius");
            }
            (MatchStrategy::NameOrGeo, Some(ZoneRadius::Tiered(tiers))) => {
                if self.location.is_none() {
                    return fail("tiered radius requires a location");
                }
                if !tiers.is_ascending() {
                    return fail("radius tiers must be positive and ascending");
                }
            }
            (MatchStrategy::NameOrGeo, Some(ZoneRadius::Fixed { .. })) => {
                return fail("combustion-waste sites use tiered radii");
            }
            (MatchStrategy::NameOrGeo, None) | (MatchStrategy::NameOnly, None) => {}
        }

        Ok(())
    }
}

/// Hazard associated with an occupational specialty code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationalHazardEntry {
    pub id: String,
    /// Branches the codes apply to; empty means any branch
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Code prefixes, matched case-insensitively against the start of a code
    pub code_prefixes: Vec<String>,
    pub hazard: String,
    pub severity: Severity,
    pub citation: String,
}

impl OccupationalHazardEntry {
    /// Whether this entry covers `code` in `branch`
    pub fn applies_to(&self, branch: Branch, code: &str) -> bool {
        if !self.branches.is_empty() && !self.branches.contains(&branch) {
            return false;
        }
        let code = code.trim().to_uppercase();
        self.code_prefixes
            .iter()
            .any(|prefix| code.starts_with(&prefix.trim().to_uppercase()))
    }

    pub fn validate(&self) -> ReferenceResult<()> {
        if self.id.trim().is_empty() {
            return Err(ReferenceError::invalid_entry("<blank>", "entry id is blank"));
        }
        if self.code_prefixes.is_empty() || self.code_prefixes.iter().any(|p| p.trim().is_empty())
        {
            return Err(ReferenceError::invalid_entry(
                &self.id,
                "code prefixes must be present and non-blank",
            ));
        }
        if self.hazard.trim().is_empty() {
            return Err(ReferenceError::invalid_entry(&self.id, "hazard is blank"));
        }
        Ok(())
    }
}

/// A complete, versioned reference dataset as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardDataset {
    pub version: String,
    pub entries: Vec<HazardReferenceEntry>,
    #[serde(default)]
    pub occupational: Vec<OccupationalHazardEntry>,
}

impl HazardDataset {
    /// Validate every entry and id uniqueness across both tables
    pub fn validate(&self) -> ReferenceResult<()> {
        if self.version.trim().is_empty() {
            return Err(ReferenceError::Malformed {
                source_name: "<dataset>".into(),
                reason: "version is blank".into(),
            });
        }

        let mut ids = HashSet::new();
        for entry in &self.entries {
            entry.validate()?;
            if !ids.insert(entry.id.as_str()) {
                return Err(ReferenceError::DuplicateEntry(entry.id.clone()));
            }
        }
        for entry in &self.occupational {
            entry.validate()?;
            if !ids.insert(entry.id.as_str()) {
                return Err(ReferenceError::DuplicateEntry(entry.id.clone()));
            }
        }
        Ok(())
    }
}
