//! Hazard matcher
//!
//! For one subject, gathers candidates from the name index and the spatial
//! index, then applies date overlap, per-type rules and severity tiers.
//! Results are sorted by severity (most severe first), then exposure days,
//! then reference id, so repeated runs are identical.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::period::DateRange;
use crate::profile::ValidatedProfile;
use crate::reference::{
    normalize_name, HazardReferenceEntry, HazardReferenceStore, HazardType, MatchStrategy,
    ZoneRadius,
};

use super::types::{ConfidenceLevel, HazardExposure, MatchSubject, OccupationalExposure};

/// Minimum overlap for a contaminated-water exposure
pub const MIN_CONTAMINATED_WATER_DAYS: u32 = 30;

/// Exposure days recorded for a defoliant-program hit
pub const DEFOLIANT_CONVENTION_DAYS: u32 = 365;

/// Era in which defoliant-program hazards are evaluated
pub fn defoliant_era() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(1962, 1, 9).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(1975, 5, 7).unwrap_or(NaiveDate::MAX),
    )
}

struct Candidate<'a> {
    entry: &'a HazardReferenceEntry,
    by_name: bool,
    distance: Option<f64>,
}

/// Matches stations and deployments against a reference store
#[derive(Clone)]
pub struct HazardMatcher {
    store: Arc<HazardReferenceStore>,
}

impl HazardMatcher {
    pub fn new(store: Arc<HazardReferenceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &HazardReferenceStore {
        &self.store
    }

    /// All exposures for `subject`. No match is an empty list.
    pub fn match_hazards(&self, subject: &MatchSubject) -> Vec<HazardExposure> {
        let mut candidates: HashMap<&str, Candidate<'_>> = HashMap::new();

        let name = normalize_name(subject.base_name());
        for entry in self.store.name_candidates(&name) {
            candidates
                .entry(entry.id.as_str())
                .or_insert(Candidate {
                    entry,
                    by_name: false,
                    distance: None,
                })
                .by_name = true;
        }

        if let Some(point) = subject.usable_location() {
            for (entry, distance) in self.store.entries_near(&point) {
                candidates
                    .entry(entry.id.as_str())
                    .or_insert(Candidate {
                        entry,
                        by_name: false,
                        distance: None,
                    })
                    .distance = Some(distance);
            }
        }

        let mut exposures: Vec<HazardExposure> = candidates
            .into_values()
            .filter_map(|c| evaluate(&c, subject))
            .collect();

        exposures.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then(b.exposure_days.cmp(&a.exposure_days))
                .then_with(|| a.reference_id.cmp(&b.reference_id))
        });
        exposures
    }

    /// Hazards associated with the profile's occupational codes
    pub fn match_occupational(&self, profile: &ValidatedProfile) -> Vec<OccupationalExposure> {
        let branch = profile.branch();
        profile
            .occupations()
            .flat_map(|code| {
                self.store
                    .occupational_for(branch, code)
                    .into_iter()
                    .map(move |entry| OccupationalExposure {
                        code: code.to_string(),
                        reference_id: entry.id.clone(),
                        hazard: entry.hazard.clone(),
                        severity: entry.severity,
                        citation: entry.citation.clone(),
                    })
            })
            .collect()
    }
}

fn evaluate(candidate: &Candidate<'_>, subject: &MatchSubject) -> Option<HazardExposure> {
    let entry = candidate.entry;
    let overlap = subject.period.overlap_days(&entry.active);
    if overlap == 0 {
        return None;
    }

    let exposure_days = match entry.hazard_type {
        HazardType::ContaminatedWater => {
            if overlap < MIN_CONTAMINATED_WATER_DAYS {
                return None;
            }
            overlap
        }
        HazardType::Defoliant => {
            if !subject.era_range().overlaps(&defoliant_era()) {
                return None;
            }
            DEFOLIANT_CONVENTION_DAYS
        }
        _ => overlap,
    };

    let severity = match (candidate.distance, entry.radius) {
        (Some(d), Some(ZoneRadius::Tiered(tiers))) => {
            tiers.severity_at(d).unwrap_or(entry.default_severity)
        }
        _ => entry.default_severity,
    };

    let confidence = match (candidate.by_name, candidate.distance.is_some()) {
        (true, true) => ConfidenceLevel::High,
        (false, true) => ConfidenceLevel::Medium,
        // A site that supports distance matching but was found by name alone
        (true, false) if entry.hazard_type.match_strategy() != MatchStrategy::NameOnly => {
            ConfidenceLevel::Low
        }
        (true, false) => ConfidenceLevel::Medium,
        (false, false) => return None,
    };

    Some(HazardExposure {
        hazard_type: entry.hazard_type,
        reference_id: entry.id.clone(),
        source_name: entry.name.clone(),
        distance_m: candidate.distance.unwrap_or(0.0),
        exposure_days,
        severity,
        presumptive: entry.presumptive,
        program_covered: entry.program_covered,
        confidence,
        citation: entry.citation.clone(),
    })
}
