//! Hazard matcher
//!
//! Maps a duty station or deployment onto the hazard reference store.
//!
//! # Strategies
//!
//! - Name: case-insensitive substring match in both directions on the base
//!   name
//! - Distance: haversine distance within the entry's matching radius
//!
//! Per-type rules decide which strategies apply and how exposure days and
//! severity are derived. Absence of hazards is an empty result, never an
//! error.

mod matcher;
mod types;

pub use matcher::{
    defoliant_era, HazardMatcher, DEFOLIANT_CONVENTION_DAYS, MIN_CONTAMINATED_WATER_DAYS,
};
pub use types::{ConfidenceLevel, HazardExposure, MatchSubject, OccupationalExposure};
