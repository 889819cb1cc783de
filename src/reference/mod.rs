//! Hazard reference store
//!
//! Curated, versioned dataset of known hazard zones: combustion-waste sites,
//! presumptive-exposure regions, contaminated-water sites, defoliant-program
//! regions, radiation-test sites and installation hazards, plus an
//! occupational-code hazard table.
//!
//! # Lifecycle
//!
//! - Loaded once at startup (file or compiled-in dataset) or on explicit reload
//! - Validated in full before indexing; invalid datasets are rejected whole
//! - Indexed once (spatial buckets + name indexes), then read-only
//! - Shared across matcher calls through [`ReferenceHandle`]

mod errors;
mod index;
mod loader;
mod store;
mod types;

pub use errors::{ReferenceError, ReferenceResult};
pub use index::{normalize_name, HazardIndex, MIN_INFIX_MATCH_LEN};
pub use loader::{DatasetInfo, LoadedDataset, ReferenceLoader, BUILTIN_SOURCE};
pub use store::{HazardReferenceStore, ReferenceHandle};
pub use types::{
    HazardDataset, HazardReferenceEntry, HazardType, MatchStrategy, OccupationalHazardEntry,
    RadiusTiers, Severity, ZoneRadius,
};
