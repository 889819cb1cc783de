//! Observable lifecycle events
//!
//! Every structured log line the engine emits carries one of these as its
//! `event` field so that log consumers can filter on stable names.

use std::fmt;

/// Observable events in the reconstruction engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    /// Process startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Configuration loaded
    ConfigLoaded,
    /// HTTP listener bound
    Serving,

    // Reference data
    /// Hazard reference dataset loaded and indexed
    ReferenceLoaded,
    /// Hazard reference dataset replaced by explicit reload
    ReferenceReloaded,

    // Reconstruction
    /// Reconstruction initialized from a profile
    ReconstructionInitialized,
    /// Profile rejected by validation
    ProfileRejected,
    /// Profile corrected and checklist regenerated
    ProfileCorrected,
    /// Checklist item status changed
    ItemUpdated,
    /// Item moved off the nominal status path
    ItemIrregularTransition,
    /// Aggregate recomputed after a mutation
    AggregateRecomputed,

    // Hazard matching
    /// Station or deployment matched against the reference store
    HazardsMatched,
    /// Geocoding failed; matching fell back to names only
    GeocodeFallback,

    // Records requests
    /// Records request generated
    RecordsRequested,
    /// Records request artifact regenerated
    RecordsRequestRegenerated,
    /// Records request status updated
    RecordsRequestUpdated,
    /// Records request generation failed
    RecordsRequestFailed,

    // Storage
    /// Store operation failed
    StoreFailure,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "VREC_STARTUP_BEGIN",
            Event::BootComplete => "VREC_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "VREC_SERVING",

            Event::ReferenceLoaded => "REFERENCE_LOADED",
            Event::ReferenceReloaded => "REFERENCE_RELOADED",

            Event::ReconstructionInitialized => "RECONSTRUCTION_INITIALIZED",
            Event::ProfileRejected => "PROFILE_REJECTED",
            Event::ProfileCorrected => "PROFILE_CORRECTED",
            Event::ItemUpdated => "ITEM_UPDATED",
            Event::ItemIrregularTransition => "ITEM_IRREGULAR_TRANSITION",
            Event::AggregateRecomputed => "AGGREGATE_RECOMPUTED",

            Event::HazardsMatched => "HAZARDS_MATCHED",
            Event::GeocodeFallback => "GEOCODE_FALLBACK",

            Event::RecordsRequested => "RECORDS_REQUESTED",
            Event::RecordsRequestRegenerated => "RECORDS_REQUEST_REGENERATED",
            Event::RecordsRequestUpdated => "RECORDS_REQUEST_UPDATED",
            Event::RecordsRequestFailed => "RECORDS_REQUEST_FAILED",

            Event::StoreFailure => "STORE_FAILURE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
