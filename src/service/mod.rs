//! Reconstruction engine
//!
//! The external operations of the system: intake, checklist mutation,
//! station and deployment matching, records requests, profile correction
//! and reference reloads.
//!
//! # Guarantees
//!
//! - Nothing is persisted for a profile that fails validation
//! - Category and reconstruction aggregates are recomputed and written in
//!   the same commit as the item change that caused them
//! - Mutations of one reconstruction are serialized; reads never block

mod engine;
mod errors;
mod geocode;
mod types;

pub use engine::ReconstructionService;
pub use errors::{EngineError, ServiceResult};
pub use geocode::{GeocodeError, Geocoder, TableGeocoder};
pub use types::{
    AssignmentResult, InitializeResult, ItemUpdate, ItemUpdateResult, NewAssignment,
    ReconstructionStatistics, ReconstructionTree, RecordsRequestInput,
};
