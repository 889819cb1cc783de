//! Reconstruction persistence
//!
//! Relational layout keyed by reconstruction id: reconstructions,
//! categories, items, assignments (stations and deployments), exposures and
//! outbound records requests. Deleting a category removes its items;
//! deleting an assignment removes its exposures.
//!
//! Every method that writes more than one row is atomic: either all rows
//! change or none do.

mod errors;
mod memory;
mod records;
mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use records::{AssignmentKind, AssignmentRecord, ChecklistMutation, ReconstructionRecord};
pub use sqlite::SqliteStore;

use uuid::Uuid;

use crate::checklist::{CategoryWithItems, ChecklistCategory, ChecklistItem};
use crate::hazard::HazardExposure;
use crate::records_request::RecordsRequest;

/// Trait for reconstruction persistence
pub trait ReconstructionStore: Send + Sync {
    /// Persist a new reconstruction together with its full checklist
    fn create_reconstruction(
        &self,
        record: &ReconstructionRecord,
        checklist: &[CategoryWithItems],
    ) -> StoreResult<()>;

    fn get_reconstruction(&self, id: &Uuid) -> StoreResult<ReconstructionRecord>;

    /// Ids of all reconstructions, oldest first
    fn list_reconstructions(&self) -> StoreResult<Vec<Uuid>>;

    /// Categories ordered by position
    fn categories(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<ChecklistCategory>>;

    /// Items ordered by category position, then item position
    fn items(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<ChecklistItem>>;

    fn get_item(&self, item_id: &Uuid) -> StoreResult<ChecklistItem>;

    /// Write changed items, recomputed categories and the aggregate state
    fn commit_mutation(&self, mutation: &ChecklistMutation<'_>) -> StoreResult<()>;

    /// Replace the whole checklist and the root record
    fn replace_checklist(
        &self,
        record: &ReconstructionRecord,
        checklist: &[CategoryWithItems],
    ) -> StoreResult<()>;

    fn insert_assignment(&self, assignment: &AssignmentRecord) -> StoreResult<()>;

    fn get_assignment(&self, id: &Uuid) -> StoreResult<AssignmentRecord>;

    /// Stations and deployments in insertion order
    fn assignments(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<AssignmentRecord>>;

    /// Replace the exposure set of an assignment
    fn replace_exposures(
        &self,
        assignment_id: &Uuid,
        exposures: &[HazardExposure],
        reference_version: &str,
    ) -> StoreResult<()>;

    /// Persist a request, applying `mutation` in the same transaction
    fn insert_request(
        &self,
        request: &RecordsRequest,
        mutation: Option<&ChecklistMutation<'_>>,
    ) -> StoreResult<()>;

    fn get_request(&self, id: &Uuid) -> StoreResult<RecordsRequest>;

    fn update_request(&self, request: &RecordsRequest) -> StoreResult<()>;

    /// Requests of a reconstruction, oldest first
    fn requests(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<RecordsRequest>>;
}
