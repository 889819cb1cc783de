//! In-memory store
//!
//! All tables sit behind one lock so multi-row writes are atomic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::checklist::{CategoryWithItems, ChecklistCategory, ChecklistItem};
use crate::hazard::HazardExposure;
use crate::records_request::RecordsRequest;

use super::errors::{StoreError, StoreResult};
use super::records::{AssignmentRecord, ChecklistMutation, ReconstructionRecord};
use super::ReconstructionStore;

#[derive(Debug, Default)]
struct Tables {
    reconstructions: HashMap<Uuid, ReconstructionRecord>,
    /// Creation order of reconstructions
    order: Vec<Uuid>,
    categories: HashMap<Uuid, ChecklistCategory>,
    items: HashMap<Uuid, ChecklistItem>,
    assignments: HashMap<Uuid, AssignmentRecord>,
    assignment_order: Vec<Uuid>,
    requests: HashMap<Uuid, RecordsRequest>,
    request_order: Vec<Uuid>,
}

impl Tables {
    fn require_reconstruction(&self, id: &Uuid) -> StoreResult<&ReconstructionRecord> {
        self.reconstructions
            .get(id)
            .ok_or_else(|| StoreError::not_found("reconstruction", id))
    }

    fn insert_checklist(&mut self, checklist: &[CategoryWithItems]) {
        for entry in checklist {
            self.categories
                .insert(entry.category.id, entry.category.clone());
            for item in &entry.items {
                self.items.insert(item.id, item.clone());
            }
        }
    }

    fn apply(&mut self, mutation: &ChecklistMutation<'_>) -> StoreResult<()> {
        for category in mutation.categories {
            if !self.categories.contains_key(&category.id) {
                return Err(StoreError::not_found("category", category.id));
            }
        }
        for item in mutation.items {
            if !self.items.contains_key(&item.id) {
                return Err(StoreError::not_found("item", item.id));
            }
        }
        let record = self
            .reconstructions
            .get_mut(&mutation.reconstruction_id)
            .ok_or_else(|| StoreError::not_found("reconstruction", mutation.reconstruction_id))?;
        record.state = *mutation.state;
        record.updated_at = Utc::now();

        for category in mutation.categories {
            self.categories.insert(category.id, category.clone());
        }
        for item in mutation.items {
            self.items.insert(item.id, item.clone());
        }
        Ok(())
    }
}

/// In-memory reconstruction store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }
}

impl ReconstructionStore for InMemoryStore {
    fn create_reconstruction(
        &self,
        record: &ReconstructionRecord,
        checklist: &[CategoryWithItems],
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.reconstructions.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists {
                kind: "reconstruction",
                id: record.id.to_string(),
            });
        }
        tables.reconstructions.insert(record.id, record.clone());
        tables.order.push(record.id);
        tables.insert_checklist(checklist);
        Ok(())
    }

    fn get_reconstruction(&self, id: &Uuid) -> StoreResult<ReconstructionRecord> {
        self.read()?.require_reconstruction(id).cloned()
    }

    fn list_reconstructions(&self) -> StoreResult<Vec<Uuid>> {
        Ok(self.read()?.order.clone())
    }

    fn categories(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<ChecklistCategory>> {
        let tables = self.read()?;
        tables.require_reconstruction(reconstruction_id)?;
        let mut out: Vec<ChecklistCategory> = tables
            .categories
            .values()
            .filter(|c| c.reconstruction_id == *reconstruction_id)
            .cloned()
            .collect();
        out.sort_by_key(|c| c.position);
        Ok(out)
    }

    fn items(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<ChecklistItem>> {
        let tables = self.read()?;
        tables.require_reconstruction(reconstruction_id)?;
        let position_of = |category_id: &Uuid| {
            tables
                .categories
                .get(category_id)
                .map(|c| c.position)
                .unwrap_or(u32::MAX)
        };
        let mut out: Vec<ChecklistItem> = tables
            .items
            .values()
            .filter(|i| i.reconstruction_id == *reconstruction_id)
            .cloned()
            .collect();
        out.sort_by_key(|i| (position_of(&i.category_id), i.position));
        Ok(out)
    }

    fn get_item(&self, item_id: &Uuid) -> StoreResult<ChecklistItem> {
        self.read()?
            .items
            .get(item_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("item", item_id))
    }

    fn commit_mutation(&self, mutation: &ChecklistMutation<'_>) -> StoreResult<()> {
        self.write()?.apply(mutation)
    }

    fn replace_checklist(
        &self,
        record: &ReconstructionRecord,
        checklist: &[CategoryWithItems],
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.require_reconstruction(&record.id)?;
        tables
            .categories
            .retain(|_, c| c.reconstruction_id != record.id);
        tables.items.retain(|_, i| i.reconstruction_id != record.id);
        tables.insert_checklist(checklist);
        tables.reconstructions.insert(record.id, record.clone());
        Ok(())
    }

    fn insert_assignment(&self, assignment: &AssignmentRecord) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.require_reconstruction(&assignment.reconstruction_id)?;
        tables.assignments.insert(assignment.id, assignment.clone());
        tables.assignment_order.push(assignment.id);
        Ok(())
    }

    fn get_assignment(&self, id: &Uuid) -> StoreResult<AssignmentRecord> {
        self.read()?
            .assignments
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("assignment", id))
    }

    fn assignments(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<AssignmentRecord>> {
        let tables = self.read()?;
        tables.require_reconstruction(reconstruction_id)?;
        Ok(tables
            .assignment_order
            .iter()
            .filter_map(|id| tables.assignments.get(id))
            .filter(|a| a.reconstruction_id == *reconstruction_id)
            .cloned()
            .collect())
    }

    fn replace_exposures(
        &self,
        assignment_id: &Uuid,
        exposures: &[HazardExposure],
        reference_version: &str,
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        let assignment = tables
            .assignments
            .get_mut(assignment_id)
            .ok_or_else(|| StoreError::not_found("assignment", assignment_id))?;
        assignment.exposures = exposures.to_vec();
        assignment.reference_version = reference_version.to_string();
        assignment.updated_at = Utc::now();
        Ok(())
    }

    fn insert_request(
        &self,
        request: &RecordsRequest,
        mutation: Option<&ChecklistMutation<'_>>,
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.require_reconstruction(&request.reconstruction_id)?;
        if tables.requests.contains_key(&request.id) {
            return Err(StoreError::AlreadyExists {
                kind: "records request",
                id: request.id.to_string(),
            });
        }
        if let Some(mutation) = mutation {
            tables.apply(mutation)?;
        }
        tables.requests.insert(request.id, request.clone());
        tables.request_order.push(request.id);
        Ok(())
    }

    fn get_request(&self, id: &Uuid) -> StoreResult<RecordsRequest> {
        self.read()?
            .requests
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("records request", id))
    }

    fn update_request(&self, request: &RecordsRequest) -> StoreResult<()> {
        let mut tables = self.write()?;
        let existing = tables
            .requests
            .get_mut(&request.id)
            .ok_or_else(|| StoreError::not_found("records request", request.id))?;
        *existing = request.clone();
        Ok(())
    }

    fn requests(&self, reconstruction_id: &Uuid) -> StoreResult<Vec<RecordsRequest>> {
        let tables = self.read()?;
        tables.require_reconstruction(reconstruction_id)?;
        Ok(tables
            .request_order
            .iter()
            .filter_map(|id| tables.requests.get(id))
            .filter(|r| r.reconstruction_id == *reconstruction_id)
            .cloned()
            .collect())
    }
}
