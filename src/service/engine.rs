//! Reconstruction service
//!
//! Composes the checklist engine, hazard matcher, completion tracker and
//! records-request collaborator behind the external operations, and
//! persists the results through a [`ReconstructionStore`].
//!
//! # Concurrency
//!
//! Reads take no engine lock. Every mutation of a reconstruction holds that
//! reconstruction's mutation lock from the first read to the final commit,
//! so two racing updates are applied one after the other and the two-level
//! aggregate never reflects half of a change.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::checklist::{
    generate_checklist, CategoryWithItems, ChecklistCategory, ChecklistItem, ItemStatus, Priority,
};
use crate::geo::GeoPoint;
use crate::hazard::{HazardExposure, HazardMatcher};
use crate::observability::{Event, MetricsRegistry, MetricsSnapshot};
use crate::period::DateRange;
use crate::profile::{ProfileValidator, ServiceProfile, ValidatedProfile};
use crate::records_request::{
    RecordsRequest, RecordsRequestType, RequestDraft, RequestGenerator, RequestStatus,
    RequestedDocument, VeteranInfo,
};
use crate::reference::{DatasetInfo, HazardReferenceStore, ReferenceHandle, ReferenceLoader};
use crate::store::{
    AssignmentKind, AssignmentRecord, ChecklistMutation, ReconstructionRecord,
    ReconstructionStore,
};
use crate::tracker::{aggregate, recompute_all, recompute_category};

use super::errors::{EngineError, ServiceResult};
use super::geocode::Geocoder;
use super::types::{
    AssignmentResult, InitializeResult, ItemUpdate, ItemUpdateResult, NewAssignment,
    ReconstructionStatistics, ReconstructionTree, RecordsRequestInput,
};

type Lock = Arc<Mutex<()>>;

/// Per-reconstruction mutation locks.
///
/// An entry lives only while some caller holds its `Arc`; idle entries are
/// pruned on the next lookup, so the table is bounded by the number of
/// reconstructions being mutated at once.
#[derive(Default)]
struct MutationLocks {
    locks: Mutex<HashMap<Uuid, Lock>>,
}

impl MutationLocks {
    fn for_reconstruction(&self, id: Uuid) -> ServiceResult<Lock> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| EngineError::InvalidInput("mutation lock table poisoned".into()))?;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}

fn acquire(lock: &Lock) -> MutexGuard<'_, ()> {
    // The guarded unit carries no data, so a poisoned lock is still usable
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Reconstruction engine entry point
pub struct ReconstructionService {
    store: Arc<dyn ReconstructionStore>,
    reference: Arc<ReferenceHandle>,
    generator: Arc<dyn RequestGenerator>,
    geocoder: Option<Arc<dyn Geocoder>>,
    metrics: Arc<MetricsRegistry>,
    locks: MutationLocks,
}

impl ReconstructionService {
    pub fn new(
        store: Arc<dyn ReconstructionStore>,
        reference: Arc<ReferenceHandle>,
        generator: Arc<dyn RequestGenerator>,
    ) -> Self {
        Self {
            store,
            reference,
            generator,
            geocoder: None,
            metrics: Arc::new(MetricsRegistry::new()),
            locks: MutationLocks::default(),
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn matcher(&self) -> HazardMatcher {
        HazardMatcher::new(self.reference.current())
    }

    // ========================================================================
    // Reconstruction lifecycle
    // ========================================================================

    /// Validate a profile and persist its checklist.
    ///
    /// Nothing is written when validation fails.
    pub fn initialize_reconstruction(
        &self,
        profile: &ServiceProfile,
        veteran_name: Option<String>,
    ) -> ServiceResult<InitializeResult> {
        let validated = self.validate(profile)?;
        let id = Uuid::new_v4();

        let mut checklist: Vec<CategoryWithItems> = generate_checklist(&validated)
            .iter()
            .map(|generated| CategoryWithItems::instantiate(id, generated))
            .collect();
        let state = recompute_checklist(&mut checklist);

        let now = Utc::now();
        let record = ReconstructionRecord {
            id,
            occupational_exposures: self.matcher().match_occupational(&validated),
            profile: validated,
            veteran_name,
            state,
            created_at: now,
            updated_at: now,
        };

        self.store
            .create_reconstruction(&record, &checklist)
            .inspect_err(|e| self.store_failure("create_reconstruction", e))?;
        self.metrics.increment_reconstructions();

        info!(
            event = Event::ReconstructionInitialized.as_str(),
            reconstruction_id = %id,
            branch = %record.profile.branch(),
            documents = state.total_documents,
            categories = checklist.len(),
            "reconstruction initialized"
        );

        Ok(InitializeResult {
            reconstruction_id: id,
            total_documents: state.total_documents,
            category_count: checklist.len() as u32,
        })
    }

    /// Apply a corrected profile.
    ///
    /// Regenerates the checklist; items whose category, tag and document name
    /// survive keep their status, file reference and notes.
    pub fn correct_profile(
        &self,
        reconstruction_id: Uuid,
        profile: &ServiceProfile,
    ) -> ServiceResult<InitializeResult> {
        let validated = self.validate(profile)?;
        let lock = self.locks.for_reconstruction(reconstruction_id)?;
        let _guard = acquire(&lock);

        let mut record = self.store.get_reconstruction(&reconstruction_id)?;
        let previous = self.load_checklist(&reconstruction_id)?;
        let mut carried: HashMap<_, &ChecklistItem> = HashMap::new();
        for entry in &previous {
            for item in &entry.items {
                carried.insert(item.carry_key(entry.category.category_type), item);
            }
        }

        let mut checklist: Vec<CategoryWithItems> = generate_checklist(&validated)
            .iter()
            .map(|generated| CategoryWithItems::instantiate(reconstruction_id, generated))
            .collect();

        let mut carried_over = 0u32;
        for entry in &mut checklist {
            let category_type = entry.category.category_type;
            for item in &mut entry.items {
                if let Some(old) = carried.get(&item.carry_key(category_type)) {
                    item.status = old.status;
                    item.file_ref = old.file_ref.clone();
                    item.notes = old.notes.clone();
                    item.updated_at = old.updated_at;
                    carried_over += 1;
                }
            }
        }

        record.state = recompute_checklist(&mut checklist);
        record.occupational_exposures = self.matcher().match_occupational(&validated);
        record.profile = validated;
        record.updated_at = Utc::now();

        self.store
            .replace_checklist(&record, &checklist)
            .inspect_err(|e| self.store_failure("replace_checklist", e))?;

        info!(
            event = Event::ProfileCorrected.as_str(),
            reconstruction_id = %reconstruction_id,
            carried_over,
            documents = record.state.total_documents,
            "profile corrected"
        );

        Ok(InitializeResult {
            reconstruction_id,
            total_documents: record.state.total_documents,
            category_count: checklist.len() as u32,
        })
    }

    fn validate(&self, profile: &ServiceProfile) -> ServiceResult<ValidatedProfile> {
        ProfileValidator::validate(profile).map_err(|e| {
            self.metrics.increment_profiles_rejected();
            warn!(
                event = Event::ProfileRejected.as_str(),
                code = e.code(),
                field = e.field(),
                "profile rejected"
            );
            EngineError::from(e)
        })
    }

    // ========================================================================
    // Item mutations
    // ========================================================================

    /// Change one item's status and recompute its category and the aggregate
    pub fn update_checklist_item(
        &self,
        item_id: Uuid,
        update: ItemUpdate,
    ) -> ServiceResult<ItemUpdateResult> {
        let reconstruction_id = self.store.get_item(&item_id)?.reconstruction_id;
        let lock = self.locks.for_reconstruction(reconstruction_id)?;
        let _guard = acquire(&lock);

        let mut categories = self.store.categories(&reconstruction_id)?;
        let mut items = self.store.items(&reconstruction_id)?;

        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| EngineError::NotFound {
                kind: "item",
                id: item_id.to_string(),
            })?;

        let previous = item.status;
        if !previous.is_nominal_transition(update.status) {
            warn!(
                event = Event::ItemIrregularTransition.as_str(),
                item_id = %item_id,
                from = %previous,
                to = %update.status,
                "item moved off the nominal status path"
            );
        }
        item.status = update.status;
        if update.file_ref.is_some() {
            item.file_ref = update.file_ref;
        }
        if update.notes.is_some() {
            item.notes = update.notes;
        }
        item.updated_at = Utc::now();
        let item = item.clone();

        let category = categories
            .iter_mut()
            .find(|c| c.id == item.category_id)
            .ok_or_else(|| EngineError::NotFound {
                kind: "category",
                id: item.category_id.to_string(),
            })?;
        recompute_category(category, &items);
        let category = category.clone();
        let state = aggregate(&categories, &items);

        self.store
            .commit_mutation(&ChecklistMutation {
                reconstruction_id,
                state: &state,
                categories: std::slice::from_ref(&category),
                items: std::slice::from_ref(&item),
            })
            .inspect_err(|e| self.store_failure("commit_mutation", e))?;
        self.metrics.increment_items_updated();

        info!(
            event = Event::ItemUpdated.as_str(),
            reconstruction_id = %reconstruction_id,
            item_id = %item_id,
            from = %previous,
            to = %item.status,
            category_pct = category.completion_percentage,
            overall_pct = state.completion_percentage,
            lifecycle = %state.lifecycle,
            "checklist item updated"
        );

        Ok(ItemUpdateResult {
            item,
            category,
            state,
        })
    }

    // ========================================================================
    // Stations and deployments
    // ========================================================================

    /// Record a duty station and match it against the reference store
    pub fn add_duty_station(
        &self,
        reconstruction_id: Uuid,
        station: NewAssignment,
    ) -> ServiceResult<AssignmentResult> {
        self.add_assignment(reconstruction_id, AssignmentKind::DutyStation, station)
    }

    /// Record a deployment and match it against the reference store
    pub fn add_deployment(
        &self,
        reconstruction_id: Uuid,
        deployment: NewAssignment,
    ) -> ServiceResult<AssignmentResult> {
        self.add_assignment(reconstruction_id, AssignmentKind::Deployment, deployment)
    }

    fn add_assignment(
        &self,
        reconstruction_id: Uuid,
        kind: AssignmentKind,
        input: NewAssignment,
    ) -> ServiceResult<AssignmentResult> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::InvalidInput(format!("{} name is blank", kind)));
        }
        if !input.period.is_ordered() {
            return Err(EngineError::InvalidInput(format!(
                "{} period ends before it starts",
                kind
            )));
        }
        if let Some(point) = input.location {
            if !point.is_valid() {
                return Err(EngineError::InvalidInput(
                    "location is outside valid coordinate ranges".into(),
                ));
            }
        }

        let lock = self.locks.for_reconstruction(reconstruction_id)?;
        let _guard = acquire(&lock);
        let service_period = self
            .store
            .get_reconstruction(&reconstruction_id)?
            .profile
            .service_period();

        let location = input
            .location
            .or_else(|| self.resolve_address(input.address.as_deref()));

        let matcher = self.matcher();
        let now = Utc::now();
        let mut record = AssignmentRecord {
            id: Uuid::new_v4(),
            reconstruction_id,
            kind,
            name,
            location,
            address: input.address,
            period: input.period,
            exposures: Vec::new(),
            reference_version: matcher.store().info().version.clone(),
            created_at: now,
            updated_at: now,
        };
        record.exposures = self.run_matcher(&matcher, &record, service_period);

        self.store
            .insert_assignment(&record)
            .inspect_err(|e| self.store_failure("insert_assignment", e))?;

        Ok(AssignmentResult {
            assignment_id: record.id,
            hazards_found: record.exposures.len() as u32,
        })
    }

    /// Re-run matching for a station or deployment, replacing its exposures
    pub fn rematch_assignment(&self, assignment_id: Uuid) -> ServiceResult<AssignmentResult> {
        let reconstruction_id = self.store.get_assignment(&assignment_id)?.reconstruction_id;
        let lock = self.locks.for_reconstruction(reconstruction_id)?;
        let _guard = acquire(&lock);

        let mut record = self.store.get_assignment(&assignment_id)?;
        let service_period = self
            .store
            .get_reconstruction(&reconstruction_id)?
            .profile
            .service_period();
        if record.location.is_none() {
            record.location = self.resolve_address(record.address.as_deref());
        }
        let matcher = self.matcher();
        let exposures = self.run_matcher(&matcher, &record, service_period);
        self.store
            .replace_exposures(&assignment_id, &exposures, &matcher.store().info().version)
            .inspect_err(|e| self.store_failure("replace_exposures", e))?;

        Ok(AssignmentResult {
            assignment_id,
            hazards_found: exposures.len() as u32,
        })
    }

    fn run_matcher(
        &self,
        matcher: &HazardMatcher,
        record: &AssignmentRecord,
        service_period: DateRange,
    ) -> Vec<HazardExposure> {
        let exposures = matcher.match_hazards(&record.subject(service_period));
        self.metrics.record_match(exposures.len());
        info!(
            event = Event::HazardsMatched.as_str(),
            reconstruction_id = %record.reconstruction_id,
            assignment_id = %record.id,
            kind = %record.kind,
            name = %record.name,
            geolocated = record.location.is_some(),
            hazards = exposures.len(),
            reference_version = %matcher.store().info().version,
            "hazards matched"
        );
        exposures
    }

    /// Coordinates for an address, or `None` to fall back to name matching
    fn resolve_address(&self, address: Option<&str>) -> Option<GeoPoint> {
        let address = address?.trim();
        if address.is_empty() {
            return None;
        }
        let geocoder = self.geocoder.as_ref()?;
        match geocoder.geocode(address) {
            Ok(point) if point.is_valid() => Some(point),
            Ok(_) => {
                self.geocode_fallback(address, "geocoder returned invalid coordinates");
                None
            }
            Err(e) => {
                self.geocode_fallback(address, &e.to_string());
                None
            }
        }
    }

    fn geocode_fallback(&self, address: &str, reason: &str) {
        self.metrics.increment_geocode_fallbacks();
        warn!(
            event = Event::GeocodeFallback.as_str(),
            address,
            reason,
            "geocoding failed; matching by name only"
        );
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Categories with items, stations and deployments with exposures, and
    /// the aggregate state
    pub fn get_reconstruction(&self, reconstruction_id: Uuid) -> ServiceResult<ReconstructionTree> {
        let reconstruction = self.store.get_reconstruction(&reconstruction_id)?;
        let categories = self.load_checklist(&reconstruction_id)?;
        let (duty_stations, deployments) = self
            .store
            .assignments(&reconstruction_id)?
            .into_iter()
            .partition(|a| a.kind == AssignmentKind::DutyStation);
        let records_requests = self.store.requests(&reconstruction_id)?;

        Ok(ReconstructionTree {
            gap_message: reconstruction.state.gap_message(),
            reconstruction,
            categories,
            duty_stations,
            deployments,
            records_requests,
        })
    }

    pub fn get_statistics(
        &self,
        reconstruction_id: Uuid,
    ) -> ServiceResult<ReconstructionStatistics> {
        let record = self.store.get_reconstruction(&reconstruction_id)?;
        let items = self.store.items(&reconstruction_id)?;
        let assignments = self.store.assignments(&reconstruction_id)?;
        let requests = self.store.requests(&reconstruction_id)?;

        let outstanding = |i: &&ChecklistItem| !i.status.is_complete();
        let critical_missing_count = items
            .iter()
            .filter(outstanding)
            .filter(|i| i.priority == Priority::Critical)
            .count() as u32;
        let required_missing_count = items
            .iter()
            .filter(outstanding)
            .filter(|i| i.required)
            .count() as u32;

        let exposures: Vec<&HazardExposure> =
            assignments.iter().flat_map(|a| a.exposures.iter()).collect();
        let highest_severity = exposures
            .iter()
            .map(|e| e.severity)
            .chain(record.occupational_exposures.iter().map(|o| o.severity))
            .max();

        Ok(ReconstructionStatistics {
            totals: record.state,
            critical_missing_count,
            required_missing_count,
            exposure_count: exposures.len() as u32,
            presumptive_exposure_count: exposures.iter().filter(|e| e.presumptive).count() as u32,
            program_covered_exposure_count: exposures
                .iter()
                .filter(|e| e.program_covered)
                .count() as u32,
            occupational_exposure_count: record.occupational_exposures.len() as u32,
            highest_severity,
            open_request_count: requests.iter().filter(|r| !r.status.is_closed()).count() as u32,
            gap_message: record.state.gap_message(),
            should_escalate_gaps: record.state.should_escalate_gaps(),
        })
    }

    pub fn list_reconstructions(&self) -> ServiceResult<Vec<Uuid>> {
        Ok(self.store.list_reconstructions()?)
    }

    fn load_checklist(&self, reconstruction_id: &Uuid) -> ServiceResult<Vec<CategoryWithItems>> {
        let categories = self.store.categories(reconstruction_id)?;
        let mut by_category: BTreeMap<Uuid, Vec<ChecklistItem>> = BTreeMap::new();
        for item in self.store.items(reconstruction_id)? {
            by_category.entry(item.category_id).or_default().push(item);
        }
        Ok(categories
            .into_iter()
            .map(|category| CategoryWithItems {
                items: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    // ========================================================================
    // Records requests
    // ========================================================================

    /// Generate and persist a records request.
    ///
    /// Listed checklist items that are still missing move to `requested`.
    pub fn request_records(
        &self,
        reconstruction_id: Uuid,
        input: RecordsRequestInput,
    ) -> ServiceResult<RecordsRequest> {
        let lock = self.locks.for_reconstruction(reconstruction_id)?;
        let _guard = acquire(&lock);
        let record = self.store.get_reconstruction(&reconstruction_id)?;
        let veteran = input.veteran.unwrap_or_else(|| veteran_info(&record));
        self.issue_request(&record, input.request_type, input.documents, veteran)
    }

    /// One request per request type covering every outstanding item that a
    /// records custodian must supply. Returns an empty list when nothing is
    /// outstanding.
    pub fn request_missing_records(
        &self,
        reconstruction_id: Uuid,
    ) -> ServiceResult<Vec<RecordsRequest>> {
        let lock = self.locks.for_reconstruction(reconstruction_id)?;
        let _guard = acquire(&lock);
        let record = self.store.get_reconstruction(&reconstruction_id)?;

        let mut groups: BTreeMap<RecordsRequestType, Vec<RequestedDocument>> = BTreeMap::new();
        for entry in self.load_checklist(&reconstruction_id)? {
            for item in entry.items.iter().filter(|i| i.is_requestable()) {
                groups
                    .entry(RecordsRequestType::for_item(entry.category.category_type, item))
                    .or_default()
                    .push(RequestedDocument::from_item(item));
            }
        }

        let mut issued = Vec::with_capacity(groups.len());
        for (request_type, documents) in groups {
            let veteran = veteran_info(&record);
            issued.push(self.issue_request(&record, request_type, documents, veteran)?);
        }
        Ok(issued)
    }

    fn issue_request(
        &self,
        record: &ReconstructionRecord,
        request_type: RecordsRequestType,
        documents: Vec<RequestedDocument>,
        veteran: VeteranInfo,
    ) -> ServiceResult<RecordsRequest> {
        let now = Utc::now();
        let draft = RequestDraft {
            request_id: Uuid::new_v4(),
            request_type,
            documents,
            veteran,
            filed_on: now.date_naive(),
        };
        let artifact = self.generator.generate(&draft).map_err(|e| {
            warn!(
                event = Event::RecordsRequestFailed.as_str(),
                reconstruction_id = %record.id,
                request_type = %request_type,
                code = e.code(),
                error = %e,
                "records request generation failed"
            );
            EngineError::from(e)
        })?;

        // Items named by the request move from missing to requested
        let mut categories = self.store.categories(&record.id)?;
        let mut items = self.store.items(&record.id)?;
        let mut changed_items = Vec::new();
        for doc in &draft.documents {
            let Some(item_id) = doc.item_id else { continue };
            let item = items
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or_else(|| EngineError::NotFound {
                    kind: "item",
                    id: item_id.to_string(),
                })?;
            if item.status == ItemStatus::Missing {
                item.status = ItemStatus::Requested;
                item.updated_at = now;
                changed_items.push(item.clone());
            }
        }
        let state = recompute_all(&mut categories, &items);

        let request = RecordsRequest {
            id: draft.request_id,
            reconstruction_id: record.id,
            request_type,
            documents: draft.documents,
            veteran: draft.veteran,
            form_artifact_ref: artifact.form_artifact_ref,
            expected_response_date: artifact.expected_response_date,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let mutation = ChecklistMutation {
            reconstruction_id: record.id,
            state: &state,
            categories: &categories,
            items: &changed_items,
        };
        self.store
            .insert_request(&request, Some(&mutation))
            .inspect_err(|e| self.store_failure("insert_request", e))?;
        self.metrics.increment_records_requests();

        info!(
            event = Event::RecordsRequested.as_str(),
            reconstruction_id = %record.id,
            request_id = %request.id,
            request_type = %request_type,
            documents = request.documents.len(),
            items_requested = changed_items.len(),
            expected = %request.expected_response_date,
            "records request issued"
        );
        Ok(request)
    }

    /// Re-invoke the generator for a stored request; safe to repeat
    pub fn regenerate_request(&self, request_id: Uuid) -> ServiceResult<RecordsRequest> {
        let mut request = self.store.get_request(&request_id)?;
        let artifact = self.generator.generate(&request.draft())?;
        request.form_artifact_ref = artifact.form_artifact_ref;
        request.expected_response_date = artifact.expected_response_date;
        request.updated_at = Utc::now();
        self.store.update_request(&request)?;

        info!(
            event = Event::RecordsRequestRegenerated.as_str(),
            request_id = %request_id,
            expected = %request.expected_response_date,
            "records request regenerated"
        );
        Ok(request)
    }

    /// Record an out-of-band status change for a request
    pub fn update_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> ServiceResult<RecordsRequest> {
        let mut request = self.store.get_request(&request_id)?;
        let previous = request.status;
        request.status = status;
        request.updated_at = Utc::now();
        self.store.update_request(&request)?;

        info!(
            event = Event::RecordsRequestUpdated.as_str(),
            request_id = %request_id,
            from = %previous,
            to = %status,
            "records request status updated"
        );
        Ok(request)
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    pub fn reference_info(&self) -> DatasetInfo {
        self.reference.current().info().clone()
    }

    /// Load a dataset (file, or the compiled-in one) and swap it in.
    ///
    /// Existing exposures are left as they are; re-match assignments to
    /// apply the new dataset.
    pub fn reload_reference(&self, path: Option<&Path>) -> ServiceResult<DatasetInfo> {
        let store = HazardReferenceStore::new(ReferenceLoader::load(path)?)?;
        let info = store.info().clone();
        let previous = self.reference.replace(store);
        debug!(previous = %previous.checksum, current = %info.checksum, "reference swapped");
        Ok(info)
    }

    fn store_failure(&self, operation: &'static str, err: &crate::store::StoreError) {
        self.metrics.increment_store_failures();
        warn!(
            event = Event::StoreFailure.as_str(),
            operation,
            code = err.code(),
            retryable = err.is_retryable(),
            error = %err,
            "store operation failed"
        );
    }
}

fn recompute_checklist(checklist: &mut [CategoryWithItems]) -> crate::tracker::ReconstructionState {
    let items: Vec<ChecklistItem> = checklist
        .iter()
        .flat_map(|c| c.items.iter().cloned())
        .collect();
    let mut categories: Vec<ChecklistCategory> =
        checklist.iter().map(|c| c.category.clone()).collect();
    let state = recompute_all(&mut categories, &items);
    for (entry, category) in checklist.iter_mut().zip(categories) {
        entry.category = category;
    }
    state
}

fn veteran_info(record: &ReconstructionRecord) -> VeteranInfo {
    VeteranInfo {
        full_name: record.veteran_name.clone(),
        branch: record.profile.branch(),
        service_period: record.profile.service_period(),
    }
}
