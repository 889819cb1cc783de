//! Service inputs and outputs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checklist::{CategoryWithItems, ChecklistCategory, ChecklistItem, ItemStatus};
use crate::geo::GeoPoint;
use crate::period::DateRange;
use crate::records_request::{RecordsRequest, RecordsRequestType, RequestedDocument, VeteranInfo};
use crate::reference::Severity;
use crate::store::{AssignmentRecord, ReconstructionRecord};
use crate::tracker::ReconstructionState;

/// Result of initializing or correcting a reconstruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeResult {
    pub reconstruction_id: Uuid,
    pub total_documents: u32,
    pub category_count: u32,
}

/// Requested change to one checklist item.
///
/// `file_ref` and `notes` replace the stored values only when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub status: ItemStatus,
    #[serde(default)]
    pub file_ref: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// State after an item mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdateResult {
    pub item: ChecklistItem,
    pub category: ChecklistCategory,
    pub state: ReconstructionState,
}

/// A duty station or deployment to record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Geocoded when `location` is absent and a geocoder is configured
    #[serde(default)]
    pub address: Option<String>,
    pub period: DateRange,
}

/// Result of recording or re-matching an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub assignment_id: Uuid,
    pub hazards_found: u32,
}

/// Full reconstruction tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionTree {
    pub reconstruction: ReconstructionRecord,
    pub gap_message: Option<String>,
    pub categories: Vec<CategoryWithItems>,
    pub duty_stations: Vec<AssignmentRecord>,
    pub deployments: Vec<AssignmentRecord>,
    pub records_requests: Vec<RecordsRequest>,
}

/// Summary counters for one reconstruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStatistics {
    pub totals: ReconstructionState,
    /// Critical-priority items not yet uploaded or verified
    pub critical_missing_count: u32,
    /// Required items not yet uploaded or verified
    pub required_missing_count: u32,
    pub exposure_count: u32,
    pub presumptive_exposure_count: u32,
    pub program_covered_exposure_count: u32,
    pub occupational_exposure_count: u32,
    pub highest_severity: Option<Severity>,
    pub open_request_count: u32,
    pub gap_message: Option<String>,
    pub should_escalate_gaps: bool,
}

/// Explicit records request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsRequestInput {
    pub request_type: RecordsRequestType,
    pub documents: Vec<RequestedDocument>,
    /// Defaults to details from the reconstruction's profile
    #[serde(default)]
    pub veteran: Option<VeteranInfo>,
}
