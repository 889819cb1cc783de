//! Checklist types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pursuit urgency of a category or item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank; lower ranks are pursued first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a document is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    /// The veteran already holds it and uploads it
    SelfUpload,
    /// Must be requested from a records custodian
    ThirdPartyRequest,
    /// Produced by the engine itself
    AutoGenerated,
}

impl AcquisitionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionMethod::SelfUpload => "self_upload",
            AcquisitionMethod::ThirdPartyRequest => "third_party_request",
            AcquisitionMethod::AutoGenerated => "auto_generated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "self_upload" => Some(AcquisitionMethod::SelfUpload),
            "third_party_request" => Some(AcquisitionMethod::ThirdPartyRequest),
            "auto_generated" => Some(AcquisitionMethod::AutoGenerated),
            _ => None,
        }
    }
}

/// Item collection status
///
/// Nominal path: `missing -> {uploaded, requested, processing} -> verified`,
/// with `rejected` reachable from any non-terminal state. Other moves are
/// permitted so that mistakes can be corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Missing,
    Uploaded,
    Requested,
    Processing,
    Verified,
    Rejected,
}

impl ItemStatus {
    /// Counts towards completion
    pub fn is_complete(&self) -> bool {
        matches!(self, ItemStatus::Uploaded | ItemStatus::Verified)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Verified | ItemStatus::Rejected)
    }

    /// Whether `self -> next` lies on the nominal path
    pub fn is_nominal_transition(&self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        if *self == next {
            return true;
        }
        match (self, next) {
            (Missing, Uploaded | Requested | Processing) => true,
            (Requested, Uploaded | Processing) => true,
            (Processing, Uploaded) => true,
            (Uploaded | Requested | Processing, Verified) => true,
            (from, Rejected) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Missing => "missing",
            ItemStatus::Uploaded => "uploaded",
            ItemStatus::Requested => "requested",
            ItemStatus::Processing => "processing",
            ItemStatus::Verified => "verified",
            ItemStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "missing" => Some(ItemStatus::Missing),
            "uploaded" => Some(ItemStatus::Uploaded),
            "requested" => Some(ItemStatus::Requested),
            "processing" => Some(ItemStatus::Processing),
            "verified" => Some(ItemStatus::Verified),
            "rejected" => Some(ItemStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Enlistment,
    InitialTraining,
    OccupationalTraining,
    SpecializedTraining,
    DutyStations,
    Deployments,
    Medical,
    Administrative,
    Separation,
    HazardMap,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Enlistment => "enlistment",
            CategoryType::InitialTraining => "initial_training",
            CategoryType::OccupationalTraining => "occupational_training",
            CategoryType::SpecializedTraining => "specialized_training",
            CategoryType::DutyStations => "duty_stations",
            CategoryType::Deployments => "deployments",
            CategoryType::Medical => "medical",
            CategoryType::Administrative => "administrative",
            CategoryType::Separation => "separation",
            CategoryType::HazardMap => "hazard_map",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "enlistment" => Some(CategoryType::Enlistment),
            "initial_training" => Some(CategoryType::InitialTraining),
            "occupational_training" => Some(CategoryType::OccupationalTraining),
            "specialized_training" => Some(CategoryType::SpecializedTraining),
            "duty_stations" => Some(CategoryType::DutyStations),
            "deployments" => Some(CategoryType::Deployments),
            "medical" => Some(CategoryType::Medical),
            "administrative" => Some(CategoryType::Administrative),
            "separation" => Some(CategoryType::Separation),
            "hazard_map" => Some(CategoryType::HazardMap),
            _ => None,
        }
    }

    /// Emitted for every profile
    pub fn is_fixed(&self) -> bool {
        !matches!(
            self,
            CategoryType::SpecializedTraining
                | CategoryType::DutyStations
                | CategoryType::Deployments
        )
    }
}

/// Semantic document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    Orders,
    Certificate,
    TrainingRecord,
    PersonnelRecord,
    Roster,
    StatusReport,
    HazardMap,
    AfterActionReport,
    HealthAssessment,
    RegistryEntry,
    MedicalRecord,
    Evaluation,
    Award,
    SeparationDocument,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Orders => "orders",
            DocumentType::Certificate => "certificate",
            DocumentType::TrainingRecord => "training_record",
            DocumentType::PersonnelRecord => "personnel_record",
            DocumentType::Roster => "roster",
            DocumentType::StatusReport => "status_report",
            DocumentType::HazardMap => "hazard_map",
            DocumentType::AfterActionReport => "after_action_report",
            DocumentType::HealthAssessment => "health_assessment",
            DocumentType::RegistryEntry => "registry_entry",
            DocumentType::MedicalRecord => "medical_record",
            DocumentType::Evaluation => "evaluation",
            DocumentType::Award => "award",
            DocumentType::SeparationDocument => "separation_document",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contract" => Some(DocumentType::Contract),
            "orders" => Some(DocumentType::Orders),
            "certificate" => Some(DocumentType::Certificate),
            "training_record" => Some(DocumentType::TrainingRecord),
            "personnel_record" => Some(DocumentType::PersonnelRecord),
            "roster" => Some(DocumentType::Roster),
            "status_report" => Some(DocumentType::StatusReport),
            "hazard_map" => Some(DocumentType::HazardMap),
            "after_action_report" => Some(DocumentType::AfterActionReport),
            "health_assessment" => Some(DocumentType::HealthAssessment),
            "registry_entry" => Some(DocumentType::RegistryEntry),
            "medical_record" => Some(DocumentType::MedicalRecord),
            "evaluation" => Some(DocumentType::Evaluation),
            "award" => Some(DocumentType::Award),
            "separation_document" => Some(DocumentType::SeparationDocument),
            _ => None,
        }
    }
}

/// A document the checklist asks for, before it belongs to a reconstruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub document_name: String,
    pub document_type: DocumentType,
    /// Human-readable place the document comes from
    pub source: String,
    pub acquisition_method: AcquisitionMethod,
    pub priority: Priority,
    /// Counts towards readiness weighting; independent of `priority`
    pub required: bool,
    /// Station, deployment, school or code the item belongs to
    pub tag: Option<String>,
}

/// A generated category with its items in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCategory {
    pub category_type: CategoryType,
    pub name: String,
    pub priority: Priority,
    pub position: u32,
    pub items: Vec<ItemTemplate>,
}

/// Checklist category owned by a reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub id: Uuid,
    pub reconstruction_id: Uuid,
    pub category_type: CategoryType,
    pub name: String,
    pub priority: Priority,
    pub position: u32,
    pub total_items: u32,
    pub completed_items: u32,
    pub completion_percentage: u8,
}

/// Checklist item owned by a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub reconstruction_id: Uuid,
    /// Declaration order within the category
    pub position: u32,
    pub document_name: String,
    pub document_type: DocumentType,
    pub source: String,
    pub acquisition_method: AcquisitionMethod,
    pub priority: Priority,
    pub required: bool,
    pub tag: Option<String>,
    pub status: ItemStatus,
    pub file_ref: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ChecklistItem {
    /// Identity that survives checklist regeneration
    pub fn carry_key(&self, category_type: CategoryType) -> (CategoryType, Option<String>, String) {
        (category_type, self.tag.clone(), self.document_name.clone())
    }

    /// Outstanding and obtainable through a records request
    pub fn is_requestable(&self) -> bool {
        self.acquisition_method == AcquisitionMethod::ThirdPartyRequest
            && self.status == ItemStatus::Missing
    }
}

/// A category together with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWithItems {
    pub category: ChecklistCategory,
    pub items: Vec<ChecklistItem>,
}

impl CategoryWithItems {
    /// Give a generated category identities inside `reconstruction_id`.
    ///
    /// Counts start at zero completed; all items begin `missing`.
    pub fn instantiate(reconstruction_id: Uuid, generated: &GeneratedCategory) -> Self {
        let category_id = Uuid::new_v4();
        let now = Utc::now();
        let items: Vec<ChecklistItem> = generated
            .items
            .iter()
            .enumerate()
            .map(|(position, template)| ChecklistItem {
                id: Uuid::new_v4(),
                category_id,
                reconstruction_id,
                position: position as u32,
                document_name: template.document_name.clone(),
                document_type: template.document_type,
                source: template.source.clone(),
                acquisition_method: template.acquisition_method,
                priority: template.priority,
                required: template.required,
                tag: template.tag.clone(),
                status: ItemStatus::Missing,
                file_ref: None,
                notes: None,
                updated_at: now,
            })
            .collect();

        Self {
            category: ChecklistCategory {
                id: category_id,
                reconstruction_id,
                category_type: generated.category_type,
                name: generated.name.clone(),
                priority: generated.priority,
                position: generated.position,
                total_items: items.len() as u32,
                completed_items: 0,
                completion_percentage: 0,
            },
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::Critical.rank() < Priority::High.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_completion_statuses() {
        assert!(ItemStatus::Uploaded.is_complete());
        assert!(ItemStatus::Verified.is_complete());
        assert!(!ItemStatus::Requested.is_complete());
        assert!(!ItemStatus::Processing.is_complete());
        assert!(!ItemStatus::Rejected.is_complete());
    }

    #[test]
    fn test_nominal_transitions() {
        use ItemStatus::*;
        assert!(Missing.is_nominal_transition(Requested));
        assert!(Requested.is_nominal_transition(Verified));
        assert!(Processing.is_nominal_transition(Rejected));
        assert!(!Verified.is_nominal_transition(Missing));
        assert!(!Rejected.is_nominal_transition(Uploaded));
        assert!(!Missing.is_nominal_transition(Verified));
    }

    #[test]
    fn test_status_wire_names() {
        for status in [
            ItemStatus::Missing,
            ItemStatus::Uploaded,
            ItemStatus::Requested,
            ItemStatus::Processing,
            ItemStatus::Verified,
            ItemStatus::Rejected,
        ] {
            assert_eq!(ItemStatus::parse(status.as_str()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
