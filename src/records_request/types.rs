//! Records-request types

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checklist::{CategoryType, ChecklistItem, DocumentType};
use crate::period::DateRange;
use crate::profile::Branch;

/// Kind of outbound records request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordsRequestType {
    /// Standard Form 180 request for the personnel file
    PersonnelFile,
    MedicalRecords,
    UnitRecords,
    Foia,
}

impl RecordsRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordsRequestType::PersonnelFile => "personnel_file",
            RecordsRequestType::MedicalRecords => "medical_records",
            RecordsRequestType::UnitRecords => "unit_records",
            RecordsRequestType::Foia => "foia",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personnel_file" => Some(RecordsRequestType::PersonnelFile),
            "medical_records" => Some(RecordsRequestType::MedicalRecords),
            "unit_records" => Some(RecordsRequestType::UnitRecords),
            "foia" => Some(RecordsRequestType::Foia),
            _ => None,
        }
    }

    /// Form used for this request type
    pub fn form_code(&self) -> &'static str {
        match self {
            RecordsRequestType::PersonnelFile => "SF-180",
            RecordsRequestType::MedicalRecords => "VA-10-5345",
            RecordsRequestType::UnitRecords => "NA-13075",
            RecordsRequestType::Foia => "FOIA",
        }
    }

    /// Request type that obtains an outstanding item
    pub fn for_item(category_type: CategoryType, item: &ChecklistItem) -> Self {
        match (category_type, item.document_type) {
            (CategoryType::Medical, _) | (_, DocumentType::HealthAssessment) => {
                RecordsRequestType::MedicalRecords
            }
            (
                CategoryType::DutyStations | CategoryType::Deployments,
                DocumentType::Roster | DocumentType::StatusReport | DocumentType::AfterActionReport,
            ) => RecordsRequestType::UnitRecords,
            _ => RecordsRequestType::PersonnelFile,
        }
    }
}

impl fmt::Display for RecordsRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of an outbound request, updated out of band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Submitted,
    Acknowledged,
    Fulfilled,
    Denied,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Submitted => "submitted",
            RequestStatus::Acknowledged => "acknowledged",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Denied => "denied",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "submitted" => Some(RequestStatus::Submitted),
            "acknowledged" => Some(RequestStatus::Acknowledged),
            "fulfilled" => Some(RequestStatus::Fulfilled),
            "denied" => Some(RequestStatus::Denied),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Fulfilled | RequestStatus::Denied)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifying details placed on the request form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeteranInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    pub branch: Branch,
    pub service_period: DateRange,
}

/// One document asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedDocument {
    /// Checklist item the document satisfies, when it came from one
    #[serde(default)]
    pub item_id: Option<Uuid>,
    pub document_name: String,
    #[serde(default)]
    pub tag: Option<String>,
}

impl RequestedDocument {
    pub fn from_item(item: &ChecklistItem) -> Self {
        Self {
            item_id: Some(item.id),
            document_name: item.document_name.clone(),
            tag: item.tag.clone(),
        }
    }
}

/// Input handed to a [`RequestGenerator`](super::RequestGenerator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub request_id: Uuid,
    pub request_type: RecordsRequestType,
    pub documents: Vec<RequestedDocument>,
    pub veteran: VeteranInfo,
    /// Day the request was first filed; regeneration keeps it
    pub filed_on: NaiveDate,
}

/// What a generator produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestArtifact {
    pub form_artifact_ref: String,
    pub expected_response_date: NaiveDate,
}

/// A persisted outbound records request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsRequest {
    pub id: Uuid,
    pub reconstruction_id: Uuid,
    pub request_type: RecordsRequestType,
    pub documents: Vec<RequestedDocument>,
    pub veteran: VeteranInfo,
    pub form_artifact_ref: String,
    pub expected_response_date: NaiveDate,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordsRequest {
    pub fn draft(&self) -> RequestDraft {
        RequestDraft {
            request_id: self.id,
            request_type: self.request_type,
            documents: self.documents.clone(),
            veteran: self.veteran.clone(),
            filed_on: self.created_at.date_naive(),
        }
    }
}
