//! Request artifact generation
//!
//! Producing a printable form and mailing instructions happens outside this
//! crate. The generator here records a stable artifact reference that the
//! external form service resolves, and computes the expected response date.

use chrono::{Duration, NaiveDate};

use super::errors::{RequestError, RequestResult};
use super::types::{RequestArtifact, RequestDraft};

/// Default custodian response window
pub const DEFAULT_RESPONSE_DAYS: u32 = 120;

/// Produces request artifacts
pub trait RequestGenerator: Send + Sync {
    /// Generate an artifact for `draft`.
    ///
    /// Calling this twice for the same draft must be safe and yield an
    /// equivalent artifact.
    fn generate(&self, draft: &RequestDraft) -> RequestResult<RequestArtifact>;
}

/// Generator that emits a form reference keyed by request id
#[derive(Debug, Clone)]
pub struct FormReferenceGenerator {
    response_days: u32,
}

impl FormReferenceGenerator {
    pub fn new(response_days: u32) -> Self {
        Self { response_days }
    }

    pub fn response_days(&self) -> u32 {
        self.response_days
    }

    /// Expected response date for a request issued on `issued`
    pub fn expected_response(&self, issued: NaiveDate) -> NaiveDate {
        issued + Duration::days(i64::from(self.response_days))
    }
}

impl Default for FormReferenceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_DAYS)
    }
}

impl RequestGenerator for FormReferenceGenerator {
    fn generate(&self, draft: &RequestDraft) -> RequestResult<RequestArtifact> {
        if draft.documents.is_empty() {
            return Err(RequestError::EmptyDocumentList);
        }
        if let Some(doc) = draft
            .documents
            .iter()
            .find(|d| d.document_name.trim().is_empty())
        {
            return Err(RequestError::Invalid(format!(
                "blank document name (item {:?})",
                doc.item_id
            )));
        }

        Ok(RequestArtifact {
            form_artifact_ref: format!(
                "forms/{}/{}",
                draft.request_type.form_code().to_lowercase(),
                draft.request_id
            ),
            expected_response_date: self.expected_response(draft.filed_on),
        })
    }
}
