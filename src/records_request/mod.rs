//! Records-request collaborator
//!
//! Builds outbound requests for documents that must come from a records
//! custodian. Artifact generation sits behind [`RequestGenerator`] so the
//! form service can be swapped; regeneration reuses the stored request id
//! and is safe to repeat.

mod errors;
mod generator;
mod types;

pub use errors::{RequestError, RequestResult};
pub use generator::{FormReferenceGenerator, RequestGenerator, DEFAULT_RESPONSE_DAYS};
pub use types::{
    RecordsRequest, RecordsRequestType, RequestArtifact, RequestDraft, RequestStatus,
    RequestedDocument, VeteranInfo,
};
