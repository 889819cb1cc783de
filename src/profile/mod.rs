//! Service profile intake
//!
//! A profile is the snapshot of a veteran's service that every other
//! subsystem derives from. Intake accepts a loosely-typed [`ServiceProfile`]
//! (as submitted over the API) and validation turns it into a
//! [`ValidatedProfile`] whose required fields are guaranteed present.
//!
//! # Rules
//!
//! - Branch and service period are mandatory
//! - The service period must be ordered (start <= end)
//! - Identifiers (occupational codes, deployments, schools) are trimmed and
//!   must not be blank or duplicated
//! - Validation is deterministic and has no side effects

mod errors;
mod types;
mod validator;

pub use errors::{ProfileError, ProfileResult};
pub use types::{Branch, ServiceProfile, ValidatedProfile};
pub use validator::ProfileValidator;
