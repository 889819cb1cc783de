//! Checklist rule engine
//!
//! Turns a validated service profile into a categorized, prioritized
//! document checklist.
//!
//! # Rules
//!
//! - Seven fixed categories are always emitted
//! - Duty stations are always emitted, sized by the estimated station count
//! - Specialized schools and deployments are emitted only when listed
//! - Categories are ordered by priority, stable on declaration order
//! - Items keep declaration order inside their category

mod rules;
mod types;

pub use rules::{
    deployment_template_len, estimated_station_count, generate_checklist, generate_for_intake,
    station_template_len, YEARS_PER_STATION,
};
pub use types::{
    AcquisitionMethod, CategoryType, CategoryWithItems, ChecklistCategory, ChecklistItem,
    DocumentType, GeneratedCategory, ItemStatus, ItemTemplate, Priority,
};
