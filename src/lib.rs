//! vetrecon - service-record reconstruction and hazard-exposure mapping
//!
//! Turns a veteran's service profile into a prioritized document-acquisition
//! checklist, matches duty stations and deployments against a curated
//! hazard reference, and tracks completion up to submission readiness.
//!
//! # Layout
//!
//! - [`profile`] - intake and validation
//! - [`checklist`] - deterministic checklist rules
//! - [`reference`] / [`hazard`] - hazard dataset, indexes and matching
//! - [`tracker`] - completion aggregation and lifecycle
//! - [`records_request`] - outbound records requests
//! - [`store`] - persistence (memory and SQLite)
//! - [`service`] - the external operations
//! - [`http_server`] / [`cli`] - interfaces

pub mod checklist;
pub mod cli;
pub mod geo;
pub mod hazard;
pub mod http_server;
pub mod observability;
pub mod period;
pub mod profile;
pub mod records_request;
pub mod reference;
pub mod service;
pub mod store;
pub mod tracker;
