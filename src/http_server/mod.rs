//! # HTTP Server Module
//!
//! JSON API over the reconstruction engine.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Engine counters
//! - `/reference` - Loaded hazard dataset provenance and reload
//! - `/reconstructions/*` - Intake, tree, statistics, stations, deployments
//!   and records requests
//! - `/items/*`, `/assignments/*`, `/records-requests/*` - Mutations by id

pub mod config;
pub mod observability_routes;
pub mod reconstruction_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use reconstruction_routes::{reconstruction_routes, ApiState, ErrorResponse};
pub use server::HttpServer;
