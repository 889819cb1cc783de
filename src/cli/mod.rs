//! Command-line interface
//!
//! - serve: boot the engine and serve the HTTP API
//! - checklist: one-shot checklist generation for a profile
//! - match: one-shot hazard matching for a station or deployment
//! - reference: verify a hazard reference dataset

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    build_service, checklist, load_reference, match_subject, open_store, run, run_command, serve,
    verify_reference, MatchRequest, MatchResponse,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_response};
