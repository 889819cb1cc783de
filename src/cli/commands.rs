//! CLI command implementations
//!
//! `serve` boots the full engine behind the HTTP API. The other commands
//! are one-shot: read one JSON document, print one JSON response, exit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checklist::{generate_checklist, GeneratedCategory};
use crate::geo::GeoPoint;
use crate::hazard::{HazardExposure, HazardMatcher, MatchSubject, OccupationalExposure};
use crate::http_server::{ApiState, HttpServer};
use crate::observability::{init_tracing, Event, MetricsRegistry};
use crate::period::DateRange;
use crate::profile::{ProfileValidator, ServiceProfile};
use crate::records_request::FormReferenceGenerator;
use crate::reference::{DatasetInfo, HazardReferenceStore, ReferenceHandle, ReferenceLoader};
use crate::service::ReconstructionService;
use crate::store::{InMemoryStore, ReconstructionStore, SqliteStore};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.log_filter, config.log_json);
    info!(
        event = Event::ConfigLoaded.as_str(),
        path = ?cli.config,
        "configuration loaded"
    );

    let result = run_command(cli.command, &config);
    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Serve { port } => serve(config, port),
        Command::Checklist { input } => {
            let profile: ServiceProfile = read_input(input.as_deref())?;
            write_response(&checklist(&profile)?)
        }
        Command::Match { input } => {
            let request: MatchRequest = read_input(input.as_deref())?;
            write_response(&match_subject(config, &request)?)
        }
        Command::Reference { path } => {
            let path = path.or_else(|| config.hazard_reference_path.clone());
            write_response(&verify_reference(path.as_deref())?)
        }
    }
}

/// Open the configured store: SQLite when a path is set, otherwise memory
pub fn open_store(config: &Config) -> CliResult<Arc<dyn ReconstructionStore>> {
    Ok(match &config.database_path {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(InMemoryStore::new()),
    })
}

/// Load the configured hazard reference into a shared handle
pub fn load_reference(config: &Config) -> CliResult<ReferenceHandle> {
    let loaded = ReferenceLoader::load(config.hazard_reference_path.as_deref())?;
    Ok(ReferenceHandle::new(HazardReferenceStore::new(loaded)?))
}

/// Build the engine from configuration
pub fn build_service(config: &Config) -> CliResult<ReconstructionService> {
    Ok(ReconstructionService::new(
        open_store(config)?,
        Arc::new(load_reference(config)?),
        Arc::new(FormReferenceGenerator::new(config.records_response_days)),
    )
    .with_metrics(Arc::new(MetricsRegistry::new())))
}

/// Boot the engine and serve the HTTP API until the process exits
pub fn serve(config: &Config, port: Option<u16>) -> CliResult<()> {
    info!(event = Event::BootStart.as_str(), "booting");

    let service = build_service(config)?;
    let reference = service.reference_info();
    let state = Arc::new(ApiState::new(
        Arc::new(service),
        config.hazard_reference_path.clone(),
    ));

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::new(http_config, state);

    info!(
        event = Event::BootComplete.as_str(),
        reference_version = %reference.version,
        reference_checksum = %reference.checksum,
        addr = %server.socket_addr(),
        persistent = config.database_path.is_some(),
        "boot complete"
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate a profile and generate its checklist without persisting it
pub fn checklist(profile: &ServiceProfile) -> CliResult<Vec<GeneratedCategory>> {
    let validated = ProfileValidator::validate(profile)?;
    Ok(generate_checklist(&validated))
}

/// Input for the `match` command
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub period: DateRange,
    /// Also report occupational exposures for this profile
    #[serde(default)]
    pub profile: Option<ServiceProfile>,
}

/// Output of the `match` command
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub reference: DatasetInfo,
    pub exposures: Vec<HazardExposure>,
    pub occupational: Vec<OccupationalExposure>,
}

/// Match one subject against the configured reference dataset
pub fn match_subject(config: &Config, request: &MatchRequest) -> CliResult<MatchResponse> {
    if !request.period.is_ordered() {
        return Err(CliError::invalid_input("period ends before it starts"));
    }

    let handle = load_reference(config)?;
    let matcher = HazardMatcher::new(handle.current());
    let mut subject = MatchSubject::new(request.name.clone(), request.location, request.period);

    let occupational = match &request.profile {
        Some(profile) => {
            let validated = ProfileValidator::validate(profile)?;
            subject = subject.with_service_period(validated.service_period());
            matcher.match_occupational(&validated)
        }
        None => Vec::new(),
    };

    Ok(MatchResponse {
        reference: matcher.store().info().clone(),
        exposures: matcher.match_hazards(&subject),
        occupational,
    })
}

/// Load a dataset and report its provenance
pub fn verify_reference(path: Option<&std::path::Path>) -> CliResult<DatasetInfo> {
    let loaded = ReferenceLoader::load(path)?;
    let store = HazardReferenceStore::new(loaded)?;
    Ok(store.info().clone())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::profile::Branch;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_checklist_rejects_missing_branch() {
        let profile = ServiceProfile {
            service_period: Some(DateRange::new(date(2000, 1, 1), date(2004, 1, 1))),
            ..Default::default()
        };
        let err = checklist(&profile).unwrap_err();
        assert_eq!(err.code_str(), "VREC_CLI_INVALID_INPUT");
    }

    #[test]
    fn test_match_with_occupational_profile() {
        let request = MatchRequest {
            name: "Camp Lejeune".into(),
            location: None,
            period: DateRange::new(date(1980, 1, 1), date(1981, 1, 1)),
            profile: Some(ServiceProfile {
                branch: Some(Branch::MarineCorps),
                service_period: Some(DateRange::new(date(1979, 6, 1), date(1983, 6, 1))),
                primary_occupation: Some("0311".into()),
                ..Default::default()
            }),
        };
        let response = match_subject(&Config::default(), &request).unwrap();
        assert!(response
            .exposures
            .iter()
            .any(|e| e.reference_id == "cwater-lejeune"));
        assert_eq!(response.occupational.len(), 1);
    }

    #[test]
    fn test_match_profile_service_period_opens_defoliant_era() {
        let mut request = MatchRequest {
            name: "Guam".into(),
            location: None,
            period: DateRange::new(date(1977, 1, 1), date(1977, 12, 31)),
            profile: None,
        };
        let without = match_subject(&Config::default(), &request).unwrap();
        assert!(without.exposures.iter().all(|e| e.reference_id != "def-guam"));

        request.profile = Some(ServiceProfile {
            branch: Some(Branch::AirForce),
            service_period: Some(DateRange::new(date(1971, 1, 1), date(1979, 1, 1))),
            ..Default::default()
        });
        let with = match_subject(&Config::default(), &request).unwrap();
        assert!(with.exposures.iter().any(|e| e.reference_id == "def-guam"));
    }

    #[test]
    fn test_verify_builtin_reference() {
        let info = verify_reference(None).unwrap();
        assert!(info.entry_count > 0);
    }

    #[test]
    fn test_build_service_in_memory() {
        let service = build_service(&Config::default()).unwrap();
        assert!(service.list_reconstructions().unwrap().is_empty());
    }
}
