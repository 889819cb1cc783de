//! Configuration file
//!
//! A single JSON document; every field has a default, so an absent file
//! and `{}` configure the same process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::http_server::HttpServerConfig;
use crate::records_request::DEFAULT_RESPONSE_DAYS;

use super::errors::{CliError, CliResult};

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file; in-memory store when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Hazard reference dataset; compiled-in dataset when absent
    #[serde(default)]
    pub hazard_reference_path: Option<PathBuf>,

    /// Default tracing filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    #[serde(default)]
    pub http: HttpServerConfig,

    /// Days until a records custodian is expected to respond
    #[serde(default = "default_response_days")]
    pub records_response_days: u32,
}

fn default_log_filter() -> String {
    "vetrecon=info,tower_http=info".to_string()
}

fn default_response_days() -> u32 {
    DEFAULT_RESPONSE_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            hazard_reference_path: None,
            log_filter: default_log_filter(),
            log_json: false,
            http: HttpServerConfig::default(),
            records_response_days: default_response_days(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load `path` when given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.records_response_days == 0 {
            return Err(CliError::config_error("records_response_days must be > 0"));
        }

        if EnvFilter::try_new(&self.log_filter).is_err() {
            return Err(CliError::config_error(format!(
                "Invalid log_filter: '{}'",
                self.log_filter
            )));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        if let Some(path) = &self.hazard_reference_path {
            if !path.is_file() {
                return Err(CliError::config_error(format!(
                    "hazard_reference_path does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let file = write_config("{}");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.records_response_days, 120);
    }

    #[test]
    fn test_zero_response_days_rejected() {
        let file = write_config(r#"{"records_response_days": 0}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "VREC_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_missing_reference_file_rejected() {
        let file = write_config(r#"{"hazard_reference_path": "/nonexistent/hazards.json"}"#);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_http_section_parsed() {
        let file = write_config(r#"{"http": {"port": 9100}, "log_json": true}"#);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.http.port, 9100);
        assert!(config.log_json);
    }
}
