//! CLI argument definitions using clap
//!
//! Commands:
//! - vetrecon serve [--config <path>] [--port <port>]
//! - vetrecon checklist [--input <profile.json>]
//! - vetrecon match [--input <subject.json>]
//! - vetrecon reference [--path <dataset.json>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vetrecon - service-record reconstruction and hazard-exposure mapping
#[derive(Parser, Debug)]
#[command(name = "vetrecon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate a checklist for a service profile (JSON, stdin by default)
    Checklist {
        /// Read the profile from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Match one station or deployment against the hazard reference
    Match {
        /// Read the subject from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Load and verify a hazard reference dataset
    Reference {
        /// Dataset file; the configured or compiled-in dataset when omitted
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["vetrecon", "--config", "v.json", "serve", "--port", "9000"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("v.json")));
        assert!(matches!(cli.command, Command::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_parse_checklist_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["vetrecon", "checklist"]).unwrap();
        assert!(matches!(cli.command, Command::Checklist { input: None }));
    }
}
