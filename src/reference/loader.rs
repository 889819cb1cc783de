//! Reference dataset loading
//!
//! A dataset is one JSON document. Loading computes a CRC32 over the raw
//! bytes so that operators can tell which revision a running process holds,
//! then parses and structurally validates every entry. A dataset that fails
//! validation is never partially loaded.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ReferenceError, ReferenceResult};
use super::types::HazardDataset;

/// Curated dataset compiled into the binary
const BUILTIN_DATASET: &str = include_str!("../../data/hazard_reference.json");

/// Label used as the source of the compiled-in dataset
pub const BUILTIN_SOURCE: &str = "<builtin>";

/// Provenance of a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub version: String,
    /// CRC32 of the source bytes, lowercase hex
    pub checksum: String,
    pub source: String,
    pub entry_count: usize,
    pub occupational_count: usize,
}

/// A validated dataset together with its provenance
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: HazardDataset,
    pub info: DatasetInfo,
}

/// Loads hazard reference datasets
pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Load the compiled-in dataset
    pub fn builtin() -> ReferenceResult<LoadedDataset> {
        Self::from_bytes(BUILTIN_SOURCE, BUILTIN_DATASET.as_bytes())
    }

    /// Load a dataset file from disk
    pub fn from_path(path: &Path) -> ReferenceResult<LoadedDataset> {
        let bytes = fs::read(path).map_err(|e| ReferenceError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&path.display().to_string(), &bytes)
    }

    /// Parse and validate dataset bytes
    pub fn from_bytes(source: &str, bytes: &[u8]) -> ReferenceResult<LoadedDataset> {
        let checksum = format!("{:08x}", crc32fast::hash(bytes));

        let dataset: HazardDataset =
            serde_json::from_slice(bytes).map_err(|e| ReferenceError::Malformed {
                source_name: source.to_string(),
                reason: format!("Invalid JSON: {}", e),
            })?;

        dataset.validate()?;

        let info = DatasetInfo {
            version: dataset.version.clone(),
            checksum,
            source: source.to_string(),
            entry_count: dataset.entries.len(),
            occupational_count: dataset.occupational.len(),
        };

        Ok(LoadedDataset { dataset, info })
    }

    /// Load from `path` when given, otherwise the compiled-in dataset
    pub fn load(path: Option<&Path>) -> ReferenceResult<LoadedDataset> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }
}
