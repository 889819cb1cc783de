//! Geocoding collaborator
//!
//! Turning a free-text address into coordinates happens outside the engine.
//! A failed lookup never fails the calling operation: the assignment is
//! matched by name only.

use std::collections::HashMap;

use thiserror::Error;

use crate::geo::GeoPoint;
use crate::reference::normalize_name;

/// Geocoding failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("No coordinates for address: {0}")]
    NoMatch(String),

    #[error("Geocoder unavailable: {0}")]
    Unavailable(String),
}

/// Resolves addresses to coordinates
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

/// Geocoder backed by a fixed address table
#[derive(Debug, Clone, Default)]
pub struct TableGeocoder {
    entries: HashMap<String, GeoPoint>,
}

impl TableGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, point: GeoPoint) -> Self {
        self.entries.insert(normalize_name(address), point);
        self
    }
}

impl Geocoder for TableGeocoder {
    fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        self.entries
            .get(&normalize_name(address))
            .copied()
            .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))
    }
}
