//! Hazard reference store
//!
//! The immutable, indexed form of a loaded dataset. Matchers hold an
//! `Arc<HazardReferenceStore>`; an explicit reload builds a new store and
//! swaps it into the [`ReferenceHandle`] without disturbing in-flight reads.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::geo::GeoPoint;
use crate::observability::Event;
use crate::profile::Branch;

use super::errors::ReferenceResult;
use super::index::HazardIndex;
use super::loader::{DatasetInfo, LoadedDataset};
use super::types::{HazardReferenceEntry, OccupationalHazardEntry};

/// Indexed, read-only hazard reference data
pub struct HazardReferenceStore {
    info: DatasetInfo,
    entries: Vec<HazardReferenceEntry>,
    occupational: Vec<OccupationalHazardEntry>,
    index: HazardIndex,
}

impl HazardReferenceStore {
    /// Index a loaded dataset
    pub fn new(loaded: LoadedDataset) -> ReferenceResult<Self> {
        let LoadedDataset { dataset, info } = loaded;
        let index = HazardIndex::build(&dataset.entries)?;

        info!(
            event = Event::ReferenceLoaded.as_str(),
            version = %info.version,
            checksum = %info.checksum,
            entries = info.entry_count,
            "hazard reference indexed"
        );

        Ok(Self {
            info,
            entries: dataset.entries,
            occupational: dataset.occupational,
            index,
        })
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// Entries whose name keys match a normalized name, in dataset order
    pub fn name_candidates(&self, normalized_name: &str) -> Vec<&HazardReferenceEntry> {
        self.index
            .name_candidates(normalized_name)
            .into_iter()
            .map(|p| &self.entries[p])
            .collect()
    }

    /// Geospatial entries within their matching radius of `point`, with
    /// distances in meters, in dataset order
    pub fn entries_near(&self, point: &GeoPoint) -> Vec<(&HazardReferenceEntry, f64)> {
        self.index
            .spatial_candidates(point)
            .into_iter()
            .filter_map(|p| {
                let entry = &self.entries[p];
                let (site, radius) = entry.geo_zone()?;
                let distance = point.distance_to(&site);
                (distance <= radius).then_some((entry, distance))
            })
            .collect()
    }

    /// Occupational hazard entries covering `code` in `branch`
    pub fn occupational_for(&self, branch: Branch, code: &str) -> Vec<&OccupationalHazardEntry> {
        self.occupational
            .iter()
            .filter(|e| e.applies_to(branch, code))
            .collect()
    }
}

/// Shared, swappable handle to the current reference store
pub struct ReferenceHandle {
    current: RwLock<Arc<HazardReferenceStore>>,
}

impl ReferenceHandle {
    pub fn new(store: HazardReferenceStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The store in effect right now
    pub fn current(&self) -> Arc<HazardReferenceStore> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the store; returns the previous dataset info
    pub fn replace(&self, store: HazardReferenceStore) -> DatasetInfo {
        let next = Arc::new(store);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::mem::replace(&mut *guard, next);
        info!(
            event = Event::ReferenceReloaded.as_str(),
            previous = %previous.info().version,
            current = %guard.info().version,
            "hazard reference replaced"
        );
        previous.info().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{normalize_name, HazardType, ReferenceLoader};

    fn builtin() -> HazardReferenceStore {
        HazardReferenceStore::new(ReferenceLoader::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_balad_by_name() {
        let store = builtin();
        let hits = store.name_candidates(&normalize_name("Balad"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hazard_type, HazardType::CombustionWaste);
    }

    #[test]
    fn test_nevada_by_distance() {
        let store = builtin();
        let hits = store.entries_near(&GeoPoint::new(37.0956, -115.9000));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.id, "rad-nevada");
        assert!(hits[0].1 < 50_000.0);
    }

    #[test]
    fn test_open_ocean_has_no_hazards() {
        let store = builtin();
        assert!(store.entries_near(&GeoPoint::new(-30.0, -140.0)).is_empty());
    }

    #[test]
    fn test_occupational_lookup() {
        let store = builtin();
        let hits = store.occupational_for(Branch::Navy, "MM2");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].hazard.contains("Asbestos"));
    }

    #[test]
    fn test_handle_replace() {
        let handle = ReferenceHandle::new(builtin());
        let before = handle.current();
        let previous = handle.replace(builtin());
        assert_eq!(previous.version, before.info().version);
        assert!(!Arc::ptr_eq(&before, &handle.current()));
    }
}
