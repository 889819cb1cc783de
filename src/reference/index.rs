//! In-memory indexes over the reference dataset
//!
//! Built once when a dataset is loaded, never mutated afterwards.
//!
//! - Spatial: a one-degree bucket grid keyed by (lat, lon) cell. A lookup
//!   visits only the cells that the largest matching radius can reach.
//! - Names: an Aho-Corasick automaton answers "which reference keys occur
//!   inside this name", and a sorted suffix table answers "which reference
//!   keys contain this name". Names shorter than [`MIN_INFIX_MATCH_LEN`]
//!   only hit keys that contain them as whole words, so "k2" finds
//!   "k2 air base" but "cam" does not find "camp lejeune".
//!
//! Both return candidate entry positions in ascending order; final distance
//! and date checks belong to the matcher.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use aho_corasick::{AhoCorasick, MatchKind};

use crate::geo::{GeoPoint, METERS_PER_DEGREE};

use super::errors::{ReferenceError, ReferenceResult};
use super::types::HazardReferenceEntry;

/// Shortest name matched anywhere inside a reference key; shorter names
/// must cover whole words of the key
pub const MIN_INFIX_MATCH_LEN: usize = 4;

/// Normalize a name for matching: lowercase alphanumeric words joined by
/// single spaces. Punctuation and repeated whitespace become one separator.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&word.to_lowercase());
    }
    out
}

type Cell = (i32, i32);

fn wrap_lon_cell(lon: i32) -> i32 {
    (lon + 180).rem_euclid(360) - 180
}

fn cell_of(point: &GeoPoint) -> Cell {
    let lat = (point.latitude.floor() as i32).clamp(-90, 89);
    let lon = wrap_lon_cell(point.longitude.floor() as i32);
    (lat, lon)
}

/// One-degree bucket grid over geospatially matched entries
#[derive(Debug, Default)]
struct SpatialGrid {
    cells: HashMap<Cell, Vec<usize>>,
    max_radius_m: f64,
}

impl SpatialGrid {
    fn insert(&mut self, position: usize, point: GeoPoint, radius_m: f64) {
        self.cells.entry(cell_of(&point)).or_default().push(position);
        if radius_m > self.max_radius_m {
            self.max_radius_m = radius_m;
        }
    }

    fn candidates(&self, point: &GeoPoint) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        if self.cells.is_empty() {
            return out;
        }

        let lat_span = self.max_radius_m / METERS_PER_DEGREE;
        let lat_lo = ((point.latitude - lat_span).floor() as i32).max(-90);
        let lat_hi = ((point.latitude + lat_span).floor() as i32).min(89);

        // Longitude degrees shrink towards the poles; size the span for the
        // highest latitude the band reaches.
        let extreme_lat = (lat_lo as f64).abs().max((lat_hi as f64 + 1.0).abs()).min(89.9);
        let lon_span = lat_span / extreme_lat.to_radians().cos();

        let lon_cells: Vec<i32> = if lon_span >= 180.0 {
            (-180..180).collect()
        } else {
            let lo = (point.longitude - lon_span).floor() as i32;
            let hi = (point.longitude + lon_span).floor() as i32;
            (lo..=hi).map(wrap_lon_cell).collect()
        };

        for lat in lat_lo..=lat_hi {
            for &lon in &lon_cells {
                if let Some(positions) = self.cells.get(&(lat, lon)) {
                    out.extend(positions.iter().copied());
                }
            }
        }
        out
    }
}

/// Bidirectional substring index over normalized name keys
struct NameIndex {
    automaton: Option<AhoCorasick>,
    /// Automaton pattern id -> entry position
    pattern_owner: Vec<usize>,
    /// Every suffix of every key -> entry positions
    suffixes: BTreeMap<String, BTreeSet<usize>>,
    /// Suffixes that start at a word boundary
    word_suffixes: BTreeMap<String, BTreeSet<usize>>,
}

impl NameIndex {
    fn build(keys: Vec<(String, usize)>) -> ReferenceResult<Self> {
        let mut suffixes: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        let mut word_suffixes: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (key, position) in &keys {
            let mut at_word_start = true;
            for (offset, c) in key.char_indices() {
                let suffix = &key[offset..];
                suffixes.entry(suffix.to_string()).or_default().insert(*position);
                if at_word_start {
                    word_suffixes
                        .entry(suffix.to_string())
                        .or_default()
                        .insert(*position);
                }
                at_word_start = c == ' ';
            }
        }

        let automaton = if keys.is_empty() {
            None
        } else {
            let patterns: Vec<&str> = keys.iter().map(|(k, _)| k.as_str()).collect();
            let ac = AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&patterns)
                .map_err(|e| ReferenceError::Malformed {
                    source_name: "<name index>".into(),
                    reason: e.to_string(),
                })?;
            Some(ac)
        };

        Ok(Self {
            automaton,
            pattern_owner: keys.into_iter().map(|(_, p)| p).collect(),
            suffixes,
            word_suffixes,
        })
    }

    /// Entries with a key occurring inside `name`
    fn keys_within(&self, name: &str) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        if let Some(ac) = &self.automaton {
            for m in ac.find_overlapping_iter(name) {
                out.insert(self.pattern_owner[m.pattern().as_usize()]);
            }
        }
        out
    }

    /// Entries with a key that contains `name`
    fn keys_containing(&self, name: &str) -> BTreeSet<usize> {
        let whole_words = name.chars().count() < MIN_INFIX_MATCH_LEN;
        let table = if whole_words {
            &self.word_suffixes
        } else {
            &self.suffixes
        };

        let mut out = BTreeSet::new();
        let range = table.range::<str, _>((Bound::Included(name), Bound::Unbounded));
        for (suffix, positions) in range {
            let Some(rest) = suffix.strip_prefix(name) else {
                break;
            };
            if whole_words && !(rest.is_empty() || rest.starts_with(' ')) {
                continue;
            }
            out.extend(positions.iter().copied());
        }
        out
    }
}

/// Combined spatial and name index
pub struct HazardIndex {
    grid: SpatialGrid,
    names: NameIndex,
}

impl HazardIndex {
    /// Build indexes over `entries`; positions refer to the slice order
    pub fn build(entries: &[HazardReferenceEntry]) -> ReferenceResult<Self> {
        let mut grid = SpatialGrid::default();
        let mut keys = Vec::new();

        for (position, entry) in entries.iter().enumerate() {
            if let Some((point, radius)) = entry.geo_zone() {
                grid.insert(position, point, radius);
            }
            if entry.is_name_matchable() {
                for key in entry.name_keys() {
                    let normalized = normalize_name(key);
                    if !normalized.is_empty() {
                        keys.push((normalized, position));
                    }
                }
            }
        }

        Ok(Self {
            grid,
            names: NameIndex::build(keys)?,
        })
    }

    /// Entry positions whose name keys match `name` in either direction.
    ///
    /// `name` must already be normalized with [`normalize_name`].
    pub fn name_candidates(&self, name: &str) -> BTreeSet<usize> {
        if name.is_empty() {
            return BTreeSet::new();
        }
        let mut out = self.names.keys_within(name);
        out.extend(self.names.keys_containing(name));
        out
    }

    /// Entry positions in grid cells reachable from `point`
    pub fn spatial_candidates(&self, point: &GeoPoint) -> BTreeSet<usize> {
        self.grid.candidates(point)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::period::DateRange;
    use crate::reference::{HazardType, Severity, ZoneRadius};

    fn entry(
        id: &str,
        hazard_type: HazardType,
        name: &str,
        aliases: &[&str],
    ) -> HazardReferenceEntry {
        HazardReferenceEntry {
            id: id.into(),
            hazard_type,
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            location: None,
            radius: None,
            active: DateRange::new(
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            ),
            default_severity: Severity::Medium,
            presumptive: false,
            program_covered: false,
            citation: "test".into(),
        }
    }

    fn radiation(id: &str, lat: f64, lon: f64, meters: f64) -> HazardReferenceEntry {
        let mut e = entry(id, HazardType::RadiationTest, id, &[]);
        e.location = Some(GeoPoint::new(lat, lon));
        e.radius = Some(ZoneRadius::Fixed { meters });
        e
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Balad Air Base, IRAQ "), "balad air base iraq");
        assert_eq!(normalize_name("U-Tapao (RTAFB)"), "u tapao rtafb");
        assert_eq!(normalize_name("---"), "");
    }

    #[test]
    fn test_input_contains_reference_key() {
        let entries = vec![entry("a", HazardType::Installation, "Balad", &[])];
        let index = HazardIndex::build(&entries).unwrap();
        let hits = index.name_candidates(&normalize_name("LSA Balad North"));
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_reference_key_contains_input() {
        let entries = vec![entry(
            "a",
            HazardType::Installation,
            "Karshi-Khanabad",
            &["Camp Stronghold Freedom"],
        )];
        let index = HazardIndex::build(&entries).unwrap();
        assert!(index.name_candidates("stronghold").contains(&0));
        assert!(index.name_candidates("khanabad").contains(&0));
    }

    #[test]
    fn test_short_input_does_not_match_word_fragment() {
        let entries = vec![entry("a", HazardType::Installation, "Camp Lejeune", &[])];
        let index = HazardIndex::build(&entries).unwrap();
        assert!(index.name_candidates("cam").is_empty());
        assert!(index.name_candidates("eun").is_empty());
    }

    #[test]
    fn test_short_input_matches_whole_word() {
        let entries = vec![
            entry("k2", HazardType::Installation, "Karshi-Khanabad", &["K2 Air Base"]),
            entry("pad", HazardType::Installation, "Site Bravo Pad 3", &[]),
        ];
        let index = HazardIndex::build(&entries).unwrap();
        assert!(index.name_candidates("k2").contains(&0));
        assert!(index.name_candidates("air").contains(&0));
        assert!(index.name_candidates("pad").contains(&1));
        assert!(index.name_candidates("3").contains(&1));
        assert!(!index.name_candidates("k").contains(&0));
    }

    #[test]
    fn test_geo_only_entries_not_name_indexed() {
        let entries = vec![radiation("Nevada Test Site", 37.1, -116.0, 50_000.0)];
        let index = HazardIndex::build(&entries).unwrap();
        assert!(index.name_candidates("nevada test site").is_empty());
        assert!(index.spatial_candidates(&GeoPoint::new(37.3, -116.2)).contains(&0));
    }

    #[test]
    fn test_spatial_lookup_skips_distant_cells() {
        let entries = vec![
            radiation("near", 10.5, 20.5, 20_000.0),
            radiation("far", -40.5, -70.5, 20_000.0),
        ];
        let index = HazardIndex::build(&entries).unwrap();
        let hits = index.spatial_candidates(&GeoPoint::new(10.9, 20.9));
        assert!(hits.contains(&0));
        assert!(!hits.contains(&1));
    }

    #[test]
    fn test_spatial_lookup_wraps_antimeridian() {
        let entries = vec![radiation("amchitka", 51.4, 179.9, 30_000.0)];
        let index = HazardIndex::build(&entries).unwrap();
        assert!(index.spatial_candidates(&GeoPoint::new(51.4, -179.9)).contains(&0));
    }

    #[test]
    fn test_empty_index() {
        let index = HazardIndex::build(&[]).unwrap();
        assert!(index.name_candidates("anything").is_empty());
        assert!(index.spatial_candidates(&GeoPoint::new(0.0, 0.0)).is_empty());
    }
}
