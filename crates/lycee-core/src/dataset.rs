//! Dataset store.
//!
//! Immutable, process-lifetime view of the institution fixtures. Two files are
//! read once at startup from the data directory:
//!
//! ```text
//! data/
//! ├── markers.json   # flat list, one marker per institution (map view)
//! └── records.json   # object keyed by institution id (full records)
//! ```
//!
//! The generator's legacy file names (`lycees_list.json`, `lycees_data.json`)
//! are accepted when the new ones are absent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{InstitutionMarker, InstitutionRecord};

/// Marker list file name
pub const MARKERS_FILE: &str = "markers.json";
/// Keyed record file name
pub const RECORDS_FILE: &str = "records.json";

const LEGACY_MARKERS_FILE: &str = "lycees_list.json";
const LEGACY_RECORDS_FILE: &str = "lycees_data.json";

/// Read-only institution dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    markers: Vec<InstitutionMarker>,
    records: BTreeMap<String, InstitutionRecord>,
}

impl DatasetStore {
    /// Load both fixtures from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let markers_path = resolve(dir, MARKERS_FILE, LEGACY_MARKERS_FILE)?;
        let records_path = resolve(dir, RECORDS_FILE, LEGACY_RECORDS_FILE)?;

        let markers: Vec<InstitutionMarker> = read_json(&markers_path)?;
        let records: BTreeMap<String, InstitutionRecord> = read_json(&records_path)?;

        let store = Self::from_parts(markers, records);
        info!(
            dir = %dir.display(),
            institutions = store.len(),
            markers = store.markers.len(),
            "Dataset loaded"
        );
        Ok(store)
    }

    /// Build a store from already-parsed fixtures.
    ///
    /// Series are normalized: sorted by year, baselines cleared on observed
    /// points, transient scenario values dropped. Marker enrollment is taken
    /// from the latest observed point of the matching record.
    pub fn from_parts(
        mut markers: Vec<InstitutionMarker>,
        records: BTreeMap<String, InstitutionRecord>,
    ) -> Self {
        let records: BTreeMap<String, InstitutionRecord> = records
            .into_iter()
            .map(|(key, mut record)| {
                if record.institution.id != key {
                    warn!(
                        key = %key,
                        id = %record.institution.id,
                        "Record id differs from its key, using the key"
                    );
                    record.institution.id = key.clone();
                }
                normalize(&mut record);
                (key, record)
            })
            .collect();

        for marker in &mut markers {
            match records.get(&marker.id) {
                Some(record) => {
                    if let Some(actual) = record.latest_actual() {
                        marker.current_enrollment = actual;
                    }
                }
                None => warn!(id = %marker.id, "Marker has no matching record"),
            }
        }

        for id in records.keys() {
            if !markers.iter().any(|m| &m.id == id) {
                debug!(id = %id, "Record has no map marker");
            }
        }

        Self { markers, records }
    }

    /// Full record of an institution, `None` for an unknown id.
    pub fn get_institution(&self, id: &str) -> Option<&InstitutionRecord> {
        self.records.get(id)
    }

    /// Map markers, in fixture order.
    pub fn list_institutions(&self) -> &[InstitutionMarker] {
        &self.markers
    }

    /// Other institutions sharing the division of `record`, ordered by id.
    pub fn peers_of<'a>(
        &'a self,
        record: &'a InstitutionRecord,
    ) -> impl Iterator<Item = &'a InstitutionRecord> + 'a {
        self.records.values().filter(move |other| {
            other.institution.division_code == record.institution.division_code
                && other.id() != record.id()
        })
    }

    /// Number of full records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn resolve(dir: &Path, name: &str, legacy: &str) -> Result<PathBuf> {
    let primary = dir.join(name);
    if primary.exists() {
        return Ok(primary);
    }
    let fallback = dir.join(legacy);
    if fallback.exists() {
        debug!(path = %fallback.display(), "Using legacy fixture name");
        return Ok(fallback);
    }
    Err(Error::Dataset(format!(
        "{} not found in {}",
        name,
        dir.display()
    )))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Dataset(format!("{}: {}", path.display(), e)))
}

fn normalize(record: &mut InstitutionRecord) {
    record.series.sort_by_key(|p| p.year);
    for point in &mut record.series {
        if point.actual.is_some() {
            point.baseline = None;
        }
        point.scenario = None;
    }
}
