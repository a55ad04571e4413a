//! Static stop reference table.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::AlertError;

/// Placeholder key for alerts with no resolvable stop attribution.
pub const SENTINEL_STOP: &str = "None";

/// One row of the `stops.txt`-style reference table.
#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: String,
    stop_name: String,
}

/// Mapping from platform-level stop id to its published display names.
///
/// Loaded once at startup and immutable afterwards. Only ids whose final
/// character is a digit are kept (the platform-direction suffix convention,
/// e.g. `101N`); parent/station-only rows are excluded. Iteration order is
/// file order.
#[derive(Debug, Default)]
pub struct StopDirectory {
    names: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl StopDirectory {
    pub fn load(path: &Path) -> Result<Self, AlertError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| AlertError::DataLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut directory = StopDirectory::default();
        for row in reader.deserialize::<StopRow>() {
            let row = row.map_err(|e| AlertError::DataLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

            if row.stop_id.is_empty() || !row.stop_id.ends_with(|c: char| c.is_ascii_digit()) {
                continue;
            }

            match directory.names.entry(row.stop_id) {
                // A stop id may legitimately carry several published names.
                Entry::Occupied(mut entry) => entry.get_mut().push(row.stop_name),
                Entry::Vacant(entry) => {
                    directory.order.push(entry.key().clone());
                    entry.insert(vec![row.stop_name]);
                }
            }
        }

        debug!(stops = directory.order.len(), path = %path.display(), "Stop directory loaded");
        Ok(directory)
    }

    /// First recorded display name for a stop. The sentinel id maps to the
    /// literal `"None"`.
    pub fn display_name(&self, stop_id: &str) -> Result<&str, AlertError> {
        if stop_id == SENTINEL_STOP {
            return Ok(SENTINEL_STOP);
        }
        self.names
            .get(stop_id)
            .and_then(|names| names.first())
            .map(String::as_str)
            .ok_or_else(|| AlertError::StopNotFound(stop_id.to_string()))
    }

    pub fn contains(&self, stop_id: &str) -> bool {
        self.names.contains_key(stop_id)
    }

    /// Stop ids in original file order.
    pub fn stop_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
