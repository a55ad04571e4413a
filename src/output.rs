//! Output formatting and persistence for the per-stop alert collection.

use anyhow::Result;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::StopAlerts;

/// Logs the collection as pretty-printed JSON.
pub fn print_json(collection: &[StopAlerts]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(collection)?);
    Ok(())
}

/// Writes the collection to a JSON snapshot file, replacing any prior one.
pub fn write_snapshot(path: &str, collection: &[StopAlerts]) -> Result<()> {
    debug!(path, stops = collection.len(), "Writing snapshot");

    let file = File::create(Path::new(path))?;
    serde_json::to_writer_pretty(file, collection)?;

    Ok(())
}
