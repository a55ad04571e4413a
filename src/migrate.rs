//! In-place timestamp migration for persisted feed snapshots.
//!
//! Rewrites a JSON snapshot file, converting epoch timestamps to display
//! dates in `header.timestamp`, every entity's `active_period` endpoints,
//! and the mercury-alert `created_at`/`updated_at` fields. Works on
//! [`serde_json::Value`] so any structure the data model does not know
//! about survives the rewrite untouched. Safe to run repeatedly.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::AlertError;
use crate::timestamp::{self, TimestampValue};

pub fn migrate_snapshot(path: &Path) -> Result<(), AlertError> {
    let snapshot_err = |reason: String| AlertError::Snapshot {
        path: path.to_path_buf(),
        reason,
    };

    let raw = fs::read_to_string(path).map_err(|e| snapshot_err(e.to_string()))?;
    let mut data: Value = serde_json::from_str(&raw).map_err(|e| snapshot_err(e.to_string()))?;

    rewrite_timestamps(&mut data);

    let out = serde_json::to_string_pretty(&data).map_err(|e| snapshot_err(e.to_string()))?;
    fs::write(path, out).map_err(|e| snapshot_err(e.to_string()))?;

    info!(path = %path.display(), "Snapshot timestamps migrated");
    Ok(())
}

/// Applies the timestamp rewrite to an in-memory snapshot.
pub fn rewrite_timestamps(data: &mut Value) {
    if let Some(ts) = data.get_mut("header").and_then(|h| h.get_mut("timestamp")) {
        // A two-slash string was converted by an earlier run
        let already_converted = ts
            .as_str()
            .map(timestamp::is_display_date)
            .unwrap_or(false);
        if !already_converted {
            *ts = convert_value(ts);
        }
    }

    if let Some(entities) = data.get_mut("entity").and_then(Value::as_array_mut) {
        for entity in entities {
            rewrite_entity(entity);
        }
    }
}

fn rewrite_entity(entity: &mut Value) {
    let Some(alert) = entity.get_mut("alert") else {
        return;
    };

    if let Some(periods) = alert.get_mut("active_period").and_then(Value::as_array_mut) {
        for period in periods {
            for key in ["start", "end"] {
                if let Some(endpoint) = period.get_mut(key) {
                    if endpoint.is_number() {
                        *endpoint = convert_value(endpoint);
                    }
                }
            }
        }
    }

    if let Some(mercury) = alert.get_mut("transit_realtime.mercury_alert") {
        for key in ["created_at", "updated_at"] {
            if let Some(field) = mercury.get_mut(key) {
                *field = convert_value(field);
            }
        }
    }
}

fn convert_value(value: &Value) -> Value {
    let epoch = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64));
    match epoch {
        Some(ts) => match timestamp::to_display_date(&TimestampValue::Epoch(ts)) {
            TimestampValue::Text(s) => Value::String(s),
            TimestampValue::Epoch(_) => value.clone(),
        },
        None => value.clone(),
    }
}
