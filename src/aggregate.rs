//! Per-stop grouping of normalized alerts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::feed::FeedPayload;
use crate::normalize::{AlertRecord, normalize};
use crate::stops::{SENTINEL_STOP, StopDirectory};

/// One stop and the alerts currently attributed to it. This is the
/// canonical output shape: explicit stop+alerts pairs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopAlerts {
    pub stop: String,
    pub alerts: Vec<AlertRecord>,
}

/// Groups every normalized alert by affected stop over the full directory.
///
/// The aggregation is total over the stop universe: every directory stop
/// appears exactly once in the output, with an empty sequence when the feed
/// names no alert for it. Alerts whose stop id is unknown to the directory
/// accumulate under the sentinel key, which is dropped from the emission.
///
/// Ordering: stops that received alerts come first, in order of their first
/// alert; the remaining directory stops follow in file order. Within a
/// stop, alerts keep feed encounter order.
pub fn aggregate(feed: &FeedPayload, directory: &StopDirectory) -> Vec<StopAlerts> {
    let mut sequences: HashMap<String, Vec<AlertRecord>> = directory
        .stop_ids()
        .map(|id| (id.to_string(), Vec::new()))
        .collect();
    sequences.insert(SENTINEL_STOP.to_string(), Vec::new());

    // Stops in order of first attribution, sentinel included while
    // distributing
    let mut alerted: Vec<String> = Vec::new();

    for entity in &feed.entity {
        let Some(alert) = entity.alert.as_ref() else {
            continue;
        };
        let record = match normalize(entity) {
            Ok(record) => record,
            Err(skip) => {
                trace!(entity_id = ?entity.id, reason = ?skip, "entity skipped");
                continue;
            }
        };

        for informed in &alert.informed_entity {
            let Some(stop_id) = informed.stop_id.as_deref().filter(|s| !s.is_empty()) else {
                continue;
            };
            let key = if directory.contains(stop_id) {
                stop_id
            } else {
                SENTINEL_STOP
            };
            if let Some(sequence) = sequences.get_mut(key) {
                sequence.push(record.clone());
                if !alerted.iter().any(|s| s == key) {
                    alerted.push(key.to_string());
                }
            }
        }
    }

    let mut collection = Vec::with_capacity(directory.len());
    for stop in &alerted {
        if stop == SENTINEL_STOP {
            continue;
        }
        if let Some(alerts) = sequences.remove(stop) {
            collection.push(StopAlerts {
                stop: stop.clone(),
                alerts,
            });
        }
    }
    for stop in directory.stop_ids() {
        if let Some(alerts) = sequences.remove(stop) {
            collection.push(StopAlerts {
                stop: stop.to_string(),
                alerts,
            });
        }
    }

    debug!(
        stops = collection.len(),
        alerted = alerted.len(),
        "Feed aggregated"
    );
    collection
}
