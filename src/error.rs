use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the alert pipeline.
///
/// Date-extraction problems are not represented here: they are recovered
/// locally inside the extractor and never reach a caller.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("could not load stop table {path:?}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    #[error("upstream feed fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("no stop {0:?} in the directory")]
    StopNotFound(String),

    #[error("snapshot {path:?}: {reason}")]
    Snapshot { path: PathBuf, reason: String },
}
