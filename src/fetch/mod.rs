//! Upstream feed retrieval.
//!
//! One GET with a fixed timeout; a transport failure or timeout aborts the
//! run with no partial output. No retries.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::time::Duration;

use crate::error::AlertError;
use crate::feed::FeedPayload;

pub const FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches and decodes the alert feed payload from `url`.
pub async fn fetch_feed<C: HttpClient>(client: &C, url: &str) -> Result<FeedPayload, AlertError> {
    let url = url
        .parse()
        .map_err(|e| AlertError::UpstreamFetch(format!("invalid feed url: {e}")))?;

    let mut req = reqwest::Request::new(reqwest::Method::GET, url);
    *req.timeout_mut() = Some(FEED_TIMEOUT);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| AlertError::UpstreamFetch(e.to_string()))?;
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| AlertError::UpstreamFetch(e.to_string()))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AlertError::UpstreamFetch(format!("feed decode failed: {e}")))
}
