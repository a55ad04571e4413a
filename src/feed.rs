//! Serde model of the upstream service-alert feed payload.
//!
//! The feed is the JSON rendering of the MTA subway-alerts GTFS-RT feed.
//! Its shape is inconsistent in practice (translation blocks appear both as
//! lists and as single objects, timestamps as epoch numbers or as
//! already-converted strings), so every field here is defensive: absent or
//! unknown fields deserialize to defaults rather than failing.

use serde::{Deserialize, Serialize};

use crate::timestamp::TimestampValue;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub header: FeedHeader,
    #[serde(default)]
    pub entity: Vec<FeedEntity>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedHeader {
    #[serde(default)]
    pub timestamp: Option<TimestampValue>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Alert {
    #[serde(default)]
    pub informed_entity: Vec<InformedEntity>,
    #[serde(default)]
    pub header_text: Option<TranslatedText>,
    #[serde(default)]
    pub description_text: Option<TranslatedText>,
    #[serde(default)]
    pub active_period: Vec<ActivePeriod>,
    /// Vendor-specific extension block carrying alert metadata.
    #[serde(default, rename = "transit_realtime.mercury_alert")]
    pub mercury_alert: Option<MercuryAlert>,
}

/// A (route, stop) attribution sub-record inside an alert.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InformedEntity {
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub stop_id: Option<String>,
}

/// A start/end window during which an alert is in effect. Endpoints may be
/// epoch numbers or calendar strings left behind by an earlier migration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ActivePeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<TimestampValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<TimestampValue>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MercuryAlert {
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<TimestampValue>,
    #[serde(default)]
    pub updated_at: Option<TimestampValue>,
    #[serde(default)]
    pub human_readable_active_period: Option<TranslatedText>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TranslatedText {
    #[serde(default)]
    pub translation: OneOrMany<Translation>,
}

impl TranslatedText {
    /// Text of the first translation entry, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.translation.first().map(|t| t.text.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Translation {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// The feed serializes `translation` sometimes as a list and sometimes as a
/// bare object. Accept both.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.first(),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}
