//! Per-entity alert normalization.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates::{self, DatePeriod};
use crate::feed::{ActivePeriod, FeedEntity};
use crate::timestamp::TimestampValue;

/// Why an entity was excluded from normalization. Not an error: route-less
/// or alert-less entities are silently dropped from the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NoAlert,
    NoInformedEntities,
    NoRoute,
}

/// One flat alert record, attributable to every stop its alert names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertRecord {
    pub alert_type: String,
    pub created_at: Option<TimestampValue>,
    pub updated_at: Option<TimestampValue>,
    pub heading_text: String,
    pub direction_hint: Option<String>,
    pub description_text: String,
    pub route_id: String,
    pub active_period: Vec<ActivePeriod>,
    pub extracted_date_info: DatePeriod,
}

// "uptown"/"downtown" literally, or a trailing "...bound" word. Article
// leads ("the bound train") are rejected after matching; the regex crate
// has no lookaround.
static DIRECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:downtown|uptown)\b|\b(?P<lead>\w+)[ -]?bound\b")
        .expect("direction pattern is valid")
});

/// Extracts a flat [`AlertRecord`] from one feed entity.
///
/// Returns [`Skip`] when the entity carries no alert, its alert names no
/// informed entities, or the first informed entity has no route id (such an
/// alert cannot be attributed to any stop). All other missing fields
/// default to empty rather than failing; the feed is not trusted to be
/// fully populated.
pub fn normalize(entity: &FeedEntity) -> Result<AlertRecord, Skip> {
    let alert = entity.alert.as_ref().ok_or(Skip::NoAlert)?;
    let first = alert
        .informed_entity
        .first()
        .ok_or(Skip::NoInformedEntities)?;

    // Single-route simplification: the first informed entity's route stands
    // in for the whole alert, even when it spans several routes.
    let route_id = first
        .route_id
        .clone()
        .filter(|r| !r.is_empty())
        .ok_or(Skip::NoRoute)?;

    let mercury = alert.mercury_alert.as_ref();
    let period_text = mercury
        .and_then(|m| m.human_readable_active_period.as_ref())
        .and_then(|t| t.first_text())
        .unwrap_or("");

    let heading_text = alert
        .header_text
        .as_ref()
        .and_then(|t| t.first_text())
        .unwrap_or("")
        .to_string();
    let description_text = alert
        .description_text
        .as_ref()
        .and_then(|t| t.first_text())
        .unwrap_or("")
        .to_string();

    Ok(AlertRecord {
        alert_type: mercury
            .and_then(|m| m.alert_type.clone())
            .unwrap_or_default(),
        created_at: mercury.and_then(|m| m.created_at.clone()),
        updated_at: mercury.and_then(|m| m.updated_at.clone()),
        direction_hint: direction_hint(&heading_text),
        extracted_date_info: dates::extract(period_text),
        heading_text,
        description_text,
        route_id,
        active_period: alert.active_period.clone(),
    })
}

/// Scans a heading for a direction token.
pub(crate) fn direction_hint(heading: &str) -> Option<String> {
    for caps in DIRECTION_RE.captures_iter(heading) {
        if let Some(lead) = caps.name("lead") {
            if matches!(
                lead.as_str().to_ascii_lowercase().as_str(),
                "the" | "a" | "an"
            ) {
                continue;
            }
        }
        return caps.get(0).map(|m| m.as_str().to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Alert, InformedEntity, MercuryAlert, OneOrMany, TranslatedText, Translation};

    fn translated(text: &str) -> TranslatedText {
        TranslatedText {
            translation: OneOrMany::Many(vec![Translation {
                text: text.to_string(),
                language: Some("en".to_string()),
            }]),
        }
    }

    fn entity_with_alert(alert: Alert) -> FeedEntity {
        FeedEntity {
            id: Some("lmm:alert:1".to_string()),
            alert: Some(alert),
        }
    }

    fn routed_entity(route_id: &str, heading: &str) -> FeedEntity {
        entity_with_alert(Alert {
            informed_entity: vec![InformedEntity {
                route_id: Some(route_id.to_string()),
                stop_id: Some("101N".to_string()),
            }],
            header_text: Some(translated(heading)),
            ..Default::default()
        })
    }

    #[test]
    fn test_entity_without_alert_is_skipped() {
        let entity = FeedEntity::default();
        assert_eq!(normalize(&entity), Err(Skip::NoAlert));
    }

    #[test]
    fn test_alert_without_informed_entities_is_skipped() {
        let entity = entity_with_alert(Alert::default());
        assert_eq!(normalize(&entity), Err(Skip::NoInformedEntities));
    }

    #[test]
    fn test_route_less_first_informed_entity_is_skipped() {
        let entity = entity_with_alert(Alert {
            informed_entity: vec![InformedEntity {
                route_id: None,
                stop_id: Some("101N".to_string()),
            }],
            ..Default::default()
        });
        assert_eq!(normalize(&entity), Err(Skip::NoRoute));

        let entity = entity_with_alert(Alert {
            informed_entity: vec![InformedEntity {
                route_id: Some(String::new()),
                stop_id: Some("101N".to_string()),
            }],
            ..Default::default()
        });
        assert_eq!(normalize(&entity), Err(Skip::NoRoute));
    }

    #[test]
    fn test_route_comes_from_first_informed_entity() {
        let entity = entity_with_alert(Alert {
            informed_entity: vec![
                InformedEntity {
                    route_id: Some("A".to_string()),
                    stop_id: Some("101N".to_string()),
                },
                InformedEntity {
                    route_id: Some("C".to_string()),
                    stop_id: Some("102N".to_string()),
                },
            ],
            ..Default::default()
        });
        let record = normalize(&entity).unwrap();
        assert_eq!(record.route_id, "A");
    }

    #[test]
    fn test_mercury_fields_extracted() {
        let entity = entity_with_alert(Alert {
            informed_entity: vec![InformedEntity {
                route_id: Some("A".to_string()),
                stop_id: None,
            }],
            mercury_alert: Some(MercuryAlert {
                alert_type: Some("Delays".to_string()),
                created_at: Some(TimestampValue::Epoch(1_700_000_000)),
                updated_at: Some(TimestampValue::Epoch(1_700_000_100)),
                human_readable_active_period: Some(translated("Jun 3 - 7")),
            }),
            ..Default::default()
        });

        let record = normalize(&entity).unwrap();
        assert_eq!(record.alert_type, "Delays");
        assert_eq!(record.created_at, Some(TimestampValue::Epoch(1_700_000_000)));
        assert_eq!(record.extracted_date_info.source_text, "Jun 3 - 7");
        assert!(!record.extracted_date_info.dates.is_empty());
    }

    #[test]
    fn test_missing_mercury_defaults_to_empty() {
        let entity = routed_entity("A", "A trains are delayed");
        let record = normalize(&entity).unwrap();
        assert_eq!(record.alert_type, "");
        assert!(record.created_at.is_none());
        assert!(record.extracted_date_info.dates.is_empty());
        assert_eq!(record.description_text, "");
    }

    #[test]
    fn test_direction_uptown_downtown() {
        assert_eq!(
            direction_hint("A trains are uptown only"),
            Some("uptown".to_string())
        );
        assert_eq!(
            direction_hint("downtown service suspended"),
            Some("downtown".to_string())
        );
        let record = normalize(&routed_entity("A", "A trains are uptown")).unwrap();
        assert_eq!(record.direction_hint, Some("uptown".to_string()));
    }

    #[test]
    fn test_direction_bound_phrases() {
        assert_eq!(
            direction_hint("Manhattan-bound A trains skip stops"),
            Some("Manhattan-bound".to_string())
        );
        assert_eq!(
            direction_hint("southbound trains delayed"),
            Some("southbound".to_string())
        );
    }

    #[test]
    fn test_direction_article_before_bound_rejected() {
        assert_eq!(direction_hint("the bound volume"), None);
        assert_eq!(direction_hint("no direction here"), None);
    }
}
