//! Conversion between Unix epoch timestamps and display-date strings.
//!
//! Feed timestamps arrive as epoch seconds, but persisted snapshots may
//! already carry converted `dd/mm/yyyy` strings from an earlier migration
//! run. [`TimestampValue`] models that union and the conversions here are
//! idempotent over it.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Values below this are not treated as epoch seconds (anything pre-2001
/// cannot be a live feed timestamp).
pub const EPOCH_FLOOR: i64 = 1_000_000_000;

/// Either a raw epoch-seconds number or an already-converted calendar string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TimestampValue {
    Epoch(i64),
    Text(String),
}

/// Converts a plausible epoch value to its `dd/mm/yyyy` local rendering.
///
/// Values at or below [`EPOCH_FLOOR`], out-of-range epochs, and strings pass
/// through unchanged, which makes repeated application a no-op.
pub fn to_display_date(value: &TimestampValue) -> TimestampValue {
    match value {
        TimestampValue::Epoch(ts) if *ts > EPOCH_FLOOR => match Local.timestamp_opt(*ts, 0) {
            chrono::LocalResult::Single(dt) => TimestampValue::Text(dt.format("%d/%m/%Y").to_string()),
            _ => value.clone(),
        },
        other => other.clone(),
    }
}

/// Interprets an epoch value as a local datetime. Strings are assumed to be
/// calendar-shaped already and yield `None`.
pub fn to_datetime(value: &TimestampValue) -> Option<DateTime<Local>> {
    match value {
        TimestampValue::Epoch(ts) => Local.timestamp_opt(*ts, 0).single(),
        TimestampValue::Text(_) => None,
    }
}

/// A string with exactly two `/` separators is recognized as an
/// already-converted display date.
pub fn is_display_date(text: &str) -> bool {
    text.matches('/').count() == 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_floor_passes_through() {
        let value = TimestampValue::Epoch(999_999_999);
        assert_eq!(to_display_date(&value), value);
    }

    #[test]
    fn test_epoch_converts_to_two_slash_string() {
        let converted = to_display_date(&TimestampValue::Epoch(1_700_000_000));
        match converted {
            TimestampValue::Text(s) => assert_eq!(s.matches('/').count(), 2),
            TimestampValue::Epoch(_) => panic!("expected a converted string"),
        }
    }

    #[test]
    fn test_to_display_date_is_idempotent() {
        for value in [
            TimestampValue::Epoch(1_700_000_000),
            TimestampValue::Epoch(999_999_999),
            TimestampValue::Text("17/11/2023".into()),
            TimestampValue::Text("not a date".into()),
        ] {
            let once = to_display_date(&value);
            let twice = to_display_date(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_to_datetime_on_text_is_none() {
        assert!(to_datetime(&TimestampValue::Text("17/11/2023".into())).is_none());
        assert!(to_datetime(&TimestampValue::Epoch(1_700_000_000)).is_some());
    }

    #[test]
    fn test_is_display_date() {
        assert!(is_display_date("17/11/2023"));
        assert!(!is_display_date("2023-11-17"));
        assert!(!is_display_date("17/11"));
    }
}
