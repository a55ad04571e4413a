//! Free-text date extraction for human-readable active-period strings.
//!
//! The feed's `human_readable_active_period` field is prose ("Jun 28 - Jul 2,
//! nights 9:45 PM to 5:00 AM"). Two views are produced: [`extract`] renders
//! every date/time mention for display, and [`extract_ranges`] parses
//! explicit start/end ranges for period bookkeeping. Both recover from
//! unparseable input instead of erroring.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::datesearch::{resolve_month_day, search_dates};

/// Structured result of free-text extraction, kept alongside the alert.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DatePeriod {
    pub source_text: String,
    pub dates: Vec<String>,
    pub times: Vec<String>,
}

/// Explicit textual ranges and single dates, index-aligned: a single date
/// occupies a `start_dates` slot with `None` in `end_dates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRanges {
    pub start_dates: Vec<NaiveDate>,
    pub end_dates: Vec<Option<NaiveDate>>,
}

// Ranged: "Jun 3 - 7" or "Jun 28 - Jul 2". Single: a month-day not part of
// a range or a clock time (the exclusion is checked against the trailing
// context, see SINGLE_REJECT).
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<ranged>[A-Za-z]{3}\s\d*\s?-\s?(?:[A-Za-z]{3}\s)?\d+)|(?P<single>\b[A-Za-z]{3}\s\d+)",
    )
    .expect("range pattern is valid")
});

static SINGLE_REJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d*:|\s*-\s*)").expect("reject pattern is valid"));

static MONTH_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{3}").expect("month token pattern is valid"));

static DAY_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("day token pattern is valid"));

/// Renders every date and time found in `text`.
///
/// Dates render as `"Mon, Jun 3"`, deduplicated in first-occurrence order.
/// A time of exactly midnight is the searcher's fill value for date-only
/// matches and is treated as "no time specified", never rendered.
pub fn extract(text: &str) -> DatePeriod {
    extract_with_reference(text, Local::now().date_naive())
}

pub fn extract_with_reference(text: &str, today: NaiveDate) -> DatePeriod {
    let mut period = DatePeriod {
        source_text: text.to_string(),
        ..Default::default()
    };

    for found in search_dates(text, today) {
        let date = found.at.format("%a, %b %-d").to_string();
        if !period.dates.contains(&date) {
            period.dates.push(date);
        }
        if found.at.time() != NaiveTime::MIN {
            let time = found.at.format("%I:%M %p").to_string();
            if !period.times.contains(&time) {
                period.times.push(time);
            }
        }
    }

    period
}

/// Parses explicit textual ranges ("Jun 28 - Jul 2") and single dates.
///
/// When the end side of a range omits its month, the start month is reused.
/// No matches at all, or any resolution failure, collapses the whole result
/// to `{[today], [None]}`; the caller never sees an error.
pub fn extract_ranges(text: &str) -> DateRanges {
    extract_ranges_with_reference(text, Local::now().date_naive())
}

pub fn extract_ranges_with_reference(text: &str, today: NaiveDate) -> DateRanges {
    match try_extract_ranges(text, today) {
        Some(ranges) if !ranges.start_dates.is_empty() => ranges,
        _ => {
            debug!(text, "no parseable date range, falling back to today");
            DateRanges {
                start_dates: vec![today],
                end_dates: vec![None],
            }
        }
    }
}

fn try_extract_ranges(text: &str, today: NaiveDate) -> Option<DateRanges> {
    let mut out = DateRanges::default();

    for caps in RANGE_RE.captures_iter(text) {
        if let Some(ranged) = caps.name("ranged") {
            let slice = ranged.as_str();
            let months: Vec<&str> = MONTH_TOKEN_RE.find_iter(slice).map(|m| m.as_str()).collect();
            let days: Vec<&str> = DAY_TOKEN_RE.find_iter(slice).map(|m| m.as_str()).collect();

            let mut sides = [today; 2];
            for (i, side) in sides.iter_mut().enumerate() {
                let month = months.get(i).or_else(|| months.first())?;
                let day: u32 = days.get(i)?.parse().ok()?;
                *side = resolve_month_day(month, day, today)?;
            }
            out.start_dates.push(sides[0]);
            out.end_dates.push(Some(sides[1]));
        } else if let Some(single) = caps.name("single") {
            // Emulate the "not a time, not a range" exclusion
            if SINGLE_REJECT.is_match(&text[single.end()..]) {
                continue;
            }
            let (month, day) = single.as_str().split_once(' ')?;
            let day: u32 = day.parse().ok()?;
            out.start_dates.push(resolve_month_day(month, day, today)?);
            out.end_dates.push(None);
        }
    }

    Some(out)
}
