//! Natural-language date/time search over free text.
//!
//! This is the capability boundary the free-text extractor depends on: scan
//! an arbitrary human-readable string for month-name dates ("Jun 3",
//! "June 3"), clock times ("12:15 AM", "9 PM", "21:30"), and combined
//! tokens ("Mon, Jun 3 at 5:30 PM"), resolving each against a reference
//! date. Years are inferred from the reference date; a date-only match
//! resolves to midnight, which is the documented fill value for "no time
//! specified".

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*,?\s+)?   # optional weekday prefix
        (?P<month>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|
            aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
        \.?\s+(?P<day>\d{1,2})\b",
    )
    .expect("date pattern is valid")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<h>\d{1,2}):(?P<m>\d{2})\s*(?P<mer>[ap])\.?m\.?\b|\b(?P<h2>\d{1,2})\s*(?P<mer2>[ap])\.?m\.?\b|\b(?P<h3>\d{1,2}):(?P<m3>\d{2})\b",
    )
    .expect("time pattern is valid")
});

// Filler allowed between a date and a clock time that belongs to it.
static GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"(?i)^[\s,]*(?:at|from|until|to)?\s*$").expect("gap pattern is valid")
    });

/// One calendar match found in free text.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundDate {
    /// The matched slice of the input, for diagnostics.
    pub matched: String,
    pub at: NaiveDateTime,
}

/// Resolves a three-letter (or longer) month token plus a day-of-month
/// against the reference date's year.
pub fn resolve_month_day(month_token: &str, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let month = month_number(month_token)?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

/// Finds every date and time mention in `text`, in encounter order.
///
/// A clock time adjacent to a preceding date (separated only by filler such
/// as ", " or " at ") is attached to that date; a standalone time resolves
/// on `today`. A date with no attached time resolves at midnight.
pub fn search_dates(text: &str, today: NaiveDate) -> Vec<FoundDate> {
    struct DateHit {
        start: usize,
        end: usize,
        date: NaiveDate,
    }
    struct TimeHit {
        start: usize,
        end: usize,
        time: NaiveTime,
    }

    let mut date_hits: Vec<DateHit> = Vec::new();
    for caps in DATE_RE.captures_iter(text) {
        let whole = caps.get(0).expect("match has a whole group");
        let month = &caps["month"];
        let day: u32 = match caps["day"].parse() {
            Ok(d) => d,
            Err(_) => continue,
        };
        // Out-of-range days (e.g. "Feb 31") are not dates
        if let Some(date) = resolve_month_day(month, day, today) {
            date_hits.push(DateHit {
                start: whole.start(),
                end: whole.end(),
                date,
            });
        }
    }

    let mut time_hits: Vec<TimeHit> = Vec::new();
    for caps in TIME_RE.captures_iter(text) {
        let whole = caps.get(0).expect("match has a whole group");
        let parsed = if caps.name("h").is_some() {
            clock_time(&caps["h"], Some(&caps["m"]), Some(&caps["mer"]))
        } else if caps.name("h2").is_some() {
            clock_time(&caps["h2"], None, Some(&caps["mer2"]))
        } else {
            clock_time(&caps["h3"], Some(&caps["m3"]), None)
        };
        if let Some(time) = parsed {
            time_hits.push(TimeHit {
                start: whole.start(),
                end: whole.end(),
                time,
            });
        }
    }

    let mut found: Vec<(usize, FoundDate)> = Vec::new();
    let mut consumed = vec![false; date_hits.len()];

    for t in &time_hits {
        let owner = date_hits
            .iter()
            .rposition(|d| d.end <= t.start && GAP_RE.is_match(&text[d.end..t.start]));
        match owner {
            Some(i) => {
                consumed[i] = true;
                let d = &date_hits[i];
                found.push((
                    d.start,
                    FoundDate {
                        matched: text[d.start..t.end].to_string(),
                        at: d.date.and_time(t.time),
                    },
                ));
            }
            None => found.push((
                t.start,
                FoundDate {
                    matched: text[t.start..t.end].to_string(),
                    at: today.and_time(t.time),
                },
            )),
        }
    }

    for (i, d) in date_hits.iter().enumerate() {
        if !consumed[i] {
            found.push((
                d.start,
                FoundDate {
                    matched: text[d.start..d.end].to_string(),
                    at: d.date.and_time(NaiveTime::MIN),
                },
            ));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, f)| f).collect()
}

fn clock_time(hour: &str, minute: Option<&str>, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = match minute {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    let hour = match meridiem.map(|m| m.to_ascii_lowercase()) {
        Some(m) if m.starts_with('a') => {
            if hour == 12 { 0 } else { hour }
        }
        Some(_) => {
            if hour == 12 { 12 } else { hour + 12 }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn month_number(token: &str) -> Option<u32> {
    let lowered = token.to_ascii_lowercase();
    match lowered.get(..3)? {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_date_only_resolves_to_midnight() {
        let found = search_dates("Service changes Jun 3", reference());
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].at,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_time(NaiveTime::MIN)
        );
    }

    #[test]
    fn test_adjacent_time_is_attached_to_date() {
        let found = search_dates("Runs Mon, Jun 3 at 5:30 PM", reference());
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].at,
            NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(17, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_standalone_time_resolves_on_reference_day() {
        let found = search_dates("from 9:45 PM to midnight", reference());
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].at,
            reference().and_hms_opt(21, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_twelve_am_is_midnight() {
        let found = search_dates("Jun 3 at 12:00 AM", reference());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].at.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_twelve_pm_is_noon() {
        let found = search_dates("at 12:00 PM", reference());
        assert_eq!(found[0].at.time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn test_full_month_names() {
        let found = search_dates("starting January 15", reference());
        assert_eq!(
            found[0].at.date(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_invalid_day_is_skipped() {
        assert!(search_dates("Feb 31", reference()).is_empty());
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(search_dates("Trains run as scheduled", reference()).is_empty());
    }

    #[test]
    fn test_multiple_mentions_in_encounter_order() {
        let found = search_dates("Jun 28 - Jul 2, nights from 9 PM", reference());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].at.date(), NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        assert_eq!(found[1].at.date(), NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert_eq!(found[2].at.time(), NaiveTime::from_hms_opt(21, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_month_day() {
        assert_eq!(
            resolve_month_day("Jul", 4, reference()),
            NaiveDate::from_ymd_opt(2024, 7, 4)
        );
        assert_eq!(resolve_month_day("xyz", 4, reference()), None);
        assert_eq!(resolve_month_day("Feb", 31, reference()), None);
    }
}
