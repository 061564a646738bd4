// src/specs/event_page.rs
//! Scraping *spec* for the ticket listing page.
//!
//! Reads two facts from a fetched page:
//! - the **meet date**, written out as `<weekday> <day> <month> <year>`
//!   (e.g. `Saturday 12 July 2025`, `Sat 12th Jul 2025`), possibly split
//!   across several tags;
//! - the **sale countdown**, the number of seconds until tickets go on sale,
//!   as passed to the page's countdown widget (`countdown(3600)`,
//!   `data-countdown="3600"`, `countdown = 3600`).
//!
//! Pure: no I/O, no clock. The caller turns the countdown into a release
//! timestamp.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Month, NaiveDate, Utc, Weekday};
use regex::Regex;
use tracing::warn;

use crate::core::html::visible_text;
use crate::error::{ParseError, ParseFailure};

/// Meet dates are pinned to midday UTC so the calendar day survives any
/// local-time conversion.
pub const MEET_HOUR_UTC: u32 = 12;

static MEET_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tue|wed|thu|fri|sat|sun)\b\.?,?\s+(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]+)\.?,?\s+(\d{4})\b",
    )
    .expect("meet date regex is valid")
});

static COUNTDOWN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)countdown\s*(?:\(\s*|=\s*["']?)([^"',);\s]*)"#).expect("countdown regex is valid")
});

/// One read of the listing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub meet_date: DateTime<Utc>,
    /// May be negative once the sale has opened.
    pub seconds_until_release: i64,
    /// The page has no sold-out marker yet; always `false`.
    pub sold_out: bool,
}

pub fn parse(raw: &str) -> Result<Snapshot, ParseError> {
    let meet_date = parse_meet_date(raw).ok_or_else(|| ParseError::new(ParseFailure::MissingMeetDate, raw))?;
    let seconds_until_release = parse_release_offset(raw).map_err(|reason| ParseError::new(reason, raw))?;

    Ok(Snapshot { meet_date, seconds_until_release, sold_out: false })
}

/// First `<weekday> <day> <month> <year>` run in the visible text that names a
/// real date.
fn parse_meet_date(raw: &str) -> Option<DateTime<Utc>> {
    let text = visible_text(raw);

    for caps in MEET_DATE_RE.captures_iter(&text) {
        let Ok(month) = Month::from_str(&caps[3]) else { continue };
        let (Ok(day), Ok(year)) = (caps[2].parse::<u32>(), caps[4].parse::<i32>()) else { continue };
        let Some(date) = NaiveDate::from_ymd_opt(year, month.number_from_month(), day) else { continue };

        if let Ok(label) = Weekday::from_str(&caps[1]) {
            if label != date.weekday() {
                warn!("Meet date label says {} but {} is a {}", &caps[1], date, date.weekday());
            }
        }

        return date.and_hms_opt(MEET_HOUR_UTC, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// First countdown argument that is a whole number. Other mentions of
/// `countdown` (the widget's own definition, a heading) are skipped.
fn parse_release_offset(raw: &str) -> Result<i64, ParseFailure> {
    let mut seen = false;
    for caps in COUNTDOWN_RE.captures_iter(raw) {
        seen = true;
        if let Ok(secs) = caps[1].parse::<i64>() {
            return Ok(secs);
        }
    }
    Err(if seen { ParseFailure::NonNumericReleaseOffset } else { ParseFailure::MissingReleaseOffset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PAGE: &str = r#"
        <html><head><script>var x = 1;</script></head><body>
          <div class="event-header">
            <h2>Next meet</h2>
            <p class="date"><span>Saturday</span> <span>12</span>&nbsp;<span>July</span> 2025</p>
          </div>
          <div id="sale"></div>
          <script>window.addEventListener('load', function () { countdown(3600); });</script>
        </body></html>
    "#;

    #[test]
    fn reads_known_fixture() {
        let snap = parse(PAGE).unwrap();
        assert_eq!(snap.meet_date, Utc.with_ymd_and_hms(2025, 7, 12, 12, 0, 0).unwrap());
        assert_eq!(snap.seconds_until_release, 3600);
        assert!(!snap.sold_out);
    }

    #[test]
    fn abbreviated_labels_and_ordinals() {
        let page = r#"<p>Sat, 1st Nov. 2025</p><div data-countdown="86400"></div>"#;
        let snap = parse(page).unwrap();
        assert_eq!(snap.meet_date.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(snap.seconds_until_release, 86400);
    }

    #[test]
    fn countdown_may_be_negative_after_opening() {
        let page = "Friday 3 October 2025 <script>countdown = -120;</script>";
        assert_eq!(parse(page).unwrap().seconds_until_release, -120);
    }

    #[test]
    fn skips_non_month_words() {
        let page = "Sunday 5 tickets 2025 ... Sunday 5 October 2025 countdown(10)";
        assert_eq!(parse(page).unwrap().meet_date.date_naive(), NaiveDate::from_ymd_opt(2025, 10, 5).unwrap());
    }

    #[test]
    fn missing_date() {
        let err = parse("<p>Coming soon</p><script>countdown(60)</script>").unwrap_err();
        assert_eq!(err.reason, ParseFailure::MissingMeetDate);
        assert!(err.raw.contains("Coming soon"));
    }

    #[test]
    fn impossible_date_counts_as_missing() {
        let err = parse("Monday 31 February 2025 countdown(60)").unwrap_err();
        assert_eq!(err.reason, ParseFailure::MissingMeetDate);
    }

    #[test]
    fn date_inside_script_is_ignored() {
        let err = parse(r#"<script>var d = "Saturday 12 July 2025"; countdown(5);</script>"#).unwrap_err();
        assert_eq!(err.reason, ParseFailure::MissingMeetDate);
    }

    #[test]
    fn missing_countdown() {
        let err = parse("Saturday 12 July 2025, sale opens soon").unwrap_err();
        assert_eq!(err.reason, ParseFailure::MissingReleaseOffset);
    }

    #[test]
    fn non_numeric_countdown() {
        for page in [
            "Saturday 12 July 2025 countdown(saleStart)",
            "Saturday 12 July 2025 countdown()",
            "Saturday 12 July 2025 countdown(36.5)",
        ] {
            assert_eq!(parse(page).unwrap_err().reason, ParseFailure::NonNumericReleaseOffset, "{page}");
        }
    }

    #[test]
    fn countdown_definition_before_the_call() {
        let page = "<p>Saturday 12 July 2025</p><script>function countdown(secs) { tick(secs); } countdown(3600);</script>";
        assert_eq!(parse(page).unwrap().seconds_until_release, 3600);
    }

    #[test]
    fn countdown_heading_before_the_call() {
        let page = "<h3>Countdown (UTC)</h3><p>Saturday 12 July 2025</p><script>countdown(3600);</script>";
        assert_eq!(parse(page).unwrap().seconds_until_release, 3600);
    }
}
