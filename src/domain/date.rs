//! Article date parsing.
//!
//! Editors type article dates either in ISO form (`2025-04-23`, optionally with a
//! time) or in the short Spanish form used on the printed bulletin (`23 ABR 2025`).
//! [`parse_article_date`] turns both into an [`ArticleTimestamp`] that orders by
//! recency. Anything it cannot read becomes [`ArticleTimestamp::oldest()`], so a bad date
//! only ever pushes an article to the bottom of the feed.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use std::fmt;
use std::ops::Sub;

/// Three-letter Spanish month abbreviations, indexed by zero-based month.
pub const SPANISH_MONTHS: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

/// Naive date-time layouts tried after RFC 3339 for dash-separated dates.
const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed article date, comparable by recency.
///
/// Wraps a timezone-less date-time. Dates written as `DD MON YYYY` land at local
/// midnight; dates carrying an explicit offset are normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArticleTimestamp(NaiveDateTime);

impl ArticleTimestamp {
    /// The oldest article date: the Unix epoch.
    ///
    /// Returned for empty or unreadable input. Equal to `ArticleTimestamp::default()`.
    #[must_use]
    pub fn oldest() -> Self {
        Self(NaiveDateTime::default())
    }

    /// Builds a timestamp at midnight of the given calendar day.
    ///
    /// `month0` is zero-based. Day values outside the month roll over into the
    /// neighbouring months (day 32 of January is February 1st, day 0 is the last
    /// day of the previous month). Returns `None` only when the resulting date is
    /// outside chrono's supported range.
    #[must_use]
    pub fn from_calendar(year: i32, month0: u32, day: i64) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month0.checked_add(1)?, 1)?;
        let offset = day.checked_sub(1)?;
        let date = if offset >= 0 {
            first.checked_add_days(Days::new(offset.unsigned_abs()))?
        } else {
            first.checked_sub_days(Days::new(offset.unsigned_abs()))?
        };
        date.and_hms_opt(0, 0, 0).map(Self)
    }

    /// Milliseconds since the Unix epoch, negative for earlier dates.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0
            .signed_duration_since(NaiveDateTime::default())
            .num_milliseconds()
    }
}

impl Sub for ArticleTimestamp {
    type Output = chrono::Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0.signed_duration_since(rhs.0)
    }
}

impl fmt::Display for ArticleTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Maps a Spanish month abbreviation to its zero-based month, ignoring case.
///
/// ```
/// use ecocampus::domain::date::spanish_month_index;
///
/// assert_eq!(spanish_month_index("abr"), Some(3));
/// assert_eq!(spanish_month_index("Dic"), Some(11));
/// assert_eq!(spanish_month_index("APR"), None);
/// ```
#[must_use]
pub fn spanish_month_index(abbreviation: &str) -> Option<u32> {
    let upper = abbreviation.to_uppercase();
    SPANISH_MONTHS
        .iter()
        .position(|month| *month == upper)
        .and_then(|index| u32::try_from(index).ok())
}

/// Parses an article date string into a comparable timestamp.
///
/// Never fails: empty, malformed or out-of-range input yields
/// [`ArticleTimestamp::oldest()`].
///
/// # Accepted shapes
///
/// - Anything containing `-`: RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]` or
///   `YYYY-MM-DD`.
/// - `DD MON YYYY` with a Spanish month abbreviation in any case.
/// - Other strings fall back to RFC 3339 / RFC 2822 / ISO parsing.
///
/// # Examples
///
/// ```
/// use ecocampus::domain::date::{parse_article_date, ArticleTimestamp};
///
/// let spanish = parse_article_date("23 ABR 2025");
/// let iso = parse_article_date("2025-04-23");
/// assert_eq!(spanish, iso);
/// assert_eq!(parse_article_date("pronto"), ArticleTimestamp::oldest());
/// ```
#[must_use]
pub fn parse_article_date(input: &str) -> ArticleTimestamp {
    let raw = input.trim();
    if raw.is_empty() {
        return ArticleTimestamp::oldest();
    }

    if raw.contains('-') {
        return parse_calendar(raw).unwrap_or_else(|| {
            tracing::trace!(date = %raw, "unreadable ISO date, using minimum");
            ArticleTimestamp::oldest()
        });
    }

    parse_spanish(raw)
        .or_else(|| parse_calendar(raw))
        .unwrap_or_else(|| {
            tracing::trace!(date = %raw, "unreadable date, using minimum");
            ArticleTimestamp::oldest()
        })
}

/// Reads the `DD MON YYYY` form.
fn parse_spanish(raw: &str) -> Option<ArticleTimestamp> {
    let parts: Vec<&str> = raw.split(' ').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let day = day.parse::<i64>().ok()?;
    let month0 = spanish_month_index(month)?;
    let year = year.parse::<i32>().ok()?;

    ArticleTimestamp::from_calendar(year, month0, day)
}

/// Standard calendar parsing: RFC 3339, RFC 2822, then naive ISO layouts.
fn parse_calendar(raw: &str) -> Option<ArticleTimestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ArticleTimestamp(dt.naive_utc()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(ArticleTimestamp(dt.naive_utc()));
    }

    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(ArticleTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight(year: i32, month: u32, day: u32) -> ArticleTimestamp {
        ArticleTimestamp(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn min_is_unix_epoch() {
        assert_eq!(ArticleTimestamp::oldest().timestamp_millis(), 0);
        assert_eq!(ArticleTimestamp::oldest(), ArticleTimestamp::default());
    }

    #[test]
    fn empty_and_blank_strings_are_minimum() {
        assert_eq!(parse_article_date(""), ArticleTimestamp::oldest());
        assert_eq!(parse_article_date("   "), ArticleTimestamp::oldest());
    }

    #[test]
    fn single_token_garbage_is_minimum() {
        assert_eq!(parse_article_date("ayer"), ArticleTimestamp::oldest());
        assert_eq!(parse_article_date("20250423"), ArticleTimestamp::oldest());
    }

    #[test]
    fn spanish_dates_match_calendar_construction() {
        assert_eq!(parse_article_date("23 ABR 2025"), midnight(2025, 4, 23));
        assert_eq!(parse_article_date("01 ENE 2024"), midnight(2024, 1, 1));
        assert_eq!(parse_article_date("31 DIC 1999"), midnight(1999, 12, 31));
    }

    #[test]
    fn month_abbreviation_is_case_insensitive() {
        let expected = midnight(2024, 8, 15);
        assert_eq!(parse_article_date("15 ago 2024"), expected);
        assert_eq!(parse_article_date("15 Ago 2024"), expected);
        assert_eq!(parse_article_date("15 aGO 2024"), expected);
    }

    #[test]
    fn every_month_resolves() {
        for (index, month) in SPANISH_MONTHS.iter().enumerate() {
            let parsed = parse_article_date(&format!("10 {month} 2023"));
            let expected = midnight(2023, u32::try_from(index).unwrap() + 1, 10);
            assert_eq!(parsed, expected, "month {month}");
        }
    }

    #[test]
    fn non_numeric_day_or_year_is_minimum() {
        assert_eq!(parse_article_date("xx ABR 2025"), ArticleTimestamp::oldest());
        assert_eq!(parse_article_date("23 ABR dosmil"), ArticleTimestamp::oldest());
    }

    #[test]
    fn unknown_month_is_minimum() {
        assert_eq!(parse_article_date("23 APR 2025"), ArticleTimestamp::oldest());
    }

    #[test]
    fn wrong_token_count_is_minimum() {
        assert_eq!(parse_article_date("23 ABR"), ArticleTimestamp::oldest());
        assert_eq!(parse_article_date("23  ABR 2025"), ArticleTimestamp::oldest());
    }

    #[test]
    fn day_overflow_rolls_into_next_month() {
        assert_eq!(parse_article_date("31 FEB 2024"), midnight(2024, 3, 2));
        assert_eq!(parse_article_date("0 MAR 2024"), midnight(2024, 2, 29));
    }

    #[test]
    fn iso_date_without_time() {
        assert_eq!(parse_article_date("2025-04-23"), midnight(2025, 4, 23));
    }

    #[test]
    fn iso_date_with_time_component() {
        let parsed = parse_article_date("2025-04-23T10:30:00");
        assert!(parsed > midnight(2025, 4, 23));
        assert!(parsed < midnight(2025, 4, 24));

        let with_offset = parse_article_date("2025-04-23T10:30:00+00:00");
        assert_eq!(with_offset, parsed);

        let with_fraction = parse_article_date("2025-04-23 10:30:00.250");
        assert!(with_fraction > parsed);
    }

    #[test]
    fn malformed_iso_is_minimum() {
        assert_eq!(parse_article_date("2025-13-45"), ArticleTimestamp::oldest());
        assert_eq!(parse_article_date("23-ABR-2025"), ArticleTimestamp::oldest());
    }

    #[test]
    fn already_minimum_date_round_trips() {
        assert_eq!(parse_article_date("1970-01-01"), ArticleTimestamp::oldest());
        assert_eq!(parse_article_date("01 ENE 1970"), ArticleTimestamp::oldest());
    }

    #[test]
    fn rfc2822_fallback_for_other_shapes() {
        let parsed = parse_article_date("Wed, 23 Apr 2025 00:00:00 +0000");
        assert_eq!(parsed, midnight(2025, 4, 23));
    }

    #[test]
    fn subtraction_yields_duration() {
        let later = parse_article_date("02 ENE 2024");
        let earlier = parse_article_date("01 ENE 2024");
        assert_eq!((later - earlier).num_days(), 1);
        assert_eq!((earlier - later).num_days(), -1);
    }
}
