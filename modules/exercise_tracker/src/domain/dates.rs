//! Date normalization for exercise dates and log bounds.
//!
//! Every date that enters the module goes through [`normalize`]: it yields the
//! instant used for comparisons together with the canonical calendar-day text
//! (`Sun Jan 01 2023`) that all responses carry. Rendering is done in UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use tracing::warn;

/// `strftime` pattern of the canonical date string.
pub const CANONICAL_FORMAT: &str = "%a %b %d %Y";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
];

/// A date as both a comparable instant and its canonical rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    pub instant: DateTime<Utc>,
    pub canonical: String,
}

impl NormalizedDate {
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            canonical: canonical_date(instant),
        }
    }
}

/// Normalize an optional date input against the current time.
pub fn normalize(input: Option<&str>) -> NormalizedDate {
    normalize_at(input, Utc::now())
}

/// Normalize an optional date input; `now` is used when the input is absent,
/// blank or cannot be parsed.
pub fn normalize_at(input: Option<&str>, now: DateTime<Utc>) -> NormalizedDate {
    let instant = match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => now,
        Some(raw) => parse_date(raw).unwrap_or_else(|| {
            warn!(input = raw, "Unparseable date, falling back to current time");
            now
        }),
    };
    NormalizedDate::from_instant(instant)
}

/// Render an instant as the canonical calendar-day string.
pub fn canonical_date(instant: DateTime<Utc>) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

/// Strict parser: `None` when the text is not a recognizable date.
///
/// Inputs without an offset are taken as UTC; date-only inputs resolve to
/// midnight UTC. Digit-only input of up to four characters is a year, longer
/// digit runs are epoch milliseconds.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw).filter(|instant| (0..=9999).contains(&instant.year()))
}

/// Midnight UTC of the instant's canonical day.
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

// Canonical strings carry a four-digit year; anything outside 0..=9999 is rejected.
fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(instant) = parse_numeric(s) {
        return Some(instant);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    if let Some(instant) = parse_calendar_day(s) {
        return Some(instant);
    }
    // Canonical strings lead with a weekday; like most date parsers we do not
    // hold the input to it being the right one.
    strip_weekday(s).and_then(parse_calendar_day)
}

fn parse_numeric(s: &str) -> Option<DateTime<Utc>> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() <= 4 && digits.len() == s.len() {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?
            .and_hms_opt(0, 0, 0)
            .map(|ndt| ndt.and_utc());
    }
    let millis: i64 = s.parse().ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

fn parse_calendar_day(s: &str) -> Option<DateTime<Utc>> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| parse_year_month(s))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

/// `YYYY-MM` means the first day of that month.
fn parse_year_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn strip_weekday(s: &str) -> Option<&str> {
    let (first, rest) = s.split_once(char::is_whitespace)?;
    first
        .trim_end_matches(',')
        .parse::<Weekday>()
        .ok()
        .map(|_| rest.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 8, 15, 30, 0).unwrap()
    }

    #[test]
    fn renders_canonical_form() {
        let d = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(canonical_date(d), "Sun Jan 01 2023");
        assert_eq!(canonical_date(fixed_now()), "Tue Jul 08 2025");
    }

    #[test]
    fn absent_or_blank_input_uses_now() {
        for input in [None, Some(""), Some("   ")] {
            let n = normalize_at(input, fixed_now());
            assert_eq!(n.instant, fixed_now());
            assert_eq!(n.canonical, "Tue Jul 08 2025");
        }
    }

    #[test]
    fn iso_date_is_utc_midnight() {
        let n = normalize_at(Some("2023-01-01"), fixed_now());
        assert_eq!(n.instant, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(n.canonical, "Sun Jan 01 2023");
    }

    #[test]
    fn accepts_iso_datetimes() {
        let expected = Utc.with_ymd_and_hms(2023, 3, 5, 10, 15, 0).unwrap();
        assert_eq!(parse_date("2023-03-05T10:15:00Z"), Some(expected));
        assert_eq!(parse_date("2023-03-05T12:15:00+02:00"), Some(expected));
        assert_eq!(parse_date("2023-03-05T10:15:00"), Some(expected));
        assert_eq!(parse_date("2023-03-05 10:15:00"), Some(expected));
        assert_eq!(parse_date("2023-03-05T10:15:00.000Z"), Some(expected));
    }

    #[test]
    fn offset_can_move_the_calendar_day() {
        let n = normalize_at(Some("2023-01-01T23:30:00-05:00"), fixed_now());
        assert_eq!(n.canonical, "Mon Jan 02 2023");
    }

    #[test]
    fn accepts_rfc2822() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(
            parse_date("Sun, 01 Jan 2023 10:00:00 +0000"),
            Some(expected)
        );
    }

    #[test]
    fn accepts_epoch_millis_and_years() {
        assert_eq!(
            parse_date("1672531200000"),
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-02"),
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn accepts_month_name_forms() {
        let expected = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(parse_date("Jan 01 2023"), expected);
        assert_eq!(parse_date("January 1, 2023"), expected);
        assert_eq!(parse_date("1 January 2023"), expected);
        assert_eq!(parse_date("01/01/2023"), expected);
    }

    #[test]
    fn years_beyond_four_digits_fall_back_to_now() {
        assert_eq!(parse_date("253402300800000"), None);
        assert_eq!(parse_date("-62167219200001"), None);
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999);
        assert_eq!(parse_date("253402300799999"), Some(last));

        let n = normalize_at(Some("253402300800000"), fixed_now());
        assert_eq!(n.instant, fixed_now());
        assert_eq!(n.canonical, "Tue Jul 08 2025");
    }

    #[test]
    fn start_of_day_keeps_the_canonical_day() {
        let late = parse_date("2023-01-01T23:30:00-05:00").unwrap();
        let day = start_of_day(late);
        assert_eq!(day, Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(canonical_date(day), canonical_date(late));
    }

    #[test]
    fn canonical_output_is_a_fixed_point() {
        for input in [
            "2023-01-01",
            "2025-07-08T23:59:59Z",
            "1999-12-31",
            "2024-02-29",
            "Sun Jan 01 2023",
        ] {
            let once = normalize_at(Some(input), fixed_now());
            let twice = normalize_at(Some(&once.canonical), fixed_now());
            assert_eq!(once.canonical, twice.canonical, "input {input}");
        }
    }

    #[test]
    fn wrong_weekday_is_tolerated() {
        let n = normalize_at(Some("Mon Jan 01 2023"), fixed_now());
        assert_eq!(n.canonical, "Sun Jan 01 2023");
    }

    #[test]
    fn garbage_falls_back_to_now() {
        for input in ["not a date", "2023-13-45", "yesterday", "12:00"] {
            let n = normalize_at(Some(input), fixed_now());
            assert_eq!(n.instant, fixed_now(), "input {input}");
        }
        assert_eq!(parse_date("not a date"), None);
    }
}
