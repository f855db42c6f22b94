//! Calendar and range helpers
//!
//! All record dates are naive local datetimes; no timezone conversion is
//! performed anywhere. Comparisons are only correct when records were
//! written in the same timezone they are read in, which holds for a
//! single-user local store.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

/// Parse a record timestamp, failing closed.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (with optional fractional
/// seconds), a space-separated variant, and RFC 3339. Returns `None` for
/// anything else so garbage dates never reach the arithmetic downstream.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        // Keep the wall-clock time as written; no timezone normalization.
        return Some(dt.naive_local());
    }
    None
}

/// An inclusive datetime range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Inclusive membership test.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        dt >= self.start && dt <= self.end
    }
}

/// Last instant of a calendar day.
fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(23, 59, 59).expect("valid time of day")
}

/// Midnight of a calendar day.
fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(0, 0, 0).expect("valid time of day")
}

/// Sunday-aligned week containing `today`.
pub fn week_range(today: NaiveDate) -> DateRange {
    let back = today.weekday().num_days_from_sunday() as i64;
    let sunday = today - Duration::days(back);
    DateRange {
        start: start_of_day(sunday),
        end: end_of_day(sunday + Duration::days(6)),
    }
}

/// Calendar month containing `today`, first-of-month through last instant.
pub fn month_range(today: NaiveDate) -> DateRange {
    let first = today.with_day(1).expect("day 1 always valid");
    let next_month = first + Months::new(1);
    DateRange {
        start: start_of_day(first),
        end: end_of_day(next_month - Duration::days(1)),
    }
}

/// Rolling window ending at `now` and reaching back `days` days.
pub fn rolling_range(now: NaiveDateTime, days: i64) -> DateRange {
    DateRange {
        start: now - Duration::days(days),
        end: now,
    }
}

/// `YYYY-MM` bucket key for monthly aggregation.
pub fn month_key(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}

/// Timeframes the trend analytics buckets by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Week,
    Month,
    ThreeMonths,
    SixMonths,
}

/// All timeframes, in display order.
pub const ALL_TIMEFRAMES: [Timeframe; 4] = [
    Timeframe::Week,
    Timeframe::Month,
    Timeframe::ThreeMonths,
    Timeframe::SixMonths,
];

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::ThreeMonths => "3months",
            Timeframe::SixMonths => "6months",
        }
    }

    /// Rolling range ending now. Week reaches back 7 days; the month
    /// variants reach back whole calendar months.
    pub fn range(&self, now: NaiveDateTime) -> DateRange {
        let start = match self {
            Timeframe::Week => now - Duration::days(7),
            Timeframe::Month => now - Months::new(1),
            Timeframe::ThreeMonths => now - Months::new(3),
            Timeframe::SixMonths => now - Months::new(6),
        };
        DateRange { start, end: now }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "3months" => Ok(Timeframe::ThreeMonths),
            "6months" => Ok(Timeframe::SixMonths),
            _ => Err(format!("unknown timeframe: {}", s)),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert_eq!(
            parse_timestamp("2024-03-05"),
            d(2024, 3, 5).and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            parse_timestamp("2024-03-05T14:30:00"),
            d(2024, 3, 5).and_hms_opt(14, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2024-03-05T14:30:00.250"),
            d(2024, 3, 5).and_hms_milli_opt(14, 30, 0, 250)
        );
        assert_eq!(
            parse_timestamp("2024-03-05T14:30:00+02:00"),
            d(2024, 3, 5).and_hms_opt(14, 30, 0)
        );
    }

    #[test]
    fn test_parse_timestamp_fails_closed() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
        assert_eq!(parse_timestamp("03/05/2024"), None);
    }

    #[test]
    fn test_week_range_sunday_aligned() {
        // 2024-01-03 is a Wednesday
        let range = week_range(d(2024, 1, 3));
        assert_eq!(range.start, d(2023, 12, 31).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(range.end, d(2024, 1, 6).and_hms_opt(23, 59, 59).unwrap());

        // A Sunday starts its own week
        let range = week_range(d(2024, 1, 7));
        assert_eq!(range.start, d(2024, 1, 7).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_range() {
        let range = month_range(d(2024, 2, 15));
        assert_eq!(range.start, d(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap());
        // 2024 is a leap year
        assert_eq!(range.end, d(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let range = month_range(d(2024, 3, 10));
        assert!(range.contains(d(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(range.contains(d(2024, 3, 31).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!range.contains(d(2024, 4, 1).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(d(2024, 3, 5)), "2024-03");
        assert_eq!(month_key(d(2024, 12, 31)), "2024-12");
    }

    #[test]
    fn test_timeframe_ranges() {
        let now = d(2024, 6, 15).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            Timeframe::Week.range(now).start,
            d(2024, 6, 8).and_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(
            Timeframe::ThreeMonths.range(now).start,
            d(2024, 3, 15).and_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(Timeframe::SixMonths.range(now).end, now);
    }

    #[test]
    fn test_timeframe_roundtrip() {
        for tf in ALL_TIMEFRAMES {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
    }
}
