//! Order timestamp parsing and formatting
//!
//! The orders sheet stores wall-clock times in the Korean locale format
//! produced by `Intl.DateTimeFormat("ko-KR")`, e.g. `2024. 11. 28. 오후 07:29:15`.
//! This module is the only place that touches that string form; everything
//! else works with `DateTime<Tz>`.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use regex::Regex;

use super::ParseError;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\.\s*(오전|오후|(?i:am|pm))\s*(\d{1,2}):(\d{1,2}):(\d{1,2})",
    )
    .expect("timestamp pattern is valid")
});

const MORNING: &str = "오전";
const AFTERNOON: &str = "오후";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Am,
    Pm,
}

impl Period {
    fn parse(marker: &str) -> Option<Self> {
        match marker {
            MORNING => Some(Self::Am),
            AFTERNOON => Some(Self::Pm),
            m if m.eq_ignore_ascii_case("am") => Some(Self::Am),
            m if m.eq_ignore_ascii_case("pm") => Some(Self::Pm),
            _ => None,
        }
    }

    /// 12-hour clock → 24-hour clock
    fn to_24h(self, hour: u32) -> u32 {
        match self {
            Self::Pm if (1..12).contains(&hour) => hour + 12,
            Self::Am if hour == 12 => 0,
            _ => hour,
        }
    }
}

/// Parse an order-sheet timestamp into an instant in `tz`.
///
/// `"2024. 11. 28. 오후 07:29:15"` and `"2024. 11. 28. PM 07:29:15"` both
/// yield 19:29:15 on 2024-11-28.
pub fn parse_order_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Tz>, ParseError> {
    let caps = TIMESTAMP_RE
        .captures(raw)
        .ok_or_else(|| ParseError::TimestampFormat(raw.to_string()))?;

    let field = |i: usize| -> Result<u32, ParseError> {
        caps[i]
            .parse::<u32>()
            .map_err(|_| ParseError::TimestampFormat(raw.to_string()))
    };

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| ParseError::TimestampFormat(raw.to_string()))?;
    let period =
        Period::parse(&caps[4]).ok_or_else(|| ParseError::TimestampFormat(raw.to_string()))?;
    let hour = period.to_24h(field(5)?);

    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .ok_or_else(|| ParseError::InvalidDate(raw.to_string()))?;
    let time = NaiveTime::from_hms_opt(hour, field(6)?, field(7)?)
        .ok_or_else(|| ParseError::InvalidTime(raw.to_string()))?;

    tz.from_local_datetime(&date.and_time(time))
        .latest()
        .ok_or_else(|| ParseError::NonexistentLocalTime(raw.to_string()))
}

/// Format an instant the way new order rows are written.
///
/// Zero-padded 12-hour clock with a Korean period marker, so the output
/// round-trips through [`parse_order_timestamp`].
pub fn format_order_timestamp(at: &DateTime<Tz>) -> String {
    let marker = if at.hour() < 12 { MORNING } else { AFTERNOON };
    format!(
        "{}. {} {} {}",
        at.format("%Y"),
        at.format("%m. %d."),
        marker,
        at.format("%I:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use chrono_tz::Asia::Seoul;

    #[test]
    fn test_parse_afternoon() {
        let at = parse_order_timestamp("2024. 11. 28. 오후 07:29:15", Seoul).unwrap();
        assert_eq!(at.year(), 2024);
        assert_eq!(at.month(), 11);
        assert_eq!(at.day(), 28);
        assert_eq!(at.hour(), 19);
        assert_eq!(at.minute(), 29);
        assert_eq!(at.second(), 15);
    }

    #[test]
    fn test_parse_midnight() {
        let at = parse_order_timestamp("2024. 11. 28. 오전 12:05:00", Seoul).unwrap();
        assert_eq!(at.hour(), 0);
        assert_eq!(at.minute(), 5);
        assert_eq!(at.day(), 28);
    }

    #[test]
    fn test_parse_noon_stays_noon() {
        let at = parse_order_timestamp("2024. 11. 28. 오후 12:30:00", Seoul).unwrap();
        assert_eq!(at.hour(), 12);
    }

    #[test]
    fn test_parse_english_marker() {
        let at = parse_order_timestamp("2024. 11. 28. PM 07:29:15", Seoul).unwrap();
        assert_eq!(at.hour(), 19);

        let at = parse_order_timestamp("2024. 1. 5. am 9:03:07", Seoul).unwrap();
        assert_eq!((at.month(), at.day(), at.hour()), (1, 5, 9));
    }

    #[test]
    fn test_parse_is_local_to_timezone() {
        let at = parse_order_timestamp("2024. 11. 28. 오전 08:00:00", Seoul).unwrap();
        // KST is UTC+9
        assert_eq!(at.naive_utc().hour(), 23);
        assert_eq!(at.naive_utc().day(), 27);
    }

    #[test]
    fn test_missing_period_marker_is_rejected() {
        let err = parse_order_timestamp("2024. 11. 28. 07:29:15", Seoul).unwrap_err();
        assert!(matches!(err, ParseError::TimestampFormat(_)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_order_timestamp("", Seoul).is_err());
        assert!(parse_order_timestamp("yesterday", Seoul).is_err());
        assert!(parse_order_timestamp("2024-11-28T19:29:15+09:00", Seoul).is_err());
    }

    #[test]
    fn test_impossible_values_are_rejected() {
        let err = parse_order_timestamp("2024. 2. 30. 오전 10:00:00", Seoul).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate(_)));

        let err = parse_order_timestamp("2024. 2. 3. 오전 10:61:00", Seoul).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTime(_)));
    }

    #[test]
    fn test_format_matches_sheet_layout() {
        let at = Seoul.with_ymd_and_hms(2024, 11, 28, 19, 29, 15).unwrap();
        assert_eq!(format_order_timestamp(&at), "2024. 11. 28. 오후 07:29:15");

        let at = Seoul.with_ymd_and_hms(2024, 3, 4, 0, 5, 0).unwrap();
        assert_eq!(format_order_timestamp(&at), "2024. 03. 04. 오전 12:05:00");
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        for hour in [0, 1, 11, 12, 13, 23] {
            let at = Seoul.with_ymd_and_hms(2025, 6, 9, hour, 42, 7).unwrap();
            let parsed = parse_order_timestamp(&format_order_timestamp(&at), Seoul).unwrap();
            assert_eq!(parsed, at);
        }
    }
}
