//! Subscription window parsing and validation
//!
//! Option labels embed the subscription period as `M.D(요일)~M.D(요일)`,
//! e.g. `"1주 구독 11.25(월)~12.1(일)"`. The year is not part of the label and
//! is supplied by the caller (the current year in the kiosk timezone), so a
//! period spanning New Year cannot be expressed.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;
use shared::kiosk::SubscriptionWindowView;

use super::ParseError;

static WINDOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\.(\d{1,2})\(.\)~(\d{1,2})\.(\d{1,2})\(.\)")
        .expect("window pattern is valid")
});

/// Inclusive date range during which the student may order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SubscriptionWindow {
    /// True iff `now` is strictly after the start of `start` and strictly
    /// before the last millisecond of `end`.
    pub fn contains(&self, now: &DateTime<Tz>) -> bool {
        let local = now.naive_local();
        local > self.start_of_day() && local < self.end_of_day()
    }

    fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// 23:59:59.999 on `end`
    fn end_of_day(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1)
    }
}

impl From<SubscriptionWindow> for SubscriptionWindowView {
    fn from(window: SubscriptionWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }
}

/// Extract the subscription window from an option label.
pub fn parse_subscription_window(label: &str, year: i32) -> Result<SubscriptionWindow, ParseError> {
    let caps = WINDOW_RE
        .captures(label)
        .ok_or_else(|| ParseError::WindowFormat(label.to_string()))?;

    let date = |month: &str, day: &str| -> Result<NaiveDate, ParseError> {
        let month = month
            .parse()
            .map_err(|_| ParseError::WindowFormat(label.to_string()))?;
        let day = day
            .parse()
            .map_err(|_| ParseError::WindowFormat(label.to_string()))?;
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ParseError::InvalidDate(label.to_string()))
    };

    Ok(SubscriptionWindow {
        start: date(&caps[1], &caps[2])?,
        end: date(&caps[3], &caps[4])?,
    })
}
