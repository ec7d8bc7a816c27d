//! Eligibility core
//!
//! Pure decision logic: given a student's registration row and order history,
//! decide whether the student may order right now.
//!
//! ```text
//!  raw sheet rows ──► sheets::schema ──► Registration / OrderEvent
//!                                            │
//!                         now, policy ──► evaluate() ──► Evaluation
//! ```

mod evaluator;
mod timestamp;
mod window;

pub use evaluator::{EligibilityResult, Evaluation, Rejection, evaluate};
pub use timestamp::{format_order_timestamp, parse_order_timestamp};
pub use window::{SubscriptionWindow, parse_subscription_window};

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use shared::kiosk::StudentView;
use thiserror::Error;

/// Parse failures for sheet cell values.
///
/// Never surfaced to clients: the affected row is excluded from date-based
/// aggregates and the failure is logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("timestamp does not match the sheet format: {0:?}")]
    TimestampFormat(String),
    #[error("no M.D(x)~M.D(x) range in option label: {0:?}")]
    WindowFormat(String),
    #[error("not a calendar date: {0:?}")]
    InvalidDate(String),
    #[error("not a clock time: {0:?}")]
    InvalidTime(String),
    #[error("local time does not exist in the kiosk timezone: {0:?}")]
    NonexistentLocalTime(String),
}

/// A student's registration row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Index into the fetched rows (0 is the header row)
    pub row_index: usize,
    pub student_id: String,
    pub name: String,
    pub phone: String,
    pub subscription_option: String,
    pub consent: String,
    pub registered_at: Option<String>,
    pub paid: bool,
}

impl Registration {
    pub fn view(&self) -> StudentView {
        StudentView {
            student_id: self.student_id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            subscription_option: self.subscription_option.clone(),
            consent: self.consent.clone(),
            registered_at: self.registered_at.clone(),
            paid: self.paid,
        }
    }
}

/// A recorded beverage order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub student_id: String,
    pub beverage: String,
    /// Cell text as stored in the sheet
    pub raw_timestamp: String,
    /// `None` when the cell could not be parsed
    pub placed_at: Option<DateTime<Tz>>,
}

/// How elapsed time since the last order is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CooldownPrecision {
    /// Exact difference between now and the last order
    #[default]
    Timestamp,
    /// Difference between now and local midnight of the last order's date
    CalendarDay,
}

impl std::str::FromStr for CooldownPrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "calendar-day" | "calendar_day" | "day" => Ok(Self::CalendarDay),
            other => Err(format!("unknown cooldown precision: {other}")),
        }
    }
}

/// Ordering rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    /// Maximum orders per calendar day
    pub daily_cap: u32,
    /// Minimum time between consecutive orders (inclusive threshold)
    pub cooldown: Duration,
    pub precision: CooldownPrecision,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            daily_cap: 2,
            cooldown: Duration::minutes(30),
            precision: CooldownPrecision::Timestamp,
        }
    }
}
