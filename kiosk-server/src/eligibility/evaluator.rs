use chrono::{DateTime, Duration, NaiveTime};
use chrono_tz::Tz;

use super::{CooldownPrecision, EligibilityPolicy, OrderEvent, Registration};

/// Outcome of an eligibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// No registration row for the student; distinct from "ineligible"
    NotRegistered,
    Evaluated(EligibilityResult),
}

/// Independent eligibility flags for a registered student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityResult {
    pub registration: Registration,
    /// Orders whose timestamp falls on today's date in the kiosk timezone
    pub drinks_today: u32,
    pub daily_limit_reached: bool,
    /// False while the cooldown since the most recent order is running
    pub usage_allowed: bool,
    pub payment_required: bool,
    pub last_order_at: Option<DateTime<Tz>>,
    /// Time left on the cooldown, when it is running
    pub cooldown_remaining: Option<Duration>,
}

/// Reasons that block an order outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    DailyLimitReached,
    CooldownActive,
}

impl EligibilityResult {
    pub fn cooldown_active(&self) -> bool {
        !self.usage_allowed
    }

    /// The daily cap is reported ahead of the cooldown.
    pub fn rejection(&self) -> Option<Rejection> {
        if self.daily_limit_reached {
            Some(Rejection::DailyLimitReached)
        } else if self.cooldown_active() {
            Some(Rejection::CooldownActive)
        } else {
            None
        }
    }
}

/// Evaluate a student's eligibility at `now`.
///
/// `orders` may contain other students' rows; only rows whose student ID
/// matches the registration are considered. Rows without a parsed timestamp
/// count neither toward today's total nor as a cooldown candidate.
pub fn evaluate(
    registration: Option<&Registration>,
    orders: &[OrderEvent],
    now: DateTime<Tz>,
    policy: &EligibilityPolicy,
) -> Evaluation {
    let Some(registration) = registration else {
        return Evaluation::NotRegistered;
    };

    let today = now.date_naive();
    let placed: Vec<DateTime<Tz>> = orders
        .iter()
        .filter(|o| o.student_id == registration.student_id)
        .filter_map(|o| o.placed_at)
        .collect();

    let drinks_today = placed.iter().filter(|at| at.date_naive() == today).count() as u32;
    let last_order_at = placed.iter().max().copied();

    let cooldown_remaining = last_order_at.and_then(|last| {
        let elapsed = elapsed_since(last, now, policy.precision);
        (elapsed < policy.cooldown).then(|| policy.cooldown - elapsed)
    });

    Evaluation::Evaluated(EligibilityResult {
        registration: registration.clone(),
        drinks_today,
        daily_limit_reached: drinks_today >= policy.daily_cap,
        usage_allowed: cooldown_remaining.is_none(),
        payment_required: !registration.paid,
        last_order_at,
        cooldown_remaining,
    })
}

fn elapsed_since(last: DateTime<Tz>, now: DateTime<Tz>, precision: CooldownPrecision) -> Duration {
    match precision {
        CooldownPrecision::Timestamp => now.signed_duration_since(last),
        CooldownPrecision::CalendarDay => {
            let midnight = last.date_naive().and_time(NaiveTime::MIN);
            now.naive_local().signed_duration_since(midnight)
        }
    }
}
