//! Student status lookup
//!
//! Reads both tables, evaluates eligibility at the current time, and
//! checks the subscription window. Shared by the check-student and
//! place-order flows so both apply the same rules.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::kiosk::{EligibilityReport, NextStep};

use crate::eligibility::{
    EligibilityPolicy, EligibilityResult, Evaluation, Rejection, SubscriptionWindow, evaluate,
    parse_subscription_window,
};
use crate::sheets::Table;
use crate::state::AppState;

pub const EMPTY_STUDENT_ID: &str = "학번을 입력해주세요.";
pub const NOT_REGISTERED: &str =
    "해당 학번으로 등록되지 않았어요. QR 코드로 신청할 수 있도록 안내해주세요.";
pub const PAYMENT_WARNING: &str = "첫 결제 대상자에요!";
pub const OUTSIDE_WINDOW: &str = "아직 사용기간이 아닙니다. 기간이 시작되면 이용해주세요.";

/// Trimmed, non-empty student ID
pub fn required_student_id(raw: &str) -> AppResult<&str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::required("studentId", EMPTY_STUDENT_ID));
    }
    Ok(id)
}

/// Everything known about a registered student at one instant
#[derive(Debug, Clone)]
pub struct StudentStatus {
    pub result: EligibilityResult,
    /// `None` when the option label carries no parsable date range
    pub window: Option<SubscriptionWindow>,
    pub order_window_open: bool,
    pub policy: EligibilityPolicy,
    pub now: DateTime<Tz>,
}

impl StudentStatus {
    /// Cap and cooldown block first, then payment, then the window.
    pub fn next_step(&self) -> NextStep {
        if self.result.rejection().is_some() {
            NextStep::Blocked
        } else if self.result.payment_required {
            NextStep::Payment
        } else if !self.order_window_open {
            NextStep::Blocked
        } else {
            NextStep::Menu
        }
    }

    /// Whole minutes until the cooldown ends, rounded up
    pub fn retry_after_minutes(&self) -> Option<i64> {
        self.result
            .cooldown_remaining
            .map(|left| (left.num_seconds() + 59) / 60)
    }

    /// The error an order attempt would fail with right now, in the same
    /// order as [`Self::next_step`]
    pub fn order_blocker(&self) -> Option<AppError> {
        let registration = &self.result.registration;
        let name = &registration.name;

        let err = match self.result.rejection() {
            Some(Rejection::DailyLimitReached) => AppError::with_message(
                ErrorCode::DailyLimitReached,
                format!("{name}님은 이미 {}잔을 마셨어요.", self.result.drinks_today),
            )
            .with_detail("drinksToday", self.result.drinks_today),
            Some(Rejection::CooldownActive) => {
                let mut err = AppError::with_message(
                    ErrorCode::CooldownActive,
                    format!(
                        "{name}님이 음료수를 마신지 {}분이 안지났어요.",
                        self.policy.cooldown.num_minutes()
                    ),
                );
                if let Some(minutes) = self.retry_after_minutes() {
                    err = err.with_detail("retryAfterMinutes", minutes);
                }
                err
            }
            None if self.result.payment_required => AppError::with_message(
                ErrorCode::PaymentRequired,
                format!("{PAYMENT_WARNING} 결제를 먼저 확인해주세요."),
            ),
            None if !self.order_window_open => {
                AppError::with_message(ErrorCode::OutsideOrderWindow, OUTSIDE_WINDOW)
            }
            None => return None,
        };
        Some(err.with_detail("studentId", registration.student_id.as_str()))
    }

    pub fn report(&self) -> EligibilityReport {
        let result = &self.result;
        EligibilityReport {
            student: result.registration.view(),
            drinks_today: result.drinks_today,
            usage_allowed: result.usage_allowed,
            payment_required: result.payment_required,
            daily_limit_reached: result.daily_limit_reached,
            cooldown_active: result.cooldown_active(),
            order_window_open: self.order_window_open,
            window: self.window.map(Into::into),
            last_order_at: result.last_order_at.map(|at| at.to_rfc3339()),
            retry_after_minutes: self.retry_after_minutes(),
            warning: result.payment_required.then(|| PAYMENT_WARNING.to_string()),
            next_step: self.next_step(),
        }
    }
}

/// Evaluate `student_id` against the current contents of the store.
///
/// Unregistered students are reported as a 404 with the operator-facing
/// registration hint.
pub async fn load_status(state: &AppState, student_id: &str) -> AppResult<StudentStatus> {
    let (registrations, orders) = tokio::try_join!(
        state.store.fetch_rows(Table::Registrations),
        state.store.fetch_rows(Table::Orders),
    )?;

    let now = state.now();
    let registration = state
        .schema
        .find_registration(&registrations, student_id, &state.paid_marker);
    let events = state.schema.order_events(&orders, student_id, state.timezone);

    let result = match evaluate(registration.as_ref(), &events, now, &state.policy) {
        Evaluation::NotRegistered => {
            tracing::info!(student_id = %student_id, "Student is not registered");
            return Err(AppError::with_message(ErrorCode::StudentNotRegistered, NOT_REGISTERED)
                .with_detail("studentId", student_id));
        }
        Evaluation::Evaluated(result) => result,
    };

    let window = match parse_subscription_window(&result.registration.subscription_option, now.year()) {
        Ok(window) => Some(window),
        Err(e) => {
            tracing::warn!(student_id = %student_id, error = %e, "Subscription option has no usable period");
            None
        }
    };
    let order_window_open = window.is_some_and(|w| w.contains(&now));

    tracing::debug!(
        student_id = %student_id,
        drinks_today = result.drinks_today,
        usage_allowed = result.usage_allowed,
        payment_required = result.payment_required,
        order_window_open,
        "Eligibility evaluated"
    );

    Ok(StudentStatus {
        result,
        window,
        order_window_open,
        policy: state.policy,
        now,
    })
}
