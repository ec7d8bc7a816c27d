//! Student lookup payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// POST /api/check-student body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStudentRequest {
    #[serde(default)]
    pub student_id: String,
}

/// Registration fields as shown on the kiosk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub student_id: String,
    pub name: String,
    pub phone: String,
    /// Subscription option label, e.g. `"1주 구독 11.25(월)~12.1(일)"`
    pub subscription_option: String,
    pub consent: String,
    /// Raw form-submission timestamp of the registration row
    pub registered_at: Option<String>,
    pub paid: bool,
}

/// Parsed subscription window (inclusive dates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionWindowView {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Where the kiosk should navigate after a successful lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextStep {
    /// First payment must be confirmed before ordering
    Payment,
    /// Beverage selection
    Menu,
    /// Daily limit, cooldown or closed window
    Blocked,
}

/// POST /api/check-student response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub student: StudentView,
    pub drinks_today: u32,
    pub usage_allowed: bool,
    pub payment_required: bool,
    pub daily_limit_reached: bool,
    pub cooldown_active: bool,
    pub order_window_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<SubscriptionWindowView>,
    /// Most recent order time (RFC 3339, kiosk timezone)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_order_at: Option<String>,
    /// Minutes left until the cooldown ends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub next_step: NextStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_missing_field() {
        let req: CheckStudentRequest = serde_json::from_str("{}").unwrap();
        assert!(req.student_id.is_empty());

        let req: CheckStudentRequest =
            serde_json::from_str(r#"{"studentId":"2024123456"}"#).unwrap();
        assert_eq!(req.student_id, "2024123456");
    }

    #[test]
    fn test_next_step_wire_format() {
        assert_eq!(
            serde_json::to_string(&NextStep::Payment).unwrap(),
            "\"payment\""
        );
        assert_eq!(
            serde_json::from_str::<NextStep>("\"blocked\"").unwrap(),
            NextStep::Blocked
        );
    }
}
