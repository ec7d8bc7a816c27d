//! Payment confirmation payloads

use serde::{Deserialize, Serialize};

/// POST /api/confirm-payment body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[serde(default)]
    pub student_id: String,
    /// Display name echoed by the payment screen (informational)
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub student_id: String,
    /// The payment marker was already set; nothing was written
    pub already_paid: bool,
}
