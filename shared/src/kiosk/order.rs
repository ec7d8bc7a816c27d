//! Order placement payloads

use serde::{Deserialize, Serialize};

/// POST /api/place-order body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub beverage: String,
}

/// Recorded order row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub student_id: String,
    pub beverage: String,
    /// Timestamp exactly as written to the orders sheet
    pub timestamp: String,
    /// Orders today including this one
    pub drinks_today: u32,
}
