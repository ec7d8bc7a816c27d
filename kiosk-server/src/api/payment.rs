//! Payment confirmation

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use shared::error::ApiResponse;
use shared::kiosk::{ConfirmPaymentRequest, PaymentConfirmation};

use super::{ApiResult, json_body};
use crate::services::payment::{PAYMENT_CONFIRMED, confirm_payment as record_payment};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/confirm-payment", post(confirm_payment))
}

/// POST /api/confirm-payment
pub async fn confirm_payment(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmPaymentRequest>, JsonRejection>,
) -> ApiResult<PaymentConfirmation> {
    let req = json_body(payload)?;
    let confirmation = record_payment(&state, &req).await?;
    Ok(ApiResponse::success_with_message(PAYMENT_CONFIRMED, confirmation))
}
