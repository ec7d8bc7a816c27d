//! Order placement

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use shared::error::ApiResponse;
use shared::kiosk::{OrderReceipt, PlaceOrderRequest};

use super::{ApiResult, json_body};
use crate::services::ordering::{ORDER_PLACED, place_order as record_order};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/place-order", post(place_order))
}

/// POST /api/place-order
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> ApiResult<OrderReceipt> {
    let req = json_body(payload)?;
    let receipt = record_order(&state, &req).await?;
    Ok(ApiResponse::success_with_message(ORDER_PLACED, receipt))
}
