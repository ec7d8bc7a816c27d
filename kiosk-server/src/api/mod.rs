//! HTTP routes
//!
//! - `POST /api/check-student`   eligibility report for a student ID
//! - `POST /api/place-order`     record a beverage order
//! - `POST /api/confirm-payment` mark the first payment as received
//! - `GET  /api/menu`            orderable beverages
//! - `GET  /health`              liveness

pub mod health;
pub mod menu;
pub mod order;
pub mod payment;
pub mod student;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::{BoxError, Json, Router};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Operator-facing message for every system failure
pub const SYSTEM_ERROR: &str = "시스템 오류가 발생했습니다.";

/// All routes, without middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(student::router())
        .merge(order::router())
        .merge(payment::router())
        .merge(menu::router())
        .merge(health::router())
}

/// Fully configured application
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    build_router()
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// Middleware failures still answer with the response envelope
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        AppError::with_message(ErrorCode::TimeoutError, SYSTEM_ERROR)
    } else {
        AppError::internal(err.to_string())
    }
}

/// Unwrap a JSON body, reporting malformed input in the response envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
    })
}
