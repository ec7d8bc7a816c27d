//! Student lookup

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use shared::error::ApiResponse;
use shared::kiosk::{CheckStudentRequest, EligibilityReport, NextStep};

use super::{ApiResult, json_body};
use crate::services::{load_status, required_student_id};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/check-student", post(check_student))
}

/// POST /api/check-student
pub async fn check_student(
    State(state): State<AppState>,
    payload: Result<Json<CheckStudentRequest>, JsonRejection>,
) -> ApiResult<EligibilityReport> {
    let req = json_body(payload)?;
    let student_id = required_student_id(&req.student_id)?;

    let status = load_status(&state, student_id).await?;
    let report = status.report();

    let message = match (status.order_blocker(), report.next_step) {
        (_, NextStep::Payment) => report.warning.clone().unwrap_or_default(),
        (Some(blocker), _) => blocker.message,
        (None, _) => format!("{}님, 주문 가능한 기간입니다.", report.student.name),
    };

    tracing::info!(
        student_id = %student_id,
        drinks_today = report.drinks_today,
        next_step = ?report.next_step,
        "Student checked"
    );

    Ok(ApiResponse::success_with_message(message, report))
}
