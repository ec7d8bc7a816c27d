//! First-payment confirmation

use shared::error::{AppError, AppResult, ErrorCode};
use shared::kiosk::{ConfirmPaymentRequest, PaymentConfirmation};

use super::eligibility::required_student_id;
use crate::sheets::{CellRef, Table};
use crate::state::AppState;

pub const USER_NOT_FOUND: &str = "사용자를 찾을 수 없습니다.";
pub const PAYMENT_CONFIRMED: &str = "결제 확인 완료";

/// Set the student's payment cell to the paid marker.
///
/// Confirming an already-paid student writes nothing.
pub async fn confirm_payment(
    state: &AppState,
    req: &ConfirmPaymentRequest,
) -> AppResult<PaymentConfirmation> {
    let student_id = required_student_id(&req.student_id)?;

    let _guard = state.locks.acquire(student_id).await;
    let rows = state.store.fetch_rows(Table::Registrations).await?;
    let registration = state
        .schema
        .find_registration(&rows, student_id, &state.paid_marker);
    let Some(registration) = registration else {
        tracing::info!(student_id = %student_id, "Payment confirmation for unknown student");
        return Err(
            AppError::with_message(ErrorCode::StudentNotRegistered, USER_NOT_FOUND)
                .with_detail("studentId", student_id),
        );
    };

    if registration.paid {
        tracing::info!(student_id = %student_id, "Payment already confirmed");
        return Ok(PaymentConfirmation {
            student_id: student_id.to_string(),
            already_paid: true,
        });
    }

    let cell = CellRef {
        row: registration.row_index,
        column: state.schema.registrations.payment,
    };
    state
        .store
        .update_cell(Table::Registrations, cell, &state.paid_marker)
        .await?;

    tracing::info!(
        student_id = %student_id,
        name = req.name.as_deref().unwrap_or(&registration.name),
        "Payment confirmed"
    );

    Ok(PaymentConfirmation {
        student_id: student_id.to_string(),
        already_paid: false,
    })
}
