//! Order placement

use shared::error::{AppError, AppResult, ErrorCode};
use shared::kiosk::{OrderReceipt, PlaceOrderRequest};

use super::eligibility::load_status;
use crate::eligibility::format_order_timestamp;
use crate::sheets::Table;
use crate::state::AppState;

pub const MISSING_ORDER_FIELDS: &str = "학번 또는 메뉴 정보가 없습니다.";
pub const ORDER_PLACED: &str = "주문이 완료되었습니다.";

/// Re-evaluate the student and append the order row.
///
/// The whole check-then-append sequence runs under the student's lock.
pub async fn place_order(state: &AppState, req: &PlaceOrderRequest) -> AppResult<OrderReceipt> {
    let student_id = req.student_id.trim();
    let beverage = req.beverage.trim();
    if student_id.is_empty() || beverage.is_empty() {
        let field = if student_id.is_empty() { "studentId" } else { "beverage" };
        return Err(AppError::required(field, MISSING_ORDER_FIELDS));
    }
    if !state.menu.iter().any(|item| item == beverage) {
        return Err(AppError::with_message(
            ErrorCode::UnknownBeverage,
            format!("메뉴에 없는 음료입니다: {beverage}"),
        )
        .with_detail("beverage", beverage));
    }

    let _guard = state.locks.acquire(student_id).await;
    let status = load_status(state, student_id).await?;

    if let Some(err) = status.order_blocker() {
        tracing::info!(student_id = %student_id, code = %err.code, "Order rejected");
        return Err(err);
    }

    let timestamp = format_order_timestamp(&status.now);
    let row = state.schema.order_row(student_id, beverage, &timestamp);
    state.store.append_row(Table::Orders, row).await?;

    tracing::info!(student_id = %student_id, beverage = %beverage, timestamp = %timestamp, "Order recorded");

    Ok(OrderReceipt {
        student_id: student_id.to_string(),
        beverage: beverage.to_string(),
        timestamp,
        drinks_today: status.result.drinks_today + 1,
    })
}
