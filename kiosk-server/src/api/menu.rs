use axum::Router;
use axum::extract::State;
use axum::routing::get;
use shared::error::ApiResponse;
use shared::kiosk::MenuResponse;

use super::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/menu", get(menu))
}

/// GET /api/menu
pub async fn menu(State(state): State<AppState>) -> ApiResult<MenuResponse> {
    Ok(ApiResponse::success(MenuResponse {
        beverages: state.menu.as_ref().clone(),
    }))
}
