use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::FirmPrincipal;

/// GET /api/auth/me - profile of the authenticated firm user
pub async fn me(
    State(state): State<AppState>,
    principal: FirmPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.current_user(principal.user_id).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}
