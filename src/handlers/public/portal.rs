use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::portal_service::PortalLoginRequest;

/// POST /api/customer/login - authenticate a portal-enabled customer.
/// The issued token carries the customer principal marker.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<PortalLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.portal.login(request).await?;
    Ok(Json(json!({ "success": true, "data": response })))
}
