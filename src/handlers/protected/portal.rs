use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::PortalPrincipal;

/// GET /api/customer/profile - the portal customer's own record only;
/// the id comes from the token, never from the request
pub async fn profile(
    State(state): State<AppState>,
    principal: PortalPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.portal.profile(principal.customer_id).await?;
    Ok(Json(json!({ "success": true, "data": profile })))
}

/// GET /api/customer/matters - matters of the token's customer, newest
/// first
pub async fn matters(
    State(state): State<AppState>,
    principal: PortalPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let matters = state.portal.matters(principal.customer_id).await?;
    Ok(Json(json!({ "success": true, "data": matters })))
}
