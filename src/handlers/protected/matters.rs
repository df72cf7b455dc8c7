use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::FirmPrincipal;
use crate::services::matter_service::{CreateMatterRequest, UpdateMatterRequest};

/// GET /api/customers/:customerId/matters - newest first. 404 when the
/// customer is missing or belongs to another firm.
pub async fn list(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let matters = state.matters.list(customer_id, principal.user_id).await?;
    Ok(Json(json!({ "success": true, "data": matters })))
}

/// GET /api/customers/:customerId/matters/:id
pub async fn show(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path((customer_id, id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let matter = state.matters.get(id, customer_id, principal.user_id).await?;
    Ok(Json(json!({ "success": true, "data": matter })))
}

/// POST /api/customers/:customerId/matters - 404 under a nonexistent
/// customer, 403 under someone else's
pub async fn create(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<CreateMatterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let matter = state
        .matters
        .create(customer_id, principal.user_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": matter })),
    ))
}

/// PUT /api/customers/:customerId/matters/:id - 403 only when the matter
/// was located under a customer the caller does not own
pub async fn update(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path((customer_id, id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMatterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let matter = state
        .matters
        .update(id, customer_id, principal.user_id, request)
        .await?;
    Ok(Json(json!({ "success": true, "data": matter })))
}

/// DELETE /api/customers/:customerId/matters/:id
pub async fn remove(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path((customer_id, id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .matters
        .delete(id, customer_id, principal.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
