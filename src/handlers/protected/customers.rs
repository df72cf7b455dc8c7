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
use crate::services::customer_service::{CreateCustomerRequest, UpdateCustomerRequest};

/// GET /api/customers - all customers of the calling firm user,
/// name-ordered, with read-time matter counts
pub async fn list(
    State(state): State<AppState>,
    principal: FirmPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let customers = state.customers.list(principal.user_id).await?;
    Ok(Json(json!({ "success": true, "data": customers })))
}

/// GET /api/customers/:id - one customer with its matters. A customer
/// owned by another firm reads as 404.
pub async fn show(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state.customers.get(id, principal.user_id).await?;
    Ok(Json(json!({ "success": true, "data": customer })))
}

/// POST /api/customers - create a customer owned by the caller
pub async fn create(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state.customers.create(principal.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": customer })),
    ))
}

/// PUT /api/customers/:id - full-replace update, owner-scoped
pub async fn update(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state.customers.update(id, principal.user_id, request).await?;
    Ok(Json(json!({ "success": true, "data": customer })))
}

/// DELETE /api/customers/:id - owner-scoped; cascades to the customer's
/// matters
pub async fn remove(
    State(state): State<AppState>,
    principal: FirmPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.customers.delete(id, principal.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
