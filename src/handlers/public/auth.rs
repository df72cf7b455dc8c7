use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::auth_service::{LoginRequest, SignupRequest};

/// POST /api/auth/signup - create a firm-user account and receive a token.
/// A duplicate email is a 409 and performs no write.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.auth.signup(request).await?;
    Ok(Json(json!({ "success": true, "data": response })))
}

/// POST /api/auth/login - authenticate a firm user and receive a token.
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.auth.login(request).await?;
    Ok(Json(json!({ "success": true, "data": response })))
}
