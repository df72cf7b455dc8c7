use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims, PrincipalKind};
use crate::error::ApiError;

/// Authenticated principal extracted from a validated JWT. Carries the
/// type tag that decides which ownership check applies downstream.
#[derive(Clone, Debug)]
pub struct AuthPrincipal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub kind: PrincipalKind,
    pub customer_id: Option<Uuid>,
}

impl From<Claims> for AuthPrincipal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            kind: claims.user_type,
            customer_id: claims.customer_id,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the
/// principal into request extensions
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::validate_jwt(&token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid JWT token: {}", e)))?;

    request.extensions_mut().insert(AuthPrincipal::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Extractor for firm-user endpoints. Rejects portal tokens so a customer
/// can never reach the firm-side CRUD surface.
#[derive(Clone, Debug)]
pub struct FirmPrincipal {
    pub user_id: Uuid,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for FirmPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<AuthPrincipal>()
            .ok_or_else(|| ApiError::unauthorized("Missing authentication"))?;

        if principal.kind != PrincipalKind::FirmUser {
            return Err(ApiError::unauthorized("Invalid token for this endpoint"));
        }

        Ok(Self {
            user_id: principal.id,
        })
    }
}

/// Extractor for portal endpoints. Only customer-typed tokens carrying a
/// customer id pass.
#[derive(Clone, Debug)]
pub struct PortalPrincipal {
    pub customer_id: Uuid,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PortalPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<AuthPrincipal>()
            .ok_or_else(|| ApiError::unauthorized("Missing authentication"))?;

        if principal.kind != PrincipalKind::Customer {
            return Err(ApiError::unauthorized("Invalid customer token"));
        }

        let customer_id = principal
            .customer_id
            .ok_or_else(|| ApiError::unauthorized("Invalid customer token"))?;

        Ok(Self { customer_id })
    }
}
