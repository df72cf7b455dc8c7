use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{self, password, Claims, JwtError};
use crate::database::manager::DatabaseError;
use crate::database::models::Customer;
use crate::database::repositories::CustomerStore;
use crate::services::matter_service::MatterResponse;
use crate::services::validation::{FieldErrors, ValidationError};

#[derive(Debug, Error)]
pub enum PortalError {
    /// Unknown email, portal disabled, missing hash, and wrong password
    /// all collapse into this one variant
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Customer not found")]
    CustomerNotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Deserialize)]
pub struct PortalLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PortalProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for PortalProfileResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone().unwrap_or_default(),
            phone_number: customer.phone_number.clone(),
            address: customer.address.clone(),
            last_login: customer.last_login,
            created_at: customer.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PortalAuthResponse {
    pub token: String,
    pub customer: PortalProfileResponse,
}

/// The customer-facing side: portal login plus the two read-only views a
/// portal token grants. Every lookup is keyed by the token's own customer
/// id and filtered to portal-enabled records, so a customer can never
/// reach a sibling record or the owning firm's other data.
#[derive(Clone)]
pub struct PortalService {
    customers: Arc<dyn CustomerStore>,
}

impl PortalService {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }

    pub async fn login(&self, request: PortalLoginRequest) -> Result<PortalAuthResponse, PortalError> {
        let mut errors = FieldErrors::new();
        errors.require("email", &request.email);
        errors.require("password", &request.password);
        errors.finish()?;

        let Some(customer) = self
            .customers
            .find_by_portal_email(request.email.trim())
            .await?
        else {
            return Err(PortalError::InvalidCredentials);
        };

        let Some(stored_hash) = customer.password_hash.as_deref() else {
            return Err(PortalError::InvalidCredentials);
        };

        if !password::verify(&request.password, stored_hash) {
            return Err(PortalError::InvalidCredentials);
        }

        self.customers.touch_last_login(customer.id).await?;

        let token = auth::generate_jwt(Claims::for_customer(&customer))?;
        Ok(PortalAuthResponse {
            token,
            customer: PortalProfileResponse::from(&customer),
        })
    }

    pub async fn profile(&self, customer_id: Uuid) -> Result<PortalProfileResponse, PortalError> {
        let (customer, _) = self
            .customers
            .find_portal_enabled_with_matters(customer_id)
            .await?
            .ok_or(PortalError::CustomerNotFound)?;

        Ok(PortalProfileResponse::from(&customer))
    }

    pub async fn matters(&self, customer_id: Uuid) -> Result<Vec<MatterResponse>, PortalError> {
        let (customer, matters) = self
            .customers
            .find_portal_enabled_with_matters(customer_id)
            .await?
            .ok_or(PortalError::CustomerNotFound)?;

        Ok(matters
            .iter()
            .map(|m| MatterResponse::from_matter(m, Some(customer.name.clone())))
            .collect())
    }
}
