use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::password;
use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::models::{Customer, Matter};
use crate::database::repositories::{CustomerChanges, CustomerStore, NewCustomer};
use crate::services::matter_service::MatterResponse;
use crate::services::validation::{FieldErrors, ValidationError};

#[derive(Debug, Error)]
pub enum CustomerError {
    /// Also covers "exists but belongs to a different firm" - the two are
    /// deliberately indistinguishable so ids cannot be probed
    #[error("Customer not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Hash(#[from] password::BcryptError),
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub enable_portal_access: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub password: Option<String>,
    pub enable_portal_access: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_portal_enabled: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub matters_count: i64,
}

impl CustomerResponse {
    fn from_customer(customer: &Customer, matters_count: i64) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            phone_number: customer.phone_number.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
            notes: customer.notes.clone(),
            is_portal_enabled: customer.is_portal_enabled,
            last_login: customer.last_login,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
            matters_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerWithMattersResponse {
    #[serde(flatten)]
    pub customer: CustomerResponse,
    pub matters: Vec<MatterResponse>,
}

/// Firm-side customer CRUD. Every operation is scoped to the caller's
/// owner id; the portal side of a customer record is managed here too
/// (enabling access, setting the portal password).
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<CustomerResponse>, CustomerError> {
        let customers = self.customers.list_by_owner(owner_id).await?;
        Ok(customers
            .iter()
            .map(|row| CustomerResponse::from_customer(&row.customer, row.matters_count))
            .collect())
    }

    pub async fn get(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<CustomerWithMattersResponse, CustomerError> {
        let (customer, matters) = self
            .customers
            .find_with_matters(customer_id, owner_id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        Ok(with_matters(&customer, &matters))
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateCustomerRequest,
    ) -> Result<CustomerResponse, CustomerError> {
        let mut errors = FieldErrors::new();
        errors.require("name", &request.name);
        errors.require("phone_number", &request.phone_number);
        let email = normalize(request.email);
        if let Some(email) = &email {
            errors.check_email("email", email);
        }
        let password = normalize(request.password);
        if request.enable_portal_access {
            check_portal_fields(&mut errors, email.as_deref(), password.as_deref(), false);
        }
        errors.finish()?;

        let password_hash = password.as_deref().map(password::hash).transpose()?;

        let customer = self
            .customers
            .create(NewCustomer {
                user_id: owner_id,
                name: request.name.trim().to_string(),
                phone_number: request.phone_number.trim().to_string(),
                email,
                address: normalize(request.address),
                notes: normalize(request.notes),
                password_hash,
                is_portal_enabled: request.enable_portal_access,
            })
            .await?;

        Ok(CustomerResponse::from_customer(&customer, 0))
    }

    pub async fn update(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<CustomerResponse, CustomerError> {
        // Input-only checks run before any persistence access
        let mut errors = FieldErrors::new();
        errors.require("name", &request.name);
        errors.require("phone_number", &request.phone_number);
        let email = normalize(request.email);
        if let Some(email) = &email {
            errors.check_email("email", email);
        }
        let password = normalize(request.password);
        errors.finish()?;

        let (existing, matters) = self
            .customers
            .find_with_matters(customer_id, owner_id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        // Portal credential rules depend on what is already stored
        let portal_enabled = request
            .enable_portal_access
            .unwrap_or(existing.is_portal_enabled);
        if portal_enabled {
            let mut errors = FieldErrors::new();
            check_portal_fields(
                &mut errors,
                email.as_deref(),
                password.as_deref(),
                existing.password_hash.is_some(),
            );
            errors.finish()?;
        }

        let password_hash = password.as_deref().map(password::hash).transpose()?;

        let updated = self
            .customers
            .update(
                customer_id,
                owner_id,
                CustomerChanges {
                    name: request.name.trim().to_string(),
                    phone_number: request.phone_number.trim().to_string(),
                    email,
                    address: normalize(request.address),
                    notes: normalize(request.notes),
                    password_hash,
                    is_portal_enabled: request.enable_portal_access,
                },
            )
            .await?
            .ok_or(CustomerError::NotFound)?;

        Ok(CustomerResponse::from_customer(&updated, matters.len() as i64))
    }

    pub async fn delete(&self, customer_id: Uuid, owner_id: Uuid) -> Result<(), CustomerError> {
        if !self.customers.delete(customer_id, owner_id).await? {
            return Err(CustomerError::NotFound);
        }
        Ok(())
    }
}

fn with_matters(customer: &Customer, matters: &[Matter]) -> CustomerWithMattersResponse {
    CustomerWithMattersResponse {
        customer: CustomerResponse::from_customer(customer, matters.len() as i64),
        matters: matters
            .iter()
            .map(|m| MatterResponse::from_matter(m, None))
            .collect(),
    }
}

/// Enabling portal access needs a login email and either a fresh password
/// or one already on file; password length is only checked here.
fn check_portal_fields(
    errors: &mut FieldErrors,
    email: Option<&str>,
    password: Option<&str>,
    has_stored_hash: bool,
) {
    if email.is_none() {
        errors.add("email", "An email is required to enable portal access");
    }
    match password {
        Some(password) => {
            let min = config::config().security.portal_min_password_len;
            errors.check_min_len("password", password, min);
        }
        None if !has_stored_hash => {
            errors.add("password", "A password is required to enable portal access");
        }
        None => {}
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
