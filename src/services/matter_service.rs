use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Matter;
use crate::database::repositories::{CustomerStore, MatterChanges, MatterStore, NewMatter};
use crate::services::validation::{FieldErrors, ValidationError};

#[derive(Debug, Error)]
pub enum MatterError {
    #[error("Matter not found")]
    NotFound,
    #[error("Customer not found")]
    CustomerNotFound,
    /// Raised only once the record's existence is already revealed:
    /// mutating a matter that was located under someone else's customer,
    /// or creating under a customer known to belong to another firm.
    #[error("Not authorized")]
    NotAuthorized,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

fn default_status() -> String {
    "Active".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateMatterRequest {
    pub name: String,
    pub description: String,
    pub case_type: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatterRequest {
    pub name: String,
    pub description: String,
    pub case_type: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MatterResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub description: String,
    pub case_type: Option<String>,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Derived at read time from the parent customer, never stored
    pub customer_name: Option<String>,
}

impl MatterResponse {
    pub(crate) fn from_matter(matter: &Matter, customer_name: Option<String>) -> Self {
        Self {
            id: matter.id,
            customer_id: matter.customer_id,
            name: matter.name.clone(),
            description: matter.description.clone(),
            case_type: matter.case_type.clone(),
            status: matter.status.clone(),
            start_date: matter.start_date,
            created_at: matter.created_at,
            updated_at: matter.updated_at,
            customer_name,
        }
    }
}

/// Matter CRUD under a customer. Ownership is two-level: the caller must
/// own the parent customer, checked before (reads) or as part of
/// (mutations) every matter lookup.
#[derive(Clone)]
pub struct MatterService {
    matters: Arc<dyn MatterStore>,
    customers: Arc<dyn CustomerStore>,
}

impl MatterService {
    pub fn new(matters: Arc<dyn MatterStore>, customers: Arc<dyn CustomerStore>) -> Self {
        Self { matters, customers }
    }

    pub async fn list(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<MatterResponse>, MatterError> {
        let customer = self
            .customers
            .find(customer_id, owner_id)
            .await?
            .ok_or(MatterError::CustomerNotFound)?;

        let matters = self.matters.list_by_customer(customer_id, owner_id).await?;
        Ok(matters
            .iter()
            .map(|m| MatterResponse::from_matter(m, Some(customer.name.clone())))
            .collect())
    }

    pub async fn get(
        &self,
        matter_id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<MatterResponse, MatterError> {
        let customer = self
            .customers
            .find(customer_id, owner_id)
            .await?
            .ok_or(MatterError::CustomerNotFound)?;

        let matter = self
            .matters
            .find(matter_id, customer_id, owner_id)
            .await?
            .ok_or(MatterError::NotFound)?;

        Ok(MatterResponse::from_matter(&matter, Some(customer.name)))
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
        request: CreateMatterRequest,
    ) -> Result<MatterResponse, MatterError> {
        validate(&request.name, &request.description, &request.status)?;

        if self.customers.find(customer_id, owner_id).await?.is_none() {
            // Creating under an existing customer owned by another firm is
            // the one create case where existence is already conceded
            return Err(match self.customers.owner_of(customer_id).await? {
                Some(_) => MatterError::NotAuthorized,
                None => MatterError::CustomerNotFound,
            });
        }

        let matter = self
            .matters
            .create(NewMatter {
                customer_id,
                name: request.name.trim().to_string(),
                description: request.description.trim().to_string(),
                case_type: normalize(request.case_type),
                status: request.status.trim().to_string(),
                start_date: request.start_date,
            })
            .await?;

        Ok(MatterResponse::from_matter(&matter, None))
    }

    pub async fn update(
        &self,
        matter_id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
        request: UpdateMatterRequest,
    ) -> Result<MatterResponse, MatterError> {
        validate(&request.name, &request.description, &request.status)?;

        let Some(customer) = self.customers.find(customer_id, owner_id).await? else {
            return Err(self.mutation_denial(matter_id, customer_id).await?);
        };

        let updated = self
            .matters
            .update(
                matter_id,
                customer_id,
                owner_id,
                MatterChanges {
                    name: request.name.trim().to_string(),
                    description: request.description.trim().to_string(),
                    case_type: normalize(request.case_type),
                    status: request.status.trim().to_string(),
                    start_date: request.start_date,
                },
            )
            .await?
            .ok_or(MatterError::NotFound)?;

        Ok(MatterResponse::from_matter(&updated, Some(customer.name)))
    }

    pub async fn delete(
        &self,
        matter_id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), MatterError> {
        if self.customers.find(customer_id, owner_id).await?.is_none() {
            return Err(self.mutation_denial(matter_id, customer_id).await?);
        }

        if !self.matters.delete(matter_id, customer_id, owner_id).await? {
            return Err(MatterError::NotFound);
        }
        Ok(())
    }

    /// The caller does not own `customer_id`. A mutation is answered with
    /// not-authorized only when the target matter actually exists under
    /// that customer; otherwise it collapses to not-found.
    async fn mutation_denial(
        &self,
        matter_id: Uuid,
        customer_id: Uuid,
    ) -> Result<MatterError, MatterError> {
        if self.customers.owner_of(customer_id).await?.is_some()
            && self.matters.exists_any(matter_id, customer_id).await?
        {
            Ok(MatterError::NotAuthorized)
        } else {
            Ok(MatterError::NotFound)
        }
    }
}

fn validate(name: &str, description: &str, status: &str) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::new();
    errors.require("name", name);
    errors.require("description", description);
    errors.require("status", status);
    errors.finish()
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryStore};

    fn service() -> (MatterService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (MatterService::new(store.clone(), store.clone()), store)
    }

    fn create_request(name: &str) -> CreateMatterRequest {
        CreateMatterRequest {
            name: name.to_string(),
            description: "Contested divorce case".to_string(),
            case_type: Some("Family Law".to_string()),
            status: "Active".to_string(),
            start_date: None,
        }
    }

    fn update_request(name: &str) -> UpdateMatterRequest {
        UpdateMatterRequest {
            name: name.to_string(),
            description: "Updated description".to_string(),
            case_type: None,
            status: "Closed".to_string(),
            start_date: None,
        }
    }

    #[tokio::test]
    async fn create_and_list_under_own_customer() {
        let (service, store) = service();
        let owner = store.insert_user(fixtures::firm_user("owner@firm.test"));
        let customer = store.insert_customer(fixtures::customer(owner.id, "Jane Smith"));

        service.create(customer.id, owner.id, create_request("Divorce Proceedings")).await.unwrap();

        let listed = service.list(customer.id, owner.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_name.as_deref(), Some("Jane Smith"));
    }

    #[tokio::test]
    async fn cross_owner_reads_are_not_found_never_the_payload() {
        let (service, store) = service();
        let owner = store.insert_user(fixtures::firm_user("one@firm.test"));
        let other = store.insert_user(fixtures::firm_user("two@firm.test"));
        let customer = store.insert_customer(fixtures::customer(owner.id, "Jane Smith"));
        let matter = store.insert_matter(fixtures::matter(customer.id, "Divorce Proceedings"));

        assert!(service.get(matter.id, customer.id, owner.id).await.is_ok());

        let err = service.get(matter.id, customer.id, other.id).await.unwrap_err();
        assert!(matches!(err, MatterError::CustomerNotFound));
        let err = service.list(customer.id, other.id).await.unwrap_err();
        assert!(matches!(err, MatterError::CustomerNotFound));
    }

    #[tokio::test]
    async fn mutating_a_located_foreign_matter_is_not_authorized() {
        let (service, store) = service();
        let owner = store.insert_user(fixtures::firm_user("one@firm.test"));
        let other = store.insert_user(fixtures::firm_user("two@firm.test"));
        let customer = store.insert_customer(fixtures::customer(owner.id, "Jane Smith"));
        let matter = store.insert_matter(fixtures::matter(customer.id, "Divorce Proceedings"));

        let err = service
            .update(matter.id, customer.id, other.id, update_request("Hijacked"))
            .await
            .unwrap_err();
        assert!(matches!(err, MatterError::NotAuthorized));

        let err = service.delete(matter.id, customer.id, other.id).await.unwrap_err();
        assert!(matches!(err, MatterError::NotAuthorized));

        // Nothing changed for the real owner
        let fetched = service.get(matter.id, customer.id, owner.id).await.unwrap();
        assert_eq!(fetched.name, "Divorce Proceedings");
    }

    #[tokio::test]
    async fn mutating_a_missing_matter_under_a_foreign_customer_is_not_found() {
        let (service, store) = service();
        let owner = store.insert_user(fixtures::firm_user("one@firm.test"));
        let other = store.insert_user(fixtures::firm_user("two@firm.test"));
        let customer = store.insert_customer(fixtures::customer(owner.id, "Jane Smith"));

        let err = service
            .update(Uuid::new_v4(), customer.id, other.id, update_request("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, MatterError::NotFound));
    }

    #[tokio::test]
    async fn create_distinguishes_missing_from_foreign_customer() {
        let (service, store) = service();
        let owner = store.insert_user(fixtures::firm_user("one@firm.test"));
        let other = store.insert_user(fixtures::firm_user("two@firm.test"));
        let customer = store.insert_customer(fixtures::customer(owner.id, "Jane Smith"));

        let err = service
            .create(Uuid::new_v4(), other.id, create_request("Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, MatterError::CustomerNotFound));

        let err = service
            .create(customer.id, other.id, create_request("Trespass"))
            .await
            .unwrap_err();
        assert!(matches!(err, MatterError::NotAuthorized));
    }

    #[tokio::test]
    async fn blank_required_fields_fail_before_ownership_checks() {
        let (service, store) = service();
        let owner = store.insert_user(fixtures::firm_user("owner@firm.test"));
        let customer = store.insert_customer(fixtures::customer(owner.id, "Jane Smith"));

        let err = service
            .create(
                customer.id,
                owner.id,
                CreateMatterRequest {
                    name: "".to_string(),
                    description: " ".to_string(),
                    case_type: None,
                    status: "Active".to_string(),
                    start_date: None,
                },
            )
            .await
            .unwrap_err();

        let MatterError::Validation(validation) = err else {
            panic!("expected validation error");
        };
        assert!(validation.field_errors.contains_key("name"));
        assert!(validation.field_errors.contains_key("description"));
        assert_eq!(store.matter_count_for(customer.id), 0);
    }
}
