//! Ownership-scoped data access. Every non-create operation takes the
//! acting principal's id alongside the record id and restricts its result
//! to records transitively owned by that principal. A record owned by a
//! different principal is indistinguishable from one that does not exist.

pub mod customers;
pub mod matters;
pub mod users;

pub use customers::PgCustomerStore;
pub use matters::PgMatterStore;
pub use users::PgUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Customer, Matter, User};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub firm_name: String,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub user_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub password_hash: Option<String>,
    pub is_portal_enabled: bool,
}

/// Full-replace contact fields plus optional credential changes: `None`
/// leaves the stored hash / portal flag untouched.
#[derive(Debug, Clone)]
pub struct CustomerChanges {
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub password_hash: Option<String>,
    pub is_portal_enabled: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewMatter {
    pub customer_id: Uuid,
    pub name: String,
    pub description: String,
    pub case_type: Option<String>,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct MatterChanges {
    pub name: String,
    pub description: String,
    pub case_type: Option<String>,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
}

/// A customer row with its matter count, computed at read time
#[derive(Debug, Clone, FromRow)]
pub struct CustomerSummary {
    #[sqlx(flatten)]
    pub customer: Customer,
    pub matters_count: i64,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<CustomerSummary>, DatabaseError>;
    async fn find(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Customer>, DatabaseError>;
    async fn find_with_matters(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<(Customer, Vec<Matter>)>, DatabaseError>;
    async fn create(&self, customer: NewCustomer) -> Result<Customer, DatabaseError>;
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError>;
    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, DatabaseError>;
    async fn exists(&self, id: Uuid, owner_id: Uuid) -> Result<bool, DatabaseError>;
    /// Ownership probe: who owns this customer, regardless of the caller.
    /// Only the matter service uses this, to tell "nonexistent customer"
    /// apart from "someone else's customer".
    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, DatabaseError>;

    // Portal-side lookups, restricted to portal-enabled customers
    async fn find_by_portal_email(&self, email: &str) -> Result<Option<Customer>, DatabaseError>;
    async fn find_portal_enabled_with_matters(
        &self,
        id: Uuid,
    ) -> Result<Option<(Customer, Vec<Matter>)>, DatabaseError>;
    async fn touch_last_login(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait MatterStore: Send + Sync {
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<Matter>, DatabaseError>;
    async fn find(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Matter>, DatabaseError>;
    /// Unscoped existence probe backing the not-authorized distinction on
    /// update/delete; never returns row data.
    async fn exists_any(&self, id: Uuid, customer_id: Uuid) -> Result<bool, DatabaseError>;
    async fn create(&self, matter: NewMatter) -> Result<Matter, DatabaseError>;
    async fn update(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
        changes: MatterChanges,
    ) -> Result<Option<Matter>, DatabaseError>;
    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid, customer_id: Uuid, owner_id: Uuid)
        -> Result<bool, DatabaseError>;
}
