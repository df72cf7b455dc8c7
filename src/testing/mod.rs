//! In-memory implementations of the store traits plus record fixtures,
//! for exercising the service layer without a database. The memory store
//! mirrors the persistence contract: owner-scoped lookups and cascading
//! deletes behave as the SQL schema does.

use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Customer, Matter, User};
use crate::database::repositories::{
    CustomerChanges, CustomerStore, CustomerSummary, MatterChanges, MatterStore, NewCustomer,
    NewMatter, NewUser, UserStore,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    customers: Vec<Customer>,
    matters: Vec<Matter>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> User {
        let mut tables = self.tables.lock().unwrap();
        tables.users.push(user.clone());
        user
    }

    pub fn insert_customer(&self, customer: Customer) -> Customer {
        let mut tables = self.tables.lock().unwrap();
        tables.customers.push(customer.clone());
        customer
    }

    pub fn insert_matter(&self, matter: Matter) -> Matter {
        let mut tables = self.tables.lock().unwrap();
        tables.matters.push(matter.clone());
        matter
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn customer_count(&self) -> usize {
        self.tables.lock().unwrap().customers.len()
    }

    pub fn customer_by_id(&self, id: Uuid) -> Option<Customer> {
        let tables = self.tables.lock().unwrap();
        tables.customers.iter().find(|c| c.id == id).cloned()
    }

    pub fn matter_count_for(&self, customer_id: Uuid) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .matters
            .iter()
            .filter(|m| m.customer_id == customer_id)
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            firm_name: user.firm_name,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        Ok(self.insert_user(created))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().any(|u| u.email == email))
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<CustomerSummary>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<CustomerSummary> = tables
            .customers
            .iter()
            .filter(|c| c.user_id == owner_id)
            .map(|c| CustomerSummary {
                customer: c.clone(),
                matters_count: tables
                    .matters
                    .iter()
                    .filter(|m| m.customer_id == c.id)
                    .count() as i64,
            })
            .collect();
        rows.sort_by(|a, b| a.customer.name.cmp(&b.customer.name));
        Ok(rows)
    }

    async fn find(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Customer>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .find(|c| c.id == id && c.user_id == owner_id)
            .cloned())
    }

    async fn find_with_matters(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<(Customer, Vec<Matter>)>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let Some(customer) = tables
            .customers
            .iter()
            .find(|c| c.id == id && c.user_id == owner_id)
            .cloned()
        else {
            return Ok(None);
        };
        Ok(Some((customer.clone(), matters_of(&tables, customer.id))))
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, DatabaseError> {
        let created = Customer {
            id: Uuid::new_v4(),
            user_id: customer.user_id,
            name: customer.name,
            phone_number: customer.phone_number,
            email: customer.email,
            address: customer.address,
            notes: customer.notes,
            password_hash: customer.password_hash,
            is_portal_enabled: customer.is_portal_enabled,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        Ok(self.insert_customer(created))
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(customer) = tables
            .customers
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner_id)
        else {
            return Ok(None);
        };

        customer.name = changes.name;
        customer.phone_number = changes.phone_number;
        customer.email = changes.email;
        customer.address = changes.address;
        customer.notes = changes.notes;
        if let Some(hash) = changes.password_hash {
            customer.password_hash = Some(hash);
        }
        if let Some(enabled) = changes.is_portal_enabled {
            customer.is_portal_enabled = enabled;
        }
        customer.updated_at = chrono::Utc::now();
        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.customers.len();
        tables
            .customers
            .retain(|c| !(c.id == id && c.user_id == owner_id));
        let removed = tables.customers.len() < before;
        if removed {
            // ON DELETE CASCADE
            tables.matters.retain(|m| m.customer_id != id);
        }
        Ok(removed)
    }

    async fn exists(&self, id: Uuid, owner_id: Uuid) -> Result<bool, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .any(|c| c.id == id && c.user_id == owner_id))
    }

    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.user_id))
    }

    async fn find_by_portal_email(&self, email: &str) -> Result<Option<Customer>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .find(|c| c.is_portal_enabled && c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_portal_enabled_with_matters(
        &self,
        id: Uuid,
    ) -> Result<Option<(Customer, Vec<Matter>)>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let Some(customer) = tables
            .customers
            .iter()
            .find(|c| c.id == id && c.is_portal_enabled)
            .cloned()
        else {
            return Ok(None);
        };
        Ok(Some((customer.clone(), matters_of(&tables, customer.id))))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(customer) = tables.customers.iter_mut().find(|c| c.id == id) {
            customer.last_login = Some(chrono::Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl MatterStore for MemoryStore {
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<Matter>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        if !owned(&tables, customer_id, owner_id) {
            return Ok(vec![]);
        }
        Ok(matters_of(&tables, customer_id))
    }

    async fn find(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Matter>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        if !owned(&tables, customer_id, owner_id) {
            return Ok(None);
        }
        Ok(tables
            .matters
            .iter()
            .find(|m| m.id == id && m.customer_id == customer_id)
            .cloned())
    }

    async fn exists_any(&self, id: Uuid, customer_id: Uuid) -> Result<bool, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .matters
            .iter()
            .any(|m| m.id == id && m.customer_id == customer_id))
    }

    async fn create(&self, matter: NewMatter) -> Result<Matter, DatabaseError> {
        let created = Matter {
            id: Uuid::new_v4(),
            customer_id: matter.customer_id,
            name: matter.name,
            description: matter.description,
            case_type: matter.case_type,
            status: matter.status,
            start_date: matter.start_date,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        Ok(self.insert_matter(created))
    }

    async fn update(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
        changes: MatterChanges,
    ) -> Result<Option<Matter>, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if !owned(&tables, customer_id, owner_id) {
            return Ok(None);
        }
        let Some(matter) = tables
            .matters
            .iter_mut()
            .find(|m| m.id == id && m.customer_id == customer_id)
        else {
            return Ok(None);
        };

        matter.name = changes.name;
        matter.description = changes.description;
        matter.case_type = changes.case_type;
        matter.status = changes.status;
        matter.start_date = changes.start_date;
        matter.updated_at = chrono::Utc::now();
        Ok(Some(matter.clone()))
    }

    async fn delete(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if !owned(&tables, customer_id, owner_id) {
            return Ok(false);
        }
        let before = tables.matters.len();
        tables
            .matters
            .retain(|m| !(m.id == id && m.customer_id == customer_id));
        Ok(tables.matters.len() < before)
    }
}

fn owned(tables: &Tables, customer_id: Uuid, owner_id: Uuid) -> bool {
    tables
        .customers
        .iter()
        .any(|c| c.id == customer_id && c.user_id == owner_id)
}

fn matters_of(tables: &Tables, customer_id: Uuid) -> Vec<Matter> {
    let mut matters: Vec<Matter> = tables
        .matters
        .iter()
        .filter(|m| m.customer_id == customer_id)
        .cloned()
        .collect();
    matters.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matters
}

/// Record builders with the fields tests care about filled in
pub mod fixtures {
    use super::*;

    pub fn firm_user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: String::new(),
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            firm_name: "Smith & Partners".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    pub fn customer(owner_id: Uuid, name: &str) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            user_id: owner_id,
            name: name.to_string(),
            phone_number: "555-0123".to_string(),
            email: None,
            address: None,
            notes: None,
            password_hash: None,
            is_portal_enabled: false,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    pub fn portal_customer(owner_id: Uuid, email: &str, password_hash: &str) -> Customer {
        Customer {
            email: Some(email.to_string()),
            password_hash: Some(password_hash.to_string()),
            is_portal_enabled: true,
            ..customer(owner_id, "Portal Customer")
        }
    }

    pub fn matter(customer_id: Uuid, name: &str) -> Matter {
        Matter {
            id: Uuid::new_v4(),
            customer_id,
            name: name.to_string(),
            description: "Test matter".to_string(),
            case_type: None,
            status: "Active".to_string(),
            start_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }
}
