use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Customer, Matter};

use super::{CustomerChanges, CustomerStore, CustomerSummary, NewCustomer};

#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn matters_of(&self, customer_id: Uuid) -> Result<Vec<Matter>, DatabaseError> {
        let matters = sqlx::query_as::<_, Matter>(
            "SELECT * FROM matters WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(matters)
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<CustomerSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerSummary>(
            r#"
            SELECT c.*, COUNT(m.id) AS matters_count
            FROM customers c
            LEFT JOIN matters m ON m.customer_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Customer>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_with_matters(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<(Customer, Vec<Matter>)>, DatabaseError> {
        let Some(customer) = self.find(id, owner_id).await? else {
            return Ok(None);
        };
        let matters = self.matters_of(customer.id).await?;
        Ok(Some((customer, matters)))
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, DatabaseError> {
        let created = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers
                (user_id, name, phone_number, email, address, notes, password_hash, is_portal_enabled)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(customer.user_id)
        .bind(&customer.name)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.notes)
        .bind(&customer.password_hash)
        .bind(customer.is_portal_enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, DatabaseError> {
        let updated = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $1,
                phone_number = $2,
                email = $3,
                address = $4,
                notes = $5,
                password_hash = COALESCE($6, password_hash),
                is_portal_enabled = COALESCE($7, is_portal_enabled),
                updated_at = now()
            WHERE id = $8 AND user_id = $9
            RETURNING *
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.phone_number)
        .bind(&changes.email)
        .bind(&changes.address)
        .bind(&changes.notes)
        .bind(&changes.password_hash)
        .bind(changes.is_portal_enabled)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid, owner_id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, DatabaseError> {
        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM customers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(owner)
    }

    async fn find_by_portal_email(&self, email: &str) -> Result<Option<Customer>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE email = $1 AND is_portal_enabled",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_portal_enabled_with_matters(
        &self,
        id: Uuid,
    ) -> Result<Option<(Customer, Vec<Matter>)>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND is_portal_enabled",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(customer) = customer else {
            return Ok(None);
        };
        let matters = self.matters_of(customer.id).await?;
        Ok(Some((customer, matters)))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE customers SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
