use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Matter;

use super::{MatterChanges, MatterStore, NewMatter};

/// All scoped queries join through customers so the two-level ownership
/// check (matter -> customer -> firm user) happens in one statement.
#[derive(Clone)]
pub struct PgMatterStore {
    pool: PgPool,
}

impl PgMatterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatterStore for PgMatterStore {
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<Matter>, DatabaseError> {
        let matters = sqlx::query_as::<_, Matter>(
            r#"
            SELECT m.*
            FROM matters m
            JOIN customers c ON c.id = m.customer_id
            WHERE m.customer_id = $1 AND c.user_id = $2
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(customer_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(matters)
    }

    async fn find(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Matter>, DatabaseError> {
        let matter = sqlx::query_as::<_, Matter>(
            r#"
            SELECT m.*
            FROM matters m
            JOIN customers c ON c.id = m.customer_id
            WHERE m.id = $1 AND m.customer_id = $2 AND c.user_id = $3
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(matter)
    }

    async fn exists_any(&self, id: Uuid, customer_id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM matters WHERE id = $1 AND customer_id = $2)",
        )
        .bind(id)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, matter: NewMatter) -> Result<Matter, DatabaseError> {
        let created = sqlx::query_as::<_, Matter>(
            r#"
            INSERT INTO matters (customer_id, name, description, case_type, status, start_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(matter.customer_id)
        .bind(&matter.name)
        .bind(&matter.description)
        .bind(&matter.case_type)
        .bind(&matter.status)
        .bind(matter.start_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
        changes: MatterChanges,
    ) -> Result<Option<Matter>, DatabaseError> {
        let updated = sqlx::query_as::<_, Matter>(
            r#"
            UPDATE matters m
            SET name = $1,
                description = $2,
                case_type = $3,
                status = $4,
                start_date = $5,
                updated_at = now()
            FROM customers c
            WHERE m.id = $6
              AND m.customer_id = $7
              AND c.id = m.customer_id
              AND c.user_id = $8
            RETURNING m.*
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.case_type)
        .bind(&changes.status)
        .bind(changes.start_date)
        .bind(id)
        .bind(customer_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(
        &self,
        id: Uuid,
        customer_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            DELETE FROM matters m
            USING customers c
            WHERE m.id = $1
              AND m.customer_id = $2
              AND c.id = m.customer_id
              AND c.user_id = $3
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
