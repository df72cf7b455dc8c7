use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A legal case. Ownership is transitive: a matter belongs to whoever owns
/// its parent customer, so every lookup joins through `customer_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Matter {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub description: String,
    pub case_type: Option<String>,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
