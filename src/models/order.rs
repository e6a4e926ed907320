use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Static context of a payment attempt. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub school_id: String,
    pub trustee_id: String,
    pub gateway_name: Option<String>,
    pub student_name: Option<String>,
    pub student_id: Option<String>,
    pub student_email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateOrder {
    pub school_id: String,
    pub trustee_id: String,
    pub gateway_name: Option<String>,
    pub student_name: Option<String>,
    pub student_id: Option<String>,
    pub student_email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    pub async fn create(pool: &DbPool, order: CreateOrder) -> Result<Self, OrderError> {
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, school_id, trustee_id, gateway_name, student_name, student_id, student_email, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(order.school_id)
        .bind(order.trustee_id)
        .bind(order.gateway_name)
        .bind(order.student_name)
        .bind(order.student_id)
        .bind(order.student_email)
        .bind(order.created_at.unwrap_or_else(Utc::now))
        .fetch_one(pool)
        .await?;

        Ok(order)
    }

    /// Counts orders, optionally restricted to one school.
    pub async fn count(pool: &DbPool, school_id: Option<&str>) -> Result<i64, OrderError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE ($1::TEXT IS NULL OR school_id = $1)",
        )
        .bind(school_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Orders in insertion order, optionally restricted to one school. The
    /// ordering is deterministic so that pages stay stable between calls.
    pub async fn find_all(pool: &DbPool, school_id: Option<&str>) -> Result<Vec<Self>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders
             WHERE ($1::TEXT IS NULL OR school_id = $1)
             ORDER BY created_at ASC NULLS FIRST, id ASC",
        )
        .bind(school_id)
        .fetch_all(pool)
        .await?;

        Ok(orders)
    }

    pub async fn distinct_school_ids(pool: &DbPool) -> Result<Vec<String>, OrderError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT school_id FROM orders ORDER BY school_id",
        )
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }
}
