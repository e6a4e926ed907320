use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum OrderStatusError {
    #[error("Order status with bank_reference {reference} not found")]
    NotFound { reference: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// States this service writes itself. Gateway callbacks may report others;
/// status columns are plain strings so those pass through untouched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentState {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Pending => "PENDING",
            PaymentState::Completed => "COMPLETED",
            PaymentState::Failed => "FAILED",
            PaymentState::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a payment attempt, keyed to its order by `collect_id`.
///
/// `bank_reference` holds the gateway's collect request id and is also the
/// public "custom order id" used by status lookups and webhook matching.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderStatus {
    pub id: Uuid,
    pub collect_id: Uuid,
    pub order_amount: Option<Decimal>,
    pub transaction_amount: Option<Decimal>,
    pub payment_mode: Option<String>,
    pub payment_details: Option<String>,
    pub payment_message: Option<String>,
    pub error_message: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
    pub bank_reference: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderStatus {
    pub collect_id: Uuid,
    pub order_amount: Option<Decimal>,
    pub transaction_amount: Option<Decimal>,
    pub payment_mode: Option<String>,
    pub payment_details: Option<String>,
    pub bank_reference: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateOrderStatus {
    pub fn pending(collect_id: Uuid, order_amount: Decimal, bank_reference: String) -> Self {
        Self {
            collect_id,
            order_amount: Some(order_amount),
            transaction_amount: None,
            payment_mode: None,
            payment_details: None,
            bank_reference,
            status: PaymentState::Pending.to_string(),
            created_at: None,
        }
    }
}

/// Fields the gateway callback settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleOrderStatus {
    pub status: String,
    pub transaction_amount: Decimal,
    pub payment_mode: String,
}

impl OrderStatus {
    pub async fn create(pool: &DbPool, status: CreateOrderStatus) -> Result<Self, OrderStatusError> {
        let created_at = status.created_at.unwrap_or_else(Utc::now);

        let status = sqlx::query_as::<_, OrderStatus>(
            "INSERT INTO order_statuses (id, collect_id, order_amount, transaction_amount, payment_mode, payment_details, bank_reference, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(status.collect_id)
        .bind(status.order_amount)
        .bind(status.transaction_amount)
        .bind(status.payment_mode)
        .bind(status.payment_details)
        .bind(status.bank_reference)
        .bind(status.status)
        .bind(created_at)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(status)
    }

    /// All statuses belonging to any of the given orders, in insertion order.
    pub async fn find_by_collect_ids(
        pool: &DbPool,
        collect_ids: &[Uuid],
    ) -> Result<Vec<Self>, OrderStatusError> {
        if collect_ids.is_empty() {
            return Ok(Vec::new());
        }

        let statuses = sqlx::query_as::<_, OrderStatus>(
            "SELECT * FROM order_statuses
             WHERE collect_id = ANY($1)
             ORDER BY created_at ASC, id ASC",
        )
        .bind(collect_ids)
        .fetch_all(pool)
        .await?;

        Ok(statuses)
    }

    pub async fn find_by_bank_reference(
        pool: &DbPool,
        reference: &str,
    ) -> Result<Option<Self>, OrderStatusError> {
        let status = sqlx::query_as::<_, OrderStatus>(
            "SELECT * FROM order_statuses WHERE bank_reference = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(reference)
        .fetch_optional(pool)
        .await?;

        Ok(status)
    }

    /// Applies a gateway callback to the status row matched by
    /// `bank_reference`. `collect_id` is never touched.
    pub async fn settle(
        pool: &DbPool,
        reference: &str,
        settle: SettleOrderStatus,
    ) -> Result<Self, OrderStatusError> {
        let updated = sqlx::query_as::<_, OrderStatus>(
            r#"
            UPDATE order_statuses
            SET
                status = $2,
                transaction_amount = $3,
                payment_mode = $4,
                payment_time = $5,
                updated_at = $5
            WHERE id = (
                SELECT id FROM order_statuses
                WHERE bank_reference = $1
                ORDER BY created_at ASC
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(reference)
        .bind(settle.status)
        .bind(settle.transaction_amount)
        .bind(settle.payment_mode)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        updated.ok_or_else(|| OrderStatusError::NotFound {
            reference: reference.to_string(),
        })
    }
}
