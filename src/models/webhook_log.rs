use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum WebhookLogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Append-only record of a raw gateway callback.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WebhookLog {
    pub id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl WebhookLog {
    /// Builds an unsaved log entry stamped with the current time.
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            created_at: Utc::now(),
        }
    }

    pub async fn create(pool: &DbPool, payload: &serde_json::Value) -> Result<Self, WebhookLogError> {
        let entry = Self::new(payload.clone());
        let log = sqlx::query_as::<_, WebhookLog>(
            "INSERT INTO webhook_logs (id, payload, created_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(entry.id)
        .bind(entry.payload)
        .bind(entry.created_at)
        .fetch_one(pool)
        .await?;

        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_keeps_payload_verbatim() {
        let payload = serde_json::json!({ "status": 200, "order_info": { "order_id": "" } });
        let log = WebhookLog::new(payload.clone());
        assert_eq!(log.payload, payload);
    }
}
