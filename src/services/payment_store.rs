use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::database::connection::DbPool;
use crate::models::order::{CreateOrder, Order, OrderError};
use crate::models::order_status::{
    CreateOrderStatus, OrderStatus, OrderStatusError, SettleOrderStatus,
};
use crate::models::webhook_log::{WebhookLog, WebhookLogError};
use crate::reporting::MemoryTransactionSource;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Orders(#[from] OrderError),
    #[error(transparent)]
    Statuses(#[from] OrderStatusError),
    #[error(transparent)]
    WebhookLogs(#[from] WebhookLogError),
}

/// Writes made by the payment link and gateway callback flows.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create_order(&self, order: CreateOrder) -> Result<Order, StoreError>;

    async fn create_status(&self, status: CreateOrderStatus) -> Result<OrderStatus, StoreError>;

    /// Fails with `OrderStatusError::NotFound` when no status carries
    /// `reference`.
    async fn settle_status(
        &self,
        reference: &str,
        settle: SettleOrderStatus,
    ) -> Result<OrderStatus, StoreError>;

    async fn log_webhook(&self, payload: &Value) -> Result<WebhookLog, StoreError>;
}

pub struct PgPaymentStore {
    pool: DbPool,
}

impl PgPaymentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn create_order(&self, order: CreateOrder) -> Result<Order, StoreError> {
        Ok(Order::create(&self.pool, order).await?)
    }

    async fn create_status(&self, status: CreateOrderStatus) -> Result<OrderStatus, StoreError> {
        Ok(OrderStatus::create(&self.pool, status).await?)
    }

    async fn settle_status(
        &self,
        reference: &str,
        settle: SettleOrderStatus,
    ) -> Result<OrderStatus, StoreError> {
        Ok(OrderStatus::settle(&self.pool, reference, settle).await?)
    }

    async fn log_webhook(&self, payload: &Value) -> Result<WebhookLog, StoreError> {
        Ok(WebhookLog::create(&self.pool, payload).await?)
    }
}

#[async_trait]
impl PaymentStore for MemoryTransactionSource {
    async fn create_order(&self, order: CreateOrder) -> Result<Order, StoreError> {
        Ok(self.insert_order(order).await)
    }

    async fn create_status(&self, status: CreateOrderStatus) -> Result<OrderStatus, StoreError> {
        Ok(self.insert_status(status).await)
    }

    async fn settle_status(
        &self,
        reference: &str,
        settle: SettleOrderStatus,
    ) -> Result<OrderStatus, StoreError> {
        MemoryTransactionSource::settle_status(self, reference, settle)
            .await
            .ok_or_else(|| {
                OrderStatusError::NotFound {
                    reference: reference.to_string(),
                }
                .into()
            })
    }

    async fn log_webhook(&self, payload: &Value) -> Result<WebhookLog, StoreError> {
        Ok(MemoryTransactionSource::log_webhook(self, payload.clone()).await)
    }
}
