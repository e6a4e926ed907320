use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::connection::DbPool;
use crate::models::order::{CreateOrder, Order, OrderError};
use crate::models::order_status::{
    CreateOrderStatus, OrderStatus, OrderStatusError, SettleOrderStatus,
};
use crate::models::webhook_log::WebhookLog;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Orders(#[from] OrderError),
    #[error(transparent)]
    Statuses(#[from] OrderStatusError),
    #[error("Transaction store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the order and order-status stores.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn count_orders(&self, school_id: Option<&str>) -> Result<i64, SourceError>;

    /// Orders in a stable store order.
    async fn orders(&self, school_id: Option<&str>) -> Result<Vec<Order>, SourceError>;

    async fn statuses_for(&self, collect_ids: &[Uuid]) -> Result<Vec<OrderStatus>, SourceError>;

    async fn status_by_reference(&self, reference: &str) -> Result<Option<OrderStatus>, SourceError>;
}

pub struct PgTransactionSource {
    pool: DbPool,
}

impl PgTransactionSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionSource for PgTransactionSource {
    async fn count_orders(&self, school_id: Option<&str>) -> Result<i64, SourceError> {
        Ok(Order::count(&self.pool, school_id).await?)
    }

    async fn orders(&self, school_id: Option<&str>) -> Result<Vec<Order>, SourceError> {
        Ok(Order::find_all(&self.pool, school_id).await?)
    }

    async fn statuses_for(&self, collect_ids: &[Uuid]) -> Result<Vec<OrderStatus>, SourceError> {
        Ok(OrderStatus::find_by_collect_ids(&self.pool, collect_ids).await?)
    }

    async fn status_by_reference(&self, reference: &str) -> Result<Option<OrderStatus>, SourceError> {
        Ok(OrderStatus::find_by_bank_reference(&self.pool, reference).await?)
    }
}

/// Process-local stores, kept in insertion order.
#[derive(Default)]
pub struct MemoryTransactionSource {
    orders: RwLock<Vec<Order>>,
    statuses: RwLock<Vec<OrderStatus>>,
    webhook_logs: RwLock<Vec<WebhookLog>>,
}

impl MemoryTransactionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_order(&self, order: CreateOrder) -> Order {
        let order = Order {
            id: Uuid::new_v4(),
            school_id: order.school_id,
            trustee_id: order.trustee_id,
            gateway_name: order.gateway_name,
            student_name: order.student_name,
            student_id: order.student_id,
            student_email: order.student_email,
            created_at: order.created_at,
        };
        self.orders.write().await.push(order.clone());
        order
    }

    pub async fn insert_status(&self, status: CreateOrderStatus) -> OrderStatus {
        let created_at = status.created_at.unwrap_or_else(Utc::now);
        let status = OrderStatus {
            id: Uuid::new_v4(),
            collect_id: status.collect_id,
            order_amount: status.order_amount,
            transaction_amount: status.transaction_amount,
            payment_mode: status.payment_mode,
            payment_details: status.payment_details,
            payment_message: None,
            error_message: None,
            payment_time: None,
            bank_reference: Some(status.bank_reference),
            status: Some(status.status),
            created_at,
            updated_at: created_at,
        };
        self.statuses.write().await.push(status.clone());
        status
    }

    /// Inserts a status record exactly as given, missing fields included.
    pub async fn insert_raw_status(&self, status: OrderStatus) {
        self.statuses.write().await.push(status);
    }

    /// Settles the first status carrying `reference`, or returns `None`.
    pub async fn settle_status(
        &self,
        reference: &str,
        settle: SettleOrderStatus,
    ) -> Option<OrderStatus> {
        let mut statuses = self.statuses.write().await;
        let status = statuses
            .iter_mut()
            .find(|status| status.bank_reference.as_deref() == Some(reference))?;

        let now = Utc::now();
        status.status = Some(settle.status);
        status.transaction_amount = Some(settle.transaction_amount);
        status.payment_mode = Some(settle.payment_mode);
        status.payment_time = Some(now);
        status.updated_at = now;
        Some(status.clone())
    }

    pub async fn log_webhook(&self, payload: serde_json::Value) -> WebhookLog {
        let log = WebhookLog::new(payload);
        self.webhook_logs.write().await.push(log.clone());
        log
    }

    pub async fn webhook_logs(&self) -> Vec<WebhookLog> {
        self.webhook_logs.read().await.clone()
    }
}

#[async_trait]
impl TransactionSource for MemoryTransactionSource {
    async fn count_orders(&self, school_id: Option<&str>) -> Result<i64, SourceError> {
        Ok(self.orders(school_id).await?.len() as i64)
    }

    async fn orders(&self, school_id: Option<&str>) -> Result<Vec<Order>, SourceError> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|order| school_id.is_none_or(|id| order.school_id == id))
            .cloned()
            .collect())
    }

    async fn statuses_for(&self, collect_ids: &[Uuid]) -> Result<Vec<OrderStatus>, SourceError> {
        let statuses = self.statuses.read().await;
        Ok(statuses
            .iter()
            .filter(|status| collect_ids.contains(&status.collect_id))
            .cloned()
            .collect())
    }

    async fn status_by_reference(&self, reference: &str) -> Result<Option<OrderStatus>, SourceError> {
        let statuses = self.statuses.read().await;
        Ok(statuses
            .iter()
            .find(|status| status.bank_reference.as_deref() == Some(reference))
            .cloned())
    }
}
