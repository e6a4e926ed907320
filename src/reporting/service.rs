use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::reporting::clock::Clock;
use crate::reporting::pipeline;
use crate::reporting::query::ReportQuery;
use crate::reporting::row::UNKNOWN_STATUS;
use crate::reporting::source::{SourceError, TransactionSource};
use crate::reporting::{TransactionPage, TransactionStatusView};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Transaction with ID {custom_order_id} not found.")]
    NotFound { custom_order_id: String },
    #[error("Failed to fetch transactions ({operation}): {source}")]
    Fetch {
        operation: &'static str,
        #[source]
        source: SourceError,
    },
}

impl ReportError {
    fn fetch(operation: &'static str) -> impl FnOnce(SourceError) -> ReportError {
        move |source| {
            error!(operation, error = %source, "Transaction store failure");
            ReportError::Fetch { operation, source }
        }
    }
}

/// Joined, filtered, paginated view over orders and their statuses.
#[derive(Clone)]
pub struct TransactionReport {
    source: Arc<dyn TransactionSource>,
    clock: Arc<dyn Clock>,
}

impl TransactionReport {
    pub fn new(source: Arc<dyn TransactionSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// Every reportable transaction. A `school_id` in the filter narrows
    /// the orders before the join.
    #[instrument(skip(self, query), fields(page = query.page, limit = query.limit))]
    pub async fn list_all(&self, query: &ReportQuery) -> Result<TransactionPage, ReportError> {
        self.build(query.filter.school_id.as_deref(), query).await
    }

    #[instrument(skip(self, query), fields(page = query.page, limit = query.limit))]
    pub async fn list_by_school(
        &self,
        school_id: &str,
        query: &ReportQuery,
    ) -> Result<TransactionPage, ReportError> {
        self.build(Some(school_id), query).await
    }

    /// Looks a transaction up by its custom order id, which is the
    /// status record's `bank_reference`. The stored status is returned as is;
    /// a record with no status at all reports `UNKNOWN`.
    #[instrument(skip(self))]
    pub async fn get_status(&self, custom_order_id: &str) -> Result<TransactionStatusView, ReportError> {
        let status = self
            .source
            .status_by_reference(custom_order_id)
            .await
            .map_err(ReportError::fetch("find status by reference"))?
            .ok_or_else(|| ReportError::NotFound {
                custom_order_id: custom_order_id.to_string(),
            })?;

        Ok(TransactionStatusView {
            // null status fallback
            status: status.status.unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        })
    }

    async fn build(
        &self,
        school_id: Option<&str>,
        query: &ReportQuery,
    ) -> Result<TransactionPage, ReportError> {
        let order_count = self
            .source
            .count_orders(school_id)
            .await
            .map_err(ReportError::fetch("count orders"))?;
        debug!(order_count, school_id, "Counted orders");

        if order_count == 0 {
            return Ok(TransactionPage::empty(query));
        }

        let orders = self
            .source
            .orders(school_id)
            .await
            .map_err(ReportError::fetch("fetch orders"))?;
        let collect_ids: Vec<_> = orders.iter().map(|order| order.id).collect();
        let statuses = self
            .source
            .statuses_for(&collect_ids)
            .await
            .map_err(ReportError::fetch("fetch order statuses"))?;

        let joined = pipeline::join(&orders, statuses);
        debug!(matched = joined.len(), "Joined orders with statuses");
        if joined.is_empty() {
            return Ok(TransactionPage::empty(query));
        }

        let now = self.clock.now();
        let rows = joined
            .into_iter()
            .map(|pair| pipeline::project(pair, now))
            .collect();
        let rows = pipeline::filter(rows, &query.filter);
        let rows = pipeline::sort(rows, query.sort, query.order);
        let page = pipeline::paginate(rows, query);

        info!(
            total = page.total,
            returned = page.data.len(),
            "Built transaction report"
        );
        Ok(page)
    }
}
