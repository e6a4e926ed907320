pub mod clock;
pub mod pipeline;
pub mod query;
pub mod row;
pub mod service;
pub mod source;

use serde::Serialize;

use crate::reporting::query::ReportQuery;
use crate::reporting::row::ReportingRow;

pub use clock::{Clock, FixedClock, SystemClock};
pub use query::{QueryError, RowFilter};
pub use service::{ReportError, TransactionReport};
pub use source::{MemoryTransactionSource, PgTransactionSource, SourceError, TransactionSource};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionPage {
    pub data: Vec<ReportingRow>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl TransactionPage {
    pub fn empty(query: &ReportQuery) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: query.page,
            limit: query.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransactionStatusView {
    pub status: String,
}
