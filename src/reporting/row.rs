use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

pub const DEFAULT_GATEWAY: &str = "Default Gateway";
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// One order joined with one of its status records, flattened for the
/// dashboard table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportingRow {
    pub collect_id: String,
    pub school_id: String,
    pub gateway: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_amount: Decimal,
    pub status: String,
    /// The status record's `bank_reference`.
    pub custom_order_id: String,
    pub created_at: DateTime<Utc>,
}

/// Reporting-row fields a report can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CollectId,
    SchoolId,
    Gateway,
    OrderAmount,
    TransactionAmount,
    Status,
    CustomOrderId,
    CreatedAt,
}

impl SortField {
    pub fn compare(&self, a: &ReportingRow, b: &ReportingRow) -> Ordering {
        match self {
            SortField::CollectId => a.collect_id.cmp(&b.collect_id),
            SortField::SchoolId => a.school_id.cmp(&b.school_id),
            SortField::Gateway => a.gateway.cmp(&b.gateway),
            SortField::OrderAmount => a.order_amount.cmp(&b.order_amount),
            SortField::TransactionAmount => a.transaction_amount.cmp(&b.transaction_amount),
            SortField::Status => a.status.cmp(&b.status),
            SortField::CustomOrderId => a.custom_order_id.cmp(&b.custom_order_id),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collect_id" => Ok(SortField::CollectId),
            "school_id" => Ok(SortField::SchoolId),
            "gateway" => Ok(SortField::Gateway),
            "order_amount" => Ok(SortField::OrderAmount),
            "transaction_amount" => Ok(SortField::TransactionAmount),
            "status" => Ok(SortField::Status),
            "custom_order_id" => Ok(SortField::CustomOrderId),
            // dashboard clients still send the camelCase name
            "created_at" | "createdAt" => Ok(SortField::CreatedAt),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}
