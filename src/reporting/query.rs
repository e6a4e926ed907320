use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::reporting::row::{ReportingRow, SortField, SortOrder};
use crate::requests::transaction::TransactionQueryParams;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("{field} must be a positive integer, got {value:?}")]
    NotPositive { field: &'static str, value: String },
    #[error("Cannot sort by unknown field {0:?}")]
    UnknownSortField(String),
    #[error("order must be 'asc' or 'desc', got {0:?}")]
    InvalidOrder(String),
    #[error("{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("startDate must not be after endDate")]
    EmptyDateRange,
}

/// Row-level criteria applied after the join. `school_id` is not checked
/// here: it is pushed down to the order fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub status: Option<String>,
    pub school_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl RowFilter {
    pub fn matches(&self, row: &ReportingRow) -> bool {
        if let Some(status) = &self.status {
            if !row.status.eq_ignore_ascii_case(status) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if row.created_at < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if row.created_at > until {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<SortField>,
    pub order: SortOrder,
    pub filter: RowFilter,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: None,
            order: SortOrder::default(),
            filter: RowFilter::default(),
        }
    }
}

impl ReportQuery {
    pub fn from_params(params: &TransactionQueryParams) -> Result<Self, QueryError> {
        let page = match present(&params.page) {
            Some(raw) => positive("page", raw)?,
            None => DEFAULT_PAGE,
        };
        let limit = match present(&params.limit) {
            Some(raw) => positive("limit", raw)?,
            None => DEFAULT_LIMIT,
        };
        let sort = present(&params.sort)
            .map(|raw| {
                raw.parse::<SortField>()
                    .map_err(|_| QueryError::UnknownSortField(raw.to_string()))
            })
            .transpose()?;
        let order = present(&params.order)
            .map(|raw| {
                raw.parse::<SortOrder>()
                    .map_err(|_| QueryError::InvalidOrder(raw.to_string()))
            })
            .transpose()?
            .unwrap_or_default();

        let from = present(&params.start_date)
            .map(|raw| parse_bound("startDate", raw, NaiveTime::default()))
            .transpose()?;
        let until = present(&params.end_date)
            .map(|raw| parse_bound("endDate", raw, end_of_day()))
            .transpose()?;
        if let (Some(from), Some(until)) = (from, until) {
            if from > until {
                return Err(QueryError::EmptyDateRange);
            }
        }

        Ok(Self {
            page,
            limit,
            sort,
            order,
            filter: RowFilter {
                status: present(&params.status).map(str::to_string),
                school_id: present(&params.school_id).map(str::to_string),
                from,
                until,
            },
        })
    }

    /// Number of rows skipped before this page starts.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

// Dashboard forms submit untouched inputs as empty strings.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn positive(field: &'static str, raw: &str) -> Result<u32, QueryError> {
    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(QueryError::NotPositive {
            field,
            value: raw.to_string(),
        }),
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or_default()
}

fn parse_bound(field: &'static str, raw: &str, time: NaiveTime) -> Result<DateTime<Utc>, QueryError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(time).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| QueryError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}
