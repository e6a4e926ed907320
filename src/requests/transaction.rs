use serde::Deserialize;

/// Raw reporting query string. Everything arrives as text and is validated
/// by `ReportQuery::from_params`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub status: Option<String>,
    pub school_id: Option<String>,
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
}
