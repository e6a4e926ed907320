use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};
use tracing::{error, info, warn};

use crate::database::connection::DbPool;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::order::Order;
use crate::models::user::{SchoolSummary, User, UserRole};
use crate::reporting::query::ReportQuery;
use crate::reporting::{ReportError, TransactionReport};
use crate::requests::transaction::TransactionQueryParams;
use crate::utils::helpers::error_response;

pub async fn all(
    report: web::Data<TransactionReport>,
    params: web::Query<TransactionQueryParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    info!("Listing transactions for user: {}", user.user_id);

    let query = match ReportQuery::from_params(&params) {
        Ok(query) => query,
        Err(e) => {
            warn!("Rejected transaction query: {}", e);
            return Ok(error_response(StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    match report.list_all(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(report_failure(e)),
    }
}

pub async fn by_school(
    report: web::Data<TransactionReport>,
    path: web::Path<String>,
    params: web::Query<TransactionQueryParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let school_id = path.into_inner();
    info!(
        "Listing transactions of school {} for user: {}",
        school_id, user.user_id
    );

    let query = match ReportQuery::from_params(&params) {
        Ok(query) => query,
        Err(e) => {
            warn!("Rejected transaction query: {}", e);
            return Ok(error_response(StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    match report.list_by_school(&school_id, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(report_failure(e)),
    }
}

pub async fn status(
    report: web::Data<TransactionReport>,
    path: web::Path<String>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let custom_order_id = path.into_inner();
    info!("Checking status of transaction {}", custom_order_id);

    match report.get_status(&custom_order_id).await {
        Ok(view) => Ok(HttpResponse::Ok().json(view)),
        Err(e) => Ok(report_failure(e)),
    }
}

pub async fn schools(pool: web::Data<DbPool>, _user: AuthenticatedUser) -> Result<HttpResponse> {
    info!("Listing schools");

    let users = match User::find_by_role(&pool, UserRole::School).await {
        Ok(users) => users,
        Err(e) => {
            error!("Database error listing school users: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch schools",
            ));
        }
    };

    if !users.is_empty() {
        let schools: Vec<_> = users.iter().map(User::school_summary).collect();
        return Ok(HttpResponse::Ok().json(schools));
    }

    match Order::distinct_school_ids(&pool).await {
        Ok(ids) => {
            let schools: Vec<_> = ids
                .into_iter()
                .map(|id| SchoolSummary {
                    name: format!("School {}", id),
                    id,
                })
                .collect();
            Ok(HttpResponse::Ok().json(schools))
        }
        Err(e) => {
            error!("Database error listing order schools: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch schools",
            ))
        }
    }
}

fn report_failure(e: ReportError) -> HttpResponse {
    match e {
        ReportError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, e.to_string()),
        ReportError::Fetch { operation, .. } => {
            error!(operation, "Transaction report failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch transactions",
            )
        }
    }
}
