use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{error::InternalError, web, Error, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::{error, warn};
use uuid::Uuid;

use crate::services::auth::AuthService;
use crate::utils::helpers::error_response;

/// Caller identity taken from a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let auth = req.app_data::<web::Data<AuthService>>().ok_or_else(|| {
        error!("AuthService is not registered as app data");
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Authentication service error")
    })?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

    let claims = auth.verify_token(token).map_err(|e| {
        warn!("Rejected access token: {}", e);
        reject(
            StatusCode::UNAUTHORIZED,
            "Please log in to access this endpoint.",
        )
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

fn reject(status: StatusCode, message: &'static str) -> Error {
    InternalError::from_response(message, error_response(status, message)).into()
}
