use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::AuthResponse,
        user::{CreateUser, User, UserError, UserRole},
    },
    requests::register::{LoginRequest, SignupRequest},
    services::auth::AuthService,
    utils::helpers::{error_response, ApiResponse},
};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};
use tracing::{error, info, warn};

pub async fn signup(
    pool: web::Data<DbPool>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    if let Err(message) = request.validate() {
        return Ok(error_response(StatusCode::BAD_REQUEST, message));
    }

    let request = request.into_inner();
    let create_user = CreateUser {
        email: request.email,
        password: request.password,
        name: request.name,
        school_id: request.school_id,
        role: UserRole::School,
    };

    match User::create(&pool, create_user).await {
        Ok(user) => {
            info!("Registered user: {}", user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(user)))
        }
        Err(UserError::EmailTaken) => Ok(error_response(
            StatusCode::CONFLICT,
            "Email already exists",
        )),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user",
            ))
        }
    }
}

pub async fn login(
    pool: web::Data<DbPool>,
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let user = match auth_service
        .authenticate_user(&pool, &request.email, &request.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Invalid credentials for user: {}", request.email);
            return Ok(error_response(StatusCode::UNAUTHORIZED, "Invalid credentials"));
        }
        Err(e) => {
            error!("Authentication error: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication error",
            ));
        }
    };

    let access_token = auth_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        actix_web::error::ErrorInternalServerError("Failed to generate token")
    })?;

    Ok(HttpResponse::Ok().json(AuthResponse { access_token }))
}

pub async fn profile(pool: web::Data<DbPool>, user: AuthenticatedUser) -> Result<HttpResponse> {
    match User::find_by_id(&pool, user.user_id).await {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(ApiResponse::success(profile))),
        Ok(None) => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            "Please log in to access this endpoint.",
        )),
        Err(e) => {
            error!("Failed to load profile {}: {}", user.user_id, e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load profile",
            ))
        }
    }
}
