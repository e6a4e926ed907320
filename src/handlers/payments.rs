use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::middleware::auth::AuthenticatedUser;
use crate::models::order::CreateOrder;
use crate::models::order_status::{CreateOrderStatus, OrderStatusError, SettleOrderStatus};
use crate::requests::payment::CreatePaymentRequest;
use crate::requests::webhook::WebhookPayload;
use crate::services::gateway::{GatewayError, PaymentGateway};
use crate::services::payment_store::{PaymentStore, StoreError};
use crate::utils::helpers::{error_response, ApiResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub payment_url: String,
}

pub async fn create(
    store: web::Data<dyn PaymentStore>,
    gateway: web::Data<PaymentGateway>,
    request: web::Json<CreatePaymentRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    info!("Creating payment for user: {}", user.user_id);

    if let Err(message) = request.validate() {
        return Ok(error_response(StatusCode::BAD_REQUEST, message));
    }

    let school_id = match gateway.school_id() {
        Ok(id) => id.to_string(),
        Err(e) => {
            error!("Cannot create payment: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Payment gateway is not configured",
            ));
        }
    };

    let order = match store
        .create_order(CreateOrder {
            school_id,
            trustee_id: user.user_id.to_string(),
            ..CreateOrder::default()
        })
        .await
    {
        Ok(order) => order,
        Err(e) => {
            error!("Database error creating order: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create order",
            ));
        }
    };

    let collect = match gateway.create_collect_request(request.amount).await {
        Ok(collect) => collect,
        Err(GatewayError::NotConfigured(setting)) => {
            error!("Cannot create payment, {} is not configured", setting);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Payment gateway is not configured",
            ));
        }
        Err(e) => {
            error!("Payment gateway error for order {}: {}", order.id, e);
            return Ok(error_response(
                StatusCode::BAD_GATEWAY,
                "Failed to create payment link.",
            ));
        }
    };

    let pending = CreateOrderStatus::pending(order.id, request.amount, collect.collect_request_id);
    if let Err(e) = store.create_status(pending).await {
        error!("Database error creating status for order {}: {}", order.id, e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to record payment",
        ));
    }

    info!("Payment link issued for order: {}", order.id);
    Ok(HttpResponse::Created().json(PaymentLink {
        payment_url: collect.collect_request_url,
    }))
}

/// Gateway callback. The raw body is logged before anything else, so
/// malformed and unmatched callbacks are kept too.
pub async fn webhook(
    store: web::Data<dyn PaymentStore>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse> {
    let raw = body.into_inner();

    if let Err(e) = store.log_webhook(&raw).await {
        error!("Database error logging webhook: {}", e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to record webhook",
        ));
    }

    let payload = match WebhookPayload::from_value(&raw) {
        Ok(payload) => payload,
        Err(message) => {
            warn!("{}", message);
            return Ok(error_response(StatusCode::BAD_REQUEST, message));
        }
    };

    let info = payload.order_info;
    let settle = SettleOrderStatus {
        status: info.status,
        transaction_amount: info.transaction_amount,
        payment_mode: info.payment_mode,
    };

    match store.settle_status(&info.order_id, settle).await {
        Ok(status) => {
            info!(
                collect_id = %status.collect_id,
                status = status.status.as_deref().unwrap_or_default(),
                "Webhook applied to order status"
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
                "Webhook received and processed successfully.",
            )))
        }
        Err(StoreError::Statuses(OrderStatusError::NotFound { reference })) => {
            warn!("Webhook for unknown bank_reference {}", reference);
            Ok(error_response(
                StatusCode::NOT_FOUND,
                format!("Order status with bank_reference {} not found.", reference),
            ))
        }
        Err(e) => {
            error!("Database error applying webhook: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update payment status",
            ))
        }
    }
}
