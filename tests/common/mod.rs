#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use school_payments::config::AppConfig;
use school_payments::models::order::CreateOrder;
use school_payments::models::order_status::CreateOrderStatus;
use school_payments::models::user::User;
use school_payments::reporting::MemoryTransactionSource;
use school_payments::services::auth::AuthService;
use school_payments::services::gateway::PaymentGateway;

pub const SECRET: &str = "integration-secret";

/// Builds the full route table over a memory store, a frozen clock and the
/// given auth service and payment gateway.
macro_rules! app {
    ($source:expr, $auth:expr) => {
        app!($source, $auth, common::gateway(&[]))
    };
    ($source:expr, $auth:expr, $gateway:expr) => {{
        let source: std::sync::Arc<school_payments::reporting::MemoryTransactionSource> = $source;
        let report = school_payments::reporting::TransactionReport::new(
            source.clone(),
            std::sync::Arc::new(school_payments::reporting::FixedClock(
                chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2030, 1, 1, 0, 0, 0).unwrap(),
            )),
        );
        let store: std::sync::Arc<dyn school_payments::services::payment_store::PaymentStore> =
            source;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(report))
                .app_data(actix_web::web::Data::new($auth))
                .app_data(actix_web::web::Data::new($gateway))
                .app_data(actix_web::web::Data::from(store))
                .configure(school_payments::routes::api::scoped_config),
        )
        .await
    }};
}

pub fn auth() -> AuthService {
    AuthService::new(SECRET, Duration::hours(1))
}

pub fn user(id: Uuid) -> User {
    User {
        id,
        email: "bursar@school.test".to_string(),
        password_hash: String::new(),
        name: None,
        school_id: Some("S1".to_string()),
        role: "school".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn token(auth: &AuthService) -> String {
    auth.generate_token(&user(Uuid::new_v4())).unwrap()
}

pub fn gateway(settings: &[(&str, &str)]) -> PaymentGateway {
    let mut vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgres://localhost/payments"),
        ("JWT_SECRET", SECRET),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.extend(settings.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    PaymentGateway::from_config(&AppConfig::from_map(vars).unwrap()).unwrap()
}

pub fn get(uri: &str, bearer: &str) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", bearer)))
}

/// S1: ref-a SUCCESS 100 (day 1), ref-b PENDING 50 (day 2).
/// S2: ref-c FAILED 0 (day 3).
pub async fn seeded_source() -> Arc<MemoryTransactionSource> {
    let source = Arc::new(MemoryTransactionSource::new());
    let rows = [
        ("S1", 1, "SUCCESS", dec!(100), "ref-a"),
        ("S1", 2, "PENDING", dec!(50), "ref-b"),
        ("S2", 3, "FAILED", dec!(0), "ref-c"),
    ];
    for (school, day, state, amount, reference) in rows {
        let order = source
            .insert_order(CreateOrder {
                school_id: school.to_string(),
                trustee_id: "trustee".to_string(),
                gateway_name: Some("PhonePe".to_string()),
                created_at: Some(Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap()),
                ..CreateOrder::default()
            })
            .await;
        source
            .insert_status(CreateOrderStatus {
                collect_id: order.id,
                order_amount: Some(amount),
                transaction_amount: Some(amount),
                payment_mode: Some("UPI".to_string()),
                payment_details: None,
                bank_reference: reference.to_string(),
                status: state.to_string(),
                created_at: None,
            })
            .await;
    }
    source
}
