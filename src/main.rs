use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use school_payments::config::AppConfig;
use school_payments::database::connection::{create_pool, run_migrations};
use school_payments::reporting::{PgTransactionSource, SystemClock, TransactionReport};
use school_payments::routes::api::scoped_config;
use school_payments::services::auth::AuthService;
use school_payments::services::gateway::PaymentGateway;
use school_payments::services::payment_store::{PaymentStore, PgPaymentStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded");

    let pool = create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let report = TransactionReport::new(
        Arc::new(PgTransactionSource::new(pool.clone())),
        Arc::new(SystemClock),
    );
    let payment_store: Arc<dyn PaymentStore> = Arc::new(PgPaymentStore::new(pool.clone()));
    let auth_service = AuthService::from_config(&config);
    let gateway = PaymentGateway::from_config(&config).context("Failed to build gateway client")?;

    let pool = web::Data::new(pool);
    let report = web::Data::new(report);
    let payment_store = web::Data::from(payment_store);
    let auth_service = web::Data::new(auth_service);
    let gateway = web::Data::new(gateway);
    let cors_origin = config.cors_origin.clone();

    let addr = config.server_addr();
    info!("Starting server on {}", addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(pool.clone())
            .app_data(report.clone())
            .app_data(payment_store.clone())
            .app_data(auth_service.clone())
            .app_data(gateway.clone())
            .configure(scoped_config)
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind to {}", addr))?
    .run()
    .await?;

    Ok(())
}
