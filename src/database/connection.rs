use crate::config::AppConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

pub type DbPool = PgPool;

pub async fn create_pool(config: &AppConfig) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.database_url)
        .await?;

    info!(
        max_connections = config.database_max_connections,
        "Database pool created"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
