//! Form builder API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod extract;
mod handlers;
mod state;

use std::sync::Arc;

use formcraft_core::AppError;
use formcraft_infrastructure::{PostgresFormRepository, PostgresSubmissionRepository};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, DatabaseConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let app_state = match &config.database {
        Some(database) => {
            let pool = connect_database(database).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            AppState::new(
                Arc::new(PostgresFormRepository::new(pool.clone())),
                Arc::new(PostgresSubmissionRepository::new(pool)),
            )
        }
        None => {
            info!("DATABASE_URL not set, using in-memory storage");
            AppState::in_memory()
        }
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "formcraft-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

async fn connect_database(database: &DatabaseConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(&database.url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}
