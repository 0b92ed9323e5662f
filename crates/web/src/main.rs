use std::sync::Arc;

use anyhow::Context;
use category_storage::Database;

mod auth;
mod config;
mod error;
mod features;
mod gateway;
mod openapi;
mod routes;
mod secrets;
mod state;
#[cfg(test)]
mod test_utils;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting category API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let credentials = secrets::provider_for(&config.secret_source)
        .await
        .database_credentials()
        .await
        .context("Failed to fetch database credentials")?;
    tracing::info!("Database credentials fetched");

    tracing::info!("Connecting to database at: {}", credentials.display_target());
    let db = Database::connect(&credentials, &config.pool)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    if config.run_migrations {
        tracing::info!("Running database migrations");
        db.run_migrations()
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations completed successfully");
    }

    tracing::info!(
        required_role = %config.pipeline.required_role,
        exists_policy = ?config.pipeline.exists_policy,
        expose_error_detail = config.pipeline.expose_error_detail,
        "Pipeline settings"
    );

    let state = AppState::new(Arc::new(db), config.pipeline.clone());
    let app = routes::router(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
