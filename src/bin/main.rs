use std::net::SocketAddr;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};

use academic_records::bootstrap::initialize_admin_user;
use academic_records::database::connect_database;
use academic_records::state::AppState;
use academic_records::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"), &APP_CONFIG.log_level);

    tracing::info!(app_env = %APP_CONFIG.app_env, "Starting application...");

    let db = connect_database(&APP_CONFIG.database_url, APP_CONFIG.database_max_connections).await?;

    if APP_CONFIG.run_migrations {
        tracing::info!("Applying pending migrations...");
        Migrator::up(&db, None)
            .await
            .context("Failed to apply migrations")?;
    }

    tracing::info!("Checking admin user...");
    if let Err(e) =
        initialize_admin_user(&db, &APP_CONFIG.admin_email, &APP_CONFIG.admin_password).await
    {
        tracing::error!("Failed to initialize admin user: {:#}", e);
        tracing::warn!("Continuing without admin user initialization...");
    }

    let state = AppState::new(db, &APP_CONFIG.jwt_secret, APP_CONFIG.jwt_expires_in);
    let app = app::create_app(state, APP_CONFIG.swagger_enabled, &APP_CONFIG.cors_allowed_origins)?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {}", http_address))?;

    tracing::info!("HTTP server listening on {}", &http_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
