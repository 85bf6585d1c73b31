use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use maternal_care_api::api::{create_app, AppState};
use maternal_care_api::config::AppConfig;
use maternal_care_domain::database;
use maternal_care_domain::reference::AddressDataset;
use maternal_care_domain::repository::Storage;
use maternal_care_domain::services::{provider_for, AddressDirectory};

/// Entry point for the MaternalCare API server
///
/// Reads `.env` and the environment, picks Postgres or the in-memory store,
/// loads the address reference data and serves until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting MaternalCare API server");

    let config = AppConfig::from_env().context("invalid configuration")?;

    let storage = match &config.database {
        Some(db) => match database::connect(db).await {
            Ok(pool) => Storage::Postgres(pool),
            Err(e) => {
                error!("Failed to connect to PostgreSQL: {}", e);
                warn!("Falling back to in-memory storage; records will not survive a restart");
                Storage::memory()
            }
        },
        None => {
            info!("DATABASE_URL not set, using in-memory storage");
            Storage::memory()
        }
    };
    info!("Storage: {}", storage.describe());

    let address = match &config.address_data_path {
        Some(path) => {
            let dataset = AddressDataset::from_path(path)
                .with_context(|| format!("failed to load address data from {}", path.display()))?;
            AddressDirectory::new(dataset)
        }
        None => AddressDirectory::embedded()?,
    };

    let provider = provider_for(config.early_warning_url.as_deref())?;

    let state = AppState::new(storage, Arc::new(address), Arc::new(config.tokens.clone()), provider);

    if let Some(admin) = &config.admin {
        if state.services.users.ensure_admin(&admin.email, &admin.password).await? {
            info!("Bootstrap admin {} created", admin.email);
        }
    }

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
