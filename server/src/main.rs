//! Booking system HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Start PostgreSQL
//! docker run -d -p 5432:5432 -e POSTGRES_PASSWORD=postgres -e POSTGRES_DB=slotbook postgres:16
//!
//! # Load sample data, then run the server
//! cargo run --bin seed
//! cargo run --bin slotbook-server
//! ```

use slotbook_core::environment::SystemClock;
use slotbook_postgres::PostgresStore;
use slotbook_server::{AppState, Config, build_router, metrics};
use slotbook_web::RoomBroadcaster;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,slotbook=debug,sqlx=warn,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Slotbook HTTP Server");

    // Load configuration
    let config = Config::from_env();
    info!(
        database = %config.redacted_database_url(),
        address = %config.bind_address(),
        static_dir = ?config.server.static_dir,
        "Configuration loaded"
    );

    // Metrics
    metrics::register_metrics();
    if let Some(addr) = config.metrics_address() {
        metrics::install_exporter(addr)?;
    }

    // Store
    info!("Connecting to database...");
    let store = Arc::new(PostgresStore::connect(&config.database.url, &config.pool_config()).await?);
    store.migrate().await?;
    info!("Database connected and migrated");

    // Services and router
    let rooms = RoomBroadcaster::new(config.server.broadcast_capacity);
    let state = AppState::new(store.clone(), store, rooms, Arc::new(SystemClock));
    let app = build_router(state, config.server.static_dir.as_deref());

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "HTTP server listening");

    // Serve until a shutdown signal, then give open connections (websockets
    // included) the configured grace period.
    let signalled = Arc::new(Notify::new());
    let notify = Arc::clone(&signalled);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                notify.notify_one();
            })
            .await
    });

    tokio::select! {
        result = &mut server => result??,
        () = signalled.notified() => {
            let grace = Duration::from_secs(config.server.shutdown_timeout);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result??,
                Err(_) => {
                    warn!(?grace, "Graceful shutdown timed out, dropping open connections");
                    server.abort();
                }
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
