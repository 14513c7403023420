//! # Folio Server
//!
//! Main entry point for the Folio demo service: two author lookup endpoints
//! over MySQL, wrapped by the unified request-observability layer.

use folio_config::ConfigLoader;
use folio_core::{FolioError, FolioResult};
use folio_repository::{create_pool, MySqlAuthorRepository};
use folio_rest::{create_router, AppState};
use folio_service::AuthorServiceImpl;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

mod startup;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    info!("Starting Folio Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> FolioResult<()> {
    // Load configuration once; it is immutable for the process lifetime.
    let config = ConfigLoader::from_default_location()?;

    info!("Environment: {}", config.app.environment);

    // Create database pool and run migrations
    let db_pool = create_pool(&config.database).await?;
    db_pool.run_migrations().await?;

    // Wire repository -> service -> REST state
    let author_repository = Arc::new(MySqlAuthorRepository::new(db_pool));
    let author_service = Arc::new(AuthorServiceImpl::new(author_repository));
    let app_state = AppState::new(author_service);

    // Create REST router
    let router = create_router(app_state, &config);

    let addr = config.server.addr();
    startup::print_banner();
    startup::print_startup_info(config.server.port);
    info!("Starting REST server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FolioError::Internal(format!("Failed to bind: {}", e)))?;

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| FolioError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
