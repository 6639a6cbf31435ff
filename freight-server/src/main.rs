use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use freight_server::config::ServerConfig;
use freight_server::dataset::DatasetStore;
use freight_server::query::QueryExecutor;
use freight_server::telemetry;
use freight_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(config.log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    // Datasets are loaded once and shared read-only by every request
    let store = match DatasetStore::open_csv(&config.postings_path, &config.stops_path) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to load datasets");
            return ExitCode::FAILURE;
        }
    };

    let executor = QueryExecutor::new(Arc::new(store), config.query.clone());
    let app = create_router(AppState::new(executor), &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        addr = %config.bind,
        destination_rule = %config.query.destination_rule,
        "Freight search listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
