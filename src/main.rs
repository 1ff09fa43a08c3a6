use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;

use block_height_exporter::config::Settings;
use block_height_exporter::metrics::BlockHeightMetrics;
use block_height_exporter::postgres::{mask_database_url, PostgresPool};
use block_height_exporter::pushgateway::PushGatewayClient;
use block_height_exporter::tasks::Poller;
use block_height_exporter::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    // Initialize tracing
    init_tracing(settings.log_format)?;

    if let Err(e) = settings.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    tracing::info!(
        dsn = %mask_database_url(&settings.dsn),
        push_url = %settings.push_url,
        interval = ?settings.interval,
        job = %settings.job,
        "Starting block height exporter"
    );

    // Connect to the database
    let pool = match PostgresPool::connect(&settings.dsn).await {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!(error = %e, "Failed to open database connection");
            return Err(e.into());
        }
    };

    let metrics = BlockHeightMetrics::new()?;
    let pusher = Arc::new(PushGatewayClient::new(&settings.push_url, &settings.job)?);
    let poller = Poller::new(pool.clone(), pusher, metrics, settings.interval);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let poller_handle = tokio::spawn(poller.run(shutdown_rx));

    shutdown_signal_handler(shutdown_tx).await;

    if let Err(e) = poller_handle.await {
        tracing::error!(error = %e, "Block height poller panicked");
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        }
    }

    let _ = shutdown_tx.send(());
}
