use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::metrics::BlockHeightMetrics;

/// Something that can report the current maximum block height
#[async_trait]
pub trait HeightSource: Send + Sync {
    async fn max_height(&self) -> Result<i64>;
}

/// Something that can publish the block height gauge
#[async_trait]
pub trait MetricsPusher: Send + Sync {
    async fn push(&self, metrics: &BlockHeightMetrics) -> Result<()>;
}

/// Result of a single poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Gauge updated and pushed
    Pushed(i64),
    /// Gauge updated, push failed and the sample was dropped
    PushFailed(i64),
    /// Query failed, gauge left unchanged and nothing pushed
    QueryFailed,
}

/// Background task polling the block height and pushing it to the gateway
pub struct Poller {
    source: Arc<dyn HeightSource>,
    pusher: Arc<dyn MetricsPusher>,
    metrics: BlockHeightMetrics,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn HeightSource>,
        pusher: Arc<dyn MetricsPusher>,
        metrics: BlockHeightMetrics,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            pusher,
            metrics,
            interval,
        }
    }

    pub fn metrics(&self) -> &BlockHeightMetrics {
        &self.metrics
    }

    /// Run one query/update/push step, without the trailing sleep.
    pub async fn run_cycle(&self) -> CycleOutcome {
        tracing::info!("Querying the database for the maximum block height");

        let height = match self.source.max_height().await {
            Ok(height) => height,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to execute query");
                return CycleOutcome::QueryFailed;
            }
        };

        tracing::info!(max_height = height, "Query successful");
        self.metrics.set_max_height(height);

        match self.pusher.push(&self.metrics).await {
            Ok(()) => {
                tracing::info!(max_height = height, "Pushed metrics successfully");
                CycleOutcome::Pushed(height)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not push to Pushgateway");
                CycleOutcome::PushFailed(height)
            }
        }
    }

    /// Poll forever, sleeping `interval` after every cycle.
    ///
    /// Returns only once `shutdown` fires; the signal is observed during the
    /// sleep, never in the middle of a cycle.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Block height poller started"
        );

        loop {
            self.run_cycle().await;

            tracing::info!(
                interval_ms = self.interval.as_millis() as u64,
                "Sleeping before the next query"
            );

            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Block height poller received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Block height poller stopped");
    }
}
