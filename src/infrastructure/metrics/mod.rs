//! Prometheus gauge for the maximum block height.
//!
//! The gauge lives in a private registry owned by the poller rather than the
//! process-wide default registry, so a push carries exactly this one metric.

use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};

use crate::error::Result;

/// Name of the exported gauge
pub const BLOCK_HEIGHT_METRIC: &str = "oula_aleo_block_max_height";

const BLOCK_HEIGHT_HELP: &str = "The maximum block height";

/// The block height gauge and the registry it is exported from
#[derive(Clone)]
pub struct BlockHeightMetrics {
    registry: Registry,
    max_height: Gauge,
}

impl BlockHeightMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let max_height = Gauge::with_opts(Opts::new(BLOCK_HEIGHT_METRIC, BLOCK_HEIGHT_HELP))?;
        registry.register(Box::new(max_height.clone()))?;

        Ok(Self {
            registry,
            max_height,
        })
    }

    /// Replace the current gauge value
    pub fn set_max_height(&self, height: i64) {
        self.max_height.set(height as f64);
    }

    pub fn max_height(&self) -> f64 {
        self.max_height.get()
    }

    /// Gather the registry into metric families
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Encode the registry in the Prometheus text exposition format
    pub fn encode(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
