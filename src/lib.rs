// Infrastructure layer (shared components)
pub mod infrastructure;

// Re-export infrastructure modules for shorter paths
pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;
pub use infrastructure::postgres;
pub use infrastructure::pushgateway;

// Supporting modules
pub mod tasks;
pub mod telemetry;
