//! Infrastructure layer modules
//!
//! This module contains the components the poller is wired from:
//! - `config`: Command-line settings
//! - `error`: Unified error types
//! - `metrics`: The block height gauge and its registry
//! - `postgres`: PostgreSQL connection and the max-height query
//! - `pushgateway`: Prometheus Pushgateway client

pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
pub mod pushgateway;
