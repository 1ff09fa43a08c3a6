//! Prometheus Pushgateway integration.

mod client;

pub use client::PushGatewayClient;
