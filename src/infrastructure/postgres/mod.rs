//! PostgreSQL access for the block height query.

pub mod pool;

pub use pool::{mask_database_url, PostgresPool, MAX_HEIGHT_QUERY};
