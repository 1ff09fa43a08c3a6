use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query returned no block height (is the block table empty?)")]
    EmptyResult,

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Invalid push target: {0}")]
    InvalidPushUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pushgateway rejected push with status {status}: {body}")]
    PushRejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
