use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilaError {
    #[error("Invalid share query: {0}")]
    InvalidQuery(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}
