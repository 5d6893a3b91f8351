use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum GondolaError {
    #[error("failed to ingest file: {0}")]
    Ingest(String),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid verification status '{0}', expected correct or divergent")]
    InvalidStatus(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
