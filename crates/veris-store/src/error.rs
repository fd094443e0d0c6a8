use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The fetch was cancelled before completing; its results must not
    /// be applied.
    #[error("fetch cancelled")]
    Cancelled,

    #[error("store not available: {0}")]
    Unavailable(String),
}
