use thiserror::Error;

/// Rejections produced while decoding or validating a map command.
/// Every variant leaves the filter state untouched.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("filter command carries no content fields")]
    EmptyPayload,

    #[error("FILTER_AND_FLY payload is missing a complete viewport")]
    MissingViewport,

    #[error("unknown command type: {0}")]
    UnknownCommand(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("reply parse error: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    #[error("store error: {0}")]
    Store(#[from] veris_store::StoreError),

    /// A fetch completed for a filter state that has since been
    /// superseded; its results were discarded.
    #[error("stale fetch: store is at generation {expected}, fetch was for {actual}")]
    Stale { expected: u64, actual: u64 },
}
