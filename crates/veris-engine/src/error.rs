use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad arguments to a financial calculation. Fatal to that single
    /// calculation only.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A property record whose numeric fields cannot be scored. The
    /// record is excluded, never defaulted.
    #[error("invalid property {id}: {reason}")]
    InvalidProperty { id: String, reason: String },
}
