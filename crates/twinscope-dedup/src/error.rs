use thiserror::Error;
use twinscope_core::CoreError;

#[derive(Debug, Error)]
pub enum DedupError {
    #[error("invalid threshold '{0}': expected a number between 0 and 1")]
    InvalidThreshold(String),

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("unknown field in weight overrides: {0}")]
    UnknownField(String),

    #[error("interaction failed: {0}")]
    Interaction(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, DedupError>;
