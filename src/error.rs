use thiserror::Error;

/// Boxed error type used at the async collaborator seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("judgment not found: {0}")]
    JudgmentNotFound(String),

    #[error("judgment store error: {0}")]
    Store(#[source] BoxError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
