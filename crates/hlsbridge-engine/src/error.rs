use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("streaming engine is not supported in this environment")]
    Unsupported,

    #[error("failed to load {url}: {reason}")]
    Load { url: String, reason: String },

    #[error("{0}")]
    Internal(String),
}
