use thiserror::Error;

/// The host refused a cue.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cue {id} rejected: {reason}")]
pub struct CueError {
    pub id: String,
    pub reason: String,
}

impl CueError {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
