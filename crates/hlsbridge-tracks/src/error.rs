use thiserror::Error;

use crate::track::TrackId;

pub type TrackResult<T> = Result<T, TrackError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TrackError {
    #[error("index {index} is out of bounds for track list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("a different track with id {0} is already in the list")]
    DuplicateId(TrackId),

    #[error("track {0} already belongs to another list")]
    AlreadyOwned(TrackId),
}
