use thiserror::Error;

pub type RangeResult<T> = Result<T, RangeError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RangeError {
    #[error("index {index} is out of bounds for {len} time range(s)")]
    IndexOutOfBounds { index: usize, len: usize },
}
