#![forbid(unsafe_code)]

//! `TimeRanges`-shaped views for a media surface.
//!
//! [`SeekableTimeRanges`] reports the window covered by the engine's active
//! fragments instead of a natively buffered timeline, and hands over to the
//! host's own ranges whenever no engine is attached.

mod error;
mod ranges;
mod seekable;
mod start_date;

pub use error::{RangeError, RangeResult};
#[cfg(any(test, feature = "test-utils"))]
pub use ranges::TimeRangesMock;
pub use ranges::{StaticTimeRanges, TimeRanges, check_index, clamp_time};
pub use seekable::{EngineAccessor, SeekableTimeRanges};
pub use start_date::start_date;
