use crate::error::{RangeError, RangeResult};

/// Read-only set of `[start, end)` time ranges, in seconds.
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = TimeRangesMock)
)]
pub trait TimeRanges: Send + Sync + 'static {
    fn length(&self) -> usize;

    fn start(&self, index: usize) -> RangeResult<f64>;

    fn end(&self, index: usize) -> RangeResult<f64>;
}

/// Fails unless `index < len`.
pub fn check_index(index: usize, len: usize) -> RangeResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(RangeError::IndexOutOfBounds { index, len })
    }
}

/// Clamp `time` into the first range. Unclamped when there is no range.
pub fn clamp_time(ranges: &dyn TimeRanges, time: f64) -> f64 {
    match (ranges.start(0), ranges.end(0)) {
        (Ok(start), Ok(end)) if start <= end => time.clamp(start, end),
        _ => time,
    }
}

/// Fixed list of ranges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticTimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl StaticTimeRanges {
    #[must_use]
    pub fn new(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl TimeRanges for StaticTimeRanges {
    fn length(&self) -> usize {
        self.ranges.len()
    }

    fn start(&self, index: usize) -> RangeResult<f64> {
        check_index(index, self.ranges.len())?;
        Ok(self.ranges[index].0)
    }

    fn end(&self, index: usize) -> RangeResult<f64> {
        check_index(index, self.ranges.len())?;
        Ok(self.ranges[index].1)
    }
}
