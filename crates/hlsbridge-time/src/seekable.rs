use std::{fmt, sync::Arc};

use hlsbridge_engine::{StreamingEngine, active_level_details};
use tracing::trace;

use crate::{
    error::RangeResult,
    ranges::{TimeRanges, check_index},
};

/// Returns the engine currently attached to the surface, if any.
pub type EngineAccessor = Arc<dyn Fn() -> Option<Arc<dyn StreamingEngine>> + Send + Sync>;

/// What the seekable view resolves to at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Window {
    /// No engine attached: the host's own ranges apply.
    Native,
    /// Engine attached, but no fragments known yet.
    Empty,
    Range { start: f64, end: f64 },
}

/// Seekable ranges derived from the engine's active fragment window.
///
/// Nothing is cached: every accessor asks the engine again, so the view
/// follows level switches and live playlist refreshes.
pub struct SeekableTimeRanges {
    engine: EngineAccessor,
    native: Arc<dyn TimeRanges>,
}

impl fmt::Debug for SeekableTimeRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekableTimeRanges")
            .field("window", &self.window())
            .finish_non_exhaustive()
    }
}

impl SeekableTimeRanges {
    pub fn new<F>(engine: F, native: Arc<dyn TimeRanges>) -> Self
    where
        F: Fn() -> Option<Arc<dyn StreamingEngine>> + Send + Sync + 'static,
    {
        Self {
            engine: Arc::new(engine),
            native,
        }
    }

    fn window(&self) -> Window {
        let Some(engine) = (self.engine)() else {
            return Window::Native;
        };
        match active_level_details(engine.as_ref()).and_then(|details| details.window()) {
            Some((start, end)) => Window::Range { start, end },
            None => {
                trace!("engine attached without fragments");
                Window::Empty
            }
        }
    }
}

impl TimeRanges for SeekableTimeRanges {
    fn length(&self) -> usize {
        match self.window() {
            Window::Native => self.native.length(),
            Window::Empty => 0,
            Window::Range { .. } => 1,
        }
    }

    fn start(&self, index: usize) -> RangeResult<f64> {
        match self.window() {
            Window::Native => self.native.start(index),
            Window::Empty => check_index(index, 0).map(|()| 0.0),
            Window::Range { start, .. } => check_index(index, 1).map(|()| start),
        }
    }

    fn end(&self, index: usize) -> RangeResult<f64> {
        match self.window() {
            Window::Native => self.native.end(index),
            Window::Empty => check_index(index, 0).map(|()| 0.0),
            Window::Range { end, .. } => check_index(index, 1).map(|()| end),
        }
    }
}
