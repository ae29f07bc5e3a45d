use std::time::SystemTime;

use hlsbridge_engine::{StreamingEngine, active_level_details};

/// Wall-clock time of media position zero for the engine's active level.
///
/// `None` without loaded details, without program date time, or without
/// fragments.
pub fn start_date(engine: &dyn StreamingEngine) -> Option<SystemTime> {
    active_level_details(engine)?.start_date()
}
