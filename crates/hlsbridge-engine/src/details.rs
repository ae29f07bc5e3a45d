use std::sync::Arc;

use tracing::trace;

use crate::{traits::StreamingEngine, types::LevelDetails};

/// Playlist details of the level that currently defines the timeline.
///
/// A level becomes current before its playlist finishes loading, so when the
/// current level has no details yet the first level that has them is used.
pub fn active_level_details(engine: &dyn StreamingEngine) -> Option<Arc<LevelDetails>> {
    let levels = engine.levels();
    if let Some(details) = engine
        .current_level()
        .and_then(|index| levels.get(index))
        .and_then(|level| level.details.clone())
    {
        return Some(details);
    }
    let fallback = levels.iter().find_map(|level| level.details.clone());
    if fallback.is_some() {
        trace!(current = ?engine.current_level(), "current level not loaded, using first loaded level");
    }
    fallback
}
