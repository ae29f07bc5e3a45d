//! Options handed to the engine on construction.

use derivative::Derivative;
use derive_setters::Setters;

/// Engine construction options.
#[derive(Clone, Debug, Derivative, PartialEq, Eq, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_", strip_option)]
pub struct EngineConfig {
    /// Report an infinite duration for live and event streams, matching
    /// native playback. Default: true.
    #[derivative(Default(value = "true"))]
    pub live_duration_infinity: bool,
    /// Level to start on. `None` lets the engine decide.
    pub start_level: Option<usize>,
    /// Let the engine render subtitles itself instead of reporting them as
    /// non-native tracks. Default: false, the surface synthesizes them.
    pub render_text_tracks_natively: bool,
    /// Verbose engine logging. Default: false.
    pub debug: bool,
}
