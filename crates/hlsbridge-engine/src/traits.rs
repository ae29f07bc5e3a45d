use std::sync::Arc;

use url::Url;

use crate::{
    config::EngineConfig,
    error::EngineResult,
    events::{EngineEventKind, EngineHandler, SubscriptionId},
    types::{Level, Rendition},
};

/// A running streaming engine instance.
///
/// The media surface the engine renders into is bound by the
/// [`EngineFactory`] that created it; [`attach_media`](Self::attach_media)
/// starts driving that surface.
///
/// Selection setters may emit the matching switch event synchronously or
/// later. Indexes always refer to the engine's lists as they are at the
/// time of the call.
pub trait StreamingEngine: Send + Sync + 'static {
    fn load_source(&self, url: &Url) -> EngineResult<()>;

    fn attach_media(&self);

    /// Release the media binding. Emits [`EngineEventKind::MediaDetaching`].
    fn detach_media(&self);

    /// Dispose the instance. In-flight work is abandoned.
    fn destroy(&self);

    /// Whether the engine currently drives its media surface.
    fn is_attached(&self) -> bool;

    // -- levels --

    fn levels(&self) -> Vec<Level>;

    fn current_level(&self) -> Option<usize>;

    fn set_current_level(&self, index: usize);

    // -- renditions --

    fn audio_tracks(&self) -> Vec<Rendition>;

    fn audio_track(&self) -> Option<usize>;

    fn set_audio_track(&self, index: usize);

    fn subtitle_tracks(&self) -> Vec<Rendition>;

    fn subtitle_track(&self) -> Option<usize>;

    fn set_subtitle_track(&self, index: Option<usize>);

    // -- events --

    fn subscribe(&self, kind: EngineEventKind, handler: EngineHandler) -> SubscriptionId;

    /// Unregistering an unknown id is a no-op.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Constructs engine instances for a media surface.
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = EngineFactoryMock)
)]
pub trait EngineFactory: Send + Sync + 'static {
    /// Whether the engine can run at all in this environment.
    fn is_supported(&self) -> bool;

    /// Whether a source should be played through the engine.
    fn handles(&self, src: &Url) -> bool;

    fn create(&self, config: &EngineConfig) -> EngineResult<Arc<dyn StreamingEngine>>;
}
