//! In-memory streaming engine driven by the test.
//!
//! The engine never switches on its own: tests script switches with
//! [`FakeEngine::switch_level`] and friends, which update the selection and
//! emit the matching event, exactly like an engine-originated change.
//! Calls made by the code under test are recorded in [`EngineCalls`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use hlsbridge_engine::{
    EngineConfig, EngineError, EngineEvent, EngineEventKind, EngineFactory, EngineHandler,
    EngineResult, Level, LevelDetails, Rendition, StreamingEngine, SubscriptionId,
};
use parking_lot::Mutex;
use url::Url;

/// Calls received from the code under test.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineCalls {
    pub load_source: Vec<Url>,
    pub attach_media: usize,
    pub detach_media: usize,
    pub destroy: usize,
    pub set_current_level: Vec<usize>,
    pub set_audio_track: Vec<usize>,
    pub set_subtitle_track: Vec<Option<usize>>,
}

#[derive(Default)]
struct State {
    levels: Vec<Level>,
    current_level: Option<usize>,
    audio_tracks: Vec<Rendition>,
    audio_track: Option<usize>,
    subtitle_tracks: Vec<Rendition>,
    subtitle_track: Option<usize>,
    attached: bool,
    destroyed: bool,
}

#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<State>,
    handlers: Mutex<Vec<(SubscriptionId, EngineEventKind, EngineHandler)>>,
    next_subscription: AtomicU64,
    calls: Mutex<EngineCalls>,
    /// Emit the switch event from inside the selection setters.
    switch_on_set: AtomicBool,
    fail_load: AtomicBool,
}

impl FakeEngine {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // -- scripting --

    pub fn set_levels(&self, levels: Vec<Level>) {
        self.state.lock().levels = levels;
    }

    pub fn set_audio_tracks(&self, tracks: Vec<Rendition>) {
        self.state.lock().audio_tracks = tracks;
    }

    pub fn set_subtitle_tracks(&self, tracks: Vec<Rendition>) {
        self.state.lock().subtitle_tracks = tracks;
    }

    /// Set the selection without emitting anything.
    pub fn preselect(&self, level: Option<usize>, audio: Option<usize>) {
        let mut state = self.state.lock();
        state.current_level = level;
        state.audio_track = audio;
    }

    pub fn set_details(&self, level: usize, details: LevelDetails) {
        if let Some(level) = self.state.lock().levels.get_mut(level) {
            level.details = Some(Arc::new(details));
        }
    }

    /// Make selection setters emit their switch event synchronously.
    pub fn switch_on_set(&self, enabled: bool) {
        self.switch_on_set.store(enabled, Ordering::SeqCst);
    }

    pub fn fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Engine-originated level switch.
    pub fn switch_level(&self, index: usize) {
        self.state.lock().current_level = Some(index);
        self.emit(&EngineEvent::LevelSwitched { level: index });
    }

    /// Engine-originated audio switch.
    pub fn switch_audio(&self, index: usize) {
        self.state.lock().audio_track = Some(index);
        self.emit(&EngineEvent::AudioTrackSwitched { id: index });
    }

    /// Engine-originated subtitle switch.
    pub fn switch_subtitles(&self, index: Option<usize>) {
        self.state.lock().subtitle_track = index;
        self.emit(&EngineEvent::SubtitleTrackSwitch { id: index });
    }

    /// Deliver an event to every handler subscribed to its kind.
    pub fn emit(&self, event: &EngineEvent) {
        let kind = event.kind();
        let handlers: Vec<EngineHandler> = self
            .handlers
            .lock()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    // -- inspection --

    #[must_use]
    pub fn calls(&self) -> EngineCalls {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }
}

impl StreamingEngine for FakeEngine {
    fn load_source(&self, url: &Url) -> EngineResult<()> {
        self.calls.lock().load_source.push(url.clone());
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(EngineError::Load {
                url: url.to_string(),
                reason: "scripted failure".into(),
            });
        }
        Ok(())
    }

    fn attach_media(&self) {
        self.calls.lock().attach_media += 1;
        self.state.lock().attached = true;
    }

    fn detach_media(&self) {
        self.calls.lock().detach_media += 1;
        if !self.state.lock().attached {
            return;
        }
        self.emit(&EngineEvent::MediaDetaching);
        self.state.lock().attached = false;
    }

    fn destroy(&self) {
        self.calls.lock().destroy += 1;
        self.state.lock().destroyed = true;
    }

    fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    fn levels(&self) -> Vec<Level> {
        self.state.lock().levels.clone()
    }

    fn current_level(&self) -> Option<usize> {
        self.state.lock().current_level
    }

    fn set_current_level(&self, index: usize) {
        self.calls.lock().set_current_level.push(index);
        self.state.lock().current_level = Some(index);
        if self.switch_on_set.load(Ordering::SeqCst) {
            self.emit(&EngineEvent::LevelSwitched { level: index });
        }
    }

    fn audio_tracks(&self) -> Vec<Rendition> {
        self.state.lock().audio_tracks.clone()
    }

    fn audio_track(&self) -> Option<usize> {
        self.state.lock().audio_track
    }

    fn set_audio_track(&self, index: usize) {
        self.calls.lock().set_audio_track.push(index);
        self.state.lock().audio_track = Some(index);
        if self.switch_on_set.load(Ordering::SeqCst) {
            self.emit(&EngineEvent::AudioTrackSwitched { id: index });
        }
    }

    fn subtitle_tracks(&self) -> Vec<Rendition> {
        self.state.lock().subtitle_tracks.clone()
    }

    fn subtitle_track(&self) -> Option<usize> {
        self.state.lock().subtitle_track
    }

    fn set_subtitle_track(&self, index: Option<usize>) {
        self.calls.lock().set_subtitle_track.push(index);
        self.state.lock().subtitle_track = index;
        if self.switch_on_set.load(Ordering::SeqCst) {
            self.emit(&EngineEvent::SubtitleTrackSwitch { id: index });
        }
    }

    fn subscribe(&self, kind: EngineEventKind, handler: EngineHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.handlers.lock().push((id, kind, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.lock().retain(|(sub, _, _)| *sub != id);
    }
}

type Prepare = Box<dyn Fn(&FakeEngine) + Send + Sync>;

/// Factory handing out [`FakeEngine`]s for `.m3u8` sources.
#[derive(Default)]
pub struct FakeEngineFactory {
    prepare: Mutex<Option<Prepare>>,
    created: Mutex<Vec<Arc<FakeEngine>>>,
    configs: Mutex<Vec<EngineConfig>>,
}

impl FakeEngineFactory {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run `prepare` on every engine before it is handed out.
    pub fn on_create<F>(&self, prepare: F)
    where
        F: Fn(&FakeEngine) + Send + Sync + 'static,
    {
        *self.prepare.lock() = Some(Box::new(prepare));
    }

    #[must_use]
    pub fn created(&self) -> Vec<Arc<FakeEngine>> {
        self.created.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Arc<FakeEngine>> {
        self.created.lock().last().cloned()
    }

    #[must_use]
    pub fn configs(&self) -> Vec<EngineConfig> {
        self.configs.lock().clone()
    }
}

impl EngineFactory for FakeEngineFactory {
    fn is_supported(&self) -> bool {
        true
    }

    fn handles(&self, src: &Url) -> bool {
        src.path().ends_with(".m3u8")
    }

    fn create(&self, config: &EngineConfig) -> EngineResult<Arc<dyn StreamingEngine>> {
        let engine = FakeEngine::new();
        if let Some(prepare) = self.prepare.lock().as_ref() {
            prepare(&engine);
        }
        self.configs.lock().push(config.clone());
        self.created.lock().push(Arc::clone(&engine));
        Ok(engine)
    }
}
