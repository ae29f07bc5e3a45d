use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use hlsbridge_engine::{EngineFactory, StreamingEngine};
use hlsbridge_events::EventBus;
use hlsbridge_host::{HostObserverId, MediaHost};
use hlsbridge_text::SubtitleBridge;
use hlsbridge_time::SeekableTimeRanges;
use hlsbridge_tracks::{AudioTrackList, ObserverId, VideoTrackList};
use parking_lot::Mutex;

use crate::{config::BridgeConfig, subscriptions::Subscriptions};

/// Where the surface is in its engine lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttachPhase {
    /// No engine drives the surface; the host plays natively.
    #[default]
    Detached,
    /// An engine was constructed and is being wired up.
    Attaching,
    Attached,
    /// The engine is releasing the surface.
    Detaching,
}

/// One engine instance driving the surface, from attach to detach.
pub(crate) struct Session {
    pub(crate) generation: u64,
    pub(crate) src: String,
    pub(crate) engine: Arc<dyn StreamingEngine>,
    pub(crate) seekable: Arc<SeekableTimeRanges>,
    pub(crate) subscriptions: Subscriptions,
    pub(crate) video_observer: ObserverId,
    pub(crate) audio_observer: ObserverId,
    pub(crate) text_observer: HostObserverId,
}

/// State shared between the bridge and the handlers it registers.
///
/// Handlers hold it weakly and carry the generation of the session that
/// registered them; see [`Shared::engine_for`].
pub(crate) struct Shared {
    pub(crate) host: Arc<dyn MediaHost>,
    pub(crate) factory: Arc<dyn EngineFactory>,
    pub(crate) config: BridgeConfig,
    pub(crate) bus: EventBus,
    pub(crate) video: VideoTrackList,
    pub(crate) audio: AudioTrackList,
    pub(crate) subtitles: SubtitleBridge,
    pub(crate) session: Mutex<Option<Arc<Session>>>,
    pub(crate) phase: Mutex<AttachPhase>,
    next_generation: AtomicU64,
    /// Held for the duration of a detach.
    pub(crate) detaching: AtomicBool,
}

impl Shared {
    pub(crate) fn new(
        host: Arc<dyn MediaHost>,
        factory: Arc<dyn EngineFactory>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            subtitles: SubtitleBridge::new(Arc::clone(&host)),
            bus: EventBus::new(config.event_capacity),
            video: VideoTrackList::new(),
            audio: AudioTrackList::new(),
            session: Mutex::new(None),
            phase: Mutex::new(AttachPhase::Detached),
            next_generation: AtomicU64::new(1),
            detaching: AtomicBool::new(false),
            host,
            factory,
            config,
        }
    }

    pub(crate) fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn session(&self) -> Option<Arc<Session>> {
        self.session.lock().clone()
    }

    /// The engine of the current session, if that session is `generation`.
    ///
    /// Events from an engine that has since been replaced or detached find
    /// nothing here and are dropped.
    pub(crate) fn engine_for(&self, generation: u64) -> Option<Arc<dyn StreamingEngine>> {
        self.session
            .lock()
            .as_ref()
            .filter(|session| session.generation == generation)
            .map(|session| Arc::clone(&session.engine))
    }

    pub(crate) fn set_phase(&self, phase: AttachPhase) {
        *self.phase.lock() = phase;
    }

    pub(crate) fn phase(&self) -> AttachPhase {
        *self.phase.lock()
    }
}
