use std::{
    sync::{Arc, atomic::Ordering},
    time::SystemTime,
};

use hlsbridge_engine::StreamingEngine;
use hlsbridge_events::{AttachEvent, Event};
use hlsbridge_host::{CanPlay, HLS_MIME_TYPE, MediaHost, TextTrack};
use hlsbridge_time::{SeekableTimeRanges, TimeRanges, clamp_time, start_date};
use hlsbridge_tracks::{AudioTrackList, ReentrancyGuard, VideoTrackList};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::BridgeConfig,
    error::{BridgeError, BridgeResult},
    state::{AttachPhase, Session, Shared},
    sync::{Wiring, wire},
};

/// A media host that plays HLS sources through a streaming engine.
///
/// Wraps the host and overrides the members the engine redefines: `src`,
/// `seekable`, `currentTime`, `canPlayType`, the start date and the
/// video/audio track lists. Everything else stays on the host, reachable via
/// [`host`](Self::host). [`detach`](Self::detach) hands the host back.
///
/// At most one engine drives the host at a time: assigning a new HLS source
/// tears the previous engine down before the next one is constructed.
pub struct MediaBridge {
    shared: Arc<Shared>,
}

impl MediaBridge {
    /// Decorate `host`.
    ///
    /// Fails when `config` carries no engine factory or the engine cannot
    /// run here. A source already set on the host is assigned again through
    /// [`set_src`](Self::set_src).
    pub fn attach(host: Arc<dyn MediaHost>, config: BridgeConfig) -> BridgeResult<Self> {
        let factory = config
            .factory
            .clone()
            .ok_or(BridgeError::EngineNotConfigured)?;
        if !factory.is_supported() {
            return Err(BridgeError::EngineUnsupported);
        }
        let existing = host.native_src();
        let bridge = Self {
            shared: Arc::new(Shared::new(host, factory, config)),
        };
        if let Some(src) = existing {
            bridge.set_src(&src)?;
        }
        Ok(bridge)
    }

    /// Tear the engine down and return the plain host.
    pub fn detach(self) -> Arc<dyn MediaHost> {
        self.detach_engine();
        Arc::clone(&self.shared.host)
    }

    #[must_use]
    pub fn host(&self) -> &Arc<dyn MediaHost> {
        &self.shared.host
    }

    #[must_use]
    pub fn phase(&self) -> AttachPhase {
        self.shared.phase()
    }

    /// Whether an engine currently drives the host.
    #[must_use]
    pub fn is_engine_driven(&self) -> bool {
        self.shared.session().is_some()
    }

    #[must_use]
    pub fn engine(&self) -> Option<Arc<dyn StreamingEngine>> {
        self.shared
            .session()
            .map(|session| Arc::clone(&session.engine))
    }

    /// Subscribe to bridge events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    // -- source --

    /// Assign a source.
    ///
    /// Sources the engine handles attach a fresh engine. A `blob:` URL goes
    /// to the host without touching the engine, since that is how an engine
    /// binds its own media source. Anything else detaches the engine and
    /// plays natively.
    pub fn set_src(&self, src: &str) -> BridgeResult<()> {
        match Url::parse(src) {
            Ok(url) if self.shared.factory.handles(&url) => self.attach_engine(src, &url),
            Ok(url) if url.scheme() == "blob" => {
                debug!(src, "blob source passed to host");
                self.shared.host.set_native_src(src);
                Ok(())
            }
            _ => {
                self.detach_engine();
                self.shared.host.set_native_src(src);
                self.shared.bus.publish(AttachEvent::NativeSource {
                    src: src.to_owned(),
                });
                Ok(())
            }
        }
    }

    /// The engine source while engine-driven, the host's otherwise.
    #[must_use]
    pub fn src(&self) -> Option<String> {
        match self.shared.session() {
            Some(session) => Some(session.src.clone()),
            None => self.shared.host.native_src(),
        }
    }

    // -- time --

    #[must_use]
    pub fn seekable(&self) -> Arc<dyn TimeRanges> {
        match self.shared.session() {
            Some(session) => session.seekable.clone(),
            None => self.shared.host.native_seekable(),
        }
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.shared.host.current_time()
    }

    /// Seek. While engine-driven, `time` is clamped into the seekable window.
    pub fn set_current_time(&self, time: f64) {
        let time = match self.shared.session() {
            Some(session) => clamp_time(session.seekable.as_ref(), time),
            None => time,
        };
        self.shared.host.set_current_time(time);
    }

    /// Wall-clock time of media position zero.
    #[must_use]
    pub fn start_date(&self) -> Option<SystemTime> {
        match self.shared.session() {
            Some(session) => start_date(session.engine.as_ref()),
            None => self.shared.host.native_start_date(),
        }
    }

    #[must_use]
    pub fn can_play_type(&self, mime: &str) -> CanPlay {
        if mime.eq_ignore_ascii_case(HLS_MIME_TYPE) {
            return CanPlay::Probably;
        }
        self.shared.host.can_play_type(mime)
    }

    // -- tracks --

    /// Video tracks, while an engine drives the host.
    #[must_use]
    pub fn video_tracks(&self) -> Option<VideoTrackList> {
        self.shared.session().map(|_| self.shared.video.clone())
    }

    /// Audio tracks, while an engine drives the host.
    #[must_use]
    pub fn audio_tracks(&self) -> Option<AudioTrackList> {
        self.shared.session().map(|_| self.shared.audio.clone())
    }

    #[must_use]
    pub fn text_tracks(&self) -> Vec<Arc<dyn TextTrack>> {
        self.shared.host.text_tracks()
    }

    // -- lifecycle --

    /// Refused while a detach is running: the outgoing engine must be
    /// destroyed before the next one is constructed.
    fn attach_engine(&self, src: &str, url: &Url) -> BridgeResult<()> {
        let shared = &self.shared;
        if shared.detaching.load(Ordering::Acquire) {
            warn!(src, "engine source assigned during detach, ignored");
            return Err(BridgeError::Detaching);
        }
        self.detach_engine();

        shared.set_phase(AttachPhase::Attaching);
        let generation = shared.next_generation();
        let engine = match shared.factory.create(&shared.config.engine) {
            Ok(engine) => engine,
            Err(err) => {
                shared.set_phase(AttachPhase::Detached);
                return Err(err.into());
            }
        };

        let weak = Arc::downgrade(shared);
        let seekable = SeekableTimeRanges::new(
            move || weak.upgrade()?.engine_for(generation),
            shared.host.native_seekable(),
        );
        let Wiring {
            subscriptions,
            video_observer,
            audio_observer,
            text_observer,
        } = wire(shared, &engine, generation);
        *shared.session.lock() = Some(Arc::new(Session {
            generation,
            src: src.to_owned(),
            engine: Arc::clone(&engine),
            seekable: Arc::new(seekable),
            subscriptions,
            video_observer,
            audio_observer,
            text_observer,
        }));

        if let Err(err) = engine.load_source(url) {
            warn!(%err, src, "engine refused source");
            self.detach_engine();
            return Err(err.into());
        }
        engine.attach_media();
        shared.set_phase(AttachPhase::Attached);
        info!(src, generation, "engine attached");
        shared.bus.publish(AttachEvent::Attached {
            src: src.to_owned(),
            generation,
        });
        Ok(())
    }

    /// Release and dispose the current engine. Idempotent, and a no-op when
    /// reached again from inside a running detach.
    fn detach_engine(&self) {
        let shared = &self.shared;
        let Some(_guard) = ReentrancyGuard::enter(&shared.detaching) else {
            return;
        };
        let Some(session) = shared.session.lock().take() else {
            return;
        };
        shared.set_phase(AttachPhase::Detaching);

        shared.video.remove_listener(session.video_observer);
        shared.audio.remove_listener(session.audio_observer);
        shared.host.off_text_tracks_change(session.text_observer);

        shared.video.clear();
        shared.audio.clear();
        shared.subtitles.clear();

        if session.engine.is_attached() {
            session.engine.detach_media();
        }
        session.subscriptions.release_all();
        session.engine.destroy();

        if shared.session.lock().is_none() {
            shared.set_phase(AttachPhase::Detached);
        }
        info!(generation = session.generation, "engine detached");
        shared.bus.publish(AttachEvent::Detached {
            generation: session.generation,
        });
    }
}

impl Drop for MediaBridge {
    fn drop(&mut self) {
        self.detach_engine();
    }
}
