//! In-memory media element.
//!
//! Text-track mode writes fire the host's text-track `change` listeners
//! synchronously, like a media element dispatching `change` on its
//! `textTracks` list.

use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::SystemTime,
};

use hlsbridge_engine::{Cue, TextTrackKind};
use hlsbridge_host::{
    CanPlay, CueError, HostObserverId, MediaHost, TextTrack, TextTrackInit, TextTrackMode,
    TextTracksListener,
};
use hlsbridge_time::{StaticTimeRanges, TimeRanges};
use parking_lot::Mutex;

#[derive(Default)]
struct Listeners {
    next: AtomicU64,
    entries: Mutex<Vec<(HostObserverId, TextTracksListener)>>,
}

impl Listeners {
    fn fire(&self) {
        let listeners: Vec<TextTracksListener> = self
            .entries
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

/// Text track living on a [`FakeHost`].
pub struct FakeTextTrack {
    kind: TextTrackKind,
    label: String,
    language: String,
    mode: Mutex<TextTrackMode>,
    cues: Mutex<Vec<Cue>>,
    /// Refuse cues carrying settings, accept their minimal form.
    reject_settings: AtomicBool,
    /// Refuse every cue.
    reject_all: AtomicBool,
    listeners: Weak<Listeners>,
}

impl FakeTextTrack {
    fn new(init: TextTrackInit, listeners: Weak<Listeners>) -> Self {
        Self {
            kind: init.kind,
            label: init.label,
            language: init.language,
            mode: Mutex::new(init.mode),
            cues: Mutex::new(Vec::new()),
            reject_settings: AtomicBool::new(false),
            reject_all: AtomicBool::new(false),
            listeners,
        }
    }

    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().clone()
    }

    pub fn reject_settings(&self, reject: bool) {
        self.reject_settings.store(reject, Ordering::SeqCst);
    }

    pub fn reject_all(&self, reject: bool) {
        self.reject_all.store(reject, Ordering::SeqCst);
    }
}

impl TextTrack for FakeTextTrack {
    fn kind(&self) -> TextTrackKind {
        self.kind
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn language(&self) -> String {
        self.language.clone()
    }

    fn mode(&self) -> TextTrackMode {
        *self.mode.lock()
    }

    fn set_mode(&self, mode: TextTrackMode) {
        {
            let mut current = self.mode.lock();
            if *current == mode {
                return;
            }
            *current = mode;
        }
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.fire();
        }
    }

    fn has_cue(&self, id: &str) -> bool {
        self.cues.lock().iter().any(|cue| cue.id == id)
    }

    fn cue_count(&self) -> usize {
        self.cues.lock().len()
    }

    fn add_cue(&self, cue: &Cue) -> Result<(), CueError> {
        if self.reject_all.load(Ordering::SeqCst) {
            return Err(CueError::new(&cue.id, "track refuses cues"));
        }
        if cue.settings.is_some() && self.reject_settings.load(Ordering::SeqCst) {
            return Err(CueError::new(&cue.id, "unsupported cue settings"));
        }
        if *self.mode.lock() == TextTrackMode::Disabled {
            return Err(CueError::new(&cue.id, "track is disabled"));
        }
        self.cues.lock().push(cue.clone());
        Ok(())
    }
}

/// In-memory media element.
pub struct FakeHost {
    seekable: Arc<StaticTimeRanges>,
    src: Mutex<Option<String>>,
    current_time: Mutex<f64>,
    start_date: Option<SystemTime>,
    text_tracks: Mutex<Vec<Arc<FakeTextTrack>>>,
    listeners: Arc<Listeners>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::with_seekable(StaticTimeRanges::empty())
    }
}

impl FakeHost {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Host whose native seekable ranges are `seekable`.
    #[must_use]
    pub fn with_seekable(seekable: StaticTimeRanges) -> Self {
        Self {
            seekable: Arc::new(seekable),
            src: Mutex::new(None),
            current_time: Mutex::new(0.0),
            start_date: None,
            text_tracks: Mutex::new(Vec::new()),
            listeners: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_start_date(mut self, date: SystemTime) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Concrete handles to the host's text tracks, in insertion order.
    #[must_use]
    pub fn fake_tracks(&self) -> Vec<Arc<FakeTextTrack>> {
        self.text_tracks.lock().clone()
    }

    /// Add a native (non-synthesized) text track.
    pub fn add_native_track(&self, init: TextTrackInit) -> Arc<FakeTextTrack> {
        let track = Arc::new(FakeTextTrack::new(init, Arc::downgrade(&self.listeners)));
        self.text_tracks.lock().push(Arc::clone(&track));
        track
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.entries.lock().len()
    }
}

impl MediaHost for FakeHost {
    fn native_seekable(&self) -> Arc<dyn TimeRanges> {
        self.seekable.clone()
    }

    fn native_src(&self) -> Option<String> {
        self.src.lock().clone()
    }

    fn set_native_src(&self, src: &str) {
        *self.src.lock() = Some(src.to_owned());
    }

    fn current_time(&self) -> f64 {
        *self.current_time.lock()
    }

    fn set_current_time(&self, time: f64) {
        *self.current_time.lock() = time;
    }

    fn native_start_date(&self) -> Option<SystemTime> {
        self.start_date
    }

    fn can_play_type(&self, mime: &str) -> CanPlay {
        if mime.starts_with("video/mp4") || mime.starts_with("audio/mp4") {
            CanPlay::Maybe
        } else {
            CanPlay::No
        }
    }

    fn text_tracks(&self) -> Vec<Arc<dyn TextTrack>> {
        self.text_tracks
            .lock()
            .iter()
            .map(|track| Arc::clone(track) as Arc<dyn TextTrack>)
            .collect()
    }

    fn add_text_track(&self, init: TextTrackInit) -> Arc<dyn TextTrack> {
        self.add_native_track(init)
    }

    fn remove_text_track(&self, track: &Arc<dyn TextTrack>) {
        let target = Arc::as_ptr(track).cast::<()>();
        self.text_tracks
            .lock()
            .retain(|entry| Arc::as_ptr(entry).cast::<()>() != target);
    }

    fn on_text_tracks_change(&self, listener: TextTracksListener) -> HostObserverId {
        let id = HostObserverId(self.listeners.next.fetch_add(1, Ordering::SeqCst));
        self.listeners.entries.lock().push((id, listener));
        id
    }

    fn off_text_tracks_change(&self, id: HostObserverId) {
        self.listeners
            .entries
            .lock()
            .retain(|(entry, _)| *entry != id);
    }
}
