//! Single track handles.
//!
//! A [`Track`] is cheap to clone and every clone refers to the same track.
//! Lists compare tracks by handle ([`Track::same`]), so two tracks carrying the
//! same attributes are still different tracks.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use derivative::Derivative;
use derive_setters::Setters;
use parking_lot::Mutex;

/// Stable identity of a track inside its list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(Arc<str>);

impl TrackId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl PartialEq<str> for TrackId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TrackId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Per-kind payload carried by a track.
pub trait TrackKind: fmt::Debug + Send + Sync + 'static {
    /// Name of the selection flag, used in logs.
    const FLAG: &'static str;
}

/// Video rendition attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Video {
    pub width: u32,
    pub height: u32,
    /// Bits per second.
    pub bitrate: u64,
}

impl TrackKind for Video {
    const FLAG: &'static str = "selected";
}

/// Audio renditions carry no attributes beyond the common ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Audio;

impl TrackKind for Audio {
    const FLAG: &'static str = "enabled";
}

/// Common attributes for constructing a track.
#[derive(Clone, Debug, Setters)]
#[setters(prefix = "with_", into)]
pub struct TrackInit {
    #[setters(skip)]
    pub id: TrackId,
    pub label: String,
    pub language: String,
}

impl TrackInit {
    pub fn new(id: impl Into<TrackId>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            language: String::new(),
        }
    }
}

pub(crate) type FlagHook<K> = Arc<dyn Fn(&Track<K>) + Send + Sync>;

#[derive(Derivative)]
#[derivative(Debug)]
struct TrackInner<K: TrackKind> {
    id: TrackId,
    label: String,
    language: String,
    kind: K,
    active: AtomicBool,
    owned: AtomicBool,
    #[derivative(Debug = "ignore")]
    hook: Mutex<Option<FlagHook<K>>>,
}

/// Shared handle to a video or audio track.
#[derive(Debug)]
pub struct Track<K: TrackKind> {
    inner: Arc<TrackInner<K>>,
}

pub type VideoTrack = Track<Video>;
pub type AudioTrack = Track<Audio>;

impl<K: TrackKind> Clone for Track<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: TrackKind> Track<K> {
    #[must_use]
    pub fn new(init: TrackInit, kind: K, active: bool) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                id: init.id,
                label: init.label,
                language: init.language,
                kind,
                active: AtomicBool::new(active),
                owned: AtomicBool::new(false),
                hook: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &TrackId {
        &self.inner.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.inner.language
    }

    #[must_use]
    pub fn kind(&self) -> &K {
        &self.inner.kind
    }

    /// Whether both handles refer to the same track.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The selection flag (`selected` for video, `enabled` for audio).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Flip the selection flag and notify the owning list.
    ///
    /// Writing the current value is a no-op and notifies nobody.
    pub fn set_active(&self, active: bool) {
        if self.inner.active.swap(active, Ordering::AcqRel) == active {
            return;
        }
        // Clone out of the lock: the hook re-enters sibling tracks.
        let hook = self.inner.hook.lock().clone();
        if let Some(hook) = hook {
            hook(self);
        }
    }

    pub(crate) fn set_hook(&self, hook: Option<FlagHook<K>>) {
        *self.inner.hook.lock() = hook;
    }

    /// Mark the track as owned by a list. `false` if another list owns it.
    pub(crate) fn claim(&self) -> bool {
        self.inner
            .owned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn is_owned(&self) -> bool {
        self.inner.owned.load(Ordering::Acquire)
    }

    /// Teardown hook run when the track leaves its list.
    pub(crate) fn release(&self) {
        self.set_hook(None);
        self.inner.owned.store(false, Ordering::Release);
    }
}

impl Track<Video> {
    #[must_use]
    pub fn video(init: TrackInit, video: Video, selected: bool) -> Self {
        Self::new(init, video, selected)
    }

    #[must_use]
    pub fn selected(&self) -> bool {
        self.is_active()
    }

    pub fn set_selected(&self, selected: bool) {
        self.set_active(selected);
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.kind().width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.kind().height
    }

    #[must_use]
    pub fn bitrate(&self) -> u64 {
        self.kind().bitrate
    }
}

impl Track<Audio> {
    #[must_use]
    pub fn audio(init: TrackInit, enabled: bool) -> Self {
        Self::new(init, Audio, enabled)
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.is_active()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.set_active(enabled);
    }
}
