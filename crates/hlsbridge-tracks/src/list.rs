//! Ordered track container with change notifications.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::{
    error::{TrackError, TrackResult},
    track::{Track, TrackKind},
    types::ObserverId,
};

/// Notification emitted by a [`TrackList`].
#[derive(Clone, Debug)]
pub enum TrackListEvent<K: TrackKind> {
    AddTrack(Track<K>),
    RemoveTrack(Track<K>),
    /// The selection changed. Fired once per logical selection change.
    Change,
}

impl<K: TrackKind> TrackListEvent<K> {
    /// DOM-style event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddTrack(_) => "addtrack",
            Self::RemoveTrack(_) => "removetrack",
            Self::Change => "change",
        }
    }

    #[must_use]
    pub fn track(&self) -> Option<&Track<K>> {
        match self {
            Self::AddTrack(track) | Self::RemoveTrack(track) => Some(track),
            Self::Change => None,
        }
    }
}

type Listener<K> = Arc<dyn Fn(&TrackListEvent<K>) + Send + Sync>;

pub(crate) struct ListInner<K: TrackKind> {
    tracks: RwLock<Vec<Track<K>>>,
    listeners: Mutex<Vec<(ObserverId, Listener<K>)>>,
    next_observer: AtomicU64,
    /// Held while the list enforces its own invariant.
    pub(crate) changing: AtomicBool,
}

impl<K: TrackKind> Drop for ListInner<K> {
    fn drop(&mut self) {
        for track in self.tracks.get_mut().iter() {
            track.release();
        }
    }
}

/// Insertion-ordered list of tracks.
///
/// Clones share the same list. Listeners run synchronously on the thread
/// that mutated the list, after internal locks are released, so a listener
/// may freely read or mutate the list it observes.
pub struct TrackList<K: TrackKind> {
    pub(crate) inner: Arc<ListInner<K>>,
}

impl<K: TrackKind> Clone for TrackList<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: TrackKind> Default for TrackList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrackKind> std::fmt::Debug for TrackList<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackList")
            .field("tracks", &*self.inner.tracks.read())
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}

impl<K: TrackKind> TrackList<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ListInner {
                tracks: RwLock::new(Vec::new()),
                listeners: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(0),
                changing: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.tracks.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.tracks.read().is_empty()
    }

    /// Positional access. Fails outside `[0, len)`.
    pub fn item(&self, index: usize) -> TrackResult<Track<K>> {
        let tracks = self.inner.tracks.read();
        tracks
            .get(index)
            .cloned()
            .ok_or(TrackError::IndexOutOfBounds {
                index,
                len: tracks.len(),
            })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Track<K>> {
        self.inner.tracks.read().get(index).cloned()
    }

    /// First track with the given id, in list order.
    #[must_use]
    pub fn get_track_by_id(&self, id: &str) -> Option<Track<K>> {
        self.inner
            .tracks
            .read()
            .iter()
            .find(|track| track.id() == id)
            .cloned()
    }

    #[must_use]
    pub fn position(&self, track: &Track<K>) -> Option<usize> {
        self.inner.tracks.read().iter().position(|t| t.same(track))
    }

    #[must_use]
    pub fn contains(&self, track: &Track<K>) -> bool {
        self.position(track).is_some()
    }

    /// Snapshot of the current tracks.
    #[must_use]
    pub fn tracks(&self) -> Vec<Track<K>> {
        self.inner.tracks.read().clone()
    }

    /// Append a track and emit `addtrack`.
    ///
    /// Re-adding a track that is already in the list is a no-op.
    pub fn add_track(&self, track: Track<K>) -> TrackResult<()> {
        {
            let mut tracks = self.inner.tracks.write();
            if tracks.iter().any(|t| t.same(&track)) {
                return Ok(());
            }
            Self::check_insertable(&tracks, &track)?;
            if !track.claim() {
                return Err(TrackError::AlreadyOwned(track.id().clone()));
            }
            tracks.push(track.clone());
            trace!(id = %track.id(), index = tracks.len() - 1, "track added");
        }
        self.emit(&TrackListEvent::AddTrack(track));
        Ok(())
    }

    /// Remove a track and emit `removetrack`. No-op when absent.
    pub fn remove_track(&self, track: &Track<K>) {
        let removed = {
            let mut tracks = self.inner.tracks.write();
            let Some(index) = tracks.iter().position(|t| t.same(track)) else {
                return;
            };
            tracks[index].release();
            tracks.remove(index)
        };
        trace!(id = %removed.id(), "track removed");
        self.emit(&TrackListEvent::RemoveTrack(removed));
    }

    /// Remove every track, front to back.
    pub fn clear(&self) {
        while let Some(first) = self.get(0) {
            self.remove_track(&first);
        }
    }

    pub fn add_listener<F>(&self, listener: F) -> ObserverId
    where
        F: Fn(&TrackListEvent<K>) + Send + Sync + 'static,
    {
        let id = ObserverId(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if the id was not registered.
    pub fn remove_listener(&self, id: ObserverId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(observer, _)| *observer != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Validate a track before the selection list touches any sibling.
    pub(crate) fn ensure_insertable(&self, track: &Track<K>) -> TrackResult<()> {
        Self::check_insertable(&self.inner.tracks.read(), track)
    }

    pub(crate) fn check_insertable(tracks: &[Track<K>], track: &Track<K>) -> TrackResult<()> {
        if tracks.iter().any(|t| t.id() == track.id()) {
            return Err(TrackError::DuplicateId(track.id().clone()));
        }
        if track.is_owned() {
            return Err(TrackError::AlreadyOwned(track.id().clone()));
        }
        Ok(())
    }

    pub(crate) fn emit(&self, event: &TrackListEvent<K>) {
        let listeners: Vec<Listener<K>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}
