//! Track lists that allow at most one selected (video) or enabled (audio)
//! track at a time.

use std::sync::{Arc, atomic::Ordering};

use tracing::trace;

use crate::{
    error::TrackResult,
    guard::ReentrancyGuard,
    list::{TrackList, TrackListEvent},
    track::{Audio, FlagHook, Track, TrackKind, Video},
    types::ObserverId,
};

/// [`TrackList`] enforcing a single active track.
///
/// Flipping one track on turns every sibling off inside the same call and
/// produces exactly one `change` notification, however many siblings had to
/// be forced off. Writing a flag that already has the requested value
/// produces nothing.
pub struct SelectionList<K: TrackKind> {
    list: TrackList<K>,
}

pub type VideoTrackList = SelectionList<Video>;
pub type AudioTrackList = SelectionList<Audio>;

impl<K: TrackKind> Clone for SelectionList<K> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

impl<K: TrackKind> Default for SelectionList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrackKind> std::fmt::Debug for SelectionList<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SelectionList").field(&self.list).finish()
    }
}

impl<K: TrackKind> SelectionList<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: TrackList::new(),
        }
    }

    /// Build a list from an initial set of tracks.
    ///
    /// When several tracks arrive active, the last one wins and the others
    /// are switched off before the list is handed out. Every track is
    /// validated first: on error no flag has been touched and no track has
    /// been claimed.
    pub fn from_tracks(tracks: Vec<Track<K>>) -> TrackResult<Self> {
        for (index, track) in tracks.iter().enumerate() {
            let earlier = &tracks[..index];
            if earlier.iter().any(|t| t.same(track)) {
                continue;
            }
            TrackList::check_insertable(earlier, track)?;
        }
        if let Some(winner) = tracks.iter().rev().find(|track| track.is_active()) {
            for track in tracks.iter().filter(|track| !track.same(winner)) {
                track.set_active(false);
            }
        }
        let this = Self::new();
        for track in tracks {
            this.add_track(track)?;
        }
        Ok(this)
    }

    /// Add a track, switching siblings off first if it arrives active.
    ///
    /// Only `addtrack` is emitted: forcing siblings off while inserting is
    /// part of the insertion, not a separate selection change.
    pub fn add_track(&self, track: Track<K>) -> TrackResult<()> {
        if self.list.contains(&track) {
            return Ok(());
        }
        self.list.ensure_insertable(&track)?;

        if track.is_active() {
            let _guard = ReentrancyGuard::enter(&self.list.inner.changing);
            self.disable_others(&track);
        }

        track.set_hook(Some(self.flag_hook()));
        if let Err(err) = self.list.add_track(track.clone()) {
            track.set_hook(None);
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_track(&self, track: &Track<K>) {
        self.list.remove_track(track);
    }

    pub fn clear(&self) {
        self.list.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn item(&self, index: usize) -> TrackResult<Track<K>> {
        self.list.item(index)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Track<K>> {
        self.list.get(index)
    }

    #[must_use]
    pub fn get_track_by_id(&self, id: &str) -> Option<Track<K>> {
        self.list.get_track_by_id(id)
    }

    #[must_use]
    pub fn tracks(&self) -> Vec<Track<K>> {
        self.list.tracks()
    }

    pub fn add_listener<F>(&self, listener: F) -> ObserverId
    where
        F: Fn(&TrackListEvent<K>) + Send + Sync + 'static,
    {
        self.list.add_listener(listener)
    }

    pub fn remove_listener(&self, id: ObserverId) -> bool {
        self.list.remove_listener(id)
    }

    /// The underlying generic list.
    #[must_use]
    pub fn as_list(&self) -> &TrackList<K> {
        &self.list
    }

    /// Index of the first active track.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.list.tracks().iter().position(Track::is_active)
    }

    #[must_use]
    pub fn active_track(&self) -> Option<Track<K>> {
        self.list.tracks().into_iter().find(Track::is_active)
    }

    /// Whether the list is currently forcing siblings off.
    #[must_use]
    pub fn is_changing(&self) -> bool {
        self.list.inner.changing.load(Ordering::Acquire)
    }

    fn disable_others(&self, keep: &Track<K>) {
        for track in self.list.tracks() {
            if !track.same(keep) {
                track.set_active(false);
            }
        }
    }

    fn flag_hook(&self) -> FlagHook<K> {
        let weak = Arc::downgrade(&self.list.inner);
        Arc::new(move |track: &Track<K>| {
            if let Some(inner) = weak.upgrade() {
                Self {
                    list: TrackList { inner },
                }
                .on_flag_changed(track);
            }
        })
    }

    fn on_flag_changed(&self, track: &Track<K>) {
        {
            let Some(_guard) = ReentrancyGuard::enter(&self.list.inner.changing) else {
                return;
            };
            if track.is_active() {
                self.disable_others(track);
            }
        }
        trace!(id = %track.id(), flag = K::FLAG, value = track.is_active(), "selection changed");
        self.list.emit(&TrackListEvent::Change);
    }
}

impl SelectionList<Video> {
    /// Index of the selected video track.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.active_index()
    }

    #[must_use]
    pub fn selected_track(&self) -> Option<Track<Video>> {
        self.active_track()
    }
}

impl SelectionList<Audio> {
    #[must_use]
    pub fn enabled_index(&self) -> Option<usize> {
        self.active_index()
    }

    #[must_use]
    pub fn enabled_track(&self) -> Option<Track<Audio>> {
        self.active_track()
    }
}
