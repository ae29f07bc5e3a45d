//! Host text tracks synthesized for engine-rendered subtitle renditions.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use hlsbridge_engine::{Cue, Rendition, RenditionId, TextTrackDescriptor};
use hlsbridge_host::{MediaHost, TextTrack, TextTrackInit, TextTrackMode, matches_rendition};
use hlsbridge_tracks::ReentrancyGuard;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cue::{CueOutcome, add_cue_to_track};

/// Tally of one cue batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CueReport {
    pub added: usize,
    pub skipped: usize,
    /// Ids of cues the host refused.
    pub dropped: Vec<String>,
}

struct Synthesized {
    rendition: RenditionId,
    track: Arc<dyn TextTrack>,
}

/// Owns the text tracks created on the host for subtitle renditions.
///
/// Tracks are keyed by the rendition's stable id; a rendition that does not
/// carry a known id is matched structurally on kind, label and language.
pub struct SubtitleBridge {
    host: Arc<dyn MediaHost>,
    tracks: Mutex<Vec<Synthesized>>,
    /// Rendition last made `showing` by the bridge.
    active: Mutex<Option<RenditionId>>,
    /// Held while the bridge itself writes track modes.
    syncing: AtomicBool,
}

impl SubtitleBridge {
    pub fn new(host: Arc<dyn MediaHost>) -> Self {
        Self {
            host,
            tracks: Mutex::new(Vec::new()),
            active: Mutex::new(None),
            syncing: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.lock().is_empty()
    }

    /// Whether a mode change observed right now was written by the bridge.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Create a host text track for every rendition not seen before.
    ///
    /// Default renditions start `showing`, the rest `hidden`. Returns how
    /// many tracks were created.
    pub fn synthesize(&self, descriptors: &[TextTrackDescriptor]) -> usize {
        let _guard = ReentrancyGuard::enter(&self.syncing);
        let mut created = 0;
        for descriptor in descriptors {
            if self.index_of_id(&descriptor.rendition).is_some() {
                trace!(rendition = %descriptor.rendition, "text track already synthesized");
                continue;
            }
            let mode = if descriptor.default {
                TextTrackMode::Showing
            } else {
                TextTrackMode::Hidden
            };
            let track = self.host.add_text_track(TextTrackInit {
                kind: descriptor.kind,
                label: descriptor.label.clone(),
                language: descriptor.language.clone(),
                mode,
            });
            debug!(rendition = %descriptor.rendition, label = %descriptor.label, ?mode, "text track synthesized");
            if descriptor.default {
                self.active
                    .lock()
                    .get_or_insert_with(|| descriptor.rendition.clone());
            }
            self.tracks.lock().push(Synthesized {
                rendition: descriptor.rendition.clone(),
                track,
            });
            created += 1;
        }
        created
    }

    /// Show the track of `active` and disable every other one.
    ///
    /// Re-evaluates all tracks on each call.
    pub fn apply_switch(&self, active: Option<&Rendition>) {
        let _guard = ReentrancyGuard::enter(&self.syncing);
        let target = active.and_then(|rendition| self.index_for(rendition));
        let tracks: Vec<Arc<dyn TextTrack>> = {
            let tracks = self.tracks.lock();
            *self.active.lock() = target
                .and_then(|index| tracks.get(index))
                .map(|entry| entry.rendition.clone());
            tracks.iter().map(|entry| Arc::clone(&entry.track)).collect()
        };
        for (index, track) in tracks.iter().enumerate() {
            let mode = if Some(index) == target {
                TextTrackMode::Showing
            } else {
                TextTrackMode::Disabled
            };
            if track.mode() != mode {
                track.set_mode(mode);
            }
        }
        trace!(active = ?active.map(Rendition::stable_id), ?target, "subtitle modes applied");
    }

    /// The synthesized track rendering `rendition`.
    #[must_use]
    pub fn track_for(&self, rendition: &Rendition) -> Option<Arc<dyn TextTrack>> {
        let index = self.index_for(rendition)?;
        self.tracks
            .lock()
            .get(index)
            .map(|entry| Arc::clone(&entry.track))
    }

    /// Rendition of the synthesized track the host is showing.
    ///
    /// A showing track other than the one the bridge last applied wins: right
    /// after the user picks a track, the previous one is still showing until
    /// the engine confirms the switch.
    #[must_use]
    pub fn showing_rendition(&self) -> Option<RenditionId> {
        let active = self.active.lock().clone();
        let showing: Vec<RenditionId> = self
            .tracks
            .lock()
            .iter()
            .filter(|entry| entry.track.mode() == TextTrackMode::Showing)
            .map(|entry| entry.rendition.clone())
            .collect();
        showing
            .iter()
            .find(|id| Some(*id) != active.as_ref())
            .or_else(|| showing.first())
            .cloned()
    }

    /// Insert a cue batch into the track of `rendition`.
    ///
    /// `None` when no synthesized track renders that rendition.
    pub fn insert_cues(&self, rendition: &Rendition, cues: &[Cue]) -> Option<CueReport> {
        let track = self.track_for(rendition)?;
        let _guard = ReentrancyGuard::enter(&self.syncing);
        let mut report = CueReport::default();
        for cue in cues {
            match add_cue_to_track(track.as_ref(), cue) {
                CueOutcome::Added => report.added += 1,
                CueOutcome::Duplicate => report.skipped += 1,
                CueOutcome::Dropped => report.dropped.push(cue.id.clone()),
            }
        }
        Some(report)
    }

    /// Remove every synthesized track from the host.
    pub fn clear(&self) {
        let removed: Vec<Synthesized> = std::mem::take(&mut *self.tracks.lock());
        *self.active.lock() = None;
        for entry in &removed {
            self.host.remove_text_track(&entry.track);
        }
        if !removed.is_empty() {
            debug!(count = removed.len(), "synthesized text tracks removed");
        }
    }

    fn index_of_id(&self, id: &RenditionId) -> Option<usize> {
        self.tracks
            .lock()
            .iter()
            .position(|entry| &entry.rendition == id)
    }

    fn index_for(&self, rendition: &Rendition) -> Option<usize> {
        let tracks = self.tracks.lock();
        let stable = rendition.stable_id();
        tracks
            .iter()
            .position(|entry| entry.rendition == stable || entry.rendition == rendition.id)
            .or_else(|| {
                tracks
                    .iter()
                    .position(|entry| matches_rendition(entry.track.as_ref(), rendition))
            })
    }
}
