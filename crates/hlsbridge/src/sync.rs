//! Two-way synchronization between engine selection and the track lists.
//!
//! Engine events update the lists; list `change` events and host text-track
//! mode changes call the engine's selection setters. Every write in either
//! direction first checks whether the other side already agrees, which is
//! what ends a round trip after one hop.

use std::sync::{Arc, Weak};

use hlsbridge_engine::{
    Cue, EngineEvent, EngineEventKind, Level, Rendition, RenditionId, StreamingEngine,
    TextTrackDescriptor,
};
use hlsbridge_events::{SelectionOrigin, SubtitleEvent, TrackEvent};
use hlsbridge_host::HostObserverId;
use hlsbridge_tracks::{ObserverId, Track, TrackInit, TrackKind, TrackListEvent, Video};
use tracing::{debug, trace, warn};

use crate::{state::Shared, subscriptions::Subscriptions};

/// Registrations made for one session.
pub(crate) struct Wiring {
    pub(crate) subscriptions: Subscriptions,
    pub(crate) video_observer: ObserverId,
    pub(crate) audio_observer: ObserverId,
    pub(crate) text_observer: HostObserverId,
}

/// Register every engine, track-list and host handler for `generation`.
pub(crate) fn wire(
    shared: &Arc<Shared>,
    engine: &Arc<dyn StreamingEngine>,
    generation: u64,
) -> Wiring {
    let weak = Arc::downgrade(shared);
    let subscriptions = Subscriptions::new(Arc::clone(engine));

    subscriptions.on(
        EngineEventKind::ManifestLoaded,
        engine_handler(&weak, generation, |shared, engine, _| {
            reconcile_video(shared, engine);
            reconcile_audio(shared, engine);
            shared.bus.publish(TrackEvent::TracksPopulated {
                video: shared.video.len(),
                audio: shared.audio.len(),
            });
        }),
    );
    subscriptions.on(
        EngineEventKind::LevelsUpdated,
        engine_handler(&weak, generation, |shared, engine, _| {
            reconcile_video(shared, engine);
        }),
    );
    subscriptions.on(
        EngineEventKind::AudioTracksUpdated,
        engine_handler(&weak, generation, |shared, engine, _| {
            reconcile_audio(shared, engine);
        }),
    );
    subscriptions.on(
        EngineEventKind::LevelSwitched,
        engine_handler(&weak, generation, |shared, engine, event| {
            if let EngineEvent::LevelSwitched { level } = event {
                on_level_switched(shared, engine, *level);
            }
        }),
    );
    subscriptions.on(
        EngineEventKind::AudioTrackSwitched,
        engine_handler(&weak, generation, |shared, engine, event| {
            if let EngineEvent::AudioTrackSwitched { id } = event {
                on_audio_switched(shared, engine, *id);
            }
        }),
    );
    subscriptions.on(
        EngineEventKind::NonNativeTextTracksFound,
        engine_handler(&weak, generation, |shared, _, event| {
            if let EngineEvent::NonNativeTextTracksFound { tracks } = event {
                on_text_tracks_found(shared, tracks);
            }
        }),
    );
    subscriptions.on(
        EngineEventKind::SubtitleTrackSwitch,
        engine_handler(&weak, generation, |shared, engine, event| {
            if let EngineEvent::SubtitleTrackSwitch { id } = event {
                on_subtitle_switch(shared, engine, *id);
            }
        }),
    );
    subscriptions.on(
        EngineEventKind::CuesParsed,
        engine_handler(&weak, generation, |shared, engine, event| {
            if let EngineEvent::CuesParsed { cues } = event {
                on_cues_parsed(shared, engine, cues);
            }
        }),
    );

    let video_weak = weak.clone();
    let video_observer = shared.video.add_listener(move |event| {
        if let (TrackListEvent::Change, Some(shared)) = (event, video_weak.upgrade()) {
            on_video_change(&shared, generation);
        }
    });
    let audio_weak = weak.clone();
    let audio_observer = shared.audio.add_listener(move |event| {
        if let (TrackListEvent::Change, Some(shared)) = (event, audio_weak.upgrade()) {
            on_audio_change(&shared, generation);
        }
    });
    let text_observer = shared.host.on_text_tracks_change(Arc::new(move || {
        if let Some(shared) = weak.upgrade() {
            on_text_tracks_change(&shared, generation);
        }
    }));

    Wiring {
        subscriptions,
        video_observer,
        audio_observer,
        text_observer,
    }
}

/// Wrap `f` so it only runs while `generation` is the current session.
fn engine_handler<F>(
    shared: &Weak<Shared>,
    generation: u64,
    f: F,
) -> impl Fn(&EngineEvent) + Send + Sync + 'static
where
    F: Fn(&Shared, &dyn StreamingEngine, &EngineEvent) + Send + Sync + 'static,
{
    let shared = shared.clone();
    move |event| {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let Some(engine) = shared.engine_for(generation) else {
            trace!(generation, kind = ?event.kind(), "event from stale engine ignored");
            return;
        };
        f(&shared, engine.as_ref(), event);
    }
}

fn same_id<K: TrackKind>(track: &Track<K>, id: &RenditionId) -> bool {
    track.id().as_str() == id.as_str()
}

// -- engine -> track lists --

/// Bring the video list in line with the engine's levels, keyed by
/// [`Level::stable_id`].
///
/// Tracks whose level disappeared are removed, new levels are appended in
/// engine order, surviving tracks keep their identity.
pub(crate) fn reconcile_video(shared: &Shared, engine: &dyn StreamingEngine) {
    let levels = engine.levels();
    let ids: Vec<Option<RenditionId>> = levels.iter().map(Level::stable_id).collect();
    let current = engine
        .current_level()
        .and_then(|index| ids.get(index).cloned().flatten());

    for track in shared.video.tracks() {
        if !ids.iter().flatten().any(|id| same_id(&track, id)) {
            debug!(id = %track.id(), "level gone, removing video track");
            shared.video.remove_track(&track);
        }
    }

    for (level, id) in levels.iter().zip(&ids) {
        let Some(id) = id else {
            warn!(name = %level.name, "level without playlist url skipped");
            continue;
        };
        if shared.video.get_track_by_id(id.as_str()).is_some() {
            continue;
        }
        let init = TrackInit::new(id.as_str())
            .with_label(level.name.clone())
            .with_language(level.language.clone().unwrap_or_default());
        let video = Video {
            width: level.width,
            height: level.height,
            bitrate: level.bitrate,
        };
        let track = Track::video(init, video, current.as_ref() == Some(id));
        if let Err(err) = shared.video.add_track(track) {
            warn!(%err, "video track rejected");
        }
    }

    if let Some(track) = current.and_then(|id| shared.video.get_track_by_id(id.as_str())) {
        track.set_selected(true);
    }
    trace!(tracks = shared.video.len(), "video tracks reconciled");
}

/// Bring the audio list in line with the engine's audio renditions, keyed by
/// [`Rendition::stable_id`].
pub(crate) fn reconcile_audio(shared: &Shared, engine: &dyn StreamingEngine) {
    let renditions = engine.audio_tracks();
    let ids: Vec<RenditionId> = renditions.iter().map(Rendition::stable_id).collect();
    let current = engine
        .audio_track()
        .and_then(|index| ids.get(index).cloned());

    for track in shared.audio.tracks() {
        if !ids.iter().any(|id| same_id(&track, id)) {
            debug!(id = %track.id(), "rendition gone, removing audio track");
            shared.audio.remove_track(&track);
        }
    }

    for (rendition, id) in renditions.iter().zip(&ids) {
        if shared.audio.get_track_by_id(id.as_str()).is_some() {
            continue;
        }
        let init = TrackInit::new(id.as_str())
            .with_label(rendition.name.clone())
            .with_language(rendition.lang.clone().unwrap_or_default());
        let track = Track::audio(init, current.as_ref() == Some(id));
        if let Err(err) = shared.audio.add_track(track) {
            warn!(%err, "audio track rejected");
        }
    }

    if let Some(track) = current.and_then(|id| shared.audio.get_track_by_id(id.as_str())) {
        track.set_enabled(true);
    }
    trace!(tracks = shared.audio.len(), "audio tracks reconciled");
}

fn on_level_switched(shared: &Shared, engine: &dyn StreamingEngine, level: usize) {
    let Some(id) = engine.levels().get(level).and_then(Level::stable_id) else {
        warn!(level, "switched to unknown level");
        return;
    };
    let Some(track) = shared.video.get_track_by_id(id.as_str()) else {
        warn!(%id, "no video track for level");
        return;
    };
    if track.selected() {
        trace!(%id, "level already selected");
        return;
    }
    debug!(%id, level, "engine switched level");
    track.set_selected(true);
    shared.bus.publish(TrackEvent::VideoSelected {
        id: id.to_string(),
        origin: SelectionOrigin::Engine,
    });
}

fn on_audio_switched(shared: &Shared, engine: &dyn StreamingEngine, index: usize) {
    let Some(id) = engine.audio_tracks().get(index).map(Rendition::stable_id) else {
        warn!(index, "switched to unknown audio rendition");
        return;
    };
    let Some(track) = shared.audio.get_track_by_id(id.as_str()) else {
        warn!(%id, "no audio track for rendition");
        return;
    };
    if track.enabled() {
        trace!(%id, "audio rendition already enabled");
        return;
    }
    debug!(%id, index, "engine switched audio");
    track.set_enabled(true);
    shared.bus.publish(TrackEvent::AudioEnabled {
        id: id.to_string(),
        origin: SelectionOrigin::Engine,
    });
}

// -- track lists -> engine --

fn on_video_change(shared: &Shared, generation: u64) {
    let Some(engine) = shared.engine_for(generation) else {
        return;
    };
    let Some(track) = shared.video.selected_track() else {
        return;
    };
    let levels = engine.levels();
    let active = engine
        .current_level()
        .and_then(|index| levels.get(index))
        .and_then(Level::stable_id);
    if active.is_some_and(|id| same_id(&track, &id)) {
        trace!(id = %track.id(), "video selection matches engine");
        return;
    }
    let Some(index) = levels
        .iter()
        .position(|level| level.stable_id().is_some_and(|id| same_id(&track, &id)))
    else {
        warn!(id = %track.id(), "selected video track has no level");
        return;
    };
    debug!(id = %track.id(), index, "video track selected, switching level");
    engine.set_current_level(index);
    shared.bus.publish(TrackEvent::VideoSelected {
        id: track.id().to_string(),
        origin: SelectionOrigin::User,
    });
}

fn on_audio_change(shared: &Shared, generation: u64) {
    let Some(engine) = shared.engine_for(generation) else {
        return;
    };
    let Some(track) = shared.audio.enabled_track() else {
        return;
    };
    let renditions = engine.audio_tracks();
    let active = engine
        .audio_track()
        .and_then(|index| renditions.get(index))
        .map(Rendition::stable_id);
    if active.is_some_and(|id| same_id(&track, &id)) {
        trace!(id = %track.id(), "audio selection matches engine");
        return;
    }
    let Some(index) = renditions
        .iter()
        .position(|rendition| same_id(&track, &rendition.stable_id()))
    else {
        warn!(id = %track.id(), "enabled audio track has no rendition");
        return;
    };
    debug!(id = %track.id(), index, "audio track enabled, switching rendition");
    engine.set_audio_track(index);
    shared.bus.publish(TrackEvent::AudioEnabled {
        id: track.id().to_string(),
        origin: SelectionOrigin::User,
    });
}

// -- subtitles --

fn on_text_tracks_found(shared: &Shared, tracks: &[TextTrackDescriptor]) {
    let count = shared.subtitles.synthesize(tracks);
    if count > 0 {
        debug!(count, "subtitle text tracks synthesized");
        shared
            .bus
            .publish(SubtitleEvent::TracksSynthesized { count });
    }
}

fn on_subtitle_switch(shared: &Shared, engine: &dyn StreamingEngine, index: Option<usize>) {
    let rendition = index.and_then(|index| engine.subtitle_tracks().get(index).cloned());
    if index.is_some() && rendition.is_none() {
        warn!(?index, "switched to unknown subtitle rendition");
    }
    shared.subtitles.apply_switch(rendition.as_ref());
    shared.bus.publish(SubtitleEvent::Switched {
        id: rendition.map(|rendition| rendition.stable_id().to_string()),
    });
}

fn on_cues_parsed(shared: &Shared, engine: &dyn StreamingEngine, cues: &[Cue]) {
    let Some(rendition) = engine
        .subtitle_track()
        .and_then(|index| engine.subtitle_tracks().get(index).cloned())
    else {
        trace!(count = cues.len(), "cues without an active subtitle rendition");
        return;
    };
    let Some(report) = shared.subtitles.insert_cues(&rendition, cues) else {
        warn!(rendition = %rendition.stable_id(), "no text track for cue batch");
        return;
    };
    trace!(added = report.added, skipped = report.skipped, "cue batch inserted");
    for id in report.dropped {
        shared.bus.publish(SubtitleEvent::CueDropped { id });
    }
    shared.bus.publish(SubtitleEvent::CuesAdded {
        added: report.added,
        skipped: report.skipped,
    });
}

/// The user changed a text track mode on the host.
fn on_text_tracks_change(shared: &Shared, generation: u64) {
    if shared.subtitles.is_syncing() || shared.subtitles.is_empty() {
        return;
    }
    let Some(engine) = shared.engine_for(generation) else {
        return;
    };
    let target = match shared.subtitles.showing_rendition() {
        None => None,
        Some(id) => {
            let renditions = engine.subtitle_tracks();
            let Some(index) = renditions
                .iter()
                .position(|rendition| rendition.stable_id() == id)
            else {
                warn!(%id, "showing text track has no subtitle rendition");
                return;
            };
            Some(index)
        }
    };
    if engine.subtitle_track() == target {
        return;
    }
    debug!(?target, "text track mode changed, switching subtitles");
    engine.set_subtitle_track(target);
}
