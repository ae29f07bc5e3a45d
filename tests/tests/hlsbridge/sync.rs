//! Selection kept in agreement between the engine and the track lists.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use hlsbridge_engine::EngineEvent;
use hlsbridge_events::{Event, SelectionOrigin, TrackEvent};
use hlsbridge_test_utils::{audio_rendition, level, tracing_setup};
use rstest::rstest;

use crate::common::{Harness, ladder, playing};

#[rstest]
fn manifest_populates_both_lists(_tracing_setup: ()) {
    let (harness, _engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();
    let audio = harness.bridge.audio_tracks().unwrap();

    assert_eq!(video.len(), 3);
    assert_eq!(video.selected_index(), Some(1));
    assert_eq!(video.selected_track().unwrap().label(), "720p");
    assert_eq!(audio.len(), 2);
    assert_eq!(audio.enabled_track().unwrap().language(), "en");
}

#[rstest]
fn track_ids_are_stable_not_positional(_tracing_setup: ()) {
    let (harness, _engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();

    let id = video.item(0).unwrap().id().to_string();
    assert!(id.ends_with("360p.m3u8"), "{id}");
}

#[rstest]
fn engine_switch_never_calls_back_into_engine(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();
    let audio = harness.bridge.audio_tracks().unwrap();

    engine.switch_level(2);
    engine.switch_audio(1);

    assert_eq!(video.selected_index(), Some(2));
    assert_eq!(audio.enabled_index(), Some(1));
    let calls = engine.calls();
    assert!(calls.set_current_level.is_empty());
    assert!(calls.set_audio_track.is_empty());
}

#[rstest]
fn repeated_engine_switch_is_silent(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    video.add_listener(move |event| {
        if event.name() == "change" {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    engine.switch_level(1);
    assert_eq!(changes.load(Ordering::SeqCst), 0);
    engine.switch_level(0);
    engine.switch_level(0);
    assert_eq!(changes.load(Ordering::SeqCst), 1);
}

#[rstest]
fn user_selection_calls_setter_once(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();

    video.item(2).unwrap().set_selected(true);

    assert_eq!(engine.calls().set_current_level, [2]);
    assert_eq!(video.selected_index(), Some(2));
}

#[rstest]
fn user_audio_selection_calls_setter_once(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let audio = harness.bridge.audio_tracks().unwrap();

    audio.item(1).unwrap().set_enabled(true);

    assert_eq!(engine.calls().set_audio_track, [1]);
}

#[rstest]
fn synchronous_confirmation_ends_the_round_trip(_tracing_setup: ()) {
    let (harness, engine) = playing();
    engine.switch_on_set(true);
    let video = harness.bridge.video_tracks().unwrap();

    video.item(0).unwrap().set_selected(true);
    video.item(2).unwrap().set_selected(true);

    assert_eq!(engine.calls().set_current_level, [0, 2]);
    assert_eq!(video.selected_index(), Some(2));
}

#[rstest]
fn reselecting_the_active_track_is_a_no_op(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();

    video.item(1).unwrap().set_selected(true);
    assert!(engine.calls().set_current_level.is_empty());
}

#[rstest]
fn levels_update_reconciles_by_id(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();
    let hd = video.item(2).unwrap();

    let mut levels = ladder();
    levels.remove(0);
    levels.push(level("4k", 2160));
    engine.set_levels(levels);
    engine.preselect(Some(0), Some(0));
    engine.emit(&EngineEvent::LevelsUpdated);

    let labels: Vec<_> = video.tracks().iter().map(|t| t.label().to_owned()).collect();
    assert_eq!(labels, ["720p", "1080p", "4k"]);
    assert!(video.item(1).unwrap().same(&hd));
    assert_eq!(video.selected_index(), Some(0));
    assert!(engine.calls().set_current_level.is_empty());

    // positions moved: selecting 1080p must resolve to its new index
    hd.set_selected(true);
    assert_eq!(engine.calls().set_current_level, [1]);
}

#[rstest]
fn audio_rendition_list_change_reconciles(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let audio = harness.bridge.audio_tracks().unwrap();

    engine.set_audio_tracks(vec![
        audio_rendition("de", "Deutsch", "de"),
        audio_rendition("fr", "Français", "fr"),
    ]);
    engine.preselect(Some(1), Some(1));
    engine.emit(&EngineEvent::AudioTracksUpdated);

    let labels: Vec<_> = audio.tracks().iter().map(|t| t.label().to_owned()).collect();
    assert_eq!(labels, ["Deutsch", "Français"]);
    assert_eq!(audio.enabled_track().unwrap().label(), "Français");
}

#[rstest]
fn selections_are_published_with_origin(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let mut events = harness.bridge.events();
    let video = harness.bridge.video_tracks().unwrap();

    engine.switch_level(0);
    video.item(2).unwrap().set_selected(true);

    let origins: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            Event::Track(TrackEvent::VideoSelected { origin, .. }) => Some(origin),
            _ => None,
        })
        .collect();
    assert_eq!(origins, [SelectionOrigin::Engine, SelectionOrigin::User]);
}

#[rstest]
fn manifest_before_any_level_is_harmless(_tracing_setup: ()) {
    let harness = Harness::new();
    let engine = harness.load();

    assert!(harness.bridge.video_tracks().unwrap().is_empty());
    engine.switch_level(0);
    assert!(engine.calls().set_current_level.is_empty());
}
