//! Engine-rendered subtitles surfaced as host text tracks.

use std::sync::Arc;

use hlsbridge_engine::{
    Cue, EngineEvent, Rendition, StreamingEngine, TextTrackDescriptor, TextTrackKind,
};
use hlsbridge_events::{Event, SubtitleEvent};
use hlsbridge_host::{MediaHost, TextTrack, TextTrackInit, TextTrackMode};
use hlsbridge_test_utils::{FakeEngine, subtitle_rendition, tracing_setup};
use rstest::rstest;

use crate::common::{Harness, ladder};

fn renditions() -> Vec<Rendition> {
    vec![
        subtitle_rendition("en", "English", "en"),
        subtitle_rendition("fr", "French", "fr"),
    ]
}

fn descriptors(default: Option<usize>) -> Vec<TextTrackDescriptor> {
    renditions()
        .iter()
        .enumerate()
        .map(|(index, rendition)| TextTrackDescriptor {
            rendition: rendition.stable_id(),
            kind: TextTrackKind::Subtitles,
            label: rendition.name.clone(),
            language: rendition.lang.clone().unwrap_or_default(),
            default: default == Some(index),
        })
        .collect()
}

/// Loaded harness whose engine has found both subtitle renditions, English
/// active.
fn with_subtitles() -> (Harness, Arc<FakeEngine>) {
    let harness = Harness::with_engine(|engine| {
        engine.set_levels(ladder());
        engine.set_subtitle_tracks(renditions());
        engine.preselect(Some(1), None);
    });
    let engine = harness.load();
    engine.emit(&EngineEvent::NonNativeTextTracksFound {
        tracks: descriptors(Some(0)),
    });
    engine.switch_subtitles(Some(0));
    (harness, engine)
}

fn modes(harness: &Harness) -> Vec<TextTrackMode> {
    harness
        .host
        .fake_tracks()
        .iter()
        .map(|track| track.mode())
        .collect()
}

#[rstest]
fn found_renditions_become_text_tracks(_tracing_setup: ()) {
    let harness = Harness::with_engine(|engine| engine.set_subtitle_tracks(renditions()));
    let engine = harness.load();

    engine.emit(&EngineEvent::NonNativeTextTracksFound {
        tracks: descriptors(Some(1)),
    });

    let tracks = harness.bridge.text_tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].label(), "English");
    assert_eq!(tracks[1].language(), "fr");
    assert_eq!(modes(&harness), [TextTrackMode::Hidden, TextTrackMode::Showing]);
}

#[rstest]
fn repeated_discovery_keeps_one_track_per_rendition(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();

    engine.emit(&EngineEvent::NonNativeTextTracksFound {
        tracks: descriptors(None),
    });

    assert_eq!(harness.host.text_tracks().len(), 2);
}

#[rstest]
fn engine_switch_shows_exactly_one_track(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();
    assert_eq!(modes(&harness), [TextTrackMode::Showing, TextTrackMode::Disabled]);

    engine.switch_subtitles(Some(1));
    assert_eq!(modes(&harness), [TextTrackMode::Disabled, TextTrackMode::Showing]);

    engine.switch_subtitles(None);
    assert_eq!(modes(&harness), [TextTrackMode::Disabled, TextTrackMode::Disabled]);
    assert!(engine.calls().set_subtitle_track.is_empty());
}

#[rstest]
fn repeated_cues_are_not_inserted_twice(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();
    let mut events = harness.bridge.events();

    engine.emit(&EngineEvent::CuesParsed {
        cues: vec![Cue::new("1", 0.0, 2.0, "Hi"), Cue::new("2", 2.0, 4.0, "there")],
    });
    engine.emit(&EngineEvent::CuesParsed {
        cues: vec![Cue::new("2", 2.0, 4.0, "there"), Cue::new("3", 4.0, 6.0, "!")],
    });

    assert_eq!(harness.host.fake_tracks()[0].cue_count(), 3);
    assert_eq!(harness.host.fake_tracks()[1].cue_count(), 0);
    let batches: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            Event::Subtitle(SubtitleEvent::CuesAdded { added, skipped }) => Some((added, skipped)),
            _ => None,
        })
        .collect();
    assert_eq!(batches, [(2, 0), (1, 1)]);
}

#[rstest]
fn styled_cue_falls_back_to_plain_text(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();
    let track = Arc::clone(&harness.host.fake_tracks()[0]);
    track.reject_settings(true);

    let mut styled = Cue::new("7", 1.0, 3.0, "Look");
    styled.settings = Some("line:10% align:start".into());
    engine.emit(&EngineEvent::CuesParsed { cues: vec![styled] });

    let cues = track.cues();
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].id, "7");
    assert_eq!(cues[0].text, "Look");
    assert_eq!(cues[0].settings, None);
}

#[rstest]
fn refused_cue_is_reported(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();
    harness.host.fake_tracks()[0].reject_all(true);
    let mut events = harness.bridge.events();

    engine.emit(&EngineEvent::CuesParsed {
        cues: vec![Cue::new("5", 0.0, 1.0, "gone")],
    });

    let dropped: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            Event::Subtitle(SubtitleEvent::CueDropped { id }) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(dropped, ["5"]);
}

#[rstest]
fn cues_without_active_rendition_are_ignored(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();
    engine.switch_subtitles(None);

    engine.emit(&EngineEvent::CuesParsed {
        cues: vec![Cue::new("1", 0.0, 1.0, "nobody")],
    });

    assert!(
        harness
            .host
            .fake_tracks()
            .iter()
            .all(|track| track.cue_count() == 0)
    );
}

#[rstest]
#[case::without_confirmation(false)]
#[case::with_confirmation(true)]
fn user_pick_switches_the_engine_once(_tracing_setup: (), #[case] confirm: bool) {
    let (harness, engine) = with_subtitles();
    engine.switch_on_set(confirm);

    harness.host.fake_tracks()[1].set_mode(TextTrackMode::Showing);

    assert_eq!(engine.calls().set_subtitle_track, [Some(1)]);
    assert_eq!(engine.subtitle_track(), Some(1));
    if confirm {
        assert_eq!(modes(&harness), [TextTrackMode::Disabled, TextTrackMode::Showing]);
    }
}

#[rstest]
fn user_hiding_the_track_turns_subtitles_off(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();

    harness.host.fake_tracks()[0].set_mode(TextTrackMode::Hidden);

    assert_eq!(engine.calls().set_subtitle_track, [None]);
}

#[rstest]
fn native_text_tracks_are_left_alone(_tracing_setup: ()) {
    let harness = Harness::with_engine(|engine| engine.set_subtitle_tracks(renditions()));
    let engine = harness.load();
    let native = harness.host.add_native_track(TextTrackInit {
        kind: TextTrackKind::Captions,
        label: "CC1".into(),
        language: "en".into(),
        mode: TextTrackMode::Hidden,
    });

    native.set_mode(TextTrackMode::Showing);

    assert!(engine.calls().set_subtitle_track.is_empty());
    assert_eq!(native.mode(), TextTrackMode::Showing);
}

#[rstest]
fn detach_removes_synthesized_tracks(_tracing_setup: ()) {
    let (harness, engine) = with_subtitles();

    harness.bridge.set_src("https://cdn.example/clip.mp4").unwrap();

    assert!(harness.host.text_tracks().is_empty());
    assert!(engine.calls().set_subtitle_track.is_empty());
}
