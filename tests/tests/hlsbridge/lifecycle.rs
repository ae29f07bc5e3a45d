//! Attach, replace and detach of engines behind the bridge.

use std::{
    sync::{Arc, Weak},
    time::{Duration, SystemTime},
};

use hlsbridge::{AttachPhase, BridgeConfig, BridgeError, MediaBridge};
use hlsbridge_engine::{
    EngineError, EngineEvent, EngineEventKind, Fragment, LevelDetails, StreamingEngine,
};
use hlsbridge_events::{AttachEvent, Event};
use hlsbridge_host::MediaHost;
use hlsbridge_test_utils::{
    FakeEngineFactory, FakeHost, MANIFEST_URL, level, tracing_setup,
};
use hlsbridge_time::StaticTimeRanges;
use parking_lot::Mutex;
use rstest::rstest;

use crate::common::{Harness, playing};

const CLIP: &str = "https://cdn.example/clip.mp4";

#[rstest]
fn detach_is_idempotent(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let video = harness.bridge.video_tracks().unwrap();
    let audio = harness.bridge.audio_tracks().unwrap();
    assert!(engine.handler_count() > 0);
    assert_eq!(harness.host.listener_count(), 1);

    harness.bridge.set_src(CLIP).unwrap();
    harness.bridge.set_src(CLIP).unwrap();

    assert!(video.is_empty());
    assert!(audio.is_empty());
    assert_eq!(engine.handler_count(), 0);
    assert_eq!(harness.host.listener_count(), 0);
    let calls = engine.calls();
    assert_eq!(calls.detach_media, 1);
    assert_eq!(calls.destroy, 1);
    assert_eq!(harness.bridge.phase(), AttachPhase::Detached);
}

#[rstest]
fn repeated_cycles_do_not_leak_handlers(_tracing_setup: ()) {
    let harness = Harness::new();
    for _ in 0..3 {
        harness.load();
        harness.bridge.set_src(CLIP).unwrap();
    }
    assert_eq!(harness.factory.created().len(), 3);
    for engine in harness.factory.created() {
        assert_eq!(engine.handler_count(), 0);
        assert!(engine.is_destroyed());
    }
    assert_eq!(harness.host.listener_count(), 0);
}

#[rstest]
fn new_source_replaces_the_engine(_tracing_setup: ()) {
    let (harness, first) = playing();
    let video = harness.bridge.video_tracks().unwrap();

    harness.bridge.set_src(MANIFEST_URL).unwrap();
    let second = harness.engine();

    assert!(first.is_destroyed());
    assert_eq!(first.handler_count(), 0);
    assert!(!second.is_destroyed());
    assert!(video.is_empty());

    second.set_levels(vec![level("480p", 480)]);
    second.emit(&EngineEvent::ManifestLoaded);
    assert_eq!(harness.bridge.video_tracks().unwrap().len(), 1);
}

#[rstest]
fn replaced_engine_cannot_touch_the_lists(_tracing_setup: ()) {
    let (harness, first) = playing();
    harness.bridge.set_src(MANIFEST_URL).unwrap();
    let second = harness.engine();
    second.set_levels(vec![level("480p", 480)]);
    second.emit(&EngineEvent::ManifestLoaded);

    first.emit(&EngineEvent::ManifestLoaded);
    first.switch_level(2);

    let video = harness.bridge.video_tracks().unwrap();
    assert_eq!(video.len(), 1);
    assert_eq!(video.item(0).unwrap().label(), "480p");
}

#[rstest]
fn blob_source_keeps_the_engine(_tracing_setup: ()) {
    let (harness, engine) = playing();

    harness.bridge.set_src("blob:https://cdn.example/0f1e").unwrap();

    assert!(harness.bridge.is_engine_driven());
    assert!(!engine.is_destroyed());
    assert_eq!(
        harness.host.native_src().as_deref(),
        Some("blob:https://cdn.example/0f1e")
    );
    assert_eq!(harness.bridge.src().as_deref(), Some(MANIFEST_URL));
}

#[rstest]
fn unparsable_source_goes_to_the_host(_tracing_setup: ()) {
    let (harness, engine) = playing();

    harness.bridge.set_src("clip.mp4").unwrap();

    assert!(engine.is_destroyed());
    assert_eq!(harness.bridge.src().as_deref(), Some("clip.mp4"));
}

#[rstest]
fn seeks_are_clamped_while_engine_driven(_tracing_setup: ()) {
    let (harness, _engine) = playing();

    harness.bridge.set_current_time(50.0);
    assert_eq!(harness.bridge.current_time(), 20.0);
    harness.bridge.set_current_time(3.0);
    assert_eq!(harness.bridge.current_time(), 10.0);
    harness.bridge.set_current_time(12.5);
    assert_eq!(harness.bridge.current_time(), 12.5);

    harness.bridge.set_src(CLIP).unwrap();
    harness.bridge.set_current_time(50.0);
    assert_eq!(harness.bridge.current_time(), 50.0);
}

#[rstest]
fn seek_without_window_is_forwarded(_tracing_setup: ()) {
    let harness = Harness::new();
    harness.load();

    assert_eq!(harness.bridge.seekable().length(), 0);
    harness.bridge.set_current_time(42.0);
    assert_eq!(harness.bridge.current_time(), 42.0);
}

#[rstest]
fn seekable_switches_between_engine_and_native(_tracing_setup: ()) {
    let host = Arc::new(FakeHost::with_seekable(StaticTimeRanges::new(vec![(0.0, 3.0)])));
    let factory = FakeEngineFactory::new();
    factory.on_create(|engine| {
        engine.set_levels(crate::common::ladder());
        engine.preselect(Some(0), None);
    });
    let bridge =
        MediaBridge::attach(host, BridgeConfig::default().with_factory(factory)).unwrap();
    assert_eq!(bridge.seekable().end(0), Ok(3.0));

    bridge.set_src(MANIFEST_URL).unwrap();
    let seekable = bridge.seekable();
    assert_eq!(seekable.end(0), Ok(20.0));

    bridge.set_src(CLIP).unwrap();
    assert_eq!(bridge.seekable().end(0), Ok(3.0));
    // a view handed out earlier falls back once its engine is gone
    assert_eq!(seekable.end(0), Ok(3.0));
}

#[rstest]
fn start_date_follows_the_source(_tracing_setup: ()) {
    let native_date = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    let host = Arc::new(FakeHost::default().with_start_date(native_date));
    let factory = FakeEngineFactory::new();
    factory.on_create(|engine| {
        let mut live = level("live", 720);
        live.details = Some(Arc::new(LevelDetails::new(vec![Fragment {
            start: 4.0,
            duration: 4.0,
            program_date_time: Some(1_700_000_004_000),
        }])));
        engine.set_levels(vec![live]);
        engine.preselect(Some(0), None);
    });
    let bridge =
        MediaBridge::attach(host, BridgeConfig::default().with_factory(factory)).unwrap();
    assert_eq!(bridge.start_date(), Some(native_date));

    bridge.set_src(MANIFEST_URL).unwrap();
    assert_eq!(
        bridge.start_date(),
        Some(SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_000))
    );
}

#[rstest]
fn refused_source_leaves_nothing_behind(_tracing_setup: ()) {
    let harness = Harness::with_engine(|engine| engine.fail_load(true));

    let err = harness.bridge.set_src(MANIFEST_URL).unwrap_err();

    assert!(matches!(err, BridgeError::Engine(EngineError::Load { .. })));
    let engine = harness.engine();
    assert!(engine.is_destroyed());
    assert_eq!(engine.handler_count(), 0);
    assert!(!harness.bridge.is_engine_driven());
    assert!(harness.bridge.video_tracks().is_none());
    // media was never attached, so there is nothing to detach
    assert_eq!(engine.calls().detach_media, 0);
}

#[rstest]
fn engine_receives_the_configured_options(_tracing_setup: ()) {
    let harness = Harness::new();
    harness.load();

    let configs = harness.factory.configs();
    assert!(configs[0].live_duration_infinity);
    assert_eq!(harness.engine().calls().load_source[0].as_str(), MANIFEST_URL);
    assert_eq!(harness.engine().calls().attach_media, 1);
}

#[rstest]
fn detach_hands_back_the_host(_tracing_setup: ()) {
    let (harness, engine) = playing();
    let Harness { host, bridge, .. } = harness;

    let returned = bridge.detach();

    assert_eq!(
        Arc::as_ptr(&returned).cast::<()>(),
        Arc::as_ptr(&host).cast::<()>()
    );
    assert!(engine.is_destroyed());
    assert_eq!(engine.calls().destroy, 1);
}

#[rstest]
fn dropping_the_bridge_disposes_the_engine(_tracing_setup: ()) {
    let (harness, engine) = playing();
    drop(harness);
    assert!(engine.is_destroyed());
    assert_eq!(engine.handler_count(), 0);
}

#[rstest]
fn lifecycle_is_published(_tracing_setup: ()) {
    let harness = Harness::new();
    let mut events = harness.bridge.events();

    harness.load();
    harness.bridge.set_src(CLIP).unwrap();

    let lifecycle: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            Event::Attach(attach) => Some(attach),
            _ => None,
        })
        .collect();
    assert_eq!(
        lifecycle,
        [
            AttachEvent::Attached {
                src: MANIFEST_URL.to_owned(),
                generation: 1
            },
            AttachEvent::Detached { generation: 1 },
            AttachEvent::NativeSource {
                src: CLIP.to_owned()
            },
        ]
    );
}

/// Bridge shared with a `MediaDetaching` handler on its first engine, which
/// assigns `nested` while that engine is being torn down.
fn reentrant_bridge(
    nested: &'static str,
) -> (Arc<MediaBridge>, Arc<FakeEngineFactory>, Arc<Mutex<Vec<bool>>>) {
    let factory = FakeEngineFactory::new();
    let bridge = Arc::new(
        MediaBridge::attach(
            FakeHost::new(),
            BridgeConfig::default().with_factory(factory.clone()),
        )
        .unwrap(),
    );
    bridge.set_src(MANIFEST_URL).unwrap();

    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&outcomes);
    let weak: Weak<MediaBridge> = Arc::downgrade(&bridge);
    factory.last().unwrap().subscribe(
        EngineEventKind::MediaDetaching,
        Arc::new(move |_: &EngineEvent| {
            if let Some(bridge) = weak.upgrade() {
                let refused = matches!(bridge.set_src(nested), Err(BridgeError::Detaching));
                sink.lock().push(refused);
            }
        }),
    );
    (bridge, factory, outcomes)
}

#[rstest]
fn detach_reached_from_inside_detach_is_a_noop(_tracing_setup: ()) {
    let (bridge, factory, outcomes) = reentrant_bridge(CLIP);

    bridge.set_src(CLIP).unwrap();

    let engine = factory.last().unwrap();
    let calls = engine.calls();
    assert_eq!(calls.detach_media, 1);
    assert_eq!(calls.destroy, 1);
    assert_eq!(*outcomes.lock(), [false]);
    assert_eq!(bridge.phase(), AttachPhase::Detached);
    assert_eq!(bridge.src().as_deref(), Some(CLIP));
}

#[rstest]
#[case::to_native(CLIP, 1, AttachPhase::Detached)]
#[case::to_new_engine(MANIFEST_URL, 2, AttachPhase::Attached)]
fn attach_from_inside_detach_is_refused(
    _tracing_setup: (),
    #[case] outer: &str,
    #[case] engines: usize,
    #[case] phase: AttachPhase,
) {
    let (bridge, factory, outcomes) = reentrant_bridge(MANIFEST_URL);
    let first = factory.last().unwrap();

    bridge.set_src(outer).unwrap();

    assert_eq!(*outcomes.lock(), [true]);
    assert_eq!(factory.created().len(), engines);
    assert!(first.is_destroyed());
    assert_eq!(first.calls().destroy, 1);
    assert_eq!(bridge.is_engine_driven(), engines == 2);
    assert_eq!(bridge.phase(), phase);
    if engines == 2 {
        assert!(!factory.last().unwrap().is_destroyed());
    }
}
