//! Seekable window derived from a fake engine's fragment timing.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use hlsbridge_engine::{Fragment, LevelDetails, StreamingEngine};
use hlsbridge_test_utils::{FakeEngine, details, level, loaded_level, tracing_setup};
use hlsbridge_time::{RangeError, SeekableTimeRanges, StaticTimeRanges, TimeRanges, start_date};
use rstest::rstest;

fn seekable_over(engine: &Arc<FakeEngine>) -> SeekableTimeRanges {
    let engine: Arc<dyn StreamingEngine> = engine.clone();
    SeekableTimeRanges::new(
        move || Some(Arc::clone(&engine)),
        Arc::new(StaticTimeRanges::new(vec![(0.0, 99.0)])),
    )
}

#[rstest]
fn window_spans_active_fragments(_tracing_setup: ()) {
    let engine = FakeEngine::new();
    engine.set_levels(vec![loaded_level("720p", 720, &[(10.0, 5.0), (15.0, 5.0)])]);
    engine.preselect(Some(0), None);
    let seekable = seekable_over(&engine);

    assert_eq!(seekable.length(), 1);
    assert_eq!(seekable.start(0), Ok(10.0));
    assert_eq!(seekable.end(0), Ok(20.0));
    assert_eq!(
        seekable.start(1),
        Err(RangeError::IndexOutOfBounds { index: 1, len: 1 })
    );
}

#[rstest]
fn empty_playlist_has_no_ranges(_tracing_setup: ()) {
    let engine = FakeEngine::new();
    engine.set_levels(vec![loaded_level("720p", 720, &[])]);
    engine.preselect(Some(0), None);
    let seekable = seekable_over(&engine);

    assert_eq!(seekable.length(), 0);
    assert!(seekable.start(0).is_err());
    assert!(seekable.end(0).is_err());
}

#[test]
fn current_level_without_details_falls_back() {
    let engine = FakeEngine::new();
    engine.set_levels(vec![
        loaded_level("360p", 360, &[(0.0, 4.0), (4.0, 4.0)]),
        level("720p", 720),
    ]);
    engine.preselect(Some(1), None);
    let seekable = seekable_over(&engine);

    assert_eq!(seekable.length(), 1);
    assert_eq!(seekable.end(0), Ok(8.0));
}

#[test]
fn window_follows_the_engine() {
    let engine = FakeEngine::new();
    engine.set_levels(vec![level("720p", 720)]);
    engine.preselect(Some(0), None);
    let seekable = seekable_over(&engine);
    assert_eq!(seekable.length(), 0);

    engine.set_details(0, details(&[(30.0, 6.0), (36.0, 6.0), (42.0, 6.0)]));
    assert_eq!(seekable.start(0), Ok(30.0));
    assert_eq!(seekable.end(0), Ok(48.0));

    engine.set_details(0, details(&[(36.0, 6.0), (42.0, 6.0), (48.0, 6.0)]));
    assert_eq!(seekable.start(0), Ok(36.0));
}

#[test]
fn no_engine_is_native_verbatim() {
    let native = StaticTimeRanges::new(vec![(0.0, 5.0), (7.5, 12.0)]);
    let seekable = SeekableTimeRanges::new(|| None, Arc::new(native.clone()));

    assert_eq!(seekable.length(), native.length());
    for index in 0..3 {
        assert_eq!(seekable.start(index), native.start(index));
        assert_eq!(seekable.end(index), native.end(index));
    }
}

#[test]
fn start_date_from_program_date_time() {
    let engine = FakeEngine::new();
    engine.set_levels(vec![level("720p", 720)]);
    engine.preselect(Some(0), None);
    assert_eq!(start_date(engine.as_ref()), None);

    engine.set_details(
        0,
        LevelDetails::new(vec![Fragment {
            start: 20.0,
            duration: 6.0,
            program_date_time: Some(1_700_000_020_000),
        }]),
    );
    assert_eq!(
        start_date(engine.as_ref()),
        Some(SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_000))
    );
}
