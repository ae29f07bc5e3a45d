//! Builders for engine data and shared rstest fixtures.

use std::sync::Arc;

use hlsbridge_engine::{Fragment, Level, LevelDetails, Rendition, RenditionKind};
use rstest::fixture;
use tracing_subscriber::EnvFilter;
use url::Url;

pub const MANIFEST_URL: &str = "https://cdn.example/live/master.m3u8";

#[must_use]
pub fn url(path: &str) -> Url {
    Url::parse("https://cdn.example/live/").unwrap().join(path).unwrap()
}

/// Video level identified by `{name}.m3u8`.
#[must_use]
pub fn level(name: &str, height: u32) -> Level {
    Level {
        name: name.to_owned(),
        language: None,
        width: height * 16 / 9,
        height,
        bitrate: u64::from(height) * 4_000,
        urls: vec![url(&format!("{name}.m3u8"))],
        details: None,
    }
}

/// Audio rendition identified by its playlist URL.
#[must_use]
pub fn audio_rendition(id: &str, name: &str, lang: &str) -> Rendition {
    let mut rendition = Rendition::new(id, RenditionKind::Audio);
    rendition.name = name.to_owned();
    rendition.lang = Some(lang.to_owned());
    rendition.url = Some(url(&format!("audio/{id}.m3u8")));
    rendition
}

#[must_use]
pub fn subtitle_rendition(id: &str, name: &str, lang: &str) -> Rendition {
    let mut rendition = Rendition::new(id, RenditionKind::Subtitles);
    rendition.name = name.to_owned();
    rendition.lang = Some(lang.to_owned());
    rendition.url = Some(url(&format!("subs/{id}.m3u8")));
    rendition
}

/// Playlist details from `(start, duration)` pairs.
#[must_use]
pub fn details(fragments: &[(f64, f64)]) -> LevelDetails {
    LevelDetails::new(
        fragments
            .iter()
            .map(|&(start, duration)| Fragment::new(start, duration))
            .collect(),
    )
}

/// Level with `details` already loaded.
#[must_use]
pub fn loaded_level(name: &str, height: u32, fragments: &[(f64, f64)]) -> Level {
    Level {
        details: Some(Arc::new(details(fragments))),
        ..level(name, height)
    }
}

#[fixture]
pub fn tracing_setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::default().add_directive("warn".parse().unwrap())),
        )
        .with_test_writer()
        .try_init();
}
