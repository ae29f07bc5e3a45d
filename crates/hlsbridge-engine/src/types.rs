use std::{
    fmt,
    sync::Arc,
    time::{Duration, SystemTime},
};

use url::Url;

/// Stable identity of a level or rendition across rediscoveries.
///
/// Positions in the engine's lists may be renumbered when the engine
/// reloads them; this id is not.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenditionId(Arc<str>);

impl RenditionId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RenditionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A timed media segment of a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragment {
    /// Start on the media timeline, in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// `EXT-X-PROGRAM-DATE-TIME` of the fragment, milliseconds since the Unix
    /// epoch.
    pub program_date_time: Option<i64>,
}

impl Fragment {
    #[must_use]
    pub fn new(start: f64, duration: f64) -> Self {
        Self {
            start,
            duration,
            program_date_time: None,
        }
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Loaded media playlist of a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelDetails {
    pub fragments: Vec<Fragment>,
    pub has_program_date_time: bool,
}

impl LevelDetails {
    #[must_use]
    pub fn new(fragments: Vec<Fragment>) -> Self {
        let has_program_date_time = fragments.iter().any(|f| f.program_date_time.is_some());
        Self {
            fragments,
            has_program_date_time,
        }
    }

    /// `(first start, last end)` of the fragment window.
    #[must_use]
    pub fn window(&self) -> Option<(f64, f64)> {
        let first = self.fragments.first()?;
        let last = self.fragments.last()?;
        Some((first.start, last.end()))
    }

    /// Wall-clock time of media position zero.
    ///
    /// Derived from the first fragment's program date time minus its start.
    #[must_use]
    pub fn start_date(&self) -> Option<SystemTime> {
        if !self.has_program_date_time {
            return None;
        }
        let first = self.fragments.first()?;
        let pdt_ms = first.program_date_time?;
        #[allow(clippy::cast_precision_loss)]
        let origin_ms = pdt_ms as f64 - first.start * 1000.0;
        if !origin_ms.is_finite() {
            return None;
        }
        let offset = Duration::from_secs_f64(origin_ms.abs() / 1000.0);
        if origin_ms >= 0.0 {
            SystemTime::UNIX_EPOCH.checked_add(offset)
        } else {
            SystemTime::UNIX_EPOCH.checked_sub(offset)
        }
    }
}

/// One video quality level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Level {
    pub name: String,
    /// `LANGUAGE` attribute of the variant.
    pub language: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Bits per second.
    pub bitrate: u64,
    /// Playlist URLs; the first one is the primary.
    pub urls: Vec<Url>,
    /// Present once the level's media playlist has been loaded.
    pub details: Option<Arc<LevelDetails>>,
}

impl Level {
    /// Identity of the level: its primary playlist URL.
    #[must_use]
    pub fn stable_id(&self) -> Option<RenditionId> {
        self.urls.first().map(|url| RenditionId::new(url.as_str()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenditionKind {
    #[default]
    Audio,
    Subtitles,
    ClosedCaptions,
}

/// An alternate audio or subtitle rendition.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendition {
    /// Engine-assigned id, used when the rendition has no URL.
    pub id: RenditionId,
    pub kind: RenditionKind,
    pub name: String,
    pub lang: Option<String>,
    pub url: Option<Url>,
    pub default: bool,
}

impl Rendition {
    #[must_use]
    pub fn new(id: impl Into<RenditionId>, kind: RenditionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: String::new(),
            lang: None,
            url: None,
            default: false,
        }
    }

    /// The playlist URL if there is one, the engine id otherwise.
    #[must_use]
    pub fn stable_id(&self) -> RenditionId {
        match &self.url {
            Some(url) => RenditionId::new(url.as_str()),
            None => self.id.clone(),
        }
    }

    #[must_use]
    pub fn text_kind(&self) -> Option<TextTrackKind> {
        match self.kind {
            RenditionKind::Audio => None,
            RenditionKind::Subtitles => Some(TextTrackKind::Subtitles),
            RenditionKind::ClosedCaptions => Some(TextTrackKind::Captions),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextTrackKind {
    #[default]
    Subtitles,
    Captions,
    Descriptions,
    Chapters,
    Metadata,
}

/// Subtitle rendition the engine wants the surface to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTrackDescriptor {
    pub rendition: RenditionId,
    pub kind: TextTrackKind,
    pub label: String,
    pub language: String,
    pub default: bool,
}

/// A timed caption line.
#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// Raw WebVTT cue settings (`line:`, `position:`, `align:` ...).
    pub settings: Option<String>,
}

impl Cue {
    #[must_use]
    pub fn new(id: impl Into<String>, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            text: text.into(),
            settings: None,
        }
    }

    /// Same cue reduced to id, timing and text.
    #[must_use]
    pub fn minimal(&self) -> Self {
        Self {
            settings: None,
            ..self.clone()
        }
    }
}
