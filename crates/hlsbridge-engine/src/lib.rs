#![forbid(unsafe_code)]

//! The streaming engine as seen from the media surface.
//!
//! Nothing here parses manifests or fetches segments. The crate only names
//! what a surface needs from an engine: its level and rendition lists, the
//! selection setters, fragment timing, and the events it emits.

mod config;
mod details;
mod error;
mod events;
mod traits;
mod types;

pub use config::EngineConfig;
pub use details::active_level_details;
pub use error::{EngineError, EngineResult};
pub use events::{EngineEvent, EngineEventKind, EngineHandler, SubscriptionId};
#[cfg(any(test, feature = "test-utils"))]
pub use traits::EngineFactoryMock;
pub use traits::{EngineFactory, StreamingEngine};
pub use types::{
    Cue, Fragment, Level, LevelDetails, Rendition, RenditionId, RenditionKind, TextTrackDescriptor,
    TextTrackKind,
};
