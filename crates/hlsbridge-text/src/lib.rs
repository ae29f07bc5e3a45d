#![forbid(unsafe_code)]

//! Subtitles delivered by the engine as cue batches, rendered through text
//! tracks the bridge synthesizes on the host.

mod cue;
mod subtitles;

pub use cue::{CueOutcome, add_cue_to_track};
pub use subtitles::{CueReport, SubtitleBridge};
