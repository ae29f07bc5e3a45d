use hlsbridge_engine::Cue;
use hlsbridge_host::{TextTrack, TextTrackMode};
use tracing::{debug, warn};

/// Result of inserting one cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueOutcome {
    Added,
    /// A cue with the same id is already on the track.
    Duplicate,
    /// The host refused both the cue and its minimal form.
    Dropped,
}

/// Insert a cue unless the track already has one with the same id.
///
/// Segmented captions repeat cues across segment boundaries, so duplicates
/// are expected. A disabled track is switched to hidden for the insertion
/// and back afterwards. When the host rejects the cue as delivered, a
/// minimal cue (id, timing, text) is tried; if that fails too the cue is
/// dropped and logged.
pub fn add_cue_to_track(track: &dyn TextTrack, cue: &Cue) -> CueOutcome {
    if track.has_cue(&cue.id) {
        return CueOutcome::Duplicate;
    }

    let mode = track.mode();
    if mode == TextTrackMode::Disabled {
        track.set_mode(TextTrackMode::Hidden);
    }

    let outcome = match track.add_cue(cue) {
        Ok(()) => CueOutcome::Added,
        Err(err) => {
            debug!(%err, "cue rejected, retrying minimal cue");
            match track.add_cue(&cue.minimal()) {
                Ok(()) => CueOutcome::Added,
                Err(err) => {
                    warn!(%err, id = %cue.id, "dropping cue");
                    CueOutcome::Dropped
                }
            }
        }
    };

    if mode == TextTrackMode::Disabled {
        track.set_mode(mode);
    }
    outcome
}
