/// Which side of the bridge started a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionOrigin {
    /// The engine switched on its own (ABR, manifest default).
    Engine,
    /// The track list was changed by its consumer.
    User,
}

/// Track list synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    /// Track lists were reconciled with the engine's level and rendition lists.
    TracksPopulated { video: usize, audio: usize },
    VideoSelected {
        id: String,
        origin: SelectionOrigin,
    },
    AudioEnabled {
        id: String,
        origin: SelectionOrigin,
    },
}
