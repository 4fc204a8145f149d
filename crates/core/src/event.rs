// Backend lifecycle events forwarded by the host into the controller

/// Identity of one backend load
///
/// Every `MediaBackend::load` stamps a fresh epoch; events report the epoch of
/// the load they belong to. The controller drops events whose epoch is no
/// longer the active one, so a callback arriving after the user has switched
/// tracks has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadEpoch(pub u64);

impl LoadEpoch {
    pub fn next(self) -> LoadEpoch {
        LoadEpoch(self.0 + 1)
    }
}

/// Backend lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// Playback position advanced
    PositionChanged { epoch: LoadEpoch },

    /// Resource metadata became available
    MetadataReady { epoch: LoadEpoch },

    /// The reported duration changed
    DurationKnown { epoch: LoadEpoch },

    /// Enough data is buffered to begin playback
    CanPlay { epoch: LoadEpoch },

    /// Enough data is buffered to play through without stalling
    CanPlayThrough { epoch: LoadEpoch },

    /// More of the resource was buffered
    BufferingProgress { epoch: LoadEpoch },

    /// Playback reached the end of the resource
    Ended { epoch: LoadEpoch },
}

impl BackendEvent {
    /// Epoch of the load this event belongs to
    pub fn epoch(&self) -> LoadEpoch {
        match *self {
            BackendEvent::PositionChanged { epoch }
            | BackendEvent::MetadataReady { epoch }
            | BackendEvent::DurationKnown { epoch }
            | BackendEvent::CanPlay { epoch }
            | BackendEvent::CanPlayThrough { epoch }
            | BackendEvent::BufferingProgress { epoch }
            | BackendEvent::Ended { epoch } => epoch,
        }
    }
}
