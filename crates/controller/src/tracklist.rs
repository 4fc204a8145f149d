// Declared tracks and their rendered controls

use playdeck_core::{ControlSurface, TriggerControl};
use std::sync::Arc;

/// One selectable resource plus its rendered controls
///
/// Identity is the track's index in the tracklist; tracks are immutable once
/// declared.
#[derive(Clone)]
pub struct Track {
    url: String,
    trigger: Arc<dyn TriggerControl>,
    surface: Arc<dyn ControlSurface>,
}

impl Track {
    pub fn new(
        url: impl Into<String>,
        trigger: Arc<dyn TriggerControl>,
        surface: Arc<dyn ControlSurface>,
    ) -> Self {
        Self {
            url: url.into(),
            trigger,
            surface,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn trigger(&self) -> &Arc<dyn TriggerControl> {
        &self.trigger
    }

    pub fn surface(&self) -> &Arc<dyn ControlSurface> {
        &self.surface
    }
}

/// Tracks in declaration order
pub struct Tracklist {
    tracks: Vec<Track>,
}

impl Tracklist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Index of the track following `index` in declaration order
    pub fn next_after(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.tracks.len()).then_some(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}
