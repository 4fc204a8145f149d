// Track lifecycle state and the shared session container

use crate::error::{PlayerError, Result};
use crate::event::LoadEpoch;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle state of the active track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// No resource selected
    Idle,
    /// Resource is loading, surface shows the loading indicator
    Loading,
    /// Enough is known about the resource to present transport controls
    Ready,
    /// Playback in progress
    Playing,
    /// Playback paused by the user
    Paused,
}

impl TrackState {
    /// Validate a lifecycle transition
    pub fn validate_transition(from: TrackState, to: TrackState) -> Result<()> {
        match (from, to) {
            // From Idle
            (TrackState::Idle, TrackState::Loading) => Ok(()),

            // From Loading
            (TrackState::Loading, TrackState::Ready) => Ok(()),
            (TrackState::Loading, TrackState::Idle) => Ok(()),

            // From Ready
            (TrackState::Ready, TrackState::Playing) => Ok(()),
            (TrackState::Ready, TrackState::Idle) => Ok(()),

            // From Playing
            (TrackState::Playing, TrackState::Paused) => Ok(()),
            (TrackState::Playing, TrackState::Idle) => Ok(()),

            // From Paused
            (TrackState::Paused, TrackState::Playing) => Ok(()),
            (TrackState::Paused, TrackState::Idle) => Ok(()),

            _ => Err(PlayerError::InvalidState(format!(
                "Invalid state transition from {:?} to {:?}",
                from, to
            ))),
        }
    }
}

/// Record of the currently selected track
#[derive(Debug, Clone, Copy)]
pub struct ActiveTrack {
    /// Index into the tracklist, declaration order
    pub index: usize,
    /// Epoch of the backend load this selection issued
    pub epoch: LoadEpoch,
    /// Lifecycle state
    pub state: TrackState,
    /// Play was requested and not since paused; applied when the load becomes ready
    pub play_pending: bool,
    /// Surface has left its loading state
    pub revealed: bool,
    /// A finite positive duration has been observed for this load
    pub duration_known: bool,
    /// Force-reveal deadline, cleared once the surface reveals
    pub reveal_deadline: Option<Instant>,
}

/// Mutable session record, exactly one per controller
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Selected track, if any
    pub active: Option<ActiveTrack>,
    /// Last non-zero volume, restored on unmute
    pub saved_volume: f32,
    /// True while the user drags the seek control
    pub seeking: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            active: None,
            saved_volume: 1.0,
            seeking: false,
        }
    }
}

/// Thread-safe session state container
#[derive(Clone)]
pub struct SessionContainer {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionContainer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.read().clone()
    }

    pub fn active(&self) -> Option<ActiveTrack> {
        self.inner.read().active
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.inner.write();
        f(&mut state);
    }

    /// Install a fresh active record for a newly selected track
    ///
    /// The previous selection must have been cleared first; a selection always
    /// enters the lifecycle through Loading.
    pub fn activate(
        &self,
        index: usize,
        epoch: LoadEpoch,
        reveal_deadline: Option<Instant>,
    ) -> Result<()> {
        let mut state = self.inner.write();
        if let Some(active) = state.active {
            return Err(PlayerError::InvalidState(format!(
                "Track {} is still active",
                active.index
            )));
        }
        TrackState::validate_transition(TrackState::Idle, TrackState::Loading)?;
        log::debug!("track {} state: Idle -> Loading", index);
        state.active = Some(ActiveTrack {
            index,
            epoch,
            state: TrackState::Loading,
            play_pending: false,
            revealed: false,
            duration_known: false,
            reveal_deadline,
        });
        Ok(())
    }

    /// Move the active track to a new lifecycle state
    pub fn transition(&self, to: TrackState) -> Result<()> {
        let mut state = self.inner.write();
        let active = state
            .active
            .as_mut()
            .ok_or_else(|| PlayerError::InvalidState("No active track to transition".to_string()))?;
        TrackState::validate_transition(active.state, to)?;
        log::debug!("track {} state: {:?} -> {:?}", active.index, active.state, to);
        active.state = to;
        Ok(())
    }

    /// Return the active track to Idle and drop its record
    pub fn clear_active(&self) {
        let mut state = self.inner.write();
        if let Some(active) = state.active.take() {
            log::debug!("track {} state: {:?} -> Idle", active.index, active.state);
        }
    }
}

impl Default for SessionContainer {
    fn default() -> Self {
        Self::new()
    }
}
