// Scripted media backend with deterministic, externally-driven behavior

use parking_lot::Mutex;
use playdeck_core::{LoadEpoch, MediaBackend, PlayerError, Result};
use std::sync::Arc;

#[derive(Debug)]
struct BackendState {
    url: Option<String>,
    epoch: LoadEpoch,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    paused: bool,
    ready: bool,
    buffered_to: Option<f64>,
    supports_fast_seek: bool,
    reject_play: bool,
    reject_seek: bool,
    seeks: Vec<f64>,
    fast_seeks: Vec<f64>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            url: None,
            epoch: LoadEpoch(0),
            position: 0.0,
            duration: None,
            volume: 1.0,
            paused: true,
            ready: false,
            buffered_to: None,
            supports_fast_seek: false,
            reject_play: false,
            reject_seek: false,
            seeks: Vec::new(),
            fast_seeks: Vec::new(),
        }
    }
}

/// Media backend whose readiness, duration, and failures are scripted
/// through a [`ScriptedHandle`]
///
/// Nothing is decoded and no time passes on its own; the driving side sets
/// duration and readiness, advances the position, and injects failures. Load
/// discards the previous resource and stamps a fresh epoch, like a real
/// backend swapping sources.
pub struct ScriptedBackend {
    state: Arc<Mutex<BackendState>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BackendState::default())),
        }
    }

    /// Handle for the driving side
    pub fn handle(&self) -> ScriptedHandle {
        ScriptedHandle {
            state: self.state.clone(),
        }
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for ScriptedBackend {
    fn load(&mut self, url: &str) -> LoadEpoch {
        let mut state = self.state.lock();
        let epoch = state.epoch.next();
        log::debug!("scripted backend: loading {} as epoch {:?}", url, epoch);
        state.url = Some(url.to_string());
        state.epoch = epoch;
        state.position = 0.0;
        state.duration = None;
        state.ready = false;
        state.buffered_to = None;
        state.paused = true;
        epoch
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        if state.reject_play {
            return Err(PlayerError::PlaybackRejected(
                "scripted rejection".to_string(),
            ));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn position(&self) -> f64 {
        self.state.lock().position
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        let mut state = self.state.lock();
        if state.reject_seek {
            return Err(PlayerError::SeekRejected("scripted rejection".to_string()));
        }
        let clamped = match state.duration {
            Some(duration) => position.clamp(0.0, duration),
            None => position.max(0.0),
        };
        state.seeks.push(clamped);
        state.position = clamped;
        Ok(())
    }

    fn fast_seek(&mut self, position: f64) -> Result<()> {
        let mut state = self.state.lock();
        if !state.supports_fast_seek {
            return Err(PlayerError::FastSeekUnsupported);
        }
        let clamped = match state.duration {
            Some(duration) => position.clamp(0.0, duration),
            None => position.max(0.0),
        };
        state.fast_seeks.push(clamped);
        state.position = clamped;
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().duration
    }

    fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    fn buffered_to(&self) -> Option<f64> {
        self.state.lock().buffered_to
    }
}

/// Driving-side view of a [`ScriptedBackend`]
#[derive(Clone)]
pub struct ScriptedHandle {
    state: Arc<Mutex<BackendState>>,
}

impl ScriptedHandle {
    /// Epoch of the most recent load
    pub fn current_epoch(&self) -> LoadEpoch {
        self.state.lock().epoch
    }

    pub fn url(&self) -> Option<String> {
        self.state.lock().url.clone()
    }

    pub fn position(&self) -> f64 {
        self.state.lock().position
    }

    pub fn set_position(&self, position: f64) {
        self.state.lock().position = position;
    }

    pub fn set_duration(&self, duration: Option<f64>) {
        self.state.lock().duration = duration;
    }

    pub fn set_ready(&self, ready: bool) {
        self.state.lock().ready = ready;
    }

    pub fn set_buffered_to(&self, buffered_to: Option<f64>) {
        self.state.lock().buffered_to = buffered_to;
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    /// Make subsequent play requests fail
    pub fn reject_play(&self, reject: bool) {
        self.state.lock().reject_play = reject;
    }

    /// Make subsequent seek requests fail
    pub fn reject_seek(&self, reject: bool) {
        self.state.lock().reject_seek = reject;
    }

    /// Advertise the fast-seek capability
    pub fn support_fast_seek(&self, supported: bool) {
        self.state.lock().supports_fast_seek = supported;
    }

    /// Positions applied through `seek`, in order
    pub fn seeks(&self) -> Vec<f64> {
        self.state.lock().seeks.clone()
    }

    /// Positions applied through `fast_seek`, in order
    pub fn fast_seeks(&self) -> Vec<f64> {
        self.state.lock().fast_seeks.clone()
    }
}
