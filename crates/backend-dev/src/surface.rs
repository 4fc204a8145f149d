// Recording control-surface doubles

use parking_lot::Mutex;
use playdeck_core::{ControlSurface, TriggerControl};

/// Everything a surface currently displays
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    /// Surface is mounted at all
    pub visible: bool,
    /// Loading indicator shown instead of the transport controls
    pub loading: bool,
    pub playing: bool,
    pub progress: f64,
    pub elapsed: String,
    pub duration: String,
    pub volume: f64,
    pub loading_progress: f64,
    /// Every duration label written, in order
    pub duration_writes: Vec<String>,
}

impl Default for SurfaceSnapshot {
    fn default() -> Self {
        Self {
            visible: false,
            loading: false,
            playing: false,
            progress: 0.0,
            elapsed: "0:00".to_string(),
            duration: "0:00".to_string(),
            volume: 100.0,
            loading_progress: 0.0,
            duration_writes: Vec::new(),
        }
    }
}

/// Control surface that records every write for assertions
///
/// `show_loading` re-renders the panel fresh, the way a host injects new
/// markup for each selection.
#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceSnapshot>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state.lock().clone()
    }
}

impl ControlSurface for RecordingSurface {
    fn set_playing(&self, playing: bool) {
        self.state.lock().playing = playing;
    }

    fn set_progress(&self, percent: f64) {
        self.state.lock().progress = percent;
    }

    fn set_elapsed(&self, label: &str) {
        self.state.lock().elapsed = label.to_string();
    }

    fn set_duration(&self, label: &str) {
        let mut state = self.state.lock();
        state.duration = label.to_string();
        state.duration_writes.push(label.to_string());
    }

    fn set_volume(&self, percent: f64) {
        self.state.lock().volume = percent;
    }

    fn set_loading_progress(&self, percent: f64) {
        self.state.lock().loading_progress = percent;
    }

    fn show_loading(&self) {
        let mut state = self.state.lock();
        *state = SurfaceSnapshot::default();
        state.visible = true;
        state.loading = true;
    }

    fn reveal(&self) {
        let mut state = self.state.lock();
        state.visible = true;
        state.loading = false;
    }

    fn hide(&self) {
        self.state.lock().visible = false;
    }
}

/// Trigger control that records its playing visual
#[derive(Default)]
pub struct RecordingTrigger {
    playing: Mutex<bool>,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        *self.playing.lock()
    }
}

impl TriggerControl for RecordingTrigger {
    fn set_playing(&self, playing: bool) {
        *self.playing.lock() = playing;
    }
}
