// Rendered control capability traits

/// Per-track activation control
///
/// One trigger exists per track. The controller only toggles its playing
/// visual (icon pair and highlight); the host owns the markup and the click
/// wiring.
pub trait TriggerControl: Send + Sync {
    /// Toggle the trigger's playing visual
    fn set_playing(&self, playing: bool);
}

/// Rendered transport controls for one track
///
/// The controller writes values and visibility and nothing else. A host whose
/// markup is missing one of these controls implements that write as a no-op,
/// so the feature degrades silently instead of failing.
pub trait ControlSurface: Send + Sync {
    /// Toggle the play/pause button between its two icon states
    fn set_playing(&self, playing: bool);

    /// Seek control position as percent of duration, 0..=100
    fn set_progress(&self, percent: f64);

    /// Elapsed time label, preformatted
    fn set_elapsed(&self, label: &str);

    /// Duration label, preformatted
    fn set_duration(&self, label: &str);

    /// Volume control position as percent, 0..=100
    fn set_volume(&self, percent: f64);

    /// Loading progress bar width as percent of duration, 0..=100
    fn set_loading_progress(&self, percent: f64);

    /// Show the surface in its loading state
    fn show_loading(&self);

    /// Hide the loading indicator and show the transport controls
    fn reveal(&self);

    /// Hide the whole surface
    fn hide(&self);
}
