// Media backend capability trait

use crate::error::{PlayerError, Result};
use crate::event::LoadEpoch;

/// Playable-media handle shared by every track
///
/// The backend decodes and plays resources; this crate never implements one.
/// All positions and durations are in seconds. Lifecycle is reported through
/// `BackendEvent`s the host forwards into the controller, each stamped with
/// the epoch returned by the `load` that produced it.
pub trait MediaBackend: Send {
    /// Point the backend at a new resource and begin loading
    ///
    /// Returns the epoch that stamps every event from this load. Loading
    /// implicitly discards the previous resource and resets the position.
    fn load(&mut self, url: &str) -> LoadEpoch;

    /// Start or resume playback
    ///
    /// May fail (blocked by the host environment, unsupported format,
    /// network error). Callers catch and log; a failure never propagates.
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// True when playback is not currently running
    fn is_paused(&self) -> bool;

    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Seek to an absolute position in seconds
    fn seek(&mut self, position: f64) -> Result<()>;

    /// Seek favouring speed over precision
    ///
    /// Optional capability; the default rejects so callers fall back to
    /// `seek`.
    fn fast_seek(&mut self, position: f64) -> Result<()> {
        let _ = position;
        Err(PlayerError::FastSeekUnsupported)
    }

    /// Total duration in seconds, `None` until metadata arrives
    fn duration(&self) -> Option<f64>;

    /// Current volume in 0.0..=1.0
    fn volume(&self) -> f32;

    /// Set volume, clamped to 0.0..=1.0
    fn set_volume(&mut self, volume: f32);

    /// True once enough data is buffered to begin playback
    fn is_ready(&self) -> bool;

    /// End of the buffered range in seconds, `None` if nothing is buffered
    fn buffered_to(&self) -> Option<f64>;
}
