// Controller configuration

use std::time::Duration;

/// Delay before a surface stuck loading is force-revealed
pub const REVEAL_FALLBACK: Duration = Duration::from_millis(3000);

/// Readiness required before a seek request is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekGuard {
    /// Require backend readiness and a finite positive duration
    Strict,
    /// Require a finite positive duration
    DurationKnown,
    /// Attempt the seek and let the backend reject it
    Unchecked,
}

/// Behavior knobs the controller leaves to the host
///
/// The defaults give duration-gated seeking with a fast-seek preference, a
/// loading progress bar, and the force-reveal fallback.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Seek readiness guard strictness
    pub seek_guard: SeekGuard,

    /// Try `fast_seek` first and fall back to a direct seek
    pub prefer_fast_seek: bool,

    /// Force-reveal a surface stuck loading after this long
    pub reveal_fallback: Option<Duration>,

    /// Render buffering progress into the loading bar
    pub loading_progress: bool,

    /// Fan volume changes out to every rendered volume control
    pub shared_volume: bool,

    /// Pause and rewind before pointing the backend at a new resource
    pub halt_before_switch: bool,

    /// Roll the playing visuals back when a play request fails
    pub rollback_on_play_failure: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            seek_guard: SeekGuard::DurationKnown,
            prefer_fast_seek: true,
            reveal_fallback: Some(REVEAL_FALLBACK),
            loading_progress: true,
            shared_volume: false,
            halt_before_switch: false,
            rollback_on_play_failure: false,
        }
    }
}
