// Core types and traits for the playdeck player controller

pub mod backend;
pub mod clock;
pub mod error;
pub mod event;
pub mod state;
pub mod surface;

// Re-export commonly used types
pub use backend::MediaBackend;
pub use clock::{format_clock, UNKNOWN_CLOCK};
pub use error::{PlayerError, Result};
pub use event::{BackendEvent, LoadEpoch};
pub use state::{ActiveTrack, SessionContainer, SessionState, TrackState};
pub use surface::{ControlSurface, TriggerControl};
