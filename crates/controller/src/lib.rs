// Playlist player controller: tracks, configuration, and the controller itself

pub mod config;
pub mod controller;
pub mod tracklist;

// Re-export commonly used types
pub use config::{ControllerConfig, SeekGuard, REVEAL_FALLBACK};
pub use controller::PlayerController;
pub use tracklist::{Track, Tracklist};
