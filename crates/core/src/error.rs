// Error handling for the player controller

use std::fmt;

/// Player error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The backend rejected a play request (blocked, unsupported, or failed)
    PlaybackRejected(String),

    /// The backend rejected a seek request
    SeekRejected(String),

    /// Fast seeking is not supported by this backend
    FastSeekUnsupported,

    /// Track index outside the declared tracklist
    UnknownTrack(usize),

    /// Invalid lifecycle state transition
    InvalidState(String),

    /// The backend failed to load a resource
    LoadError(String),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerError::PlaybackRejected(msg) => write!(f, "Playback rejected: {}", msg),
            PlayerError::SeekRejected(msg) => write!(f, "Seek rejected: {}", msg),
            PlayerError::FastSeekUnsupported => write!(f, "Fast seek not supported"),
            PlayerError::UnknownTrack(index) => write!(f, "Unknown track index: {}", index),
            PlayerError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            PlayerError::LoadError(msg) => write!(f, "Load error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerError {}

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
