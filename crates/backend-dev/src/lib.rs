// Deterministic backend and recording surfaces for tests and headless hosts

pub mod backend;
pub mod surface;

// Re-export commonly used types
pub use backend::{ScriptedBackend, ScriptedHandle};
pub use surface::{RecordingSurface, RecordingTrigger, SurfaceSnapshot};
