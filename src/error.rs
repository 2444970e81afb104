//! Error types for the gesture recognition engine.

use thiserror::Error;

/// Result type for gesture engine operations.
pub type GestureResult<T> = Result<T, GestureError>;

/// Errors surfaced by the gesture engine's public entry points.
///
/// Most producer/consumer races described by the design (motion after cancel, a full ring
/// buffer) are silent no-ops by design and are not represented here; see the recorder and queue
/// modules for where those are handled instead of raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// `start_gesture` was called for a `(device_id, seat)` pair that already has a live,
    /// unfinished gesture. The original source treats this as a producer bug and asserts; this
    /// surface returns a typed error instead so the caller can decide how to react.
    #[error("touch {seat} on device {device_id} already has a live gesture")]
    DuplicateTouch {
        /// Device identifier of the conflicting touch.
        device_id: u32,
        /// Seat index of the conflicting touch.
        seat: i32,
    },

    /// The gesture engine's shared state could not be locked because a prior holder panicked
    /// while holding it.
    #[error("gesture engine state poisoned")]
    Poisoned,
}

impl GestureError {
    /// Whether this error indicates the caller passed a `TouchID` that is already in use.
    pub fn is_duplicate_touch(&self) -> bool {
        matches!(self, GestureError::DuplicateTouch { .. })
    }
}
