use crate::types::TrackKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clip not found: {0}")]
    ClipNotFound(uuid::Uuid),

    #[error("Overlap detected")]
    OverlapDetected,

    #[error("Clip of kind {actual:?} cannot be placed on the {expected:?} track")]
    TrackKindMismatch {
        expected: TrackKind,
        actual: TrackKind,
    },

    #[error("Invariant violated on {track:?} track: {reason}")]
    InvariantViolated { track: TrackKind, reason: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
