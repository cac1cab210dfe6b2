//! Camera rig errors.

use thiserror::Error;

/// Reasons a camera rig or projection cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum RigError {
    #[error("{0} must be finite")]
    NonFinite(&'static str),

    #[error("smoothing time constant must be non-negative, got {0}")]
    NegativeSmoothing(f32),

    #[error("chase offset places the camera on its own look target")]
    DegenerateOffset,

    #[error("invalid projection: {0}")]
    InvalidProjection(&'static str),

    #[error("unknown camera mode '{0}' (expected first-person, chase or orbit)")]
    UnknownMode(String),
}
