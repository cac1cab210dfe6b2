//! Setup-time errors.
//!
//! Nothing inside a frame fails; every degenerate input there is corrected
//! silently. These errors are only produced while building the world and
//! validating configuration, before the frame loop starts.

use thiserror::Error;

use crate::collision::SurfaceId;

/// Errors produced while registering surfaces.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("{shape} dimension `{name}` must be positive and finite, got {value}")]
    InvalidDimension {
        shape: &'static str,
        name: &'static str,
        value: f32,
    },

    #[error("cone needs at least 3 radial segments, got {0}")]
    TooFewSegments(u32),

    #[error("convex hull of {0} points is degenerate")]
    DegenerateHull(usize),

    #[error("triangle mesh rejected: {0}")]
    InvalidMesh(String),

    #[error("surface transform is not finite")]
    NonFiniteTransform,

    #[error("surface id space exhausted after {0}")]
    IdsExhausted(SurfaceId),
}

/// Errors produced while validating a [`LocomotionConfig`](crate::LocomotionConfig).
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{0}` must be finite")]
    NonFinite(&'static str),

    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("`{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("gravity must pull downward (negative), got {0}")]
    GravityNotDownward(f32),

    #[error("pitch limit must be in (0, pi/2], got {0}")]
    PitchLimitOutOfRange(f32),
}
