//! Frame-rate independent exponential smoothing.
//!
//! A fixed blend factor applied once per frame lags more at low frame rates
//! than at high ones. Expressing the lag as a time constant instead gives
//! `alpha = 1 - exp(-dt / tau)`, which covers the same fraction of the
//! remaining distance per unit of wall-clock time at any frame rate.

use serde::{Deserialize, Serialize};

/// Exponential smoothing parameterised by a time constant in seconds.
///
/// A time constant of zero snaps straight to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Smoothing {
    /// Time for the remaining distance to shrink to `1/e` (seconds).
    pub time_constant: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::SNAP
    }
}

impl Smoothing {
    /// No smoothing: every update lands on the target.
    pub const SNAP: Self = Self { time_constant: 0.0 };

    /// Smoothing with the given time constant (seconds).
    pub const fn new(time_constant: f32) -> Self {
        Self { time_constant }
    }

    /// Convert a per-frame blend factor tuned at `reference_hz` into a time
    /// constant that behaves the same at that rate and consistently at any
    /// other.
    ///
    /// A factor of `1.0` or more snaps; a factor of zero or less never moves.
    pub fn from_frame_factor(factor: f32, reference_hz: f32) -> Self {
        if factor >= 1.0 || reference_hz <= 0.0 {
            return Self::SNAP;
        }
        if factor <= 0.0 {
            return Self::new(f32::INFINITY);
        }
        Self::new(-1.0 / (reference_hz * (1.0 - factor).ln()))
    }

    /// Whether the configuration is usable (non-negative, not NaN).
    pub fn is_valid(&self) -> bool {
        !self.time_constant.is_nan() && self.time_constant >= 0.0
    }

    /// Fraction of the remaining distance to cover over `dt` seconds.
    ///
    /// Always within `[0, 1]`, so blending never overshoots.
    pub fn alpha(&self, dt: f32) -> f32 {
        if !(dt > 0.0) {
            return 0.0;
        }
        if self.time_constant <= 0.0 {
            return 1.0;
        }
        (1.0 - (-dt / self.time_constant).exp()).clamp(0.0, 1.0)
    }
}
