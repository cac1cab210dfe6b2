//! Locomotion configuration constants.
//!
//! All tuning values are grouped here. Defaults reproduce the cone field
//! demo: a half-metre cube that walks at 10 units/s and jumps at 20 units/s
//! under -9.8 units/s² gravity.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::smoothing::Smoothing;

/// Which yaw the movement basis is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementBasis {
    /// Forward follows the actor's rendered body orientation.
    #[default]
    ActorRelative,
    /// Forward follows the controller (camera) yaw directly.
    CameraRelative,
}

/// Configuration for actor locomotion and ground contact.
///
/// All values use world units and seconds unless otherwise noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // ========================================================================
    // Movement
    // ========================================================================
    /// Horizontal speed while a direction is held (units/second).
    pub move_speed: f32,

    /// Source of the forward/right basis.
    pub movement_basis: MovementBasis,

    // ========================================================================
    // Vertical motion
    // ========================================================================
    /// Gravity acceleration (units/second², negative = down).
    pub gravity: f32,

    /// Vertical velocity set by a jump (units/second).
    pub jump_speed: f32,

    /// Distance from the last rest height within which a jump is still
    /// allowed even if the actor is not grounded this frame.
    pub jump_tolerance: f32,

    // ========================================================================
    // Body and probe
    // ========================================================================
    /// Half the actor's vertical extent; the centre rests this far above a
    /// contact.
    pub actor_half_height: f32,

    /// Eye offset above the actor's centre, for first-person cameras.
    pub eye_height: f32,

    /// How far above the centre the downward probe starts.
    pub probe_lift: f32,

    /// Maximum probe length.
    pub probe_distance: f32,

    /// Band above the rest height that still counts as contact.
    pub ground_tolerance: f32,

    /// Lowest height the actor's centre may ever reach.
    pub hard_floor_height: f32,

    // ========================================================================
    // Look
    // ========================================================================
    /// Radians of rotation per unit of look delta.
    pub look_sensitivity: f32,

    /// Pitch clamp, symmetric around level (radians).
    pub pitch_limit: f32,

    /// How quickly the rendered body turns toward the controller yaw.
    pub body_turn: Smoothing,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            movement_basis: MovementBasis::ActorRelative,

            gravity: -9.8,
            jump_speed: 20.0,
            jump_tolerance: 0.05,

            actor_half_height: 0.5,
            eye_height: 1.1, // eye at 1.6 above the surface
            probe_lift: 0.1,
            probe_distance: 1000.0,
            ground_tolerance: 0.05,
            hard_floor_height: 0.5,

            look_sensitivity: 0.002,
            pitch_limit: std::f32::consts::FRAC_PI_2,
            body_turn: Smoothing::from_frame_factor(0.2, 60.0),
        }
    }
}

impl LocomotionConfig {
    /// Snappier movement with a camera-relative basis and no body lag.
    pub fn arcade() -> Self {
        Self {
            move_speed: 14.0,
            movement_basis: MovementBasis::CameraRelative,
            gravity: -30.0,
            jump_speed: 12.0,
            body_turn: Smoothing::SNAP,
            ..Default::default()
        }
    }

    /// Long, floaty jumps.
    pub fn low_gravity() -> Self {
        Self {
            move_speed: 6.0,
            gravity: -1.62,
            jump_speed: 4.0,
            ..Default::default()
        }
    }

    /// Reject configurations the frame loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("move_speed", self.move_speed),
            ("gravity", self.gravity),
            ("jump_speed", self.jump_speed),
            ("jump_tolerance", self.jump_tolerance),
            ("actor_half_height", self.actor_half_height),
            ("eye_height", self.eye_height),
            ("probe_lift", self.probe_lift),
            ("probe_distance", self.probe_distance),
            ("ground_tolerance", self.ground_tolerance),
            ("hard_floor_height", self.hard_floor_height),
            ("look_sensitivity", self.look_sensitivity),
            ("pitch_limit", self.pitch_limit),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }

        positive("actor_half_height", self.actor_half_height)?;
        positive("probe_distance", self.probe_distance)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("jump_speed", self.jump_speed)?;
        non_negative("jump_tolerance", self.jump_tolerance)?;
        non_negative("probe_lift", self.probe_lift)?;
        non_negative("ground_tolerance", self.ground_tolerance)?;

        if self.gravity >= 0.0 {
            return Err(ConfigError::GravityNotDownward(self.gravity));
        }
        if self.pitch_limit <= 0.0 || self.pitch_limit > std::f32::consts::FRAC_PI_2 {
            return Err(ConfigError::PitchLimitOutOfRange(self.pitch_limit));
        }
        if !self.body_turn.is_valid() {
            return Err(ConfigError::Negative {
                name: "body_turn.time_constant",
                value: self.body_turn.time_constant,
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
