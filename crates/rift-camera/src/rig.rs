//! Camera rig policies.
//!
//! A rig reads the actor after the ground probe has settled it and derives
//! where the camera goes. Rigs never write to the actor.

use std::str::FromStr;

use glam::Vec3;
use rift_physics::locomotion::{horizontal_right, yaw_rotation};
use rift_physics::{Actor, Smoothing};
use serde::{Deserialize, Serialize};

use crate::camera::CameraPose;
use crate::error::RigError;

/// Chase offset in the actor's frame: above and behind.
pub const DEFAULT_CHASE_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 5.0);

/// Height above the actor centre that chase cameras look at.
pub const DEFAULT_LOOK_OFFSET: f32 = 0.5;

/// Which rig to build, for configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RigMode {
    FirstPerson,
    #[default]
    Chase,
    Orbit,
}

impl FromStr for RigMode {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-person" | "fps" => Ok(Self::FirstPerson),
            "chase" => Ok(Self::Chase),
            "orbit" => Ok(Self::Orbit),
            other => Err(RigError::UnknownMode(other.to_string())),
        }
    }
}

/// Camera placement policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CameraRig {
    /// Eye at the actor's head, looking along the controller yaw and pitch.
    FirstPerson {
        /// Eye offset above the actor centre.
        eye_height: f32,
    },

    /// Rigidly attached behind the actor's body.
    FixedOffsetChase {
        /// Offset in the body frame (`-Z` is the body's forward).
        offset: Vec3,
        /// Height above the actor centre to look at.
        look_offset: f32,
    },

    /// Trails a point behind the controller yaw with exponential lag.
    SmoothOrbitChase {
        /// Offset in the controller yaw frame.
        offset: Vec3,
        /// Height above the actor centre to look at.
        look_offset: f32,
        /// Lag toward the desired position.
        smoothing: Smoothing,
        /// Camera position carried between frames.
        #[serde(skip)]
        current: Option<Vec3>,
    },
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::fixed_chase()
    }
}

impl CameraRig {
    /// First-person rig at the given eye height.
    pub fn first_person(eye_height: f32) -> Self {
        Self::FirstPerson { eye_height }
    }

    /// Chase camera two units up and five behind, looking just above the
    /// actor's centre.
    pub fn fixed_chase() -> Self {
        Self::FixedOffsetChase {
            offset: DEFAULT_CHASE_OFFSET,
            look_offset: DEFAULT_LOOK_OFFSET,
        }
    }

    /// Damped chase camera, tuned like a 5% per-frame blend at 60 Hz.
    pub fn smooth_orbit() -> Self {
        Self::SmoothOrbitChase {
            offset: DEFAULT_CHASE_OFFSET,
            look_offset: DEFAULT_LOOK_OFFSET,
            smoothing: Smoothing::from_frame_factor(0.05, 60.0),
            current: None,
        }
    }

    /// Build the default rig for a mode.
    pub fn from_mode(mode: RigMode, eye_height: f32) -> Self {
        match mode {
            RigMode::FirstPerson => Self::first_person(eye_height),
            RigMode::Chase => Self::fixed_chase(),
            RigMode::Orbit => Self::smooth_orbit(),
        }
    }

    pub fn mode(&self) -> RigMode {
        match self {
            Self::FirstPerson { .. } => RigMode::FirstPerson,
            Self::FixedOffsetChase { .. } => RigMode::Chase,
            Self::SmoothOrbitChase { .. } => RigMode::Orbit,
        }
    }

    /// Reject rigs that would produce a degenerate view.
    pub fn validate(&self) -> Result<(), RigError> {
        match self {
            Self::FirstPerson { eye_height } => {
                if !eye_height.is_finite() {
                    return Err(RigError::NonFinite("eye_height"));
                }
            }
            Self::FixedOffsetChase {
                offset,
                look_offset,
            } => validate_chase(*offset, *look_offset)?,
            Self::SmoothOrbitChase {
                offset,
                look_offset,
                smoothing,
                ..
            } => {
                validate_chase(*offset, *look_offset)?;
                if !smoothing.is_valid() {
                    return Err(RigError::NegativeSmoothing(smoothing.time_constant));
                }
            }
        }
        Ok(())
    }

    /// Forget carried state so the next update starts at the target.
    pub fn reset(&mut self) {
        if let Self::SmoothOrbitChase { current, .. } = self {
            *current = None;
        }
    }

    /// Derive this frame's camera pose from the settled actor.
    pub fn update(&mut self, actor: &Actor, dt: f32) -> CameraPose {
        match self {
            Self::FirstPerson { eye_height } => {
                let position = actor.eye_position(*eye_height);
                let forward = actor.look_direction();

                // The horizontal right axis is defined at any pitch, so the
                // up vector stays valid when looking straight up or down
                let right = horizontal_right(actor.yaw);
                let up = right.cross(forward).normalize();

                CameraPose {
                    position,
                    target: position + forward,
                    up,
                    shows_actor: false,
                }
            }

            Self::FixedOffsetChase {
                offset,
                look_offset,
            } => CameraPose {
                position: actor.position + actor.body_orientation * *offset,
                target: look_target(actor, *look_offset),
                up: Vec3::Y,
                shows_actor: true,
            },

            Self::SmoothOrbitChase {
                offset,
                look_offset,
                smoothing,
                current,
            } => {
                let desired = actor.position + yaw_rotation(actor.yaw) * *offset;
                let position = match *current {
                    Some(previous) => previous.lerp(desired, smoothing.alpha(dt)),
                    None => desired,
                };
                *current = Some(position);

                CameraPose {
                    position,
                    target: look_target(actor, *look_offset),
                    up: Vec3::Y,
                    shows_actor: true,
                }
            }
        }
    }
}

fn look_target(actor: &Actor, look_offset: f32) -> Vec3 {
    actor.position + Vec3::new(0.0, look_offset, 0.0)
}

fn validate_chase(offset: Vec3, look_offset: f32) -> Result<(), RigError> {
    if !offset.is_finite() {
        return Err(RigError::NonFinite("offset"));
    }
    if !look_offset.is_finite() {
        return Err(RigError::NonFinite("look_offset"));
    }
    // Straight above or below the look target has no usable up vector
    let to_target = Vec3::new(0.0, look_offset, 0.0) - offset;
    if to_target.length_squared() < 1e-6 || to_target.cross(Vec3::Y).length_squared() < 1e-6 {
        return Err(RigError::DegenerateOffset);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn actor_at(position: Vec3, yaw: f32) -> Actor {
        let mut actor = Actor::new(position).facing(yaw);
        actor.grounded = true;
        actor
    }

    #[test]
    fn test_first_person_sits_at_eye() {
        let mut rig = CameraRig::first_person(1.1);
        let actor = actor_at(Vec3::new(2.0, 0.5, -3.0), 0.0);

        let pose = rig.update(&actor, 0.016);

        assert!((pose.position - Vec3::new(2.0, 1.6, -3.0)).length() < 1e-6);
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((pose.up - Vec3::Y).length() < 1e-6);
        assert!(!pose.shows_actor);
    }

    #[test]
    fn test_first_person_up_at_vertical_pitch() {
        let mut rig = CameraRig::first_person(1.1);

        for pitch in [FRAC_PI_2, -FRAC_PI_2] {
            let mut actor = actor_at(Vec3::ZERO, 0.7);
            actor.pitch = pitch;
            let pose = rig.update(&actor, 0.016);

            assert!(pose.is_finite());
            assert!((pose.up.length() - 1.0).abs() < 1e-5);
            assert!(pose.up.dot(pose.forward()).abs() < 1e-5);
            assert!(pose.view_matrix().determinant().abs() > 1e-4);
        }
    }

    #[test]
    fn test_fixed_chase_behind_body() {
        let mut rig = CameraRig::fixed_chase();

        let pose = rig.update(&actor_at(Vec3::new(0.0, 1.6, 0.0), 0.0), 0.016);
        assert!((pose.position - Vec3::new(0.0, 3.6, 5.0)).length() < 1e-5);
        assert!((pose.target - Vec3::new(0.0, 2.1, 0.0)).length() < 1e-5);

        // Turned right: behind is now -X
        let pose = rig.update(&actor_at(Vec3::new(0.0, 1.6, 0.0), FRAC_PI_2), 0.016);
        assert!((pose.position - Vec3::new(-5.0, 3.6, 0.0)).length() < 1e-4);
        assert!(pose.shows_actor);
    }

    #[test]
    fn test_fixed_chase_ignores_dt() {
        let actor = actor_at(Vec3::new(4.0, 0.5, 1.0), 1.2);
        let a = CameraRig::fixed_chase().update(&actor, 0.001);
        let b = CameraRig::fixed_chase().update(&actor, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_smooth_orbit_starts_at_target_then_lags() {
        let mut rig = CameraRig::smooth_orbit();
        let mut actor = actor_at(Vec3::new(0.0, 0.5, 0.0), 0.0);

        let first = rig.update(&actor, 1.0 / 60.0);
        assert!((first.position - Vec3::new(0.0, 2.5, 5.0)).length() < 1e-5);

        actor.position.x = 10.0;
        let lagging = rig.update(&actor, 1.0 / 60.0);
        assert!(lagging.position.x > 0.0 && lagging.position.x < 10.0);

        // Target follows the live actor
        assert!((lagging.target.x - 10.0).abs() < 1e-6);

        rig.reset();
        let snapped = rig.update(&actor, 1.0 / 60.0);
        assert!((snapped.position.x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_smooth_orbit_never_overshoots() {
        let mut rig = CameraRig::smooth_orbit();
        let mut actor = actor_at(Vec3::new(0.0, 0.5, 0.0), 0.0);
        rig.update(&actor, 1.0 / 60.0);

        // Actor jumps to a new spot and stays there
        actor.position = Vec3::new(20.0, 0.5, -20.0);
        let desired = actor.position + DEFAULT_CHASE_OFFSET;

        let mut previous = f32::INFINITY;
        for dt in [1.0 / 60.0, 0.5, 1.0 / 144.0, 2.0, 1.0 / 30.0] {
            for _ in 0..30 {
                let pose = rig.update(&actor, dt);
                let remaining = (pose.position - desired).length();
                assert!(remaining <= previous + 1e-5, "{remaining} > {previous}");
                previous = remaining;
            }
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn test_smooth_orbit_frame_rate_independent() {
        let run = |hz: u32| {
            let mut rig = CameraRig::smooth_orbit();
            let mut actor = actor_at(Vec3::ZERO, 0.0);
            rig.update(&actor, 1.0 / hz as f32);
            actor.position = Vec3::new(8.0, 0.0, 0.0);

            let mut pose = rig.update(&actor, 1.0 / hz as f32);
            for _ in 1..hz / 2 {
                pose = rig.update(&actor, 1.0 / hz as f32);
            }
            pose.position
        };

        let at_30 = run(30);
        let at_120 = run(120);
        assert!((at_30 - at_120).length() < 1e-3, "{at_30:?} vs {at_120:?}");
    }

    #[test]
    fn test_update_leaves_actor_untouched() {
        let actor = actor_at(Vec3::new(1.0, 2.0, 3.0), 0.4);
        let before = actor.clone();

        for mut rig in [
            CameraRig::first_person(1.1),
            CameraRig::fixed_chase(),
            CameraRig::smooth_orbit(),
        ] {
            rig.update(&actor, 0.016);
        }
        assert_eq!(actor, before);
    }

    #[test]
    fn test_validate() {
        assert_eq!(CameraRig::smooth_orbit().validate(), Ok(()));

        let overhead = CameraRig::FixedOffsetChase {
            offset: Vec3::new(0.0, 5.0, 0.0),
            look_offset: 0.5,
        };
        assert_eq!(overhead.validate(), Err(RigError::DegenerateOffset));

        let negative = CameraRig::SmoothOrbitChase {
            offset: DEFAULT_CHASE_OFFSET,
            look_offset: 0.5,
            smoothing: Smoothing::new(-1.0),
            current: None,
        };
        assert_eq!(negative.validate(), Err(RigError::NegativeSmoothing(-1.0)));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("orbit".parse::<RigMode>(), Ok(RigMode::Orbit));
        assert_eq!("fps".parse::<RigMode>(), Ok(RigMode::FirstPerson));
        assert!("drone".parse::<RigMode>().is_err());

        for mode in [RigMode::FirstPerson, RigMode::Chase, RigMode::Orbit] {
            assert_eq!(CameraRig::from_mode(mode, 1.1).mode(), mode);
        }
    }
}
