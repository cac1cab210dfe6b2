//! Locomotion integration: input and elapsed time to a provisional pose.
//!
//! Horizontal motion is kinematic (constant speed while a key is held);
//! vertical motion integrates gravity and jump impulses. Neither step
//! touches collision: the ground probe corrects the result afterwards.

use glam::Vec3;

use super::config::{LocomotionConfig, MovementBasis};
use super::state::{horizontal_forward, horizontal_right, yaw_rotation, Actor, InputState};

/// Squared length below which the raw move vector counts as no input.
const MOVE_EPSILON: f32 = 1e-6;

/// What the integrator did this step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegrationReport {
    /// Horizontal displacement applied to the actor.
    pub displacement: Vec3,

    /// Whether a jump impulse was applied.
    pub jumped: bool,
}

/// Horizontal displacement for `dt` seconds of `input` along `yaw`.
///
/// Opposing keys cancel exactly and diagonals are normalized, so the
/// magnitude is either zero or `speed * dt`.
pub fn horizontal_displacement(input: &InputState, yaw: f32, speed: f32, dt: f32) -> Vec3 {
    let forward = horizontal_forward(yaw);
    let right = horizontal_right(yaw);

    let mut raw = Vec3::ZERO;
    if input.forward {
        raw += forward;
    }
    if input.backward {
        raw -= forward;
    }
    if input.left {
        raw -= right;
    }
    if input.right {
        raw += right;
    }

    if raw.length_squared() > MOVE_EPSILON {
        raw.normalize() * (speed * dt)
    } else {
        Vec3::ZERO
    }
}

/// Apply look input to the controller orientation.
///
/// Pitch is clamped to the configured limit every call; yaw is wrapped to
/// `[-PI, PI)`. Non-finite deltas are ignored.
pub fn apply_look(config: &LocomotionConfig, actor: &mut Actor, look_delta: glam::Vec2) {
    if !look_delta.is_finite() {
        log::warn!("ignoring non-finite look delta {look_delta:?}");
        return;
    }

    actor.yaw += look_delta.x * config.look_sensitivity;
    actor.pitch -= look_delta.y * config.look_sensitivity;

    actor.pitch = actor.pitch.clamp(-config.pitch_limit, config.pitch_limit);
    actor.yaw = wrap_angle(actor.yaw);
}

/// Turn the rendered body toward the controller yaw.
pub fn turn_body(config: &LocomotionConfig, actor: &mut Actor, dt: f32) {
    let target = yaw_rotation(actor.yaw);
    let alpha = config.body_turn.alpha(dt);
    actor.body_orientation = actor.body_orientation.slerp(target, alpha).normalize();
}

/// Whether a jump request would be honoured right now.
///
/// Besides a grounded actor, one that is not rising and still within
/// `jump_tolerance` of the surface it last stood on may jump. A jump clears
/// that surface, so falling back past the take-off height never re-arms it.
pub fn can_jump(config: &LocomotionConfig, actor: &Actor) -> bool {
    actor.grounded
        || (actor.vertical_velocity <= 0.0
            && actor
                .last_ground_height
                .is_some_and(|h| (actor.position.y - h).abs() <= config.jump_tolerance))
}

/// Advance the actor by `dt` seconds of input.
///
/// Order: horizontal displacement, gravity, jump, vertical displacement.
/// The result is provisional until the ground probe has run.
pub fn integrate(
    config: &LocomotionConfig,
    actor: &mut Actor,
    input: &InputState,
    dt: f32,
) -> IntegrationReport {
    let yaw = match config.movement_basis {
        MovementBasis::ActorRelative => actor.body_yaw(),
        MovementBasis::CameraRelative => actor.yaw,
    };

    let displacement = horizontal_displacement(input, yaw, config.move_speed, dt);
    actor.position += displacement;

    actor.vertical_velocity += config.gravity * dt;

    let jumped = input.jump && can_jump(config, actor);
    if jumped {
        actor.vertical_velocity = config.jump_speed;
        actor.grounded = false;
        actor.last_ground_height = None;
        log::debug!("jump from y={:.3}", actor.position.y);
    }

    actor.position.y += actor.vertical_velocity * dt;

    IntegrationReport {
        displacement,
        jumped,
    }
}

fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}
