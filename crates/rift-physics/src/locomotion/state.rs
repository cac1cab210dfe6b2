//! Actor state and per-frame input.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Horizontal forward direction for a yaw angle.
///
/// Yaw zero faces `-Z`; positive yaw turns toward `+X`.
#[inline]
pub fn horizontal_forward(yaw: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(sin_yaw, 0.0, -cos_yaw)
}

/// Horizontal right direction for a yaw angle (`forward × up`).
#[inline]
pub fn horizontal_right(yaw: f32) -> Vec3 {
    horizontal_forward(yaw).cross(Vec3::Y).normalize()
}

/// Yaw-only orientation whose forward axis (`-Z`) matches [`horizontal_forward`].
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(-yaw)
}

/// The controllable entity.
///
/// `position` is the centre of the body. The controller orientation
/// (`yaw`, `pitch`) follows look input directly; `body_orientation` is the
/// rendered body, which may lag behind the controller yaw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Body centre in world space.
    pub position: Vec3,

    /// Controller yaw (radians), wrapped to `[-PI, PI)`.
    pub yaw: f32,

    /// Controller pitch (radians), positive looks up. Always within the
    /// configured pitch limit.
    pub pitch: f32,

    /// World-up component of velocity (units/second).
    pub vertical_velocity: f32,

    /// True only after a successful ground contact this frame.
    pub grounded: bool,

    /// Rendered body orientation (yaw only).
    pub body_orientation: Quat,

    /// Rest height recorded at the most recent contact, cleared by a jump.
    pub last_ground_height: Option<f32>,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            body_orientation: Quat::IDENTITY,
            last_ground_height: None,
        }
    }
}

impl Actor {
    /// Create an actor at the given position, facing `-Z`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Turn both the controller and the body to face `yaw`.
    pub fn facing(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self.body_orientation = yaw_rotation(yaw);
        self
    }

    /// Horizontal forward direction of the controller.
    pub fn forward_direction(&self) -> Vec3 {
        horizontal_forward(self.yaw)
    }

    /// Horizontal right direction of the controller.
    pub fn right_direction(&self) -> Vec3 {
        horizontal_right(self.yaw)
    }

    /// Full look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();

        Vec3::new(sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Yaw of the rendered body.
    pub fn body_yaw(&self) -> f32 {
        let forward = self.body_orientation * Vec3::NEG_Z;
        forward.x.atan2(-forward.z)
    }

    /// Eye position for a first-person viewpoint.
    pub fn eye_position(&self, eye_height: f32) -> Vec3 {
        self.position + Vec3::new(0.0, eye_height, 0.0)
    }
}

/// Logical actions the input layer can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 5] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
    ];
}

/// Logical input for a single frame.
///
/// Overwritten by the input layer before each step and only read by the
/// core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,

    /// Accumulated pointer movement since the last frame
    /// (`x` right, `y` down, in input units).
    pub look_delta: Vec2,
}

impl InputState {
    /// Set an action's state.
    pub fn set(&mut self, action: Action, active: bool) {
        match action {
            Action::MoveForward => self.forward = active,
            Action::MoveBackward => self.backward = active,
            Action::MoveLeft => self.left = active,
            Action::MoveRight => self.right = active,
            Action::Jump => self.jump = active,
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    /// Whether an action is held.
    pub fn is_active(&self, action: Action) -> bool {
        match action {
            Action::MoveForward => self.forward,
            Action::MoveBackward => self.backward,
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Jump => self.jump,
        }
    }

    /// Whether any directional key is held.
    pub fn has_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}
