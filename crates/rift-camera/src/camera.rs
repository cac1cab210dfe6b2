//! Camera pose and projection for rendering.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,

    /// Point the camera looks at.
    pub target: Vec3,

    /// Up vector, orthogonal to the view direction.
    pub up: Vec3,

    /// Whether the actor's body should be drawn from this viewpoint.
    pub shows_actor: bool,
}

impl CameraPose {
    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the forward direction vector.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Get the right direction vector.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite() && self.up.is_finite()
    }
}

/// Perspective projection parameters.
///
/// `aspect` belongs to whoever handles window resizes; nothing in the
/// simulation changes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Projection {
    /// Update the aspect ratio for a viewport size in pixels.
    ///
    /// Zero-sized viewports (minimised windows) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Get the projection matrix for rendering.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix for a pose.
    pub fn view_projection(&self, pose: &CameraPose) -> Mat4 {
        self.matrix() * pose.view_matrix()
    }

    pub fn validate(&self) -> Result<(), RigError> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(RigError::InvalidProjection("field of view must be in (0, 180) degrees"));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(RigError::InvalidProjection("clip planes must satisfy 0 < near < far"));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(RigError::InvalidProjection("aspect must be positive"));
        }
        Ok(())
    }
}
