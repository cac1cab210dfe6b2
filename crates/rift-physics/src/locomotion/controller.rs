//! Actor locomotion controller.
//!
//! This is the main entry point for actor movement. It takes a frame of
//! input and advances the actor through the surface registry.

use glam::Vec3;

use crate::collision::SurfaceRegistry;
use crate::error::ConfigError;

use super::config::LocomotionConfig;
use super::integrator::{apply_look, integrate, turn_body, IntegrationReport};
use super::probe::{probe_ground, spawn_at, GroundContact};
use super::state::{Actor, InputState};

/// Result of one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// What the integrator applied.
    pub integration: IntegrationReport,

    /// Ground contact after the probe.
    pub contact: GroundContact,
}

/// Actor locomotion controller.
///
/// One step runs, in order: look, body turn, integration, ground probe.
///
/// # Example
///
/// ```ignore
/// let controller = ActorController::new(LocomotionConfig::default())?;
/// let (mut actor, _) = controller.spawn(&registry, spawn_point, 0.0);
///
/// // Each frame:
/// controller.update(&mut actor, &input, &registry, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct ActorController {
    /// Locomotion configuration.
    pub config: LocomotionConfig,
}

impl ActorController {
    /// Create a controller, rejecting configurations that cannot run.
    pub fn new(config: LocomotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a controller with the default configuration.
    pub fn with_default_config() -> Self {
        Self {
            config: LocomotionConfig::default(),
        }
    }

    /// Create an actor resting on whatever is below `spawn_point`.
    pub fn spawn(
        &self,
        registry: &SurfaceRegistry,
        spawn_point: Vec3,
        yaw: f32,
    ) -> (Actor, GroundContact) {
        spawn_at(&self.config, registry, spawn_point, yaw)
    }

    /// Apply look input without advancing time.
    pub fn look(&self, actor: &mut Actor, look_delta: glam::Vec2) {
        apply_look(&self.config, actor, look_delta);
    }

    /// Advance the actor by one step.
    ///
    /// A negative or non-finite `delta_time` is treated as zero: look input
    /// still applies and the probe still runs, but nothing integrates.
    pub fn update(
        &self,
        actor: &mut Actor,
        input: &InputState,
        registry: &SurfaceRegistry,
        delta_time: f32,
    ) -> StepReport {
        let delta_time = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            log::warn!("treating invalid delta time {delta_time} as zero");
            0.0
        };

        apply_look(&self.config, actor, input.look_delta);
        turn_body(&self.config, actor, delta_time);

        let integration = integrate(&self.config, actor, input, delta_time);
        let contact = probe_ground(&self.config, actor, registry);

        StepReport {
            integration,
            contact,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
