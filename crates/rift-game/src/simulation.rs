//! The frame driver.
//!
//! [`Simulation`] owns everything one session needs: the level, the actor,
//! the camera rig and the configuration. Each [`step`](Simulation::step)
//! moves the actor through one display frame and derives the camera pose.

use std::path::Path;

use glam::{Quat, Vec2, Vec3};
use rift_camera::{CameraPose, CameraRig, Projection};
use rift_physics::{Actor, ActorController, GroundContact, InputState, LocomotionConfig};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::input::KeyBindings;
use crate::level::{Level, LevelConfig};

/// Most integration steps a single frame may be split into.
pub const MAX_SUBSTEPS: u32 = 256;

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Actor movement and ground contact.
    pub locomotion: LocomotionConfig,

    /// Camera policy.
    pub camera: CameraRig,

    /// Projection handed to the renderer.
    pub projection: Projection,

    /// Level layout.
    pub level: LevelConfig,

    /// Seed for cone placement.
    pub seed: u64,

    /// Key bindings for the input layer.
    pub bindings: KeyBindings,

    /// Longest frame simulated; anything beyond is dropped (seconds).
    pub max_frame_time: f32,

    /// Longest single integration step (seconds).
    pub max_substep: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            locomotion: LocomotionConfig::default(),
            camera: CameraRig::default(),
            projection: Projection::default(),
            level: LevelConfig::default(),
            seed: 0,
            bindings: KeyBindings::default(),
            max_frame_time: 0.25,
            max_substep: 1.0 / 60.0,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the frame loop cannot run with.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.locomotion.validate()?;
        self.camera.validate()?;
        self.projection.validate()?;

        if !(self.max_frame_time > 0.0 && self.max_frame_time.is_finite()) {
            return Err(SimulationError::Timing("max_frame_time must be positive"));
        }
        if !(self.max_substep > 0.0 && self.max_substep.is_finite()) {
            return Err(SimulationError::Timing("max_substep must be positive"));
        }
        if (self.max_frame_time / self.max_substep).ceil() > MAX_SUBSTEPS as f32 {
            return Err(SimulationError::Timing("max_substep too small for max_frame_time"));
        }
        Ok(())
    }
}

/// The actor's pose as the renderer needs it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorPose {
    pub position: Vec3,
    pub body_orientation: Quat,
    pub yaw: f32,
    pub pitch: f32,
    pub grounded: bool,
}

impl From<&Actor> for ActorPose {
    fn from(actor: &Actor) -> Self {
        Self {
            position: actor.position,
            body_orientation: actor.body_orientation,
            yaw: actor.yaw,
            pitch: actor.pitch,
            grounded: actor.grounded,
        }
    }
}

/// Everything produced by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Frame number, starting at 1 for the first step.
    pub frame: u64,

    /// Simulated time this frame, after capping (seconds).
    pub dt: f32,

    /// Integration steps the frame was split into.
    pub substeps: u32,

    pub actor: ActorPose,
    pub camera: CameraPose,
    pub contact: GroundContact,
}

/// Consumer of finished frames, typically the renderer.
pub trait FrameSink {
    fn present(&mut self, output: &FrameOutput);
}

impl FrameSink for Vec<FrameOutput> {
    fn present(&mut self, output: &FrameOutput) {
        self.push(*output);
    }
}

/// One session: a level, an actor and a camera.
#[derive(Debug)]
pub struct Simulation {
    /// Number of frames stepped so far.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// The controlled actor.
    pub actor: Actor,

    /// Contact from the most recent probe.
    pub contact: GroundContact,

    controller: ActorController,
    rig: CameraRig,
}

impl Simulation {
    /// Create a simulation in `level` and place the actor at its first
    /// spawn point.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, SimulationError> {
        config.validate()?;

        let controller = ActorController::new(config.locomotion.clone())?;
        let spawn = level.spawn_point(0);
        let (actor, contact) = controller.spawn(&level.surfaces, spawn.position, spawn.facing);

        let mut rig = config.camera.clone();
        rig.reset();

        log::info!(
            "spawned actor at {:?} in '{}' ({:?} camera)",
            actor.position,
            level.name,
            rig.mode()
        );

        Ok(Self {
            frame: 0,
            config,
            level,
            actor,
            contact,
            controller,
            rig,
        })
    }

    /// Create a simulation in the cone field described by `config`.
    pub fn from_config(config: SimulationConfig) -> Result<Self, SimulationError> {
        let level = Level::cone_field(&config.level, config.seed)?;
        Self::new(config, level)
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Swap the camera policy. The new rig starts without carried state.
    pub fn set_rig(&mut self, mut rig: CameraRig) -> Result<(), SimulationError> {
        rig.validate()?;
        rig.reset();
        log::debug!("camera switched to {:?}", rig.mode());
        self.rig = rig;
        Ok(())
    }

    /// Put the actor back at the first spawn point.
    pub fn respawn(&mut self) {
        let spawn = self.level.spawn_point(0);
        let (actor, contact) = self
            .controller
            .spawn(&self.level.surfaces, spawn.position, spawn.facing);
        self.actor = actor;
        self.contact = contact;
        self.rig.reset();
    }

    /// Advance one display frame of `dt` seconds.
    ///
    /// The frame is capped at `max_frame_time` and integrated in equal
    /// substeps no longer than `max_substep`. Look and jump input only
    /// reach the first substep, so a jump pressed in mid-air is dropped even
    /// if the actor lands later in the frame. The camera runs once at the
    /// end with the whole frame's time.
    pub fn step(&mut self, input: &InputState, dt: f32) -> FrameOutput {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("frame {}: treating invalid dt {dt} as zero", self.frame + 1);
            0.0
        };

        let frame_time = if dt > self.config.max_frame_time {
            log::debug!(
                "frame {}: capping dt {dt:.3}s to {:.3}s",
                self.frame + 1,
                self.config.max_frame_time
            );
            self.config.max_frame_time
        } else {
            dt
        };

        let substeps =
            ((frame_time / self.config.max_substep).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let substep_dt = frame_time / substeps as f32;

        let mut substep_input = *input;
        for _ in 0..substeps {
            let report = self.controller.update(
                &mut self.actor,
                &substep_input,
                &self.level.surfaces,
                substep_dt,
            );
            self.contact = report.contact;

            if report.integration.jumped {
                log::debug!("frame {}: jump", self.frame + 1);
            }
            substep_input.look_delta = Vec2::ZERO;
            substep_input.jump = false;
        }

        let camera = self.rig.update(&self.actor, frame_time);
        self.frame += 1;

        FrameOutput {
            frame: self.frame,
            dt: frame_time,
            substeps,
            actor: ActorPose::from(&self.actor),
            camera,
            contact: self.contact,
        }
    }

    /// Step and hand the result to `sink`.
    pub fn step_into(&mut self, input: &InputState, dt: f32, sink: &mut impl FrameSink) {
        let output = self.step(input, dt);
        sink.present(&output);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rift_physics::Action;

    fn flat_sim() -> Simulation {
        Simulation::new(SimulationConfig::default(), Level::flat(100.0, 0.0).unwrap()).unwrap()
    }

    #[test]
    fn test_simulation_creation() {
        let sim = flat_sim();
        assert_eq!(sim.frame, 0);
        assert!(sim.actor.grounded);
        assert!((sim.actor.position.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = flat_sim();

        let output = sim.step(&InputState::default(), 1.0 / 60.0);
        assert_eq!(output.frame, 1);

        let output = sim.step(&InputState::default(), 1.0 / 60.0);
        assert_eq!(output.frame, 2);
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_movement_input() {
        let mut sim = flat_sim();
        let start_pos = sim.actor.position;

        let input = InputState::default().with(Action::MoveForward);
        for _ in 0..60 {
            sim.step(&input, 1.0 / 60.0);
        }

        let distance = (sim.actor.position - start_pos).length();
        assert!((distance - 10.0).abs() < 1e-2, "distance={distance}");
    }

    #[test]
    fn test_long_frame_is_capped_and_substepped() {
        let mut sim = flat_sim();
        let input = InputState::default().with(Action::MoveForward);

        let output = sim.step(&input, 3.0);

        assert_eq!(output.dt, 0.25);
        assert_eq!(output.substeps, 15);
        assert!((sim.actor.position.z - (-2.5)).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_dt_is_zero() {
        let mut sim = flat_sim();
        let start = sim.actor.clone();
        let input = InputState::default().with(Action::MoveRight);

        for dt in [-1.0, f32::NAN, f32::INFINITY] {
            let output = sim.step(&input, dt);
            assert_eq!(output.dt, 0.0);
            assert_eq!(output.substeps, 1);
        }
        assert_eq!(sim.actor.position, start.position);
    }

    #[test]
    fn test_look_applied_once_per_frame() {
        let mut sim = flat_sim();
        let input = InputState {
            look_delta: Vec2::new(100.0, 0.0),
            ..Default::default()
        };

        // Eight substeps, one look
        sim.step(&input, 0.125);
        assert!((sim.actor.yaw - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_jump_consumed_once_across_substeps() {
        let mut sim = flat_sim();
        let jump = InputState::default().with(Action::Jump);

        let output = sim.step(&jump, 0.1);
        assert!(output.substeps > 1);
        assert!(!output.actor.grounded);

        // Velocity reflects one impulse followed by gravity, not a re-jump
        let expected = 20.0 - 9.8 * (0.1 - output.dt / output.substeps as f32);
        assert!((sim.actor.vertical_velocity - expected).abs() < 1e-3);
    }

    #[test]
    fn test_airborne_jump_is_not_replayed_after_landing() {
        let mut sim = flat_sim();
        sim.actor.position.y = 1.0;
        sim.actor.vertical_velocity = -5.0;
        sim.actor.grounded = false;

        // Lands part way through the fifteen substeps
        let output = sim.step(&InputState::default().with(Action::Jump), 0.25);

        assert_eq!(output.substeps, 15);
        assert!(output.contact.is_grounded());
        assert!((sim.actor.position.y - 0.5).abs() < 1e-4);
        assert_eq!(sim.actor.vertical_velocity, 0.0);
    }

    #[test]
    fn test_rig_swap_and_respawn() {
        let mut sim = flat_sim();
        sim.set_rig(CameraRig::first_person(1.1)).unwrap();

        let output = sim.step(&InputState::default(), 1.0 / 60.0);
        assert!(!output.camera.shows_actor);

        sim.actor.position = Vec3::new(30.0, 9.0, 30.0);
        sim.respawn();
        assert!((sim.actor.position - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_bad_rig_is_rejected() {
        let mut sim = flat_sim();
        let rig = CameraRig::FixedOffsetChase {
            offset: Vec3::new(0.0, f32::NAN, 0.0),
            look_offset: 0.5,
        };
        assert!(sim.set_rig(rig).is_err());
    }

    #[test]
    fn test_config_json() {
        let config = SimulationConfig::from_json_str(
            r#"{
                "seed": 42,
                "camera": { "mode": "first-person", "eye_height": 1.1 },
                "locomotion": { "move_speed": 6.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.camera, CameraRig::first_person(1.1));
        assert_eq!(config.locomotion.move_speed, 6.0);
        assert_eq!(config.max_frame_time, 0.25);
        assert_eq!(config.bindings, KeyBindings::default());

        let round_trip = SimulationConfig::from_json_str(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }

    #[test]
    fn test_config_bindings_are_normalized() {
        let config = SimulationConfig::from_json_str(
            r#"{ "bindings": { "ArrowUp": "MoveForward", " ": "Jump" } }"#,
        )
        .unwrap();

        assert_eq!(config.bindings.action_for("ArrowUp"), Some(Action::MoveForward));
        assert_eq!(config.bindings.action_for(" "), Some(Action::Jump));
        assert_eq!(config.bindings.action_for("w"), None);
    }

    #[test]
    fn test_config_rejects_bad_timing() {
        let err = SimulationConfig::from_json_str(r#"{ "max_substep": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SimulationError::Timing(_)));

        let err = SimulationConfig::from_json_str(r#"{ "max_substep": 1e-7 }"#).unwrap_err();
        assert!(matches!(err, SimulationError::Timing(_)));

        let config = SimulationConfig {
            max_frame_time: 0.25,
            max_substep: 0.25 / MAX_SUBSTEPS as f32,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimulationError::Parse(_)));
    }

    #[test]
    fn test_sink_receives_frames() {
        let mut sim = flat_sim();
        let mut frames: Vec<FrameOutput> = Vec::new();

        for _ in 0..3 {
            sim.step_into(&InputState::default(), 1.0 / 60.0, &mut frames);
        }
        assert_eq!(frames.iter().map(|f| f.frame).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
