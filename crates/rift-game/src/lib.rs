//! Rift Game
//!
//! This crate wires the locomotion core into a playable session:
//!
//! - Input collection and key bindings
//! - Level construction (ground plane and cone field)
//! - Frame timing
//! - The frame driver and its configuration
//!
//! # Architecture
//!
//! Data flows one way through each frame.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        Simulation::step                        │
//! │  ┌─────────┐    ┌────────────┐    ┌───────┐    ┌────────────┐  │
//! │  │ Input   │───►│ Integrator │───►│ Probe │───►│ Camera rig │──┼──► FrameSink
//! │  │ State   │    │ (substeps) │    │       │    │ (once)     │  │
//! │  └─────────┘    └────────────┘    └───────┘    └────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod clock;
pub mod error;
pub mod input;
pub mod level;
pub mod simulation;

// Re-export main types
pub use clock::FrameClock;
pub use error::SimulationError;
pub use input::{InputCollector, KeyBindings};
pub use level::{ConePlacement, Level, LevelConfig, SpawnPoint};
pub use simulation::{ActorPose, FrameOutput, FrameSink, Simulation, SimulationConfig};

// Re-export core types for convenience
pub use rift_camera::{CameraPose, CameraRig, Projection, RigMode};
pub use rift_physics::{Action, Actor, GroundContact, InputState, LocomotionConfig};
