//! Rift Physics
//!
//! Kinematic locomotion for a single actor walking over static terrain.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: A registry of static surfaces queried with rays
//! - **Locomotion**: Turns per-frame input into actor motion, then corrects
//!   it with a downward ground probe
//!
//! Everything here is deterministic: the same registry, configuration,
//! input sequence and time steps always give the same actor state.

pub mod collision;
pub mod error;
pub mod locomotion;
pub mod smoothing;

// Re-export commonly used types
pub use collision::{ContentFlags, RayHit, SurfaceDesc, SurfaceId, SurfaceRegistry, SurfaceShape};
pub use error::{ConfigError, RegistryError};
pub use locomotion::{
    Action, Actor, ActorController, GroundContact, InputState, LocomotionConfig, MovementBasis,
    StepReport,
};
pub use smoothing::Smoothing;
