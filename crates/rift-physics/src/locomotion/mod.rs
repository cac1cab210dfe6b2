//! Actor locomotion.
//!
//! # Step order
//!
//! 1. Look input updates yaw and pitch
//! 2. The rendered body turns toward the controller yaw
//! 3. Horizontal displacement, gravity and jump are integrated
//! 4. The ground probe corrects height and sets the grounded flag
//!
//! The integrator never touches collision; the probe is the only place the
//! actor's height is corrected.

mod config;
mod controller;
mod integrator;
mod probe;
mod state;

pub use config::{LocomotionConfig, MovementBasis};
pub use controller::{ActorController, StepReport};
pub use integrator::{
    apply_look, can_jump, horizontal_displacement, integrate, turn_body, IntegrationReport,
};
pub use probe::{probe_ground, spawn_at, GroundContact};
pub use state::{horizontal_forward, horizontal_right, yaw_rotation, Action, Actor, InputState};
