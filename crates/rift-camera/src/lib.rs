//! Rift Camera
//!
//! Camera rigs that follow the rift runner actor.
//!
//! # Rigs
//!
//! - First-person: eye at the actor's head, body hidden
//! - Fixed chase: rigidly behind the actor's body
//! - Smooth orbit: trails the actor with frame-rate independent lag
//!
//! # Usage
//!
//! Each frame, after the actor has been moved and settled, call
//! [`CameraRig::update`] and hand the resulting [`CameraPose`] (with a
//! [`Projection`]) to the renderer.

pub mod camera;
pub mod error;
pub mod rig;

pub use camera::{CameraPose, Projection};
pub use error::RigError;
pub use rig::{CameraRig, RigMode, DEFAULT_CHASE_OFFSET, DEFAULT_LOOK_OFFSET};
