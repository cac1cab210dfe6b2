//! Setup errors for the simulation.

use std::path::PathBuf;

use rift_camera::RigError;
use rift_physics::{ConfigError, RegistryError};
use thiserror::Error;

/// Anything that can stop a simulation from being built.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("locomotion config: {0}")]
    Config(#[from] ConfigError),

    #[error("level geometry: {0}")]
    Registry(#[from] RegistryError),

    #[error("camera: {0}")]
    Rig(#[from] RigError),

    #[error("frame timing: {0}")]
    Timing(&'static str),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
