//! Ground probe: resolve vertical contact with a downward ray.
//!
//! The probe casts from just above the actor's centre straight down into the
//! walkable surfaces of the registry. A hit within the tolerance band of the
//! rest height lands the actor; anything else leaves it airborne. A hard
//! floor underneath everything stops the actor falling forever when the
//! probe finds nothing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::LocomotionConfig;
use super::state::Actor;
use crate::collision::{ContentFlags, SurfaceId, SurfaceRegistry};

/// Outcome of a ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GroundContact {
    /// Resting on a registered surface.
    Surface {
        /// The surface under the actor.
        surface: SurfaceId,
        /// Rest height the actor's centre was snapped to.
        height: f32,
    },

    /// Caught by the hard floor.
    HardFloor {
        /// The floor height.
        height: f32,
    },

    /// Not in contact.
    Airborne {
        /// Height of the surface below, if the probe found one.
        below: Option<f32>,
    },
}

impl GroundContact {
    /// Whether this is a contact of either kind.
    pub fn is_grounded(&self) -> bool {
        !matches!(self, Self::Airborne { .. })
    }

    /// Rest height for contacts, `None` when airborne.
    pub fn rest_height(&self) -> Option<f32> {
        match self {
            Self::Surface { height, .. } | Self::HardFloor { height } => Some(*height),
            Self::Airborne { .. } => None,
        }
    }
}

/// Probe below the actor and correct its height.
///
/// While rising (positive vertical velocity) the actor only snaps if it is
/// below the rest height by more than the tolerance, so a fresh jump is
/// never cancelled by the contact band.
pub fn probe_ground(
    config: &LocomotionConfig,
    actor: &mut Actor,
    registry: &SurfaceRegistry,
) -> GroundContact {
    let was_grounded = actor.grounded;
    let origin = actor.position + Vec3::new(0.0, config.probe_lift, 0.0);

    let mut contact = match registry.cast_down(
        origin,
        config.probe_distance,
        ContentFlags::MASK_GROUND_PROBE,
    ) {
        Some(hit) => {
            let rest = hit.height() + config.actor_half_height;
            let band = if actor.vertical_velocity > 0.0 {
                -config.ground_tolerance
            } else {
                config.ground_tolerance
            };

            if actor.position.y <= rest + band {
                land(actor, rest);
                GroundContact::Surface {
                    surface: hit.surface,
                    height: rest,
                }
            } else {
                GroundContact::Airborne {
                    below: Some(hit.height()),
                }
            }
        }
        None => GroundContact::Airborne { below: None },
    };

    if actor.position.y < config.hard_floor_height {
        land(actor, config.hard_floor_height);
        contact = GroundContact::HardFloor {
            height: config.hard_floor_height,
        };
    }

    if !contact.is_grounded() {
        actor.grounded = false;
    }

    if was_grounded != actor.grounded {
        log::debug!(
            "ground contact changed: {contact:?} at y={:.3}",
            actor.position.y
        );
    }

    contact
}

/// Place a fresh actor at rest under `spawn_point`.
///
/// Probes straight down from the spawn point with no tolerance limit and
/// lands on the first walkable surface (or the hard floor).
pub fn spawn_at(
    config: &LocomotionConfig,
    registry: &SurfaceRegistry,
    spawn_point: Vec3,
    yaw: f32,
) -> (Actor, GroundContact) {
    let mut actor = Actor::new(spawn_point).facing(yaw);
    let origin = spawn_point + Vec3::new(0.0, config.probe_lift, 0.0);

    let mut contact = GroundContact::Airborne { below: None };
    if let Some(hit) = registry.cast_down(
        origin,
        config.probe_distance,
        ContentFlags::MASK_GROUND_PROBE,
    ) {
        let rest = hit.height() + config.actor_half_height;
        land(&mut actor, rest);
        contact = GroundContact::Surface {
            surface: hit.surface,
            height: rest,
        };
    }

    if !contact.is_grounded() || actor.position.y < config.hard_floor_height {
        land(&mut actor, config.hard_floor_height);
        contact = GroundContact::HardFloor {
            height: config.hard_floor_height,
        };
    }

    log::debug!("spawned at {:?} ({contact:?})", actor.position);
    (actor, contact)
}

fn land(actor: &mut Actor, rest_height: f32) {
    actor.position.y = rest_height;
    actor.vertical_velocity = 0.0;
    actor.grounded = true;
    actor.last_ground_height = Some(rest_height);
}
