//! Static collision geometry for ground probing.
//!
//! This module provides the surface registry the actor queries by ray.
//!
//! # Key Types
//!
//! - [`SurfaceRegistry`]: all registered surfaces, immutable once built
//! - [`SurfaceDesc`]: what the scene layer hands over per surface
//! - [`RayHit`]: nearest intersection along a ray
//!
//! # Queries
//!
//! Rays are tested against every surface whose contents intersect the query
//! mask and the nearest hit wins. Shapes are solid, so a ray that starts
//! inside an obstacle reports a hit at distance zero.

mod flags;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use trace::{RayHit, SurfaceDesc, SurfaceId, SurfaceShape};
pub use world::{Surface, SurfaceRegistry};
