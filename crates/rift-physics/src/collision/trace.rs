//! Ray hits and surface descriptions for registry queries.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Identifier handed out by [`SurfaceRegistry::register`](super::SurfaceRegistry::register).
pub type SurfaceId = u32;

/// Result of a ray query against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Surface that was hit first along the ray.
    pub surface: SurfaceId,

    /// Distance from the ray origin to the hit point.
    pub distance: f32,

    /// World-space hit point.
    pub point: Vec3,

    /// Surface normal at the hit point, pointing away from the surface.
    ///
    /// Points along the reversed ray direction when the ray started inside
    /// a solid shape.
    pub normal: Vec3,

    /// Content flags of the surface that was hit.
    pub contents: ContentFlags,
}

impl RayHit {
    /// Height of the hit point.
    #[inline]
    pub fn height(&self) -> f32 {
        self.point.y
    }

    /// Whether the ray started inside the hit surface.
    #[inline]
    pub fn started_inside(&self) -> bool {
        self.distance <= f32::EPSILON
    }
}

/// Local-space geometry of a surface.
///
/// Every shape is described around its own origin; the translation and
/// rotation of its [`SurfaceDesc`] place it in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceShape {
    /// A finite flat quad in the local XZ plane, facing +Y.
    ///
    /// Registered as a thin solid slab whose top face is the quad.
    Plane {
        /// Half the size along X.
        half_width: f32,
        /// Half the size along Z.
        half_depth: f32,
    },

    /// A box centred on the origin.
    Cuboid {
        /// Half-size in each axis.
        half_extents: Vec3,
    },

    /// A faceted cone centred on the origin, apex at `+height / 2`.
    ///
    /// Built as the convex hull of a regular polygon base and the apex, so
    /// the facet count matches what the scene layer draws.
    Cone {
        /// Base radius.
        radius: f32,
        /// Apex-to-base height.
        height: f32,
        /// Number of base polygon sides (at least 3).
        radial_segments: u32,
    },

    /// The convex hull of a point cloud.
    ConvexHull {
        /// Hull points in local space.
        points: Vec<Vec3>,
    },

    /// An arbitrary triangle mesh.
    TriangleMesh {
        /// Vertex positions in local space.
        vertices: Vec<Vec3>,
        /// Triangle indices, three per triangle.
        indices: Vec<[u32; 3]>,
    },
}

/// A surface to register: shape, world transform and contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDesc {
    /// Local geometry.
    pub shape: SurfaceShape,

    /// World-space translation of the shape origin.
    pub translation: Vec3,

    /// World-space rotation of the shape.
    pub rotation: Quat,

    /// Content flags for query filtering.
    pub contents: ContentFlags,
}

impl SurfaceDesc {
    /// Describe a walkable surface at `translation` with no rotation.
    pub fn terrain(shape: SurfaceShape, translation: Vec3) -> Self {
        Self {
            shape,
            translation,
            rotation: Quat::IDENTITY,
            contents: ContentFlags::TERRAIN,
        }
    }

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the content flags.
    pub fn with_contents(mut self, contents: ContentFlags) -> Self {
        self.contents = contents;
        self
    }

    /// A cone whose base rests on the plane `y = base_height`.
    pub fn resting_cone(
        x: f32,
        z: f32,
        base_height: f32,
        radius: f32,
        height: f32,
        radial_segments: u32,
    ) -> Self {
        Self::terrain(
            SurfaceShape::Cone {
                radius,
                height,
                radial_segments,
            },
            Vec3::new(x, base_height + height / 2.0, z),
        )
    }
}
