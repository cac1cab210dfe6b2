//! The surface registry: every static shape the actor can collide with.
//!
//! Surfaces are registered once while the world is being set up. After that
//! the registry is only read, so it can be shared freely.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::Ray;
use parry3d::shape::SharedShape;

use super::flags::ContentFlags;
use super::trace::{RayHit, SurfaceDesc, SurfaceId, SurfaceShape};
use crate::error::RegistryError;

/// Depth of the solid slab under a plane surface.
const PLANE_THICKNESS: f32 = 1.0;

/// A registered piece of collision geometry.
#[derive(Clone)]
pub struct Surface {
    /// Identifier assigned at registration.
    pub id: SurfaceId,
    /// The collision shape, in local space.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags for query filtering.
    pub contents: ContentFlags,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("shape", &self.shape.shape_type())
            .field("translation", &self.transform.translation.vector)
            .field("contents", &self.contents)
            .finish()
    }
}

/// The immutable set of static collidable geometry.
///
/// Supports planes, boxes, faceted cones, convex hulls and triangle meshes,
/// each with its own world transform. The only query the simulation needs
/// is [`raycast`](Self::raycast): nearest hit along a ray.
#[derive(Debug, Default, Clone)]
pub struct SurfaceRegistry {
    surfaces: Vec<Surface>,
    next_id: SurfaceId,
}

impl SurfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a surface and return its id.
    ///
    /// Rejects non-positive dimensions, degenerate hulls and broken meshes.
    pub fn register(&mut self, desc: SurfaceDesc) -> Result<SurfaceId, RegistryError> {
        let transform = to_isometry(desc.translation, desc.rotation)?;
        let shape = build_shape(&desc.shape)?;

        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(RegistryError::IdsExhausted(id))?;

        self.surfaces.push(Surface {
            id,
            shape,
            transform,
            contents: desc.contents,
        });

        Ok(id)
    }

    /// Register many surfaces, stopping at the first failure.
    pub fn register_all<I>(&mut self, descs: I) -> Result<Vec<SurfaceId>, RegistryError>
    where
        I: IntoIterator<Item = SurfaceDesc>,
    {
        descs.into_iter().map(|desc| self.register(desc)).collect()
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Look up a surface by id.
    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    /// Iterate over every registered surface.
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    /// Cast a ray and return the nearest hit among surfaces matching `mask`.
    ///
    /// Shapes are treated as solid: a ray starting inside a shape hits it
    /// at distance zero.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !origin.is_finite() || max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<(f32, &Surface)> = None;

        for surface in &self.surfaces {
            if !mask.intersects(surface.contents) {
                continue;
            }

            if let Some(toi) = surface
                .shape
                .cast_ray(&surface.transform, &ray, max_distance, true)
            {
                let is_closer = closest.map_or(true, |(best, _)| toi < best);
                if is_closer {
                    closest = Some((toi, surface));
                }
            }
        }

        closest.map(|(distance, surface)| RayHit {
            surface: surface.id,
            distance,
            point: origin + dir * distance,
            normal: hit_normal(&ray, distance, dir, surface),
            contents: surface.contents,
        })
    }

    /// Cast straight down from `origin`.
    pub fn cast_down(&self, origin: Vec3, max_distance: f32, mask: ContentFlags) -> Option<RayHit> {
        self.raycast(origin, Vec3::NEG_Y, max_distance, mask)
    }
}

/// Normal at the hit, flipped so it always faces back along the ray.
fn hit_normal(ray: &Ray, toi: f32, dir: Vec3, surface: &Surface) -> Vec3 {
    if toi <= f32::EPSILON {
        return -dir;
    }

    let normal = surface
        .shape
        .cast_ray_and_get_normal(&surface.transform, ray, toi + 0.01, true)
        .map(|hit| Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z))
        .unwrap_or(-dir);

    if normal.dot(dir) > 0.0 {
        -normal
    } else {
        normal
    }
}

fn to_isometry(translation: Vec3, rotation: Quat) -> Result<Isometry<Real>, RegistryError> {
    if !translation.is_finite() || !rotation.is_finite() || rotation.length_squared() < 1e-6 {
        return Err(RegistryError::NonFiniteTransform);
    }

    let rotation = rotation.normalize();
    Ok(Isometry::from_parts(
        Translation3::new(translation.x, translation.y, translation.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    ))
}

fn check_dimension(shape: &'static str, name: &'static str, value: f32) -> Result<(), RegistryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RegistryError::InvalidDimension { shape, name, value })
    }
}

fn to_points(points: &[Vec3]) -> Vec<Point<Real>> {
    points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect()
}

fn build_shape(shape: &SurfaceShape) -> Result<SharedShape, RegistryError> {
    match shape {
        SurfaceShape::Plane {
            half_width,
            half_depth,
        } => {
            check_dimension("plane", "half_width", *half_width)?;
            check_dimension("plane", "half_depth", *half_depth)?;
            let slab = SharedShape::cuboid(*half_width, PLANE_THICKNESS / 2.0, *half_depth);
            Ok(SharedShape::compound(vec![(
                Isometry::translation(0.0, -PLANE_THICKNESS / 2.0, 0.0),
                slab,
            )]))
        }
        SurfaceShape::Cuboid { half_extents } => {
            check_dimension("cuboid", "half_extents.x", half_extents.x)?;
            check_dimension("cuboid", "half_extents.y", half_extents.y)?;
            check_dimension("cuboid", "half_extents.z", half_extents.z)?;
            Ok(SharedShape::cuboid(
                half_extents.x,
                half_extents.y,
                half_extents.z,
            ))
        }
        SurfaceShape::Cone {
            radius,
            height,
            radial_segments,
        } => {
            check_dimension("cone", "radius", *radius)?;
            check_dimension("cone", "height", *height)?;
            if *radial_segments < 3 {
                return Err(RegistryError::TooFewSegments(*radial_segments));
            }
            let points = cone_points(*radius, *height, *radial_segments);
            SharedShape::convex_hull(&to_points(&points))
                .ok_or(RegistryError::DegenerateHull(points.len()))
        }
        SurfaceShape::ConvexHull { points } => {
            if points.iter().any(|p| !p.is_finite()) {
                return Err(RegistryError::DegenerateHull(points.len()));
            }
            SharedShape::convex_hull(&to_points(points))
                .ok_or(RegistryError::DegenerateHull(points.len()))
        }
        SurfaceShape::TriangleMesh { vertices, indices } => {
            if indices.is_empty() {
                return Err(RegistryError::InvalidMesh("no triangles".to_string()));
            }
            let vertex_count = vertices.len();
            if let Some(bad) = indices
                .iter()
                .flatten()
                .find(|&&i| i as usize >= vertex_count)
            {
                return Err(RegistryError::InvalidMesh(format!(
                    "index {bad} out of range for {vertex_count} vertices"
                )));
            }
            SharedShape::trimesh(to_points(vertices), indices.clone())
                .map_err(|e| RegistryError::InvalidMesh(format!("{e:?}")))
        }
    }
}

/// Base polygon at `-height / 2` plus the apex at `+height / 2`.
fn cone_points(radius: f32, height: f32, segments: u32) -> Vec<Vec3> {
    let half = height / 2.0;
    let mut points: Vec<Vec3> = (0..segments)
        .map(|i| {
            let theta = std::f32::consts::TAU * i as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            Vec3::new(radius * cos, -half, radius * sin)
        })
        .collect();
    points.push(Vec3::new(0.0, half, 0.0));
    points
}

// ============================================================================
// Tests
// ============================================================================
