//! Level construction.
//!
//! The default level is a square ground plane scattered with cones. Cone
//! placement is drawn from a seeded RNG so a seed always yields the same
//! field.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rift_physics::{RegistryError, SurfaceDesc, SurfaceRegistry, SurfaceShape};
use serde::{Deserialize, Serialize};

/// A spawn point for the actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space. The actor is dropped onto whatever is
    /// below it.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

/// One cone in the field, for whoever builds the visible scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConePlacement {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub height: f32,
}

/// Parameters for the cone field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Side length of the square ground plane.
    pub ground_size: f32,

    /// Height of the ground plane.
    pub ground_height: f32,

    /// Number of cones to scatter.
    pub cone_count: usize,

    /// Base radius range `[min, max)`.
    pub cone_radius: (f32, f32),

    /// Height range `[min, max)`.
    pub cone_height: (f32, f32),

    /// Facets around each cone.
    pub cone_segments: u32,

    /// Cones are placed uniformly in `[-spread, spread)` on x and z.
    pub spread: f32,

    /// Where the actor starts.
    pub spawn: SpawnPoint,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            ground_size: 100.0,
            ground_height: 0.0,
            cone_count: 150,
            cone_radius: (0.5, 1.5),
            cone_height: (1.0, 3.0),
            cone_segments: 8,
            spread: 50.0,
            spawn: SpawnPoint {
                position: Vec3::new(0.0, 10.0, 0.0),
                facing: 0.0,
            },
        }
    }
}

/// A level: collision surfaces plus what the scene layer needs to draw it.
#[derive(Debug, Clone)]
pub struct Level {
    /// Display name.
    pub name: String,

    /// Collision geometry.
    pub surfaces: SurfaceRegistry,

    /// Cones in placement order.
    pub cones: Vec<ConePlacement>,

    /// Actor spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

impl Level {
    /// Create an empty level.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            surfaces: SurfaceRegistry::new(),
            cones: Vec::new(),
            spawn_points: Vec::new(),
        }
    }

    /// A bare ground plane with a spawn point above its centre.
    pub fn flat(size: f32, height: f32) -> Result<Self, RegistryError> {
        let mut level = Self::new("flat");
        level.add_ground(size, height)?;
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(0.0, height + 10.0, 0.0),
            facing: 0.0,
        });
        Ok(level)
    }

    /// The cone field for `seed`.
    pub fn cone_field(config: &LevelConfig, seed: u64) -> Result<Self, RegistryError> {
        let mut level = Self::new("cone field");
        level.add_ground(config.ground_size, config.ground_height)?;

        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..config.cone_count {
            let radius = sample(&mut rng, config.cone_radius);
            let height = sample(&mut rng, config.cone_height);
            let x = sample(&mut rng, (-config.spread, config.spread));
            let z = sample(&mut rng, (-config.spread, config.spread));

            level.add_cone(
                ConePlacement {
                    x,
                    z,
                    radius,
                    height,
                },
                config.ground_height,
                config.cone_segments,
            )?;
        }

        level.spawn_points.push(config.spawn);

        log::info!(
            "built '{}' with {} surfaces (seed {seed})",
            level.name,
            level.surfaces.len()
        );
        Ok(level)
    }

    fn add_ground(&mut self, size: f32, height: f32) -> Result<(), RegistryError> {
        self.surfaces.register(SurfaceDesc::terrain(
            SurfaceShape::Plane {
                half_width: size / 2.0,
                half_depth: size / 2.0,
            },
            Vec3::new(0.0, height, 0.0),
        ))?;
        Ok(())
    }

    fn add_cone(
        &mut self,
        cone: ConePlacement,
        base_height: f32,
        segments: u32,
    ) -> Result<(), RegistryError> {
        self.surfaces.register(SurfaceDesc::resting_cone(
            cone.x,
            cone.z,
            base_height,
            cone.radius,
            cone.height,
            segments,
        ))?;
        self.cones.push(cone);
        Ok(())
    }

    /// Get a spawn point, falling back to the origin when none exist.
    pub fn spawn_point(&self, index: usize) -> SpawnPoint {
        if self.spawn_points.is_empty() {
            return SpawnPoint {
                position: Vec3::ZERO,
                facing: 0.0,
            };
        }
        self.spawn_points[index % self.spawn_points.len()]
    }
}

/// Uniform sample in `[min, max)`, or `min` for an empty range.
fn sample(rng: &mut StdRng, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_creation() {
        let level = Level::new("test");
        assert_eq!(level.name, "test");
        assert!(level.surfaces.is_empty());
        assert_eq!(level.spawn_point(3).position, Vec3::ZERO);
    }

    #[test]
    fn test_cone_field_counts() {
        let level = Level::cone_field(&LevelConfig::default(), 7).unwrap();
        assert_eq!(level.cones.len(), 150);
        assert_eq!(level.surfaces.len(), 151);
        assert_eq!(level.spawn_points.len(), 1);
    }

    #[test]
    fn test_cone_ranges() {
        let config = LevelConfig::default();
        let level = Level::cone_field(&config, 99).unwrap();

        for cone in &level.cones {
            assert!(cone.radius >= 0.5 && cone.radius < 1.5);
            assert!(cone.height >= 1.0 && cone.height < 3.0);
            assert!(cone.x >= -50.0 && cone.x < 50.0);
            assert!(cone.z >= -50.0 && cone.z < 50.0);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let config = LevelConfig::default();
        let a = Level::cone_field(&config, 1234).unwrap();
        let b = Level::cone_field(&config, 1234).unwrap();
        let c = Level::cone_field(&config, 1235).unwrap();

        assert_eq!(a.cones, b.cones);
        assert_ne!(a.cones, c.cones);
    }

    #[test]
    fn test_degenerate_cone_config_is_rejected() {
        let config = LevelConfig {
            cone_segments: 2,
            ..Default::default()
        };
        assert_eq!(
            Level::cone_field(&config, 0).unwrap_err(),
            RegistryError::TooFewSegments(2)
        );
    }

    #[test]
    fn test_cone_tops_are_walkable() {
        let config = LevelConfig {
            cone_count: 1,
            ..Default::default()
        };
        let level = Level::cone_field(&config, 5).unwrap();
        let cone = level.cones[0];

        let hit = level
            .surfaces
            .cast_down(
                Vec3::new(cone.x, 100.0, cone.z),
                1000.0,
                rift_physics::ContentFlags::MASK_GROUND_PROBE,
            )
            .unwrap();
        assert!((hit.height() - cone.height).abs() < 1e-2);
    }
}
