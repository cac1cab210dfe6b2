//! Content flags for filtering surfaces during ray queries.
//!
//! A surface can block movement (`SOLID`) without being something the actor
//! can stand on (`WALKABLE`). The ground probe only looks at walkable
//! surfaces; other queries can pick their own mask.

use serde::{Deserialize, Serialize};

/// Content flags describe what a registered surface is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Nothing; never matched by a query.
    pub const EMPTY: Self = Self(0);

    /// Blocks rays and movement.
    pub const SOLID: Self = Self(1 << 0);

    /// The actor may rest on top of this surface.
    pub const WALKABLE: Self = Self(1 << 1);

    /// Ground plane and obstacles: solid and walkable.
    pub const TERRAIN: Self = Self(Self::SOLID.0 | Self::WALKABLE.0);

    /// Mask used by the ground probe.
    pub const MASK_GROUND_PROBE: Self = Self::WALKABLE;

    /// Check if these flags contain every bit of `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
