//! World-space position type and map extent.
//!
//! Positions are `f32` world units as delivered by the simulation.  `y` is
//! height; every proximity test in the bridge works on the x/z ground plane,
//! which is also the plane the spatial grid partitions.

/// A 3-component world-space position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Ground-plane position with zero height.
    #[inline]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Squared distance on the x/z plane.  Prefer this in hot loops and
    /// compare against `radius * radius`.
    #[inline]
    pub fn distance_sq_2d(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Distance on the x/z plane.
    #[inline]
    pub fn distance_2d(self, other: Position) -> f32 {
        self.distance_sq_2d(other).sqrt()
    }

    /// Inclusive axis-aligned containment on the x/z plane.
    #[inline]
    pub fn within_area(self, min: Position, max: Position) -> bool {
        self.x >= min.x && self.x <= max.x && self.z >= min.z && self.z <= max.z
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Playable map size on the ground plane, `[0, width] × [0, height]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapExtent {
    pub width:  f32,
    pub height: f32,
}

impl MapExtent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `true` if `pos` is finite and lies on the map (edges inclusive).
    pub fn contains(self, pos: Position) -> bool {
        pos.is_finite()
            && pos.x >= 0.0
            && pos.z >= 0.0
            && pos.x <= self.width
            && pos.z <= self.height
    }
}
