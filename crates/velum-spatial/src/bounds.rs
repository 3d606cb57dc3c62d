//! Axis-aligned bounding box with an origin-corner + extents layout.

use velum_math::Vec3;

/// Axis-aligned box defined by its minimum corner and per-axis extents.
///
/// Containment is half-open: `[origin, origin + size)` on all three axes,
/// so a point sitting exactly on a cell's shared face belongs to exactly
/// one of the two cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub origin: Vec3,
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub depth: f32,
}

impl Aabb {
    /// Creates a box from its minimum corner and extents.
    pub fn new(origin: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self {
            origin,
            width,
            height,
            depth,
        }
    }

    /// Computes a box enclosing all points.
    ///
    /// The maximum face is padded outward by a small margin so that the
    /// extremal points themselves satisfy the half-open containment test.
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for &p in &points[1..] {
            min = min.min(p);
            max = max.max(p);
        }

        let extent = max - min;
        let pad = 1e-5 * extent.max_element().max(1.0);
        Some(Self {
            origin: min,
            width: extent.x + pad,
            height: extent.y + pad,
            depth: extent.z + pad,
        })
    }

    /// Returns the center of the box.
    pub fn center(&self) -> Vec3 {
        self.origin + Vec3::new(self.width / 2.0, self.height / 2.0, self.depth / 2.0)
    }

    /// Half-open containment test on all three axes.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.origin.x
            && p.x < self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y < self.origin.y + self.height
            && p.z >= self.origin.z
            && p.z < self.origin.z + self.depth
    }
}
