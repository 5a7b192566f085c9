use glam::Vec3;

/// Axis-aligned bounding box.
///
/// Boxes are accumulated incrementally: start from [`Aabb::EMPTY`] and fold
/// points in with [`Aabb::include`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Accumulation sentinel: contains nothing, and the first `include`
    /// replaces both corners.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Axial box around `center` with the given half-extent per axis
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Grow the box to contain `point`
    #[inline]
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Create an AABB that encompasses both AABBs
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Test intersection with another AABB
    ///
    /// Two AABBs intersect if they overlap in all three dimensions,
    /// including touching at edges/faces.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Check if a point is inside the AABB
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Calculate the center point of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculate the size (extents) of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Calculate the half-size (half-extents) of the AABB
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Radius of the smallest origin-centered sphere containing the box
    pub fn max_radius(&self) -> f32 {
        let corner = self.min.abs().max(self.max.abs());
        corner.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sentinel_accumulation() {
        let mut bb = Aabb::EMPTY;
        bb.include(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(bb.min, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(bb.max, Vec3::new(1.0, -2.0, 3.0));

        bb.include(Vec3::new(-1.0, 4.0, 0.0));
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bb.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::new(Vec3::ONE, Vec3::splat(3.0));
        let touching = Aabb::new(Vec3::splat(2.0), Vec3::splat(4.0));
        let apart = Aabb::new(Vec3::splat(5.0), Vec3::splat(6.0));

        assert!(a.intersects(&b));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_max_radius() {
        let bb = Aabb::new(Vec3::new(-3.0, -4.0, 0.0), Vec3::new(1.0, 2.0, 0.0));
        // Farthest corner from the origin is (-3, -4, 0)
        assert!((bb.max_radius() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_and_center() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(3.0), Vec3::splat(4.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::ZERO);
        assert_eq!(u.max, Vec3::splat(4.0));
        assert_eq!(u.center(), Vec3::splat(2.0));
    }
}
