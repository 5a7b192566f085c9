//! Line-segment queries against the flat octree.

use crate::geom::octant::{octant_center, OCTANT_COUNT};
use crate::octree::{Octree, NODE_EMPTY, NODE_SOLID, OCTREE_MIN_RADIUS};
use glam::Vec3;

impl Octree {
    /// Test the segment `p1` -> `p2` (model space) against the tree.
    ///
    /// Returns the distance from `p1` to the point where the segment first
    /// enters a solid leaf, or `None` for a miss. A hit exactly at `p1`
    /// reports `Some(0.0)`, which stays distinct from a miss. A zero-length
    /// segment acts as a point-containment probe.
    ///
    /// Degenerate input (non-finite endpoints or radius) is a miss, never a
    /// fault.
    pub fn hit_by_line(&self, p1: Vec3, p2: Vec3) -> Option<f32> {
        if !self.radius.is_finite() || self.radius <= 0.0 || !p1.is_finite() || !p2.is_finite() {
            return None;
        }
        let t = hit_line(self, 0, self.radius, p1, p2)?;
        Some(t * p1.distance(p2))
    }
}

/// Recursive descent in node-local coordinates. `a`/`b` are the segment
/// endpoints relative to the node center; the returned value is the segment
/// parameter of the hit, which translation leaves unchanged.
fn hit_line(tree: &Octree, index: usize, half: f32, a: Vec3, b: Vec3) -> Option<f32> {
    let value = tree.nodes[index];
    if value == NODE_EMPTY {
        return None;
    }

    let (t_enter, t_leave) = clip_segment(a, b, half)?;

    // A branch too small to subdivide further counts as solid.
    if value == NODE_SOLID || 0.5 * half < OCTREE_MIN_RADIUS {
        if value == NODE_SOLID && !tree.collision_allows(index) {
            return None;
        }
        return Some(t_enter);
    }

    let child_base = value as usize;
    let dir = b - a;
    let pa = a + dir * t_enter;
    let pb = a + dir * t_leave;

    let mut best: Option<f32> = None;
    for oct in 0..OCTANT_COUNT {
        if !octant_touched(oct, pa, pb, dir) {
            continue;
        }
        let center = octant_center(oct, half);
        if let Some(t) = hit_line(tree, child_base + oct, 0.5 * half, a - center, b - center) {
            best = Some(match best {
                Some(prev) => prev.min(t),
                None => t,
            });
        }
    }
    best
}

/// Slab-clip the segment `a` -> `b` against the cube [-half, half]^3.
/// Returns the clipped parameter range, or `None` if the segment misses.
fn clip_segment(a: Vec3, b: Vec3, half: f32) -> Option<(f32, f32)> {
    let dir = b - a;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    for axis in 0..3 {
        let origin = a[axis];
        let step = dir[axis];
        if step == 0.0 {
            if origin < -half || origin > half {
                return None;
            }
        } else {
            let inv = 1.0 / step;
            let mut near = (-half - origin) * inv;
            let mut far = (half - origin) * inv;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            t0 = t0.max(near);
            t1 = t1.min(far);
            if t0 > t1 {
                return None;
            }
        }
    }
    Some((t0, t1))
}

/// Whether the clipped sub-segment `pa` -> `pb` reaches into the given
/// octant of the node it was clipped against.
#[inline]
fn octant_touched(oct: usize, pa: Vec3, pb: Vec3, dir: Vec3) -> bool {
    axis_touched(oct & 0b001 != 0, pa.x, pb.x, dir.x)
        && axis_touched(oct & 0b010 != 0, pa.y, pb.y, dir.y)
        && axis_touched(oct & 0b100 != 0, pa.z, pb.z, dir.z)
}

/// Half-space membership along one axis. A sub-segment lying exactly on the
/// bisecting plane belongs to the half containing the segment direction
/// (positive side for a zero direction): one owner per plane, so boundary
/// hits are neither dropped nor double-counted.
#[inline]
fn axis_touched(high_half: bool, pa: f32, pb: f32, dir: f32) -> bool {
    let lo = pa.min(pb);
    let hi = pa.max(pb);
    if high_half {
        hi > 0.0 || (lo == 0.0 && hi == 0.0 && dir >= 0.0)
    } else {
        lo < 0.0 || (lo == 0.0 && hi == 0.0 && dir < 0.0)
    }
}
