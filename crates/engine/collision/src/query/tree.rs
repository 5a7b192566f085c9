//! Octree-vs-octree intersection via mutual recursive descent.

use crate::geom::bounds::Aabb;
use crate::geom::frame::Basis;
use crate::geom::octant::{octant_center, OCTANT_COUNT};
use crate::octree::{Octree, NODE_EMPTY, NODE_SOLID, OCTREE_MIN_RADIUS};
use glam::Vec3;

impl Octree {
    /// Test overlap against `other` at unit scale.
    ///
    /// `offset` is the center of `other` expressed in this tree's frame;
    /// `basis` gives `other`'s axes in the same frame.
    pub fn hit_by_octree(&self, other: &Octree, offset: Vec3, basis: Basis) -> bool {
        self.hit_by_octree_scaled(other, offset, basis, 1.0, 1.0)
    }

    /// Test overlap against `other`, with each tree's radius multiplied by
    /// its scale factor. Scaling here reinterprets the same occupancy at a
    /// different physical size, so meshes modeled at different units can be
    /// tested without rebuilding either tree.
    ///
    /// A degenerate transform (non-finite offset or basis, scale <= 0) is
    /// reported as "no overlap".
    pub fn hit_by_octree_scaled(
        &self,
        other: &Octree,
        offset: Vec3,
        basis: Basis,
        own_scale: f32,
        other_scale: f32,
    ) -> bool {
        if !offset.is_finite() || !basis.is_finite() {
            return false;
        }
        let half_a = self.radius * own_scale;
        let half_b = other.radius * other_scale;
        if !half_a.is_finite() || half_a <= 0.0 || !half_b.is_finite() || half_b <= 0.0 {
            return false;
        }
        hit_trees(
            Side {
                tree: self,
                index: 0,
                half: half_a,
                center: Vec3::ZERO,
            },
            Side {
                tree: other,
                index: 0,
                half: half_b,
                center: offset,
            },
            basis,
        )
    }
}

/// One node of the descent: a slot of a tree plus the placement of its cube
/// in the axial tree's frame. The axial side keeps the identity orientation;
/// the other side's cube axes are `basis`.
#[derive(Clone, Copy)]
struct Side<'t> {
    tree: &'t Octree,
    index: usize,
    half: f32,
    center: Vec3,
}

impl Side<'_> {
    fn value(&self) -> i32 {
        self.tree.nodes[self.index]
    }

    /// Solid leaf, or a branch too small to subdivide further.
    fn is_terminal(&self) -> bool {
        let value = self.value();
        value == NODE_SOLID || (value > 0 && 0.5 * self.half < OCTREE_MIN_RADIUS)
    }

    /// Occupancy verdict for a terminal node, refined by the collision mask
    /// on true leaves.
    fn registers(&self) -> bool {
        self.value() != NODE_SOLID || self.tree.collision_allows(self.index)
    }

    fn child(&self, oct: usize, center: Vec3) -> Side<'_> {
        Side {
            tree: self.tree,
            index: self.value() as usize + oct,
            half: 0.5 * self.half,
            center,
        }
    }
}

/// Bounding-volume rejection for a cube pair: enclosing spheres, then each
/// cube against the other's axial cover in both frames. Conservative: a
/// `true` here proves the cubes cannot touch.
fn cubes_disjoint(axial: &Side, oriented: &Side, basis: Basis) -> bool {
    let rel = oriented.center - axial.center;
    let reach = axial.half + oriented.half;
    if rel.length_squared() > 3.0 * reach * reach {
        return true;
    }

    // Oriented cube's cover in the axial frame
    let axial_box = Aabb::from_center_half_extent(axial.center, Vec3::splat(axial.half));
    let oriented_box =
        Aabb::from_center_half_extent(oriented.center, basis.aabb_half_extent(oriented.half));
    if !axial_box.intersects(&oriented_box) {
        return true;
    }

    // Axial cube's cover in the oriented frame
    let local = Vec3::new(rel.dot(basis.i), rel.dot(basis.j), rel.dot(basis.k));
    let axial_cover = Vec3::new(
        basis.i.abs().element_sum(),
        basis.j.abs().element_sum(),
        basis.k.abs().element_sum(),
    ) * axial.half;
    let limit = axial_cover + Vec3::splat(oriented.half);
    local.x.abs() > limit.x || local.y.abs() > limit.y || local.z.abs() > limit.z
}

fn hit_trees(axial: Side, oriented: Side, basis: Basis) -> bool {
    if axial.value() == NODE_EMPTY || oriented.value() == NODE_EMPTY {
        return false;
    }

    // Bounding-volume rejection before any expansion
    if cubes_disjoint(&axial, &oriented, basis) {
        return false;
    }

    let axial_done = axial.is_terminal();
    let oriented_done = oriented.is_terminal();

    if axial_done && oriented_done {
        return axial.registers() && oriented.registers();
    }

    // Expand the larger remaining side first; the cross product of active
    // children is still covered, one tree per recursion level.
    if !axial_done && (oriented_done || axial.half >= oriented.half) {
        (0..OCTANT_COUNT).any(|oct| {
            let center = axial.center + octant_center(oct, axial.half);
            hit_trees(axial.child(oct, center), oriented, basis)
        })
    } else {
        (0..OCTANT_COUNT).any(|oct| {
            let center = oriented.center + basis.resolve(octant_center(oct, oriented.half));
            hit_trees(axial, oriented.child(oct, center), basis)
        })
    }
}
