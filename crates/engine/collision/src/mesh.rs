//! Triangle-mesh reduction: turning a triangle soup into the nested
//! occupancy representation the builder consumes.
//!
//! The reduction subdivides the root cube recursively. A cube no triangle
//! overlaps becomes an empty leaf; at the target depth an overlapped cube
//! becomes a solid leaf; in between, the triangle list is filtered per
//! octant before descending, so the cost tracks the surface actually
//! present in each region.

use crate::build::OctreeRep;
use crate::geom::bounds::Aabb;
use crate::geom::octant::octant_center;
use crate::octree::OCTREE_MAX_DEPTH;
use glam::Vec3;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("mesh has no triangles")]
    NoGeometry,

    #[error("triangle {triangle} references vertex {index}, out of {count}")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        count: usize,
    },

    #[error("target depth {depth} exceeds the maximum of {}", OCTREE_MAX_DEPTH)]
    DepthExceeded { depth: u32 },
}

/// An indexed triangle soup in model space.
#[derive(Clone, Debug, Default)]
pub struct TriMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriMesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Bounding box of all vertices.
    pub fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for &vertex in &self.vertices {
            bounds.include(vertex);
        }
        bounds
    }

    /// Natural root half-width for this mesh: the radius of the smallest
    /// origin-centered sphere containing it.
    pub fn collision_radius(&self) -> f32 {
        self.bounding_box().max_radius()
    }

    /// Reduce the mesh to a nested occupancy representation of the given
    /// depth, over a root cube of [`TriMesh::collision_radius`] half-width.
    pub fn voxelize(&self, depth: u32) -> Result<OctreeRep, MeshError> {
        if depth > OCTREE_MAX_DEPTH {
            return Err(MeshError::DepthExceeded { depth });
        }
        if self.triangles.is_empty() {
            return Err(MeshError::NoGeometry);
        }

        let mut corners = Vec::with_capacity(self.triangles.len());
        for (triangle, indices) in self.triangles.iter().enumerate() {
            let mut resolved = [Vec3::ZERO; 3];
            for (slot, &index) in resolved.iter_mut().zip(indices) {
                *slot = *self.vertices.get(index as usize).ok_or(
                    MeshError::IndexOutOfBounds {
                        triangle,
                        index,
                        count: self.vertices.len(),
                    },
                )?;
            }
            corners.push(resolved);
        }

        let active: Vec<usize> = (0..corners.len()).collect();
        let radius = self.collision_radius();
        let rep = subdivide(&corners, &active, Vec3::ZERO, radius, depth);

        tracing::debug!(
            triangles = corners.len(),
            depth,
            radius,
            "reduced mesh to octree representation"
        );

        Ok(rep)
    }
}

fn subdivide(
    corners: &[[Vec3; 3]],
    active: &[usize],
    center: Vec3,
    half: f32,
    depth_left: u32,
) -> OctreeRep {
    if active.is_empty() {
        return OctreeRep::Leaf(false);
    }
    if depth_left == 0 {
        return OctreeRep::Leaf(true);
    }

    let children: [OctreeRep; 8] = std::array::from_fn(|oct| {
        let child_center = center + octant_center(oct, half);
        let child_half = 0.5 * half;
        let overlapping: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&tri| triangle_intersects_cube(&corners[tri], child_center, child_half))
            .collect();
        subdivide(corners, &overlapping, child_center, child_half, depth_left - 1)
    });

    // Collapse uniform subdivisions so the flattened buffer stays compact
    if children.iter().all(|c| *c == OctreeRep::Leaf(true)) {
        return OctreeRep::Leaf(true);
    }
    if children.iter().all(|c| *c == OctreeRep::Leaf(false)) {
        return OctreeRep::Leaf(false);
    }
    OctreeRep::Branch(Box::new(children))
}

/// Separating-axis overlap test between a triangle and the axis-aligned
/// cube of half-width `half` centered at `center`: the three cube axes, the
/// triangle normal, and the nine edge cross products.
fn triangle_intersects_cube(triangle: &[Vec3; 3], center: Vec3, half: f32) -> bool {
    let v0 = triangle[0] - center;
    let v1 = triangle[1] - center;
    let v2 = triangle[2] - center;

    // Cube axes: compare the triangle's AABB against the cube directly
    let tri_min = v0.min(v1).min(v2);
    let tri_max = v0.max(v1).max(v2);
    if tri_min.x > half || tri_max.x < -half {
        return false;
    }
    if tri_min.y > half || tri_max.y < -half {
        return false;
    }
    if tri_min.z > half || tri_max.z < -half {
        return false;
    }

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    if axis_separates(e0.cross(e1), half, v0, v1, v2) {
        return false;
    }

    let cube_axes = [Vec3::X, Vec3::Y, Vec3::Z];
    for axis in cube_axes {
        for edge in [e0, e1, e2] {
            let cross = axis.cross(edge);
            if cross.length_squared() > 1e-12 && axis_separates(cross, half, v0, v1, v2) {
                return false;
            }
        }
    }

    true
}

/// Whether `axis` separates the triangle from the origin-centered cube.
fn axis_separates(axis: Vec3, half: f32, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let p0 = axis.dot(v0);
    let p1 = axis.dot(v1);
    let p2 = axis.dot(v2);
    let tri_min = p0.min(p1).min(p2);
    let tri_max = p0.max(p1).max(p2);

    let cube_reach = half * (axis.x.abs() + axis.y.abs() + axis.z.abs());
    tri_min > cube_reach || tri_max < -cube_reach
}
