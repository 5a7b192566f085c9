//! Flat-encoded collision octree.
//!
//! The tree is a fixed-depth subdivision of a cube, flattened into a single
//! buffer of signed 32-bit node values. Branches hold the index of their
//! first child; the 8 children of a node always occupy consecutive slots.
//! Queries walk the buffer directly, so descent touches one contiguous
//! allocation instead of chasing per-node heap pointers.

use crate::geom::octant::{octant_center, OCTANT_COUNT};
use glam::Vec3;
use rand::Rng;

/// Maximum subdivision depth of any octree.
pub const OCTREE_MAX_DEPTH: u32 = 5;

/// Nodes are never subdivided below this half-width (world units).
pub const OCTREE_MIN_RADIUS: f32 = 1.0;

/// Node slot value for an empty leaf.
pub(crate) const NODE_EMPTY: i32 = 0;

/// Node slot value for a solid leaf.
pub(crate) const NODE_SOLID: i32 = -1;

/// Leaf-selection strategy for [`Octree::random_point_in_solid_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafWeighting {
    /// Every solid leaf is equally probable, regardless of its depth.
    Uniform,
    /// Leaves are weighted by their cube volume, so deeper (smaller) leaves
    /// are proportionally less likely.
    Volume,
}

/// A collision octree: occupancy of a cube of half-width `radius`, centered
/// on the model origin.
///
/// Node encoding invariant: a slot holds `0` (empty leaf), `-1` (solid
/// leaf), or the index of the first of its 8 consecutive children. Child
/// indices always point forward in the buffer, so every walk terminates.
///
/// Trees are immutable once built; [`Octree::scaled_by`] derives a new tree
/// and never touches its source, so a shared tree can be queried and scaled
/// from multiple threads at once.
#[derive(Clone, Debug, PartialEq)]
pub struct Octree {
    pub(crate) radius: f32,
    pub(crate) nodes: Vec<i32>,
    pub(crate) collision: Option<Vec<u8>>,
}

impl Octree {
    /// Half-width of the root cube, in world units.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Number of node slots in the encoded buffer.
    pub fn leaf_count(&self) -> usize {
        self.nodes.len()
    }

    /// The raw node buffer.
    pub fn nodes(&self) -> &[i32] {
        &self.nodes
    }

    /// Whether a fine-grained collision mask is attached.
    pub fn has_collision(&self) -> bool {
        self.collision.is_some()
    }

    /// The per-node collision mask, if attached.
    pub fn collision_mask(&self) -> Option<&[u8]> {
        self.collision.as_deref()
    }

    /// Attach a per-node collision mask. A solid leaf whose mask byte is 0
    /// stops registering hits; bytes for non-solid slots are ignored.
    pub fn set_collision_mask(
        &mut self,
        mask: Vec<u8>,
    ) -> Result<(), crate::build::OctreeBuildError> {
        if mask.len() != self.nodes.len() {
            return Err(crate::build::OctreeBuildError::CollisionMaskLength {
                expected: self.nodes.len(),
                actual: mask.len(),
            });
        }
        self.collision = Some(mask);
        Ok(())
    }

    /// Drop the collision mask, reverting to pure occupancy.
    pub fn clear_collision_mask(&mut self) {
        self.collision = None;
    }

    /// True if no leaf of the tree is solid.
    pub fn is_empty(&self) -> bool {
        !self.nodes.contains(&NODE_SOLID)
    }

    /// Derive a copy with the root half-width multiplied by `factor`.
    ///
    /// The node buffer is reused unchanged: scaling reinterprets the same
    /// occupancy at a different physical size, it does not re-bucket.
    pub fn scaled_by(&self, factor: f32) -> Octree {
        Octree {
            radius: self.radius * factor,
            nodes: self.nodes.clone(),
            collision: self.collision.clone(),
        }
    }

    /// Whether the collision mask lets the solid leaf at `index` register.
    #[inline]
    pub(crate) fn collision_allows(&self, index: usize) -> bool {
        match &self.collision {
            Some(mask) => mask[index] != 0,
            None => true,
        }
    }

    /// Total volume of all solid leaf cubes, in cubic world units.
    pub fn volume(&self) -> f32 {
        self.volume_below(0, self.radius)
    }

    fn volume_below(&self, index: usize, half: f32) -> f32 {
        match self.nodes[index] {
            NODE_EMPTY => 0.0,
            NODE_SOLID => {
                let width = 2.0 * half;
                width * width * width
            }
            child => (0..OCTANT_COUNT)
                .map(|oct| self.volume_below(child as usize + oct, 0.5 * half))
                .sum(),
        }
    }

    /// A position uniformly sampled inside one of the solid leaf cubes,
    /// translated by `offset`. `None` if the tree has no solid leaf.
    ///
    /// Leaves are selected uniformly by count; use
    /// [`Octree::random_point_in_solid_with`] for volume weighting or a
    /// caller-supplied RNG.
    pub fn random_point_in_solid(&self, offset: Vec3) -> Option<Vec3> {
        self.random_point_in_solid_with(offset, LeafWeighting::Uniform, &mut rand::rng())
    }

    /// As [`Octree::random_point_in_solid`], with an explicit leaf-selection
    /// strategy and RNG.
    pub fn random_point_in_solid_with<R: Rng>(
        &self,
        offset: Vec3,
        weighting: LeafWeighting,
        rng: &mut R,
    ) -> Option<Vec3> {
        if !self.radius.is_finite() || self.radius <= 0.0 || !offset.is_finite() {
            return None;
        }
        let (center, half) = match weighting {
            LeafWeighting::Uniform => {
                let count = self.solid_leaf_count(0);
                if count == 0 {
                    return None;
                }
                let mut remaining = rng.random_range(0..count);
                self.nth_solid_leaf(0, Vec3::ZERO, self.radius, &mut remaining)?
            }
            LeafWeighting::Volume => {
                let total = self.volume();
                if total <= 0.0 {
                    return None;
                }
                let mut budget = rng.random_range(0.0..total);
                self.leaf_at_volume(0, Vec3::ZERO, self.radius, &mut budget)?
            }
        };
        let jitter = Vec3::new(
            rng.random_range(-half..=half),
            rng.random_range(-half..=half),
            rng.random_range(-half..=half),
        );
        Some(center + jitter + offset)
    }

    fn solid_leaf_count(&self, index: usize) -> usize {
        match self.nodes[index] {
            NODE_EMPTY => 0,
            NODE_SOLID => 1,
            child => (0..OCTANT_COUNT)
                .map(|oct| self.solid_leaf_count(child as usize + oct))
                .sum(),
        }
    }

    fn nth_solid_leaf(
        &self,
        index: usize,
        center: Vec3,
        half: f32,
        remaining: &mut usize,
    ) -> Option<(Vec3, f32)> {
        match self.nodes[index] {
            NODE_EMPTY => None,
            NODE_SOLID => {
                if *remaining == 0 {
                    Some((center, half))
                } else {
                    *remaining -= 1;
                    None
                }
            }
            child => (0..OCTANT_COUNT).find_map(|oct| {
                self.nth_solid_leaf(
                    child as usize + oct,
                    center + octant_center(oct, half),
                    0.5 * half,
                    remaining,
                )
            }),
        }
    }

    fn leaf_at_volume(
        &self,
        index: usize,
        center: Vec3,
        half: f32,
        budget: &mut f32,
    ) -> Option<(Vec3, f32)> {
        match self.nodes[index] {
            NODE_EMPTY => None,
            NODE_SOLID => {
                let width = 2.0 * half;
                let volume = width * width * width;
                if *budget < volume {
                    Some((center, half))
                } else {
                    *budget -= volume;
                    None
                }
            }
            child => (0..OCTANT_COUNT).find_map(|oct| {
                self.leaf_at_volume(
                    child as usize + oct,
                    center + octant_center(oct, half),
                    0.5 * half,
                    budget,
                )
            }),
        }
    }
}
