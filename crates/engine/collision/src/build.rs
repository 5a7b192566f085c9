//! Building octrees from nested occupancy representations.

use crate::octree::{Octree, NODE_EMPTY, NODE_SOLID, OCTREE_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nested occupancy representation: recursively either a boolean leaf or
/// eight sub-representations, one per octant.
///
/// The untagged serde shape lets hosts hand over plain nested arrays
/// (`[true, false, [...], ...]`); anything that is neither a bool nor an
/// 8-element array fails to deserialize, so malformed input never reaches
/// the flattening pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OctreeRep {
    Leaf(bool),
    Branch(Box<[OctreeRep; 8]>),
}

impl OctreeRep {
    /// Depth of the representation: 0 for a bare leaf.
    pub fn depth(&self) -> u32 {
        match self {
            OctreeRep::Leaf(_) => 0,
            OctreeRep::Branch(children) => {
                1 + children.iter().map(OctreeRep::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of buffer slots the flattened form occupies.
    fn slot_count(&self) -> usize {
        match self {
            OctreeRep::Leaf(_) => 1,
            OctreeRep::Branch(children) => {
                1 + children.iter().map(OctreeRep::slot_count).sum::<usize>()
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctreeBuildError {
    #[error("representation depth {depth} exceeds the maximum of {}", OCTREE_MAX_DEPTH)]
    DepthExceeded { depth: u32 },

    #[error("root radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f32 },

    #[error("collision mask holds {actual} bytes, expected {expected}")]
    CollisionMaskLength { expected: usize, actual: usize },
}

impl Octree {
    /// Flatten a nested occupancy representation into an octree with the
    /// given root half-width.
    ///
    /// Children of a branch land in 8 consecutive slots at the index stored
    /// in the parent, in depth-first order, so a reader can walk the tree
    /// from the buffer and the branching factor alone.
    pub fn from_rep(radius: f32, rep: &OctreeRep) -> Result<Octree, OctreeBuildError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(OctreeBuildError::InvalidRadius { radius });
        }
        let depth = rep.depth();
        if depth > OCTREE_MAX_DEPTH {
            return Err(OctreeBuildError::DepthExceeded { depth });
        }

        let mut nodes = vec![NODE_EMPTY; rep.slot_count()];
        let filled = fill(rep, &mut nodes, 0, 1);
        debug_assert_eq!(filled, nodes.len());

        tracing::debug!(nodes = nodes.len(), depth, radius, "flattened octree");

        Ok(Octree {
            radius,
            nodes,
            collision: None,
        })
    }

    /// As [`Octree::from_rep`], also attaching a collision mask in which
    /// every solid leaf holds `leaf_byte` and every other slot 0.
    pub fn from_rep_with_collision(
        radius: f32,
        rep: &OctreeRep,
        leaf_byte: u8,
    ) -> Result<Octree, OctreeBuildError> {
        let mut tree = Octree::from_rep(radius, rep)?;
        let mask = tree
            .nodes
            .iter()
            .map(|&node| if node == NODE_SOLID { leaf_byte } else { 0 })
            .collect();
        tree.collision = Some(mask);
        Ok(tree)
    }
}

/// Write `rep` into slot `at`; children of branches are allocated from
/// `next_free` onward. Returns the next free slot after the whole subtree.
fn fill(rep: &OctreeRep, nodes: &mut [i32], at: usize, next_free: usize) -> usize {
    match rep {
        OctreeRep::Leaf(false) => {
            nodes[at] = NODE_EMPTY;
            next_free
        }
        OctreeRep::Leaf(true) => {
            nodes[at] = NODE_SOLID;
            next_free
        }
        OctreeRep::Branch(children) => {
            nodes[at] = next_free as i32;
            let mut next = next_free + 8;
            for (oct, child) in children.iter().enumerate() {
                next = fill(child, nodes, next_free + oct, next);
            }
            next
        }
    }
}
