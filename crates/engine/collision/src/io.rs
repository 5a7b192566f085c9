//! Persisted octree records.
//!
//! The persisted form carries only the root half-width and the flat node
//! buffer. The fine-grained collision mask is never persisted; consumers
//! rebuild it when they need one. Decoding validates the buffer up front so
//! a malformed record can never become a partially-usable tree; callers
//! treat a failed load as "no octree available" and fall back to a coarser
//! proxy.

use crate::octree::{Octree, NODE_EMPTY, NODE_SOLID, OCTREE_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The persisted form of an octree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OctreeRecord {
    /// Half-width of the root cube
    pub radius: f32,
    /// Flat node buffer, depth-first
    pub octree: Vec<i32>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctreeDecodeError {
    #[error("record holds no node buffer")]
    EmptyBuffer,

    #[error("record radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f32 },

    #[error("slot {index} holds invalid node value {value}")]
    InvalidNodeValue { index: usize, value: i32 },

    #[error("slot {index} points children at {child}, past the buffer of {len}")]
    ChildOutOfBounds {
        index: usize,
        child: usize,
        len: usize,
    },

    #[error("slot {index} points children backward at {child}")]
    BackwardChildOffset { index: usize, child: usize },

    #[error("node depth {depth} exceeds the maximum of {}", OCTREE_MAX_DEPTH)]
    DepthExceeded { depth: u32 },

    #[error("{unvisited} of {len} slots unreachable from the root")]
    UnreachableSlots { unvisited: usize, len: usize },
}

impl Octree {
    /// Reconstruct a tree from its persisted record without re-running the
    /// mesh reduction.
    pub fn from_record(record: OctreeRecord) -> Result<Octree, OctreeDecodeError> {
        let OctreeRecord { radius, octree } = record;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(OctreeDecodeError::InvalidRadius { radius });
        }
        if octree.is_empty() {
            return Err(OctreeDecodeError::EmptyBuffer);
        }

        let mut visited = vec![false; octree.len()];
        validate(&octree, &mut visited, 0, 0)?;
        let unvisited = visited.iter().filter(|&&seen| !seen).count();
        if unvisited > 0 {
            return Err(OctreeDecodeError::UnreachableSlots {
                unvisited,
                len: octree.len(),
            });
        }

        Ok(Octree {
            radius,
            nodes: octree,
            collision: None,
        })
    }

    /// The persisted form of this tree.
    pub fn to_record(&self) -> OctreeRecord {
        OctreeRecord {
            radius: self.radius,
            octree: self.nodes.clone(),
        }
    }
}

/// Walk the buffer from `index`, checking every reachable slot: node values
/// must be leaf markers or forward in-bounds child indices, and no path may
/// exceed the depth cap.
fn validate(
    nodes: &[i32],
    visited: &mut [bool],
    index: usize,
    depth: u32,
) -> Result<(), OctreeDecodeError> {
    if depth > OCTREE_MAX_DEPTH {
        return Err(OctreeDecodeError::DepthExceeded { depth });
    }
    visited[index] = true;

    let value = nodes[index];
    if value == NODE_EMPTY || value == NODE_SOLID {
        return Ok(());
    }
    if value < 0 {
        return Err(OctreeDecodeError::InvalidNodeValue { index, value });
    }

    let child = value as usize;
    if child <= index {
        return Err(OctreeDecodeError::BackwardChildOffset { index, child });
    }
    if child + 8 > nodes.len() {
        return Err(OctreeDecodeError::ChildOutOfBounds {
            index,
            child,
            len: nodes.len(),
        });
    }
    for oct in 0..8 {
        validate(nodes, visited, child + oct, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(radius: f32, octree: Vec<i32>) -> OctreeRecord {
        OctreeRecord { radius, octree }
    }

    #[test]
    fn test_decode_leaf_buffers() {
        let tree = Octree::from_record(record(10.0, vec![-1])).unwrap();
        assert_eq!(tree.radius(), 10.0);
        assert_eq!(tree.leaf_count(), 1);
        assert!(!tree.has_collision());
    }

    #[test]
    fn test_decode_rejects_empty_buffer() {
        assert_eq!(
            Octree::from_record(record(10.0, vec![])),
            Err(OctreeDecodeError::EmptyBuffer)
        );
    }

    #[test]
    fn test_decode_rejects_bad_radius() {
        assert!(matches!(
            Octree::from_record(record(-1.0, vec![-1])),
            Err(OctreeDecodeError::InvalidRadius { .. })
        ));
        assert!(matches!(
            Octree::from_record(record(f32::NAN, vec![-1])),
            Err(OctreeDecodeError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_node_value() {
        assert_eq!(
            Octree::from_record(record(10.0, vec![-2])),
            Err(OctreeDecodeError::InvalidNodeValue {
                index: 0,
                value: -2
            })
        );
    }

    #[test]
    fn test_decode_rejects_out_of_bounds_children() {
        assert_eq!(
            Octree::from_record(record(10.0, vec![1])),
            Err(OctreeDecodeError::ChildOutOfBounds {
                index: 0,
                child: 1,
                len: 1
            })
        );
    }

    #[test]
    fn test_decode_rejects_backward_offsets() {
        let buffer = vec![1, 1, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            Octree::from_record(record(10.0, buffer)),
            Err(OctreeDecodeError::BackwardChildOffset { index: 1, child: 1 })
        );
    }

    #[test]
    fn test_decode_rejects_unreachable_slots() {
        assert_eq!(
            Octree::from_record(record(10.0, vec![-1, 0])),
            Err(OctreeDecodeError::UnreachableSlots {
                unvisited: 1,
                len: 2
            })
        );
    }

    #[test]
    fn test_decode_rejects_over_deep_chains() {
        // A chain of branches, each pointing its first child at the next
        // 8-slot block: 6 branch levels overshoot the depth cap.
        let mut buffer = vec![0i32; 1 + 8 * 6];
        buffer[0] = 1;
        let mut slot = 1;
        for _ in 0..5 {
            buffer[slot] = (slot + 8) as i32;
            slot += 8;
        }
        buffer[slot] = -1;
        assert_eq!(
            Octree::from_record(record(10.0, buffer)),
            Err(OctreeDecodeError::DepthExceeded { depth: 6 })
        );
    }
}
