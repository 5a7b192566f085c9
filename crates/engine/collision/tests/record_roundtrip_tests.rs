//! Round-trip tests for the persisted octree record.
//!
//! Building a tree, persisting it, and reloading it must reproduce the node
//! buffer exactly, including through a JSON detour. Malformed records must
//! be rejected before any tree exists.

use collision::{Octree, OctreeDecodeError, OctreeRecord, OctreeRep};

/// Helper: assert that persist -> reload reproduces the exact buffer and
/// that the reloaded tree answers queries identically.
fn assert_roundtrip(tree: &Octree) {
    let record = tree.to_record();
    let reloaded = Octree::from_record(record.clone()).expect("well-formed record must decode");
    assert_eq!(reloaded.nodes(), tree.nodes());
    assert_eq!(reloaded.radius(), tree.radius());
    assert_eq!(reloaded.leaf_count(), tree.leaf_count());

    // Through JSON as the host's persistence layer would do it
    let json = serde_json::to_string(&record).expect("record serializes");
    let parsed: OctreeRecord = serde_json::from_str(&json).expect("record parses");
    let reparsed = Octree::from_record(parsed).expect("parsed record decodes");
    assert_eq!(reparsed.nodes(), tree.nodes());
}

fn branch(children: [OctreeRep; 8]) -> OctreeRep {
    OctreeRep::Branch(Box::new(children))
}

fn empty_children() -> [OctreeRep; 8] {
    std::array::from_fn(|_| OctreeRep::Leaf(false))
}

/// A representation subdivided to the depth cap along one corner chain.
fn deep_corner_rep(depth: u32) -> OctreeRep {
    if depth == 0 {
        return OctreeRep::Leaf(true);
    }
    let mut children = empty_children();
    children[7] = deep_corner_rep(depth - 1);
    children[0] = OctreeRep::Leaf(true);
    branch(children)
}

#[test]
fn test_roundtrip_leaves() {
    assert_roundtrip(&Octree::from_rep(10.0, &OctreeRep::Leaf(true)).unwrap());
    assert_roundtrip(&Octree::from_rep(0.5, &OctreeRep::Leaf(false)).unwrap());
}

#[test]
fn test_roundtrip_shallow_tree() {
    let mut children = empty_children();
    children[1] = OctreeRep::Leaf(true);
    children[6] = OctreeRep::Leaf(true);
    assert_roundtrip(&Octree::from_rep(128.0, &branch(children)).unwrap());
}

#[test]
fn test_roundtrip_full_depth_tree() {
    let rep = deep_corner_rep(5);
    assert_roundtrip(&Octree::from_rep(32.0, &rep).unwrap());
}

#[test]
fn test_reloaded_tree_answers_queries() {
    let mut children = empty_children();
    children[7] = OctreeRep::Leaf(true);
    let tree = Octree::from_rep(10.0, &branch(children)).unwrap();
    let reloaded = Octree::from_record(tree.to_record()).unwrap();

    let probe_from = glam::Vec3::new(20.0, 5.0, 5.0);
    let probe_to = glam::Vec3::new(-20.0, 5.0, 5.0);
    assert_eq!(
        tree.hit_by_line(probe_from, probe_to),
        reloaded.hit_by_line(probe_from, probe_to)
    );
}

#[test]
fn test_collision_mask_is_not_persisted() {
    let tree = Octree::from_rep_with_collision(10.0, &OctreeRep::Leaf(true), 1).unwrap();
    assert!(tree.has_collision());
    let reloaded = Octree::from_record(tree.to_record()).unwrap();
    assert!(!reloaded.has_collision());
}

#[test]
fn test_malformed_record_json_is_rejected() {
    // Missing buffer field
    assert!(serde_json::from_str::<OctreeRecord>(r#"{"radius": 10.0}"#).is_err());
    // Buffer of the wrong element type
    assert!(serde_json::from_str::<OctreeRecord>(r#"{"radius": 10.0, "octree": [1.5]}"#).is_err());
}

#[test]
fn test_corrupt_buffers_fail_decode() {
    let cases: Vec<(Vec<i32>, OctreeDecodeError)> = vec![
        (vec![], OctreeDecodeError::EmptyBuffer),
        (
            vec![-3],
            OctreeDecodeError::InvalidNodeValue {
                index: 0,
                value: -3,
            },
        ),
        (
            vec![5, 0, 0],
            OctreeDecodeError::ChildOutOfBounds {
                index: 0,
                child: 5,
                len: 3,
            },
        ),
        (
            vec![-1, -1],
            OctreeDecodeError::UnreachableSlots {
                unvisited: 1,
                len: 2,
            },
        ),
    ];
    for (buffer, expected) in cases {
        let record = OctreeRecord {
            radius: 10.0,
            octree: buffer,
        };
        assert_eq!(Octree::from_record(record), Err(expected));
    }
}
