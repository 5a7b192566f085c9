// Geometric primitives shared by the builder and both query paths

pub mod bounds;
pub mod frame;
pub mod octant;

// Re-export main types
pub use bounds::Aabb;
pub use frame::Basis;
pub use octant::{octant_center, octant_direction, OCTANT_COUNT};
