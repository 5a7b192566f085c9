// Octant indexing for cube subdivision

use glam::Vec3;

/// Number of children of a subdivided node.
pub const OCTANT_COUNT: usize = 8;

/// Signed corner direction of an octant within its parent cube.
///
/// Layout: index = x | (y << 1) | (z << 2), a clear bit selects the low
/// half of the parent on that axis, a set bit the high half.
#[inline]
pub fn octant_direction(index: usize) -> Vec3 {
    debug_assert!(index < OCTANT_COUNT, "octant index must be 0-7");
    Vec3::new(
        if index & 0b001 != 0 { 1.0 } else { -1.0 },
        if index & 0b010 != 0 { 1.0 } else { -1.0 },
        if index & 0b100 != 0 { 1.0 } else { -1.0 },
    )
}

/// Center of a child octant, for a parent cube of half-width `half`
/// centered at the origin.
#[inline]
pub fn octant_center(index: usize, half: f32) -> Vec3 {
    octant_direction(index) * (0.5 * half)
}
