use glam::{Quat, Vec3};

/// Orientation frame: the axes of one octree's space expressed in another's.
///
/// `i`, `j`, `k` are the unit x/y/z axes of the oriented space. The frame is
/// what the mutual-descent query consumes; hosts working with rotations
/// derive one with [`Basis::from_quat`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub i: Vec3,
    pub j: Vec3,
    pub k: Vec3,
}

impl Basis {
    pub const IDENTITY: Basis = Basis {
        i: Vec3::X,
        j: Vec3::Y,
        k: Vec3::Z,
    };

    pub fn new(i: Vec3, j: Vec3, k: Vec3) -> Self {
        Self { i, j, k }
    }

    /// Frame of a rotation: the right/up/forward vectors of `quat`.
    ///
    /// The quaternion is renormalized first, so frames stay orthonormal even
    /// after long chains of incremental rotation composition.
    pub fn from_quat(quat: Quat) -> Self {
        let q = quat.normalize();
        Self {
            i: q * Vec3::X,
            j: q * Vec3::Y,
            k: q * Vec3::Z,
        }
    }

    /// Map a vector expressed in this frame into the parent frame.
    #[inline]
    pub fn resolve(&self, v: Vec3) -> Vec3 {
        self.i * v.x + self.j * v.y + self.k * v.z
    }

    /// Half-extent of the axial box enclosing a cube of half-width `half`
    /// oriented by this frame.
    #[inline]
    pub fn aabb_half_extent(&self, half: f32) -> Vec3 {
        (self.i.abs() + self.j.abs() + self.k.abs()) * half
    }

    pub fn is_finite(&self) -> bool {
        self.i.is_finite() && self.j.is_finite() && self.k.is_finite()
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::IDENTITY
    }
}
