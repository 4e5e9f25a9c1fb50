use nalgebra::{Point3, Vector3};
use std::ops::{BitOr, BitOrAssign};

/// Bit set describing which groups a particle belongs to.
///
/// A kernel is configured with a single group bit and only acts on particles whose
/// mask shares that bit. Bit 0 is reserved for the implicit "all" group that every
/// particle joins on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupMask(u32);

impl GroupMask {
    /// The group every particle belongs to.
    pub const ALL: Self = Self(1);
    /// The empty mask; nothing is a member.
    pub const NONE: Self = Self(0);
    /// Number of distinct group bits available.
    pub const MAX_GROUPS: u32 = 32;

    /// Returns the mask for the group with the given bit index.
    ///
    /// Returns `None` when `index` does not fit into the mask.
    pub fn bit(index: u32) -> Option<Self> {
        (index < Self::MAX_GROUPS).then(|| Self(1 << index))
    }

    #[inline]
    pub fn intersects(self, other: GroupMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for GroupMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for GroupMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for GroupMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Per-particle state shared between the host engine and the kernels.
///
/// The integrator writes `position`, `velocity` and `dipole`; the propulsion force
/// accumulates into `force`. `force` and `torque` are otherwise owned by the host,
/// which clears them at the start of every force evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Wrapped position inside the simulation box.
    pub position: Point3<f64>,
    /// Velocity, derived from the last overdamped displacement.
    pub velocity: Vector3<f64>,
    /// Accumulated force for the current step.
    pub force: Vector3<f64>,
    /// Accumulated torque for the current step.
    pub torque: Vector3<f64>,
    /// Orientation vector. Its direction is dynamical, its length is conserved.
    pub dipole: Vector3<f64>,
    /// Periodic image counters used to unwrap `position`.
    pub image: Vector3<i32>,
    /// Group membership.
    pub mask: GroupMask,
}

impl Particle {
    /// Creates a resting particle at `position` with a zero dipole, belonging only to
    /// [`GroupMask::ALL`].
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
            dipole: Vector3::zeros(),
            image: Vector3::zeros(),
            mask: GroupMask::ALL,
        }
    }

    pub fn with_dipole(mut self, dipole: Vector3<f64>) -> Self {
        self.dipole = dipole;
        self
    }

    pub fn with_group(mut self, group: GroupMask) -> Self {
        self.mask |= group;
        self
    }

    #[inline]
    pub fn in_group(&self, group: GroupMask) -> bool {
        self.mask.intersects(group)
    }
}
