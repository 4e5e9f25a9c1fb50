use super::ids::ParticleId;
use thiserror::Error;

/// A directed triple of bonded particles.
///
/// The triple defines the direction from `i` to `k`; kernels acting on it treat `j`
/// as the member the direction is attached to. `angle_type` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AngleTriple {
    pub i: ParticleId,
    pub j: ParticleId,
    pub k: ParticleId,
    pub angle_type: u32,
}

impl AngleTriple {
    pub fn new(i: ParticleId, j: ParticleId, k: ParticleId, angle_type: u32) -> Self {
        Self {
            i,
            j,
            k,
            angle_type,
        }
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.i == id || self.j == id || self.k == id
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Angle references a particle that does not exist")]
    UnknownParticle,
    #[error("Angle type {angle_type} is outside the valid range 1..={num_types}")]
    InvalidAngleType { angle_type: u32, num_types: u32 },
}
