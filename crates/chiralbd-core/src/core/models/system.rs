use super::ids::ParticleId;
use super::particle::Particle;
use super::topology::{AngleTriple, TopologyError};
use crate::core::domain::{Dimension, SimulationBox};
use slotmap::SlotMap;

/// Per-particle attributes the store carries beyond the basic kinematic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleAttributes {
    /// Whether particles carry a meaningful orientation (dipole) vector.
    pub dipole: bool,
}

/// In-memory particle store with its bonded angle topology.
///
/// This is the state both kernels read and write. Particles are addressed through
/// stable [`ParticleId`] keys, which angle triples refer to.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: SlotMap<ParticleId, Particle>,
    attributes: ParticleAttributes,
    dimension: Dimension,
    sim_box: SimulationBox,
    angles: Vec<AngleTriple>,
    num_angle_types: u32,
}

impl ParticleSystem {
    pub fn new(dimension: Dimension, sim_box: SimulationBox, attributes: ParticleAttributes) -> Self {
        Self {
            particles: SlotMap::with_key(),
            attributes,
            dimension,
            sim_box,
            angles: Vec::new(),
            num_angle_types: 0,
        }
    }

    pub fn add_particle(&mut self, particle: Particle) -> ParticleId {
        self.particles.insert(particle)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    pub fn particles_iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter()
    }

    pub fn particles_iter_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut Particle)> {
        self.particles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn attributes(&self) -> ParticleAttributes {
        self.attributes
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn sim_box(&self) -> &SimulationBox {
        &self.sim_box
    }

    /// Declares how many angle types the topology may use.
    pub fn set_num_angle_types(&mut self, num_types: u32) {
        self.num_angle_types = num_types;
    }

    pub fn num_angle_types(&self) -> u32 {
        self.num_angle_types
    }

    /// Adds an angle triple after checking that its members exist and its type is
    /// within the declared range.
    pub fn add_angle(&mut self, angle: AngleTriple) -> Result<(), TopologyError> {
        if [angle.i, angle.j, angle.k]
            .iter()
            .any(|&id| !self.particles.contains_key(id))
        {
            return Err(TopologyError::UnknownParticle);
        }
        if angle.angle_type < 1 || angle.angle_type > self.num_angle_types {
            return Err(TopologyError::InvalidAngleType {
                angle_type: angle.angle_type,
                num_types: self.num_angle_types,
            });
        }
        self.angles.push(angle);
        Ok(())
    }

    pub fn angles(&self) -> &[AngleTriple] {
        &self.angles
    }

    /// Zeroes every force and torque, ready for a new force evaluation.
    pub fn clear_forces(&mut self) {
        for particle in self.particles.values_mut() {
            particle.force.fill(0.0);
            particle.torque.fill(0.0);
        }
    }

    /// Wraps all positions back into the periodic box.
    pub fn remap_into_box(&mut self) {
        let sim_box = &self.sim_box;
        for particle in self.particles.values_mut() {
            sim_box.remap(&mut particle.position, &mut particle.image);
        }
    }
}
