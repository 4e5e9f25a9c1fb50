use crate::core::models::ids::ParticleId;
use nalgebra::{Point3, Vector3};
use slotmap::SecondaryMap;
use std::ops::{Add, AddAssign};

/// Symmetric-order virial components `[xx, yy, zz, xy, xz, yz]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Virial {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl Virial {
    /// Virial of a single force acting at an (unwrapped) position.
    pub fn from_force_at(force: &Vector3<f64>, position: &Point3<f64>) -> Self {
        Self {
            xx: force.x * position.x,
            yy: force.y * position.y,
            zz: force.z * position.z,
            xy: force.x * position.y,
            xz: force.x * position.z,
            yz: force.y * position.z,
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.xx, self.yy, self.zz, self.xy, self.xz, self.yz]
    }

    /// Trace of the tensor, the quantity entering the scalar pressure.
    pub fn trace(&self) -> f64 {
        self.xx + self.yy + self.zz
    }
}

impl Add for Virial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            xx: self.xx + rhs.xx,
            yy: self.yy + rhs.yy,
            zz: self.zz + rhs.zz,
            xy: self.xy + rhs.xy,
            xz: self.xz + rhs.xz,
            yz: self.yz + rhs.yz,
        }
    }
}

impl AddAssign for Virial {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Running virial sum of one worker for one step.
///
/// Passing a tally to a force kernel is how the host requests virial accumulation
/// for a step. The global sum is always kept; the per-particle breakdown only when
/// created with [`VirialTally::with_per_particle`].
#[derive(Debug, Clone, Default)]
pub struct VirialTally {
    global: Virial,
    per_particle: Option<SecondaryMap<ParticleId, Virial>>,
}

impl VirialTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_per_particle() -> Self {
        Self {
            global: Virial::default(),
            per_particle: Some(SecondaryMap::new()),
        }
    }

    /// Adds a contribution attributed to `particle`.
    pub fn tally(&mut self, particle: ParticleId, contribution: Virial) {
        self.global += contribution;
        if let Some(per_particle) = self.per_particle.as_mut() {
            match per_particle.get_mut(particle) {
                Some(entry) => *entry += contribution,
                None => {
                    per_particle.insert(particle, contribution);
                }
            }
        }
    }

    pub fn global(&self) -> Virial {
        self.global
    }

    /// Per-particle virial, or `None` if not tracked or nothing was tallied for it.
    pub fn particle(&self, particle: ParticleId) -> Option<Virial> {
        self.per_particle
            .as_ref()
            .and_then(|map| map.get(particle).copied())
    }

    pub fn tracks_per_particle(&self) -> bool {
        self.per_particle.is_some()
    }

    /// Folds another worker's tally into this one.
    pub fn merge(&mut self, other: &VirialTally) {
        self.global += other.global;
        if let (Some(mine), Some(theirs)) = (self.per_particle.as_mut(), other.per_particle.as_ref()) {
            for (id, contribution) in theirs.iter() {
                match mine.get_mut(id) {
                    Some(entry) => *entry += *contribution,
                    None => {
                        mine.insert(id, *contribution);
                    }
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.global = Virial::default();
        if let Some(per_particle) = self.per_particle.as_mut() {
            per_particle.clear();
        }
    }
}
