//! Contracts between the host step loop and the kernels plugged into it.
//!
//! A host drives each step as
//!
//! 1. [`TimeIntegrator::initial_integrate`] on every integrator,
//! 2. clear forces and torques,
//! 3. [`ForceModifier::post_force`] on every force modifier, optionally with a
//!    [`VirialTally`] when this step's virial is requested.
//!
//! `init` is called once before the run and `setup` once after it, before the first
//! step. [`TimeIntegrator::reset_dt`] is called whenever the host changes its timestep.

use super::error::EngineError;
use super::virial::VirialTally;
use crate::core::models::system::ParticleSystem;
use crate::core::units::UnitStyle;

/// Host quantities a kernel needs at initialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    pub dt: f64,
    pub units: UnitStyle,
}

impl StepContext {
    pub fn new(dt: f64, units: UnitStyle) -> Self {
        Self { dt, units }
    }
}

pub trait TimeIntegrator {
    /// Validates the system against the kernel's requirements and derives every
    /// timestep-dependent prefactor.
    fn init(&mut self, system: &ParticleSystem, ctx: &StepContext) -> Result<(), EngineError>;

    /// Rescales the timestep-dependent prefactors for a new timestep.
    fn reset_dt(&mut self, dt: f64);

    /// Advances every participating particle by one step.
    fn initial_integrate(&mut self, system: &mut ParticleSystem);
}

pub trait ForceModifier {
    fn init(&mut self, system: &ParticleSystem) -> Result<(), EngineError>;

    /// Populates forces before the first step.
    fn setup(&mut self, system: &mut ParticleSystem, virial: Option<&mut VirialTally>) {
        self.post_force(system, virial);
    }

    /// Adds this modifier's forces to the accumulated forces.
    fn post_force(&mut self, system: &mut ParticleSystem, virial: Option<&mut VirialTally>);
}
