//! # Core Models Module
//!
//! Data structures describing the particle state the kernels operate on.
//!
//! ## Key Components
//!
//! - [`particle`] - Per-particle kinematic state, orientation and group membership
//! - [`topology`] - Bonded angle triples
//! - [`system`] - The particle store together with its topology and box
//! - [`ids`] - Stable particle identifiers
//!
//! ## Usage
//!
//! ```ignore
//! use chiralbd::core::domain::{Dimension, SimulationBox};
//! use chiralbd::core::models::particle::Particle;
//! use chiralbd::core::models::system::{ParticleAttributes, ParticleSystem};
//!
//! let mut system = ParticleSystem::new(
//!     Dimension::Three,
//!     SimulationBox::default(),
//!     ParticleAttributes { dipole: true },
//! );
//! let id = system.add_particle(Particle::new(Point3::origin()).with_dipole(Vector3::x()));
//! ```

pub mod ids;
pub mod particle;
pub mod system;
pub mod topology;
