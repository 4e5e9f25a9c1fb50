//! # Core Module
//!
//! Stateless building blocks shared by the simulation kernels: the particle data
//! model, the simulation domain, unit conversion factors, and the worker-local random
//! stream.
//!
//! - **Particle State** ([`models`]) - Particles, group masks, angle triples and the particle store
//! - **Domain** ([`domain`]) - Dimensionality and the periodic simulation box
//! - **Units** ([`units`]) - Boltzmann constant and conversion factors per unit style
//! - **Randomness** ([`random`]) - Seeded, reproducible deviates and noise models

pub mod domain;
pub mod models;
pub mod random;
pub mod units;
