//! # Engine Module
//!
//! Per-timestep kernels that advance a [`ParticleSystem`](crate::core::models::system::ParticleSystem)
//! in time and act on it between steps.
//!
//! ## Overview
//!
//! A host loop drives the kernels through two hooks. [`TimeIntegrator`](fix::TimeIntegrator)
//! implementations move particles during the first half of a step, and
//! [`ForceModifier`](fix::ForceModifier) implementations add forces after the regular
//! force evaluation, optionally feeding a [`VirialTally`](virial::VirialTally).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Token parsing and validated kernel parameters
//! - **Hooks** ([`fix`]) - The integrator and force-modifier traits plus the step context
//! - **Brownian Base** ([`brownian`]) - Noise prefactors, timestep bookkeeping and the random stream
//! - **Chiral Sphere** ([`chiral_sphere`]) - Overdamped translation and chiral dipole rotation
//! - **Propulsion** ([`propulsion`]) - Constant-magnitude drive along angle-triple tangents
//! - **Virial** ([`virial`]) - Six-component virial accumulation, global and per particle
//! - **Error Handling** ([`error`]) - Configuration and precondition failures
//!
//! ## Parallelism
//!
//! With the `parallel` feature the propulsion kernel evaluates angle triples on the
//! rayon pool and applies the results serially, so forces and virial sums do not
//! depend on scheduling.

pub mod brownian;
pub mod chiral_sphere;
pub mod config;
pub mod error;
pub mod fix;
pub mod propulsion;
pub mod virial;
