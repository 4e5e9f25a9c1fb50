//! # chiralbd
//!
//! Kernels for overdamped active-matter simulation: a chiral Brownian integrator for
//! finite-size spheres carrying an orientation dipole, and a tangential self-propulsion
//! force acting on bonded angle triples.
//!
//! ## Layout
//!
//! - [`core`]: Stateless data. Particles and their store, the periodic simulation box,
//!   unit styles and the seeded random stream.
//!
//! - [`engine`]: The stateful kernels. Integrators and force modifiers plug into a host
//!   loop through the traits in [`engine::fix`]; parameters are validated up front in
//!   [`engine::config`] so a kernel that constructs successfully can always step.

pub mod core;
pub mod engine;
