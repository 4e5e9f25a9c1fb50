use super::brownian::{BrownianBase, NoisePrefactors};
use super::config::BrownianParams;
use super::error::{ConfigError, EngineError, PreconditionError};
use super::fix::{StepContext, TimeIntegrator};
use crate::core::domain::Dimension;
use crate::core::models::particle::{GroupMask, Particle};
use crate::core::models::system::ParticleSystem;
use crate::core::random::{NoiseModel, RandomStream};
use nalgebra::Vector3;
use tracing::{debug, info, instrument};

const KERNEL_NAME: &str = "chiral/brownian/sphere";

/// Geometric regime of the update, fixed when the integrator is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// 2D simulation: translation in xy, rotation about z.
    Planar2D,
    /// 3D translation with rotation restricted to the z axis.
    Planar3D,
    /// 3D translation and unrestricted rotation.
    Full3D,
}

impl RotationMode {
    pub fn resolve(dimension: Dimension, planar_rotation: bool) -> Self {
        match (dimension, planar_rotation) {
            (Dimension::Two, _) => Self::Planar2D,
            (Dimension::Three, true) => Self::Planar3D,
            (Dimension::Three, false) => Self::Full3D,
        }
    }
}

trait Regime {
    const TRANSLATE_Z: bool;
    const FREE_ROTATION: bool;
}

struct Planar2D;
struct Planar3D;
struct Full3D;

impl Regime for Planar2D {
    const TRANSLATE_Z: bool = false;
    const FREE_ROTATION: bool = false;
}

impl Regime for Planar3D {
    const TRANSLATE_Z: bool = true;
    const FREE_ROTATION: bool = false;
}

impl Regime for Full3D {
    const TRANSLATE_Z: bool = true;
    const FREE_ROTATION: bool = true;
}

/// Per-step constants of the update kernel, copied out of the integrator so the
/// random stream can be borrowed mutably inside the loop.
#[derive(Debug, Clone, Copy)]
struct StepConstants {
    dt: f64,
    prefactors: NoisePrefactors,
    chirality: Vector3<f64>,
    noise: NoiseModel,
}

/// Overdamped integrator for spherical particles carrying an orientation vector,
/// with a chiral bias on the rotational noise.
///
/// Each step a participating particle is displaced by
/// `dt * (g1 * f + g2 * xi)` and its orientation `u` is advanced by
/// `(omega x u) * dt` with `omega = g3 * torque + g4 * eta`, where `eta` has mean
/// equal to the chirality vector. The orientation is then renormalized, which
/// supplies the Ito drift that keeps it on the unit sphere, and rescaled to its
/// original length.
#[derive(Debug, Clone)]
pub struct ChiralSphereIntegrator {
    base: BrownianBase,
    group: GroupMask,
    dimension: Dimension,
    mode: RotationMode,
    gamma_t: f64,
    gamma_r: f64,
}

impl ChiralSphereIntegrator {
    /// Builds the integrator for `group` on the worker with the given `rank`.
    ///
    /// # Errors
    ///
    /// Fails if the parameters are invalid for `dimension` or if either damping
    /// coefficient is missing.
    pub fn new(
        params: BrownianParams,
        group: GroupMask,
        dimension: Dimension,
        rank: u64,
    ) -> Result<Self, ConfigError> {
        params.validate(dimension)?;
        let gamma_t = params.gamma_t.ok_or(ConfigError::MissingDamping("gamma_t"))?;
        let gamma_r = params.gamma_r.ok_or(ConfigError::MissingDamping("gamma_r"))?;
        let mode = RotationMode::resolve(dimension, params.planar_rotation);

        Ok(Self {
            base: BrownianBase::new(params, rank),
            group,
            dimension,
            mode,
            gamma_t,
            gamma_r,
        })
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    pub fn group(&self) -> GroupMask {
        self.group
    }

    pub fn prefactors(&self) -> NoisePrefactors {
        self.base.prefactors()
    }

    pub fn dt(&self) -> f64 {
        self.base.dt()
    }

    /// Derives all four prefactors for timestep `dt`.
    pub fn on_init(&mut self, ctx: &StepContext) -> Result<(), ConfigError> {
        self.base.on_init(ctx.dt, &ctx.units)?;
        let temperature = self.base.params().temperature;
        let rot_temperature = self.base.params().effective_rotation_temperature();
        let (gamma_t, gamma_r) = (self.gamma_t, self.gamma_r);

        let g = self.base.prefactors_mut();
        g.g3 = g.g1 / gamma_r;
        g.g4 = g.g2 * (rot_temperature / gamma_r).sqrt();
        g.g1 /= gamma_t;
        g.g2 *= (temperature / gamma_t).sqrt();

        debug!(
            g1 = g.g1,
            g2 = g.g2,
            g3 = g.g3,
            g4 = g.g4,
            "Derived chiral sphere prefactors."
        );
        Ok(())
    }

    /// Rescales both noise amplitudes for the new timestep.
    ///
    /// Unlike the base, which only touches `g2`, this also rescales the rotational
    /// amplitude `g4` by `sqrt(dt_old / dt_new)`, so rotational diffusion per unit time
    /// survives a timestep change as well. Hosts that rescale only `g2` will disagree
    /// with this after `reset_dt`.
    pub fn on_timestep_change(&mut self, dt: f64) {
        let ratio = self.base.on_timestep_change(dt);
        self.base.prefactors_mut().g4 *= ratio;
    }

    /// Advances every particle of the group by one step.
    pub fn update(&mut self, system: &mut ParticleSystem) {
        match self.mode {
            RotationMode::Planar2D => self.integrate::<Planar2D>(system),
            RotationMode::Planar3D => self.integrate::<Planar3D>(system),
            RotationMode::Full3D => self.integrate::<Full3D>(system),
        }
    }

    fn integrate<R: Regime>(&mut self, system: &mut ParticleSystem) {
        let constants = StepConstants {
            dt: self.base.dt(),
            prefactors: self.base.prefactors(),
            chirality: self.base.params().chirality,
            noise: self.base.params().noise,
        };
        let group = self.group;
        let stream = self.base.stream_mut();

        for (_, particle) in system.particles_iter_mut() {
            if particle.in_group(group) {
                step_particle::<R>(particle, &constants, stream);
            }
        }
    }
}

fn step_particle<R: Regime>(particle: &mut Particle, c: &StepConstants, stream: &mut RandomStream) {
    let NoisePrefactors { g1, g2, g3, g4 } = c.prefactors;
    let dt = c.dt;
    let f = particle.force;

    let dx = dt * (g1 * f.x + g2 * c.noise.draw(stream, 0.0));
    let dy = dt * (g1 * f.y + g2 * c.noise.draw(stream, 0.0));
    let dz = if R::TRANSLATE_Z {
        dt * (g1 * f.z + g2 * c.noise.draw(stream, 0.0))
    } else {
        0.0
    };

    let t = particle.torque;
    let omega = if R::FREE_ROTATION {
        Vector3::new(
            g3 * t.x + g4 * c.noise.draw(stream, c.chirality.x),
            g3 * t.y + g4 * c.noise.draw(stream, c.chirality.y),
            g3 * t.z + g4 * c.noise.draw(stream, c.chirality.z),
        )
    } else {
        Vector3::new(0.0, 0.0, g3 * t.z + g4 * c.noise.draw(stream, c.chirality.z))
    };

    let displacement = Vector3::new(dx, dy, dz);
    particle.position += displacement;
    particle.velocity = displacement / dt;

    if let Some(dipole) = rotate_orientation(&particle.dipole, &omega, dt) {
        particle.dipole = dipole;
    }
}

/// Rotates an orientation vector by angular velocity `omega` over `dt`, keeping its
/// length.
///
/// The unit direction takes a first-order step `u + (omega x u) dt` and is then
/// renormalized. Returns `None` for a zero-length vector, whose direction is
/// undefined.
pub fn rotate_orientation(
    orientation: &Vector3<f64>,
    omega: &Vector3<f64>,
    dt: f64,
) -> Option<Vector3<f64>> {
    let length = orientation.norm();
    if length == 0.0 {
        return None;
    }
    let u = orientation / length;
    let stepped = u + omega.cross(&u) * dt;
    Some(stepped.normalize() * length)
}

impl TimeIntegrator for ChiralSphereIntegrator {
    #[instrument(skip_all, name = "chiral_sphere_init")]
    fn init(&mut self, system: &ParticleSystem, ctx: &StepContext) -> Result<(), EngineError> {
        if !system.attributes().dipole {
            return Err(PreconditionError::MissingAttribute {
                kernel: KERNEL_NAME,
                attribute: "mu",
            }
            .into());
        }
        if system.dimension() != self.dimension {
            return Err(ConfigError::DimensionMismatch {
                configured: self.dimension.as_u8(),
                actual: system.dimension().as_u8(),
            }
            .into());
        }
        self.on_init(ctx)?;
        info!(
            mode = ?self.mode,
            dt = ctx.dt,
            "Chiral Brownian sphere integrator ready."
        );
        Ok(())
    }

    fn reset_dt(&mut self, dt: f64) {
        self.on_timestep_change(dt);
    }

    fn initial_integrate(&mut self, system: &mut ParticleSystem) {
        self.update(system);
    }
}
