use super::defaults::DefaultsConfig;
use super::FileConfig;
use super::file::{FileKernelConfig, FileParticle};
use super::models::RunSetup;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use chiralbd::core::domain::SimulationBox;
use chiralbd::core::models::ids::ParticleId;
use chiralbd::core::models::particle::{GroupMask, Particle};
use chiralbd::core::models::system::{ParticleAttributes, ParticleSystem};
use chiralbd::core::models::topology::AngleTriple;
use chiralbd::core::units::UnitStyle;
use chiralbd::engine::chiral_sphere::ChiralSphereIntegrator;
use chiralbd::engine::config::{BrownianParams, PropulsionParams};
use chiralbd::engine::fix::StepContext;
use chiralbd::engine::propulsion::TangentialPropulsion;
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Parses a run file from disk and resolves it, applying command-line overrides.
pub fn build_run(args: &RunArgs) -> Result<RunSetup> {
    let file_config = FileConfig::from_file(&args.config)?;
    build_from_file(file_config, args.steps, args.seed)
}

pub fn build_from_file(
    file_config: FileConfig,
    steps_override: Option<u64>,
    seed_override: Option<u64>,
) -> Result<RunSetup> {
    let defaults = DefaultsConfig::default();
    let sim = file_config.simulation;

    let units: UnitStyle = sim.units.as_deref().unwrap_or(defaults.units).parse()?;
    let timestep = sim.timestep.unwrap_or(defaults.timestep);
    let steps = steps_override.unwrap_or(sim.steps);
    let output_every = sim.output_every.unwrap_or(defaults.output_every);
    if output_every == 0 {
        return Err(CliError::Config(
            "simulation.output-every must be at least 1".to_string(),
        ));
    }
    let rank = sim.rank.unwrap_or(defaults.rank);

    let lo = Point3::from(sim.sim_box.lo);
    let hi = Point3::from(sim.sim_box.hi);
    if (0..3).any(|axis| hi[axis] <= lo[axis]) {
        return Err(CliError::Config(format!(
            "simulation box has non-positive extent: lo = {:?}, hi = {:?}",
            sim.sim_box.lo, sim.sim_box.hi
        )));
    }
    let sim_box = SimulationBox::new(lo, hi).with_periodicity(sim.sim_box.periodic.unwrap_or([true; 3]));

    let attributes = ParticleAttributes {
        dipole: file_config.particles.iter().any(|p| p.dipole.is_some()),
    };
    let mut system = ParticleSystem::new(sim.dimension, sim_box, attributes);
    system.set_num_angle_types(sim.angle_types);

    let ids = file_config
        .particles
        .iter()
        .map(|p| Ok(system.add_particle(to_particle(p)?)))
        .collect::<Result<Vec<ParticleId>>>()?;

    for (n, angle) in file_config.angles.iter().enumerate() {
        let lookup = |index: usize| {
            ids.get(index).copied().ok_or_else(|| {
                CliError::Config(format!(
                    "angle {} refers to particle {} but only {} particles are defined",
                    n + 1,
                    index,
                    ids.len()
                ))
            })
        };
        let triple = AngleTriple::new(lookup(angle.i)?, lookup(angle.j)?, lookup(angle.k)?, angle.angle_type);
        system.add_angle(triple)?;
    }

    let mut params = BrownianParams::from_tokens(&file_config.integrator.tokens(), sim.dimension)?;
    if let Some(seed) = seed_override {
        params.seed = seed;
    }
    let integrator = ChiralSphereIntegrator::new(
        params,
        kernel_group(&file_config.integrator)?,
        sim.dimension,
        rank,
    )?;

    let propulsion = file_config
        .propulsion
        .as_ref()
        .map(|kernel| -> Result<TangentialPropulsion> {
            let params = PropulsionParams::from_tokens(&kernel.tokens())?;
            Ok(TangentialPropulsion::new(params, kernel_group(kernel)?))
        })
        .transpose()?;

    debug!(
        particles = ids.len(),
        angles = system.angles().len(),
        units = units.name,
        timestep,
        steps,
        "Run description resolved."
    );

    Ok(RunSetup {
        system,
        ids,
        integrator,
        propulsion,
        context: StepContext::new(timestep, units),
        steps,
        output_every,
    })
}

fn group_bit(index: u32) -> Result<GroupMask> {
    GroupMask::bit(index).ok_or_else(|| {
        CliError::Config(format!(
            "group index {} exceeds the maximum of {}",
            index,
            GroupMask::MAX_GROUPS - 1
        ))
    })
}

fn kernel_group(kernel: &FileKernelConfig) -> Result<GroupMask> {
    kernel.group.map_or(Ok(GroupMask::ALL), group_bit)
}

fn to_particle(p: &FileParticle) -> Result<Particle> {
    let mut particle = Particle::new(Point3::from(p.position));
    if let Some(dipole) = p.dipole {
        particle = particle.with_dipole(Vector3::from(dipole));
    }
    for &index in &p.groups {
        particle = particle.with_group(group_bit(index)?);
    }
    Ok(particle)
}
