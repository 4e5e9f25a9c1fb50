use chiralbd::core::models::ids::ParticleId;
use chiralbd::core::models::system::ParticleSystem;
use chiralbd::engine::chiral_sphere::ChiralSphereIntegrator;
use chiralbd::engine::fix::StepContext;
use chiralbd::engine::propulsion::TangentialPropulsion;

/// Everything the host loop needs, resolved and validated from a run file.
pub struct RunSetup {
    pub system: ParticleSystem,
    /// Particle ids in run-file order, used as trajectory indices.
    pub ids: Vec<ParticleId>,
    pub integrator: ChiralSphereIntegrator,
    pub propulsion: Option<TangentialPropulsion>,
    pub context: StepContext,
    pub steps: u64,
    pub output_every: u64,
}
