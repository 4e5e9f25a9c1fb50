use super::config::BrownianParams;
use super::error::ConfigError;
use crate::core::random::RandomStream;
use crate::core::units::UnitStyle;
use tracing::debug;

/// Step prefactors of the overdamped update.
///
/// `g1` converts force into displacement rate, `g2` is the translational noise
/// amplitude, `g3` converts torque into angular velocity and `g4` is the rotational
/// noise amplitude. Both noise amplitudes scale as `dt^-1/2`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoisePrefactors {
    pub g1: f64,
    pub g2: f64,
    pub g3: f64,
    pub g4: f64,
}

/// Shared state of the chiral Brownian integrators: parameters, timestep, the
/// worker-local random stream and the prefactors derived from them.
#[derive(Debug, Clone)]
pub struct BrownianBase {
    params: BrownianParams,
    stream: RandomStream,
    dt: f64,
    sqrtdt: f64,
    prefactors: NoisePrefactors,
}

impl BrownianBase {
    /// Creates the base state, seeding the random stream with `seed + rank`.
    pub fn new(params: BrownianParams, rank: u64) -> Self {
        let stream = RandomStream::new(params.seed, rank);
        Self {
            params,
            stream,
            dt: 0.0,
            sqrtdt: 0.0,
            prefactors: NoisePrefactors::default(),
        }
    }

    /// Sets the timestep and the unscaled translational prefactors:
    /// `g1 = ftm2v`, `g2 = sqrt(2 kB / (dt mvv2e))`.
    ///
    /// Integrators scale these further by their damping and temperatures.
    pub fn on_init(&mut self, dt: f64, units: &UnitStyle) -> Result<(), ConfigError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(ConfigError::InvalidTimestep(dt));
        }
        self.dt = dt;
        self.sqrtdt = dt.sqrt();
        self.prefactors = NoisePrefactors {
            g1: units.ftm2v,
            g2: (2.0 * units.boltz / dt / units.mvv2e).sqrt(),
            g3: 0.0,
            g4: 0.0,
        };
        debug!(
            dt,
            g1 = self.prefactors.g1,
            g2 = self.prefactors.g2,
            units = units.name,
            "Initialized Brownian base prefactors."
        );
        Ok(())
    }

    /// Switches to a new timestep and rescales `g2` by `sqrt(dt_old / dt_new)`, which
    /// keeps the diffusion coefficient of the discretized process unchanged.
    ///
    /// Returns the applied ratio so integrators can rescale their own noise amplitudes.
    pub fn on_timestep_change(&mut self, dt: f64) -> f64 {
        debug_assert!(dt > 0.0, "timestep must be positive");
        let sqrtdt_old = self.sqrtdt;
        self.dt = dt;
        self.sqrtdt = dt.sqrt();
        let ratio = sqrtdt_old / self.sqrtdt;
        self.prefactors.g2 *= ratio;
        debug!(dt, g2 = self.prefactors.g2, "Rescaled translational noise amplitude.");
        ratio
    }

    pub fn params(&self) -> &BrownianParams {
        &self.params
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn sqrtdt(&self) -> f64 {
        self.sqrtdt
    }

    pub fn prefactors(&self) -> NoisePrefactors {
        self.prefactors
    }

    pub(crate) fn prefactors_mut(&mut self) -> &mut NoisePrefactors {
        &mut self.prefactors
    }

    pub(crate) fn stream_mut(&mut self) -> &mut RandomStream {
        &mut self.stream
    }
}
