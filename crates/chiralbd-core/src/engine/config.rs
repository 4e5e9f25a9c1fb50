use super::error::ConfigError;
use crate::core::domain::Dimension;
use crate::core::random::NoiseModel;
use nalgebra::Vector3;

const BROWNIAN_COMMAND: &str = "chiral/brownian/sphere";
const BROWNIAN_USAGE: &str = "temperature seed chiral mx my mz [gamma_t value] [gamma_r value] \
                              [rotation_temp value] [planar_rotation] [rng gaussian|uniform|none]";
const PROPULSION_COMMAND: &str = "tangential/propel";

/// Physical parameters of the chiral Brownian integrators.
#[derive(Debug, Clone, PartialEq)]
pub struct BrownianParams {
    /// Target temperature of the translational noise.
    pub temperature: f64,
    /// Base seed; each worker offsets it by its rank.
    pub seed: u64,
    /// Mean of the rotational noise, per axis. A non-zero mean drives persistent rotation.
    pub chirality: Vector3<f64>,
    /// Isotropic translational damping.
    pub gamma_t: Option<f64>,
    /// Isotropic rotational damping.
    pub gamma_r: Option<f64>,
    /// Temperature of the rotational noise; falls back to `temperature`.
    pub rotation_temperature: Option<f64>,
    /// Restrict rotation to the z axis in a 3D simulation.
    pub planar_rotation: bool,
    pub noise: NoiseModel,
}

impl BrownianParams {
    /// Parses the flat argument list of the integrator command.
    ///
    /// ```text
    /// temperature seed chiral mx my mz [gamma_t v] [gamma_r v] [rotation_temp v]
    ///     [planar_rotation] [rng gaussian|uniform|none]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for missing or malformed arguments, unknown keywords,
    /// non-positive values, or `planar_rotation` in a 2D simulation.
    pub fn from_tokens(tokens: &[&str], dimension: Dimension) -> Result<Self, ConfigError> {
        if tokens.len() < 6 {
            return Err(ConfigError::MissingArguments {
                command: BROWNIAN_COMMAND,
                usage: BROWNIAN_USAGE,
            });
        }

        let temperature = parse_f64("temperature", tokens[0])?;
        let seed = parse_i64("seed", tokens[1])?;
        if seed <= 0 {
            return Err(ConfigError::InvalidSeed(seed));
        }
        if tokens[2] != "chiral" {
            return Err(ConfigError::MissingChiralKeyword(tokens[2].to_string()));
        }
        let chirality = Vector3::new(
            parse_f64("chiral mean x", tokens[3])?,
            parse_f64("chiral mean y", tokens[4])?,
            parse_f64("chiral mean z", tokens[5])?,
        );

        let mut builder = BrownianParamsBuilder::new()
            .temperature(temperature)
            .seed(seed as u64)
            .chirality(chirality);

        let mut rest = tokens[6..].iter().copied();
        while let Some(keyword) = rest.next() {
            builder = match keyword {
                "gamma_t" => builder.gamma_t(parse_f64("gamma_t", keyword_value(keyword, rest.next())?)?),
                "gamma_r" => builder.gamma_r(parse_f64("gamma_r", keyword_value(keyword, rest.next())?)?),
                "rotation_temp" => builder.rotation_temperature(parse_f64(
                    "rotation_temp",
                    keyword_value(keyword, rest.next())?,
                )?),
                "planar_rotation" => builder.planar_rotation(true),
                "rng" => builder.noise(keyword_value(keyword, rest.next())?.parse()?),
                other => return Err(ConfigError::UnknownKeyword(other.to_string())),
            };
        }

        builder.build(dimension)
    }

    /// Checks every numeric constraint and the dimensional consistency of the flags.
    pub fn validate(&self, dimension: Dimension) -> Result<(), ConfigError> {
        require_positive("temperature", self.temperature)?;
        if self.seed == 0 {
            return Err(ConfigError::InvalidSeed(0));
        }
        if let Some(gamma_t) = self.gamma_t {
            require_positive("gamma_t", gamma_t)?;
        }
        if let Some(gamma_r) = self.gamma_r {
            require_positive("gamma_r", gamma_r)?;
        }
        if let Some(rot_temp) = self.rotation_temperature {
            require_positive("rotation_temp", rot_temp)?;
        }
        if self.planar_rotation && dimension == Dimension::Two {
            return Err(ConfigError::PlanarRotationIn2D);
        }
        Ok(())
    }

    pub fn effective_rotation_temperature(&self) -> f64 {
        self.rotation_temperature.unwrap_or(self.temperature)
    }
}

#[derive(Default)]
pub struct BrownianParamsBuilder {
    temperature: Option<f64>,
    seed: Option<u64>,
    chirality: Option<Vector3<f64>>,
    gamma_t: Option<f64>,
    gamma_r: Option<f64>,
    rotation_temperature: Option<f64>,
    planar_rotation: bool,
    noise: NoiseModel,
}

impl BrownianParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn chirality(mut self, mean: Vector3<f64>) -> Self {
        self.chirality = Some(mean);
        self
    }
    pub fn gamma_t(mut self, gamma_t: f64) -> Self {
        self.gamma_t = Some(gamma_t);
        self
    }
    pub fn gamma_r(mut self, gamma_r: f64) -> Self {
        self.gamma_r = Some(gamma_r);
        self
    }
    pub fn rotation_temperature(mut self, temperature: f64) -> Self {
        self.rotation_temperature = Some(temperature);
        self
    }
    pub fn planar_rotation(mut self, enabled: bool) -> Self {
        self.planar_rotation = enabled;
        self
    }
    pub fn noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    pub fn build(self, dimension: Dimension) -> Result<BrownianParams, ConfigError> {
        let params = BrownianParams {
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
            chirality: self
                .chirality
                .ok_or(ConfigError::MissingParameter("chiral"))?,
            gamma_t: self.gamma_t,
            gamma_r: self.gamma_r,
            rotation_temperature: self.rotation_temperature,
            planar_rotation: self.planar_rotation,
            noise: self.noise,
        };
        params.validate(dimension)?;
        Ok(params)
    }
}

/// Parameters of the tangential self-propulsion force.
#[derive(Debug, Clone, PartialEq)]
pub struct PropulsionParams {
    /// Magnitude of the force applied along the tangent.
    pub magnitude: f64,
    /// Angle type the force acts on. Checked against the topology at init.
    pub angle_type: i64,
}

impl PropulsionParams {
    /// Parses `magnitude angle_type`.
    pub fn from_tokens(tokens: &[&str]) -> Result<Self, ConfigError> {
        if tokens.len() != 2 {
            return Err(ConfigError::WrongArgumentCount {
                command: PROPULSION_COMMAND,
                expected: 2,
                found: tokens.len(),
            });
        }
        Ok(Self {
            magnitude: parse_f64("magnitude", tokens[0])?,
            angle_type: parse_i64("angle_type", tokens[1])?,
        })
    }
}

fn parse_f64(name: &'static str, token: &str) -> Result<f64, ConfigError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidNumber {
            name,
            value: token.to_string(),
        })
}

fn parse_i64(name: &'static str, token: &str) -> Result<i64, ConfigError> {
    token.parse::<i64>().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: token.to_string(),
    })
}

fn keyword_value<'a>(keyword: &str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingKeywordValue(keyword.to_string()))
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn from_tokens_parses_minimal_command() {
        let params =
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0 0.5"), Dimension::Three)
                .unwrap();
        assert_eq!(params.temperature, 1.0);
        assert_eq!(params.seed, 42);
        assert_eq!(params.chirality, Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(params.gamma_t, None);
        assert_eq!(params.gamma_r, None);
        assert!(!params.planar_rotation);
        assert_eq!(params.noise, NoiseModel::Gaussian);
    }

    #[test]
    fn from_tokens_parses_all_keywords() {
        let params = BrownianParams::from_tokens(
            &tokens(
                "2.0 7 chiral 0.1 0.2 0.3 gamma_t 3.0 gamma_r 4.0 rotation_temp 5.0 planar_rotation rng uniform",
            ),
            Dimension::Three,
        )
        .unwrap();
        assert_eq!(params.gamma_t, Some(3.0));
        assert_eq!(params.gamma_r, Some(4.0));
        assert_eq!(params.rotation_temperature, Some(5.0));
        assert_eq!(params.effective_rotation_temperature(), 5.0);
        assert!(params.planar_rotation);
        assert_eq!(params.noise, NoiseModel::Uniform);
    }

    #[test]
    fn rotation_temperature_defaults_to_temperature() {
        let params =
            BrownianParams::from_tokens(&tokens("1.5 1 chiral 0 0 0"), Dimension::Three).unwrap();
        assert_eq!(params.effective_rotation_temperature(), 1.5);
    }

    #[test]
    fn from_tokens_rejects_too_few_arguments() {
        let result = BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0"), Dimension::Three);
        assert!(matches!(result, Err(ConfigError::MissingArguments { .. })));
    }

    #[test]
    fn from_tokens_rejects_non_positive_temperature_and_seed() {
        assert_eq!(
            BrownianParams::from_tokens(&tokens("0.0 42 chiral 0 0 0"), Dimension::Three),
            Err(ConfigError::NonPositive {
                name: "temperature",
                value: 0.0
            })
        );
        assert_eq!(
            BrownianParams::from_tokens(&tokens("1.0 -3 chiral 0 0 0"), Dimension::Three),
            Err(ConfigError::InvalidSeed(-3))
        );
        assert_eq!(
            BrownianParams::from_tokens(&tokens("1.0 0 chiral 0 0 0"), Dimension::Three),
            Err(ConfigError::InvalidSeed(0))
        );
    }

    #[test]
    fn from_tokens_requires_chiral_keyword() {
        assert_eq!(
            BrownianParams::from_tokens(&tokens("1.0 42 gamma_t 1 1 1"), Dimension::Three),
            Err(ConfigError::MissingChiralKeyword("gamma_t".to_string()))
        );
    }

    #[test]
    fn from_tokens_rejects_malformed_numbers() {
        assert_eq!(
            BrownianParams::from_tokens(&tokens("hot 42 chiral 0 0 0"), Dimension::Three),
            Err(ConfigError::InvalidNumber {
                name: "temperature",
                value: "hot".to_string()
            })
        );
        assert!(matches!(
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 nan 0"), Dimension::Three),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn from_tokens_rejects_non_positive_damping() {
        assert_eq!(
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0 0 gamma_t -1"), Dimension::Three),
            Err(ConfigError::NonPositive {
                name: "gamma_t",
                value: -1.0
            })
        );
        assert!(matches!(
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0 0 gamma_r 0"), Dimension::Three),
            Err(ConfigError::NonPositive { name: "gamma_r", .. })
        ));
        assert!(matches!(
            BrownianParams::from_tokens(
                &tokens("1.0 42 chiral 0 0 0 rotation_temp 0"),
                Dimension::Three
            ),
            Err(ConfigError::NonPositive {
                name: "rotation_temp",
                ..
            })
        ));
    }

    #[test]
    fn from_tokens_rejects_keyword_without_value() {
        assert_eq!(
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0 0 gamma_t"), Dimension::Three),
            Err(ConfigError::MissingKeywordValue("gamma_t".to_string()))
        );
    }

    #[test]
    fn from_tokens_rejects_unknown_keyword() {
        assert_eq!(
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0 0 mass 2"), Dimension::Three),
            Err(ConfigError::UnknownKeyword("mass".to_string()))
        );
    }

    #[test]
    fn from_tokens_rejects_unknown_noise_model() {
        assert!(matches!(
            BrownianParams::from_tokens(&tokens("1.0 42 chiral 0 0 0 rng pink"), Dimension::Three),
            Err(ConfigError::NoiseModel(_))
        ));
    }

    #[test]
    fn planar_rotation_is_rejected_in_two_dimensions() {
        assert_eq!(
            BrownianParams::from_tokens(
                &tokens("1.0 42 chiral 0 0 1 planar_rotation"),
                Dimension::Two
            ),
            Err(ConfigError::PlanarRotationIn2D)
        );
        assert!(
            BrownianParams::from_tokens(
                &tokens("1.0 42 chiral 0 0 1 planar_rotation"),
                Dimension::Three
            )
            .is_ok()
        );
    }

    #[test]
    fn builder_reports_first_missing_parameter() {
        let result = BrownianParamsBuilder::new()
            .temperature(1.0)
            .seed(3)
            .build(Dimension::Three);
        assert_eq!(result, Err(ConfigError::MissingParameter("chiral")));

        let result = BrownianParamsBuilder::new().build(Dimension::Three);
        assert_eq!(result, Err(ConfigError::MissingParameter("temperature")));
    }

    #[test]
    fn builder_rejects_zero_seed() {
        let result = BrownianParamsBuilder::new()
            .temperature(1.0)
            .seed(0)
            .chirality(Vector3::zeros())
            .build(Dimension::Three);
        assert_eq!(result, Err(ConfigError::InvalidSeed(0)));
    }

    #[test]
    fn propulsion_from_tokens_parses_magnitude_and_type() {
        let params = PropulsionParams::from_tokens(&["2.5", "3"]).unwrap();
        assert_eq!(params.magnitude, 2.5);
        assert_eq!(params.angle_type, 3);
    }

    #[test]
    fn propulsion_from_tokens_requires_exactly_two_arguments() {
        assert_eq!(
            PropulsionParams::from_tokens(&["2.5"]),
            Err(ConfigError::WrongArgumentCount {
                command: PROPULSION_COMMAND,
                expected: 2,
                found: 1
            })
        );
        assert!(PropulsionParams::from_tokens(&["2.5", "1", "extra"]).is_err());
    }

    #[test]
    fn propulsion_from_tokens_rejects_non_integer_type() {
        assert!(matches!(
            PropulsionParams::from_tokens(&["2.5", "1.5"]),
            Err(ConfigError::InvalidNumber {
                name: "angle_type",
                ..
            })
        ));
    }
}
