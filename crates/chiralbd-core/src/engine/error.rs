use crate::core::random::UnknownNoiseModelError;
use thiserror::Error;

/// Invalid or incomplete kernel configuration. Always raised during setup.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing arguments for {command}; usage: {usage}")]
    MissingArguments {
        command: &'static str,
        usage: &'static str,
    },

    #[error("Expected exactly {expected} arguments for {command}, found {found}")]
    WrongArgumentCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid numeric value '{value}' for {name}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Seed must be > 0, got {0}")]
    InvalidSeed(i64),

    #[error("Expected 'chiral' keyword, found '{0}'")]
    MissingChiralKeyword(String),

    #[error("The planar_rotation keyword is not allowed for 2D simulations")]
    PlanarRotationIn2D,

    #[error("Missing required damping coefficient '{0}'")]
    MissingDamping(&'static str),

    #[error("Keyword '{0}' requires a value")]
    MissingKeywordValue(String),

    #[error("Unknown keyword '{0}'")]
    UnknownKeyword(String),

    #[error(transparent)]
    NoiseModel(#[from] UnknownNoiseModelError),

    #[error("Invalid angle type {angle_type}: must be within 1..={num_types}")]
    InvalidAngleType { angle_type: i64, num_types: u32 },

    #[error("Tangential propulsion requires angle interactions, but no angle types are defined")]
    MissingAngleTopology,

    #[error("Kernel was configured for a {configured}D simulation but the system is {actual}D")]
    DimensionMismatch { configured: u8, actual: u8 },

    #[error("Timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),
}

/// The particle store lacks something a kernel depends on.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PreconditionError {
    #[error("{kernel} requires particle attribute '{attribute}'")]
    MissingAttribute {
        kernel: &'static str,
        attribute: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
}
