use chiralbd::core::domain::InvalidDimensionError;
use chiralbd::core::models::topology::TopologyError;
use chiralbd::core::units::UnknownUnitStyleError;
use chiralbd::engine::error::{ConfigError, EngineError};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write trajectory: {0}")]
    Trajectory(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Engine(e.into())
    }
}

impl From<TopologyError> for CliError {
    fn from(e: TopologyError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<UnknownUnitStyleError> for CliError {
    fn from(e: UnknownUnitStyleError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<InvalidDimensionError> for CliError {
    fn from(e: InvalidDimensionError) -> Self {
        CliError::Config(e.to_string())
    }
}
