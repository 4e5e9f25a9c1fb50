use crate::error::{CliError, Result};
use chiralbd::core::domain::Dimension;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Top-level layout of a TOML run file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub simulation: FileSimulationConfig,
    #[serde(default)]
    pub particles: Vec<FileParticle>,
    #[serde(default)]
    pub angles: Vec<FileAngle>,
    pub integrator: FileKernelConfig,
    pub propulsion: Option<FileKernelConfig>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSimulationConfig {
    pub units: Option<String>,
    #[serde(default)]
    pub dimension: Dimension,
    pub timestep: Option<f64>,
    pub steps: u64,
    pub output_every: Option<u64>,
    pub rank: Option<u64>,
    #[serde(rename = "box")]
    pub sim_box: FileBox,
    #[serde(default)]
    pub angle_types: u32,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileBox {
    pub lo: [f64; 3],
    pub hi: [f64; 3],
    pub periodic: Option<[bool; 3]>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileParticle {
    pub position: [f64; 3],
    pub dipole: Option<[f64; 3]>,
    /// Group bits the particle joins in addition to the implicit "all" group.
    #[serde(default)]
    pub groups: Vec<u32>,
}

/// An angle triple referring to particles by their position in `[[particles]]`.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileAngle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    #[serde(rename = "type")]
    pub angle_type: u32,
}

/// A kernel configured by its flat argument string, as a host input script would.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileKernelConfig {
    pub args: String,
    pub group: Option<u32>,
}

impl FileKernelConfig {
    pub fn tokens(&self) -> Vec<&str> {
        self.args.split_whitespace().collect()
    }
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run description from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            CliError::FileParsing { source, .. } => CliError::FileParsing {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::FileParsing {
            path: Default::default(),
            source: e.into(),
        })
    }
}
