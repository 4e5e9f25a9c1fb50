use phf::{Map, phf_map};
use std::str::FromStr;
use thiserror::Error;

/// Conversion factors the kernels need from the host's unit system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStyle {
    pub name: &'static str,
    /// Boltzmann constant (energy / temperature).
    pub boltz: f64,
    /// Converts force / mass into velocity / time.
    pub ftm2v: f64,
    /// Converts mass * velocity^2 into energy.
    pub mvv2e: f64,
}

#[rustfmt::skip]
static UNIT_STYLES: Map<&'static str, UnitStyle> = phf_map! {
    "lj"    => UnitStyle { name: "lj",    boltz: 1.0,           ftm2v: 1.0,                              mvv2e: 1.0 },
    "real"  => UnitStyle { name: "real",  boltz: 0.0019872067,  ftm2v: 1.0 / 48.88821291 / 48.88821291, mvv2e: 48.88821291 * 48.88821291 },
    "metal" => UnitStyle { name: "metal", boltz: 8.617343e-5,   ftm2v: 1.0 / 1.0364269e-4,              mvv2e: 1.0364269e-4 },
    "si"    => UnitStyle { name: "si",    boltz: 1.3806504e-23, ftm2v: 1.0,                              mvv2e: 1.0 },
    "cgs"   => UnitStyle { name: "cgs",   boltz: 1.3806504e-16, ftm2v: 1.0,                              mvv2e: 1.0 },
    "micro" => UnitStyle { name: "micro", boltz: 1.3806504e-8,  ftm2v: 1.0,                              mvv2e: 1.0 },
    "nano"  => UnitStyle { name: "nano",  boltz: 0.013806504,   ftm2v: 1.0,                              mvv2e: 1.0 },
};

impl UnitStyle {
    /// Reduced Lennard-Jones units, where every conversion factor is one.
    pub const LJ: UnitStyle = UnitStyle {
        name: "lj",
        boltz: 1.0,
        ftm2v: 1.0,
        mvv2e: 1.0,
    };

    pub fn by_name(name: &str) -> Option<Self> {
        UNIT_STYLES.get(name).copied()
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        UNIT_STYLES.keys().copied()
    }
}

impl Default for UnitStyle {
    fn default() -> Self {
        Self::LJ
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown unit style '{0}'")]
pub struct UnknownUnitStyleError(pub String);

impl FromStr for UnitStyle {
    type Err = UnknownUnitStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(&s.to_ascii_lowercase()).ok_or_else(|| UnknownUnitStyleError(s.to_string()))
    }
}
