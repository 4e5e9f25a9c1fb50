use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported dimension {0}: only 2 and 3 are allowed")]
pub struct InvalidDimensionError(pub u8);

/// Dimensionality of the host simulation.
///
/// In a two-dimensional simulation every particle lives in the xy plane and all
/// z components of displacement are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum Dimension {
    Two,
    #[default]
    Three,
}

impl Dimension {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for Dimension {
    type Error = InvalidDimensionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(InvalidDimensionError(other)),
        }
    }
}

/// Orthogonal simulation box with optional periodicity per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationBox {
    lo: Point3<f64>,
    hi: Point3<f64>,
    periodic: [bool; 3],
}

impl SimulationBox {
    /// Creates a box periodic along all three axes.
    pub fn new(lo: Point3<f64>, hi: Point3<f64>) -> Self {
        Self {
            lo,
            hi,
            periodic: [true; 3],
        }
    }

    pub fn with_periodicity(mut self, periodic: [bool; 3]) -> Self {
        self.periodic = periodic;
        self
    }

    pub fn lo(&self) -> &Point3<f64> {
        &self.lo
    }

    pub fn hi(&self) -> &Point3<f64> {
        &self.hi
    }

    pub fn lengths(&self) -> Vector3<f64> {
        self.hi - self.lo
    }

    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Returns the unwrapped position of a particle given its image counters.
    pub fn unmap(&self, position: &Point3<f64>, image: &Vector3<i32>) -> Point3<f64> {
        let lengths = self.lengths();
        Point3::new(
            position.x + f64::from(image.x) * lengths.x,
            position.y + f64::from(image.y) * lengths.y,
            position.z + f64::from(image.z) * lengths.z,
        )
    }

    /// Shortest separation vector from `from` to `to` under periodic boundaries.
    ///
    /// Along periodic axes the result is folded into `[-L/2, L/2]`; other axes keep the
    /// plain difference.
    pub fn delta(&self, from: &Point3<f64>, to: &Point3<f64>) -> Vector3<f64> {
        let mut delta = to - from;
        let lengths = self.lengths();
        for axis in 0..3 {
            if self.periodic[axis] && lengths[axis] > 0.0 {
                delta[axis] -= (delta[axis] / lengths[axis]).round() * lengths[axis];
            }
        }
        delta
    }

    /// Wraps a position back into the box along periodic axes, updating the image
    /// counters so that [`unmap`](Self::unmap) still yields the same unwrapped point.
    pub fn remap(&self, position: &mut Point3<f64>, image: &mut Vector3<i32>) {
        let lengths = self.lengths();
        for axis in 0..3 {
            if !self.periodic[axis] || lengths[axis] <= 0.0 {
                continue;
            }
            let shift = ((position[axis] - self.lo[axis]) / lengths[axis]).floor();
            if shift != 0.0 {
                position[axis] -= shift * lengths[axis];
                image[axis] += shift as i32;
            }
        }
    }
}

impl Default for SimulationBox {
    fn default() -> Self {
        Self::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
    }
}
