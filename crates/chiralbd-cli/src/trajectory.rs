use crate::error::Result;
use chiralbd::core::models::ids::ParticleId;
use chiralbd::core::models::system::ParticleSystem;
use chiralbd::engine::virial::Virial;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize, Debug, PartialEq)]
struct TrajectoryRow {
    step: u64,
    particle: usize,
    x: f64,
    y: f64,
    z: f64,
    ix: i32,
    iy: i32,
    iz: i32,
    mux: f64,
    muy: f64,
    muz: f64,
    fx: f64,
    fy: f64,
    fz: f64,
}

/// Per-particle snapshots, one CSV row per particle and output step.
pub struct TrajectoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn write_frame(&mut self, step: u64, system: &ParticleSystem, ids: &[ParticleId]) -> Result<()> {
        for (index, id) in ids.iter().enumerate() {
            let Some(p) = system.particle(*id) else {
                continue;
            };
            self.writer.serialize(TrajectoryRow {
                step,
                particle: index,
                x: p.position.x,
                y: p.position.y,
                z: p.position.z,
                ix: p.image.x,
                iy: p.image.y,
                iz: p.image.z,
                mux: p.dipole.x,
                muy: p.dipole.y,
                muz: p.dipole.z,
                fx: p.force.x,
                fy: p.force.y,
                fz: p.force.z,
            })?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct VirialRow {
    step: u64,
    xx: f64,
    yy: f64,
    zz: f64,
    xy: f64,
    xz: f64,
    yz: f64,
}

/// Global virial of the propulsion force, one row per output step.
pub struct VirialWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> VirialWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn write(&mut self, step: u64, virial: &Virial) -> Result<()> {
        self.writer.serialize(VirialRow {
            step,
            xx: virial.xx,
            yy: virial.yy,
            zz: virial.zz,
            xy: virial.xy,
            xz: virial.xz,
            yz: virial.yz,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
