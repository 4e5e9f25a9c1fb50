use super::config::PropulsionParams;
use super::error::{ConfigError, EngineError};
use super::fix::ForceModifier;
use super::virial::{Virial, VirialTally};
use crate::core::models::ids::ParticleId;
use crate::core::models::particle::GroupMask;
use crate::core::models::system::ParticleSystem;
use nalgebra::Vector3;
use tracing::{info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Squared tangent lengths below this are treated as coincident endpoints.
const DEGENERATE_TANGENT_RSQ: f64 = 1e-14;

/// Force of constant magnitude along the tangent `delta`, the separation from the
/// first to the last member of a triple.
///
/// Returns `None` when the endpoints coincide and the tangent is undefined.
#[inline]
pub fn tangential_force(delta: &Vector3<f64>, magnitude: f64) -> Option<Vector3<f64>> {
    let rsq = delta.norm_squared();
    if rsq < DEGENERATE_TANGENT_RSQ {
        return None;
    }
    Some(delta * (magnitude / rsq.sqrt()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Contribution {
    particle: ParticleId,
    force: Vector3<f64>,
}

/// Self-propulsion along the local tangent of bonded angle triples.
///
/// For every triple `(i, j, k)` of the configured angle type whose middle particle
/// is in the group, `j` is pushed along `x_k - x_i` with a fixed magnitude. The end
/// particles receive no reaction force, so momentum is not conserved: this is an
/// active drive, not an interaction.
#[derive(Debug, Clone)]
pub struct TangentialPropulsion {
    params: PropulsionParams,
    group: GroupMask,
    angle_type: Option<u32>,
}

impl TangentialPropulsion {
    pub fn new(params: PropulsionParams, group: GroupMask) -> Self {
        Self {
            params,
            group,
            angle_type: None,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.params.magnitude
    }

    /// Angle type this force acts on, available once [`ForceModifier::init`] succeeded.
    pub fn angle_type(&self) -> Option<u32> {
        self.angle_type
    }

    /// Adds the propulsion forces to `system` and, if a tally is given, their virial.
    ///
    /// Does nothing before a successful `init`.
    pub fn apply(&self, system: &mut ParticleSystem, virial: Option<&mut VirialTally>) {
        let Some(angle_type) = self.angle_type else {
            return;
        };
        let contributions = self.collect_contributions(system, angle_type);

        let sim_box = system.sim_box().clone();
        let mut virial = virial;
        for Contribution { particle, force } in contributions {
            let Some(target) = system.particle_mut(particle) else {
                continue;
            };
            target.force += force;
            if let Some(tally) = virial.as_deref_mut() {
                let unwrapped = sim_box.unmap(&target.position, &target.image);
                tally.tally(particle, Virial::from_force_at(&force, &unwrapped));
            }
        }
    }

    fn collect_contributions(&self, system: &ParticleSystem, angle_type: u32) -> Vec<Contribution> {
        let magnitude = self.params.magnitude;
        let group = self.group;
        let sim_box = system.sim_box();

        #[cfg(not(feature = "parallel"))]
        let iterator = system.angles().iter();

        #[cfg(feature = "parallel")]
        let iterator = system.angles().par_iter();

        let contributions: Vec<Contribution> = iterator
            .filter(|angle| angle.angle_type == angle_type)
            .filter_map(|angle| {
                let j = system.particle(angle.j)?;
                if !j.in_group(group) {
                    return None;
                }
                let xi = system.particle(angle.i)?.position;
                let xk = system.particle(angle.k)?.position;
                tangential_force(&sim_box.delta(&xi, &xk), magnitude).map(|force| Contribution {
                    particle: angle.j,
                    force,
                })
            })
            .collect();

        trace!(
            applied = contributions.len(),
            total = system.angles().len(),
            "Collected tangential propulsion contributions."
        );
        contributions
    }
}

impl ForceModifier for TangentialPropulsion {
    #[instrument(skip_all, name = "tangential_propulsion_init")]
    fn init(&mut self, system: &ParticleSystem) -> Result<(), EngineError> {
        let num_types = system.num_angle_types();
        if num_types == 0 {
            return Err(ConfigError::MissingAngleTopology.into());
        }
        let angle_type = self.params.angle_type;
        if angle_type < 1 || angle_type > i64::from(num_types) {
            return Err(ConfigError::InvalidAngleType {
                angle_type,
                num_types,
            }
            .into());
        }
        self.angle_type = Some(angle_type as u32);
        info!(
            magnitude = self.params.magnitude,
            angle_type,
            "Tangential propulsion ready."
        );
        Ok(())
    }

    fn post_force(&mut self, system: &mut ParticleSystem, virial: Option<&mut VirialTally>) {
        self.apply(system, virial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Dimension, SimulationBox};
    use crate::core::models::particle::Particle;
    use crate::core::models::system::ParticleAttributes;
    use crate::core::models::topology::AngleTriple;
    use nalgebra::Point3;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn virial_approx_equal(a: &Virial, b: &Virial) -> bool {
        a.as_array()
            .iter()
            .zip(b.as_array().iter())
            .all(|(x, y)| f64_approx_equal(*x, *y))
    }

    fn empty_system(num_angle_types: u32) -> ParticleSystem {
        let mut system = ParticleSystem::new(
            Dimension::Three,
            SimulationBox::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0)),
            ParticleAttributes::default(),
        );
        system.set_num_angle_types(num_angle_types);
        system
    }

    fn add_triple(
        system: &mut ParticleSystem,
        xi: Point3<f64>,
        xj: Point3<f64>,
        xk: Point3<f64>,
        angle_type: u32,
    ) -> (ParticleId, ParticleId, ParticleId) {
        let i = system.add_particle(Particle::new(xi));
        let j = system.add_particle(Particle::new(xj));
        let k = system.add_particle(Particle::new(xk));
        system.add_angle(AngleTriple::new(i, j, k, angle_type)).unwrap();
        (i, j, k)
    }

    fn ready(magnitude: f64, angle_type: i64, system: &ParticleSystem) -> TangentialPropulsion {
        let mut fix = TangentialPropulsion::new(
            PropulsionParams {
                magnitude,
                angle_type,
            },
            GroupMask::ALL,
        );
        fix.init(system).unwrap();
        fix
    }

    /// A ring of `n` particles, each the middle of a triple with its neighbours.
    fn ring(n: usize, radius: f64) -> ParticleSystem {
        let mut system = empty_system(1);
        let ids: Vec<ParticleId> = (0..n)
            .map(|m| {
                let phi = 2.0 * std::f64::consts::PI * m as f64 / n as f64;
                let mut p = Particle::new(Point3::new(radius * phi.cos(), radius * phi.sin(), 0.3));
                p.image = Vector3::new(m as i32 % 2, 0, -(m as i32 % 3));
                system.add_particle(p)
            })
            .collect();
        for m in 0..n {
            let angle = AngleTriple::new(ids[(m + n - 1) % n], ids[m], ids[(m + 1) % n], 1);
            system.add_angle(angle).unwrap();
        }
        system
    }

    #[test]
    fn force_is_applied_to_middle_particle_along_tangent() {
        let mut system = empty_system(1);
        let (i, j, k) = add_triple(
            &mut system,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            1,
        );
        let mut fix = ready(2.0, 1, &system);

        fix.post_force(&mut system, None);

        assert_eq!(system.particle(j).unwrap().force, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(system.particle(i).unwrap().force, Vector3::zeros());
        assert_eq!(system.particle(k).unwrap().force, Vector3::zeros());
    }

    #[test]
    fn coincident_endpoints_are_skipped_silently() {
        let mut system = empty_system(1);
        let (_, j, _) = add_triple(
            &mut system,
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            1,
        );
        let mut fix = ready(2.0, 1, &system);
        let mut tally = VirialTally::with_per_particle();

        fix.post_force(&mut system, Some(&mut tally));

        assert_eq!(system.particle(j).unwrap().force, Vector3::zeros());
        assert_eq!(tally.global(), Virial::default());
        assert_eq!(tally.particle(j), None);
    }

    #[test]
    fn tangential_force_is_normalized_and_handles_tolerance() {
        let f = tangential_force(&Vector3::new(3.0, 4.0, 0.0), 10.0).unwrap();
        assert!(f64_approx_equal(f.x, 6.0));
        assert!(f64_approx_equal(f.y, 8.0));
        assert!(tangential_force(&Vector3::new(1e-8, 0.0, 0.0), 1.0).is_none());
        assert!(tangential_force(&Vector3::new(1e-6, 0.0, 0.0), 1.0).is_some());
    }

    #[test]
    fn triple_straddling_periodic_boundary_is_driven_forward() {
        let mut system = empty_system(1);
        let (i, j, k) = add_triple(
            &mut system,
            Point3::new(4.5, 0.0, 0.0),
            Point3::new(4.9, 0.0, 0.0),
            Point3::new(-4.7, 0.0, 0.0),
            1,
        );
        system.particle_mut(k).unwrap().image = Vector3::new(1, 0, 0);
        let mut fix = ready(2.0, 1, &system);
        let mut tally = VirialTally::with_per_particle();

        fix.post_force(&mut system, Some(&mut tally));

        let force = system.particle(j).unwrap().force;
        assert!(f64_approx_equal(force.x, 2.0));
        assert!(f64_approx_equal(force.y, 0.0));
        assert!(f64_approx_equal(force.z, 0.0));
        assert_eq!(system.particle(i).unwrap().force, Vector3::zeros());
        assert_eq!(system.particle(k).unwrap().force, Vector3::zeros());
        assert!(f64_approx_equal(tally.global().xx, 2.0 * 4.9));
    }

    #[test]
    fn tangent_is_independent_of_which_images_are_wrapped() {
        let unwrapped = [
            Point3::new(4.6, 4.8, 0.0),
            Point3::new(5.1, 5.2, 0.0),
            Point3::new(5.6, 5.9, 0.3),
        ];
        let mut reference = empty_system(1);
        let mut wrapped = empty_system(1);
        let (_, j_ref, _) = add_triple(&mut reference, unwrapped[0], unwrapped[1], unwrapped[2], 1);
        let (_, j_wrap, _) = add_triple(&mut wrapped, unwrapped[0], unwrapped[1], unwrapped[2], 1);
        wrapped.remap_into_box();
        assert!(wrapped.particles_iter().any(|(_, p)| p.image != Vector3::zeros()));

        ready(1.0, 1, &reference).post_force(&mut reference, None);
        ready(1.0, 1, &wrapped).post_force(&mut wrapped, None);

        let expected = reference.particle(j_ref).unwrap().force;
        let actual = wrapped.particle(j_wrap).unwrap().force;
        assert!((expected - actual).norm() < TOLERANCE);
        assert!(f64_approx_equal(expected.norm(), 1.0));
    }

    #[test]
    fn only_matching_angle_type_is_driven() {
        let mut system = empty_system(2);
        let (_, j1, _) = add_triple(
            &mut system,
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            1,
        );
        let (_, j2, _) = add_triple(
            &mut system,
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            2,
        );
        let mut fix = ready(1.0, 2, &system);

        fix.post_force(&mut system, None);

        assert_eq!(system.particle(j1).unwrap().force, Vector3::zeros());
        assert_eq!(system.particle(j2).unwrap().force, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn middle_particle_outside_group_is_not_driven() {
        let active = GroupMask::bit(2).unwrap();
        let mut system = empty_system(1);
        let (_, j, _) = add_triple(
            &mut system,
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            1,
        );
        let mut fix = TangentialPropulsion::new(
            PropulsionParams {
                magnitude: 1.0,
                angle_type: 1,
            },
            active,
        );
        fix.init(&system).unwrap();
        fix.post_force(&mut system, None);
        assert_eq!(system.particle(j).unwrap().force, Vector3::zeros());

        system.particle_mut(j).unwrap().mask |= active;
        fix.post_force(&mut system, None);
        assert_eq!(system.particle(j).unwrap().force, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn forces_accumulate_onto_existing_forces() {
        let mut system = empty_system(1);
        let (_, j, _) = add_triple(
            &mut system,
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            1,
        );
        system.particle_mut(j).unwrap().force = Vector3::new(1.0, 1.0, 1.0);
        let mut fix = ready(0.5, 1, &system);

        fix.setup(&mut system, None);

        assert_eq!(system.particle(j).unwrap().force, Vector3::new(1.0, 1.5, 1.0));
    }

    #[test]
    fn init_requires_angle_topology() {
        let system = empty_system(0);
        let mut fix = TangentialPropulsion::new(
            PropulsionParams {
                magnitude: 1.0,
                angle_type: 1,
            },
            GroupMask::ALL,
        );
        assert!(matches!(
            fix.init(&system),
            Err(EngineError::Config(ConfigError::MissingAngleTopology))
        ));
        assert_eq!(fix.angle_type(), None);
    }

    #[test]
    fn init_rejects_angle_type_out_of_range() {
        let system = empty_system(2);
        for bad in [0, 3, -1] {
            let mut fix = TangentialPropulsion::new(
                PropulsionParams {
                    magnitude: 1.0,
                    angle_type: bad,
                },
                GroupMask::ALL,
            );
            assert!(matches!(
                fix.init(&system),
                Err(EngineError::Config(ConfigError::InvalidAngleType { num_types: 2, .. }))
            ));
        }
    }

    #[test]
    fn apply_before_init_does_nothing() {
        let mut system = empty_system(1);
        let (_, j, _) = add_triple(
            &mut system,
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            1,
        );
        let fix = TangentialPropulsion::new(
            PropulsionParams {
                magnitude: 1.0,
                angle_type: 1,
            },
            GroupMask::ALL,
        );
        fix.apply(&mut system, None);
        assert_eq!(system.particle(j).unwrap().force, Vector3::zeros());
    }

    #[test]
    fn virial_uses_unwrapped_position_of_middle_particle() {
        let mut system = empty_system(1);
        let (_, j, _) = add_triple(
            &mut system,
            Point3::origin(),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(1.0, 0.0, 0.0),
            1,
        );
        system.particle_mut(j).unwrap().image = Vector3::new(1, 0, -1);
        let mut fix = ready(2.0, 1, &system);
        let mut tally = VirialTally::with_per_particle();

        fix.post_force(&mut system, Some(&mut tally));

        // Box length 10: unwrapped j = (11, 2, -7), force = (2, 0, 0).
        let expected = Virial {
            xx: 22.0,
            yy: 0.0,
            zz: 0.0,
            xy: 4.0,
            xz: -14.0,
            yz: 0.0,
        };
        assert!(virial_approx_equal(&tally.global(), &expected));
        assert!(virial_approx_equal(&tally.particle(j).unwrap(), &expected));
    }

    #[test]
    fn virial_sum_equals_sum_of_independent_contributions() {
        let mut system = ring(12, 2.0);
        let mut fix = ready(1.5, 1, &system);
        let sim_box = system.sim_box().clone();

        let mut expected = Virial::default();
        for angle in system.angles() {
            let xi = system.particle(angle.i).unwrap().position;
            let xk = system.particle(angle.k).unwrap().position;
            let j = system.particle(angle.j).unwrap();
            let force = tangential_force(&sim_box.delta(&xi, &xk), 1.5).unwrap();
            expected += Virial::from_force_at(&force, &sim_box.unmap(&j.position, &j.image));
        }

        let mut tally = VirialTally::new();
        fix.post_force(&mut system, Some(&mut tally));

        assert!(virial_approx_equal(&tally.global(), &expected));
    }

    #[test]
    fn virial_sum_is_independent_of_traversal_order() {
        let forward = ring(9, 1.5);

        let mut reversed = empty_system(1);
        let mut remap = std::collections::HashMap::new();
        let originals: Vec<_> = forward.particles_iter().collect();
        for (id, particle) in originals.iter().rev() {
            remap.insert(*id, reversed.add_particle((*particle).clone()));
        }
        for angle in forward.angles().iter().rev() {
            reversed
                .add_angle(AngleTriple::new(remap[&angle.i], remap[&angle.j], remap[&angle.k], 1))
                .unwrap();
        }

        let mut forward = forward;
        let mut forward_tally = VirialTally::new();
        ready(0.7, 1, &forward).post_force(&mut forward, Some(&mut forward_tally));

        let mut reversed_tally = VirialTally::new();
        ready(0.7, 1, &reversed).post_force(&mut reversed, Some(&mut reversed_tally));

        assert!(virial_approx_equal(
            &forward_tally.global(),
            &reversed_tally.global()
        ));
    }

    #[test]
    fn ring_propulsion_has_no_reaction_forces_and_nonzero_net_force_per_particle() {
        let mut system = ring(6, 1.0);
        let mut fix = ready(1.0, 1, &system);

        fix.post_force(&mut system, None);

        for (_, particle) in system.particles_iter() {
            assert!(f64_approx_equal(particle.force.norm(), 1.0));
            // Tangent of a circle is perpendicular to the radius.
            let radial = Vector3::new(particle.position.x, particle.position.y, 0.0);
            assert!(particle.force.dot(&radial).abs() < 1e-9);
        }
    }
}
