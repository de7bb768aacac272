use rand::{rngs::StdRng, Rng};
use rand_distr::{Distribution, Normal};

use crate::core::geometry::Domain;
use crate::core::particle::Particle;
use crate::error::{Error, Result};

/// Motion policy applied independently to every active particle each step.
///
/// Both policies are pure per-particle transformations with no coupling
/// between particles, so a step is trivially data-parallel.
#[derive(Debug, Clone, Copy)]
pub enum MotionModel {
    /// Bounded random walk: each axis is perturbed by a step drawn from
    /// {-step_size, 0, +step_size}, then the position is hard-clamped into
    /// the domain. The clamp deliberately swallows overshoot at solid
    /// walls instead of reflecting.
    Diffusive {
        /// Per-axis step magnitude.
        step_size: f64,
        /// Disc radius used only for leak proximity, identical for all
        /// particles.
        particle_radius: f64,
    },
    /// Constant-velocity flight between elastic wall reflections.
    Ballistic {
        /// Standard deviation of the initial per-component velocity.
        temperature: f64,
        /// Fixed time step.
        dt: f64,
    },
}

impl MotionModel {
    /// Validate the policy parameters.
    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            MotionModel::Diffusive {
                step_size,
                particle_radius,
            } => {
                if !step_size.is_finite() || step_size <= 0.0 {
                    return Err(Error::InvalidConfig(
                        "step_size must be finite and > 0".into(),
                    ));
                }
                if !particle_radius.is_finite() || particle_radius < 0.0 {
                    return Err(Error::InvalidConfig(
                        "particle_radius must be finite and >= 0".into(),
                    ));
                }
            }
            MotionModel::Ballistic { temperature, dt } => {
                if !temperature.is_finite() || temperature <= 0.0 {
                    return Err(Error::InvalidConfig(
                        "temperature must be finite and > 0".into(),
                    ));
                }
                if !dt.is_finite() || dt <= 0.0 {
                    return Err(Error::InvalidConfig("dt must be finite and > 0".into()));
                }
            }
        }
        Ok(())
    }

    /// Draw the ensemble's initial velocities. Ballistic components are
    /// sampled from `Normal(0, temperature)` once at creation; the
    /// diffusive walk carries no velocity state.
    pub(crate) fn initial_velocities(&self, n: usize, rng: &mut StdRng) -> Result<Vec<[f64; 2]>> {
        match *self {
            MotionModel::Diffusive { .. } => Ok(vec![[0.0, 0.0]; n]),
            MotionModel::Ballistic { temperature, .. } => {
                let normal = Normal::new(0.0, temperature).map_err(|e| {
                    Error::InvalidConfig(format!(
                        "temperature {temperature} does not define a velocity distribution: {e}"
                    ))
                })?;
                Ok((0..n)
                    .map(|_| [normal.sample(rng), normal.sample(rng)])
                    .collect())
            }
        }
    }

    /// Advance one active particle by one step, producing the provisional
    /// position the boundary resolver consumes.
    pub(crate) fn advance(&self, p: &mut Particle, domain: &Domain, rng: &mut StdRng) {
        match *self {
            MotionModel::Diffusive { step_size, .. } => {
                for rk in p.r.iter_mut() {
                    *rk += step_size * rng.random_range(-1..=1i32) as f64;
                }
                domain.clamp(&mut p.r);
            }
            MotionModel::Ballistic { dt, .. } => {
                p.r[0] += p.v[0] * dt;
                p.r[1] += p.v[1] * dt;
            }
        }
    }
}
