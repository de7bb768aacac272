use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::core::boundary::{self, Outcome};
use crate::core::config::{LeakPlacement, SimConfig};
use crate::core::geometry::{Domain, Leak};
use crate::core::motion::MotionModel;
use crate::core::particle::Particle;
use crate::error::{Error, Result};

/// Per-step record consumed by rendering and analysis collaborators: every
/// particle position (escaped particles frozen where they left), the
/// active flags, and the cumulative escape count after the step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Position of every particle, active or not.
    pub positions: Vec<[f64; 2]>,
    /// Per-particle active flag.
    pub active: Vec<bool>,
    /// Cumulative number of escaped particles.
    pub escaped_count: usize,
}

impl Snapshot {
    /// Number of particles still in the ensemble at this step.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }
}

/// Append-only sequence of per-step snapshots, one per executed step.
///
/// Produced by `Simulation::run` and never mutated afterwards; rendering
/// maps it to a scatter animation, analysis to a decay curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    steps: Vec<Snapshot>,
}

impl History {
    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True iff no step has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All snapshots in step order.
    pub fn steps(&self) -> &[Snapshot] {
        &self.steps
    }

    /// Last recorded snapshot, if any.
    pub fn last(&self) -> Option<&Snapshot> {
        self.steps.last()
    }

    /// Remaining-population time series (the decay-curve input).
    pub fn remaining(&self) -> Vec<usize> {
        self.steps.iter().map(Snapshot::active_count).collect()
    }

    fn push(&mut self, snap: Snapshot) {
        self.steps.push(snap);
    }
}

/// Simulation driver: owns the ensemble, the geometry, the motion policy
/// and the random stream, and runs the strictly sequential step loop.
///
/// The driver is the sole writer of `active` flags, `escaped_count` and
/// History; motion and boundary components only transform the per-particle
/// state handed to them.
#[derive(Debug)]
pub struct Simulation {
    domain: Domain,
    leak: Leak,
    motion: MotionModel,
    pub particles: Vec<Particle>,
    escaped_count: usize,
    step_index: u64,
    rng: StdRng,
}

impl Simulation {
    /// Validate `config`, place the leak, and create the ensemble with all
    /// particles active at uniform random positions. Ballistic velocities
    /// are drawn once from `Normal(0, temperature)` per component.
    ///
    /// `seed` pins the random stream for reproducible runs; `None` seeds
    /// from entropy.
    ///
    /// Errors: `Error::InvalidConfig` for a non-positive domain, a leak
    /// that does not fit its edge, an empty ensemble, or bad motion
    /// parameters. Nothing is constructed on error.
    pub fn new(config: SimConfig, seed: Option<u64>) -> Result<Self> {
        if config.n_particles == 0 {
            return Err(Error::InvalidConfig("n_particles must be > 0".into()));
        }
        let domain = Domain::new(config.width, config.height)?;
        config.motion.validate()?;

        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rand::rng().random()),
        };

        let leak = match config.leak {
            LeakPlacement::Random => Leak::sample(&domain, config.leak_width, &mut rng)?,
            LeakPlacement::Explicit { wall, center } => {
                Leak::new(&domain, wall, center, config.leak_width)?
            }
        };

        let mut particles = Vec::with_capacity(config.n_particles);
        for _ in 0..config.n_particles {
            let r = [
                rng.random_range(0.0..=domain.width()),
                rng.random_range(0.0..=domain.height()),
            ];
            particles.push(Particle::new(r, [0.0, 0.0]));
        }
        let velocities = config.motion.initial_velocities(config.n_particles, &mut rng)?;
        for (p, v) in particles.iter_mut().zip(velocities) {
            p.v = v;
        }

        info!(
            "ensemble of {} particles in {}x{}, leak on {} edge at {:.3} (width {:.3})",
            config.n_particles,
            domain.width(),
            domain.height(),
            leak.wall().as_str(),
            leak.center(),
            leak.width()
        );

        Ok(Self {
            domain,
            leak,
            motion: config.motion,
            particles,
            escaped_count: 0,
            step_index: 0,
            rng,
        })
    }

    /// Execute one committed step: the motion policy over every active
    /// particle, then boundary resolution, then escape bookkeeping.
    ///
    /// Inactive particles are skipped entirely; they can never reactivate.
    /// Every active particle is classified into exactly one of
    /// pass-through / reflect / escape, so the step is total and never
    /// fails.
    pub fn step(&mut self) {
        let mut newly_escaped = 0usize;
        for p in &mut self.particles {
            if !p.active {
                continue;
            }
            self.motion.advance(p, &self.domain, &mut self.rng);
            let outcome = match self.motion {
                MotionModel::Diffusive {
                    particle_radius, ..
                } => boundary::resolve_diffusive(p, &self.domain, &self.leak, particle_radius),
                MotionModel::Ballistic { .. } => {
                    boundary::resolve_ballistic(p, &self.domain, &self.leak)
                }
            };
            if outcome == Outcome::Escaped {
                p.active = false;
                newly_escaped += 1;
            }
        }
        self.escaped_count += newly_escaped;
        self.step_index += 1;
    }

    /// Run `n_steps` strictly sequential steps, appending one snapshot per
    /// executed step. A run of zero steps yields an empty History.
    pub fn run(&mut self, n_steps: usize) -> History {
        let mut history = History::default();
        for _ in 0..n_steps {
            self.step();
            history.push(self.snapshot());
        }
        debug!(
            "run complete at step {}: {} active, {} escaped",
            self.step_index,
            self.active_count(),
            self.escaped_count
        );
        history
    }

    /// Snapshot of the current committed state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            positions: self.particles.iter().map(|p| p.r).collect(),
            active: self.particles.iter().map(|p| p.active).collect(),
            escaped_count: self.escaped_count,
        }
    }

    /// Total ensemble size (active + escaped).
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Number of particles still active.
    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    /// Cumulative number of escaped particles.
    pub fn escaped_count(&self) -> usize {
        self.escaped_count
    }

    /// Index of the next step to execute (= number of committed steps).
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Simulation domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Leak geometry, for rendering the aperture.
    pub fn leak(&self) -> &Leak {
        &self.leak
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; 2]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Per-particle active flags.
    pub fn active_flags(&self) -> Vec<bool> {
        self.particles.iter().map(|p| p.active).collect()
    }
}
