use crate::core::geometry::Wall;
use crate::core::motion::MotionModel;

/// Where the leak sits: sampled at setup or pinned explicitly.
#[derive(Debug, Clone, Copy)]
pub enum LeakPlacement {
    /// Uniform wall, then uniform center over the admissible sub-range.
    Random,
    /// Fixed wall and aperture center along it.
    Explicit { wall: Wall, center: f64 },
}

/// Full simulation configuration, validated once by `Simulation::new` and
/// immutable afterwards.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Domain extent along x (> 0).
    pub width: f64,
    /// Domain extent along y (> 0).
    pub height: f64,
    /// Ensemble size (> 0).
    pub n_particles: usize,
    /// Leak placement policy.
    pub leak: LeakPlacement,
    /// Aperture width along its host edge (> 0).
    pub leak_width: f64,
    /// Motion policy and its parameters.
    pub motion: MotionModel,
}
