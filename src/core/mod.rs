//! Core simulation engine: leak geometry, motion policies, boundary
//! resolution and the step-loop driver.
//!
//! Data flows one way per step: driver -> motion model -> boundary
//! resolver -> driver (state commit) -> history record.

pub mod boundary;
pub mod config;
pub mod geometry;
pub mod motion;
pub mod particle;
pub mod sim;

pub use boundary::Outcome;
pub use config::{LeakPlacement, SimConfig};
pub use geometry::{Domain, Leak, Wall};
pub use motion::MotionModel;
pub use particle::Particle;
pub use sim::{History, Simulation, Snapshot};
