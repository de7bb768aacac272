use numpy::ndarray::{Array1, Array2, Array3};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

pub mod core;
pub mod error;

use crate::core::{LeakPlacement, MotionModel, SimConfig, Simulation, Wall};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// LeakSim Python-facing wrapper around the Rust Simulation core.
///
/// API:
/// - __new__(width, height, n_particles, leak_width, leak_edge=None, ...)
/// - run(n_steps) -> dict of history arrays
/// - step()
/// - get_positions() / get_velocities() / get_active()
/// - escaped_count() / active_count() / num_particles() / step_index()
/// - get_leak() / domain_size()
#[pyclass]
pub struct LeakSim {
    sim: Simulation,
}

#[pymethods]
impl LeakSim {
    /// Initialize a gas-leak simulation over the box [0, width] x [0, height].
    ///
    /// Parameters
    /// - width, height: domain extents (floats, > 0)
    /// - n_particles: ensemble size (int, > 0)
    /// - leak_width: aperture width along its host edge (float, > 0)
    /// - leak_edge: "top" | "bottom" | "left" | "right"; None picks an edge
    ///   and a position uniformly at random
    /// - leak_position: aperture center along the chosen edge; required
    ///   together with leak_edge
    /// - model: "ballistic" (default) or "diffusive"
    /// - temperature, dt: ballistic parameters (velocity std dev, time step)
    /// - step_size, particle_radius: diffusive parameters
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (
        width=10.0,
        height=10.0,
        n_particles=100,
        leak_width=1.0,
        leak_edge=None,
        leak_position=None,
        model="ballistic",
        temperature=1.0,
        dt=0.1,
        step_size=1.0,
        particle_radius=0.0,
        seed=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        width: f64,
        height: f64,
        n_particles: usize,
        leak_width: f64,
        leak_edge: Option<&str>,
        leak_position: Option<f64>,
        model: &str,
        temperature: f64,
        dt: f64,
        step_size: f64,
        particle_radius: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let motion = match model {
            "ballistic" => MotionModel::Ballistic { temperature, dt },
            "diffusive" => MotionModel::Diffusive {
                step_size,
                particle_radius,
            },
            other => {
                return Err(py_err(format!(
                    "unknown model {other:?}; expected \"ballistic\" or \"diffusive\""
                )))
            }
        };
        let leak = match (leak_edge, leak_position) {
            (None, None) => LeakPlacement::Random,
            (Some(edge), Some(center)) => LeakPlacement::Explicit {
                wall: Wall::parse(edge).map_err(py_err)?,
                center,
            },
            (Some(_), None) => return Err(py_err("leak_position is required when leak_edge is given")),
            (None, Some(_)) => return Err(py_err("leak_edge is required when leak_position is given")),
        };
        let config = SimConfig {
            width,
            height,
            n_particles,
            leak,
            leak_width,
            motion,
        };
        let sim = Simulation::new(config, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Run `n_steps` and return the full history (releases the GIL during
    /// computation):
    ///
    /// {"positions": (n_steps, N, 2) float64,
    ///  "active":    (n_steps, N) bool,
    ///  "escaped":   (n_steps,) uint64}
    fn run<'py>(&mut self, py: Python<'py>, n_steps: usize) -> PyResult<Py<PyDict>> {
        let history = py.detach(|| self.sim.run(n_steps));
        let n = self.sim.num_particles();
        let recorded = history.len();

        let mut positions = Array3::<f64>::zeros((recorded, n, 2));
        let mut active = Array2::<bool>::from_elem((recorded, n), false);
        let mut escaped = Array1::<u64>::zeros(recorded);
        for (t, snap) in history.steps().iter().enumerate() {
            for (i, r) in snap.positions.iter().enumerate() {
                positions[[t, i, 0]] = r[0];
                positions[[t, i, 1]] = r[1];
            }
            for (i, &a) in snap.active.iter().enumerate() {
                active[[t, i]] = a;
            }
            escaped[t] = snap.escaped_count as u64;
        }

        let out = PyDict::new(py);
        out.set_item("positions", positions.into_pyarray(py))?;
        out.set_item("active", active.into_pyarray(py))?;
        out.set_item("escaped", escaped.into_pyarray(py))?;
        Ok(out.into())
    }

    /// Advance the simulation by a single step.
    fn step(&mut self) {
        self.sim.step();
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    /// Escaped particles report the position where they left.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f64>::zeros((n, 2));
        for (i, r) in self.sim.positions().into_iter().enumerate() {
            arr[[i, 0]] = r[0];
            arr[[i, 1]] = r[1];
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    /// All-zero under the diffusive model.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f64>::zeros((n, 2));
        for (i, v) in self.sim.velocities().into_iter().enumerate() {
            arr[[i, 0]] = v[0];
            arr[[i, 1]] = v[1];
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return the per-particle active flags as a NumPy bool array of shape (N,).
    fn get_active<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<bool>>> {
        let flags = Array1::from_vec(self.sim.active_flags());
        Ok(flags.into_pyarray(py).to_owned().into())
    }

    /// Cumulative number of escaped particles.
    fn escaped_count(&self) -> usize {
        self.sim.escaped_count()
    }

    /// Number of particles still active.
    fn active_count(&self) -> usize {
        self.sim.active_count()
    }

    /// Total ensemble size.
    fn num_particles(&self) -> usize {
        self.sim.num_particles()
    }

    /// Number of committed steps.
    fn step_index(&self) -> u64 {
        self.sim.step_index()
    }

    /// The leak as (edge, center, width) for rendering the aperture.
    fn get_leak(&self) -> (&'static str, f64, f64) {
        let leak = self.sim.leak();
        (leak.wall().as_str(), leak.center(), leak.width())
    }

    /// Domain extents as (width, height).
    fn domain_size(&self) -> (f64, f64) {
        let d = self.sim.domain();
        (d.width(), d.height())
    }
}

/// The leaksim Python module entry point.
#[pymodule]
fn leaksim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<LeakSim>()?;
    Ok(())
}
