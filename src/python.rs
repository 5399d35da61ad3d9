use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::{HistoryMode, SimConfig};
use crate::core::ball::DIM;
use crate::core::{layout, Ball, ModelData, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust `Simulation`.
///
/// - __new__(size=1.0, radius=0.1, num_balls=None, seed=None, history_interval=None)
/// - run(event_count) -> int
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
/// - set_velocities(np.ndarray of shape (N, 2))
/// - get_history() -> dict of arrays
#[pyclass]
pub struct BallSim {
    sim: Simulation,
}

#[pymethods]
impl BallSim {
    /// Build a simulation in a square box of side `size`.
    ///
    /// Parameters
    /// - size: container side length (float, > 0)
    /// - radius: shared ball radius (float, > 0)
    /// - num_balls: if None, the four-quadrant layout; otherwise a random
    ///   non-overlapping layout with this many balls
    /// - seed: RNG seed for the random layout
    /// - history_interval: if given, record snapshots every `history_interval`
    ///   time units; otherwise after every event
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (size=1.0, radius=0.1, num_balls=None, seed=None, history_interval=None))]
    fn new(
        size: f64,
        radius: f64,
        num_balls: Option<usize>,
        seed: Option<u64>,
        history_interval: Option<f64>,
    ) -> PyResult<Self> {
        let history = match history_interval {
            Some(interval) => HistoryMode::Uniform { interval },
            None => HistoryMode::PerEvent,
        };
        let config = SimConfig {
            size,
            radius,
            history,
        };
        config.validate().map_err(py_err)?;
        let balls = match num_balls {
            Some(n) => layout::random(n, size, radius, seed),
            None => layout::quadrants(size, radius),
        }
        .map_err(py_err)?;
        let sim = Simulation::with_config(balls, &config).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Process up to `event_count` collisions (releases the GIL during computation).
    ///
    /// Returns the number actually processed.
    fn run(&mut self, py: Python<'_>, event_count: usize) -> PyResult<usize> {
        py.detach(|| self.sim.run(event_count)).map_err(py_err)
    }

    /// Current simulated time.
    fn get_time(&self) -> f64 {
        self.sim.time()
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        rows_to_array(&self.sim.positions()).into_pyarray(py)
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        rows_to_array(&self.sim.velocities()).into_pyarray(py)
    }

    /// Set all ball velocities from a NumPy array of shape (N, 2), dtype=float64.
    /// Values must be finite.
    fn set_velocities<'py>(&mut self, velocities: PyReadonlyArray2<'py, f64>) -> PyResult<()> {
        let arr = velocities.as_array();
        let n = self.sim.num_balls();
        if arr.shape() != [n, DIM] {
            return Err(py_err(format!(
                "velocities must have shape ({}, {}), got {:?}",
                n,
                DIM,
                arr.shape()
            )));
        }
        let rows: Vec<[f64; DIM]> = arr.rows().into_iter().map(|row| [row[0], row[1]]).collect();
        self.sim.set_velocities(&rows).map_err(py_err)
    }

    /// Recorded history as a dict:
    /// {"times": (M,), "x", "y", "vx", "vy", "speed": (M, N)}.
    fn get_history<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let data = self.sim.history();
        let n = self.sim.num_balls();
        let out = PyDict::new(py);
        let times: Bound<'py, PyArray1<f64>> = data.times().into_pyarray(py);
        out.set_item("times", times)?;
        out.set_item("x", series_array(data, n, ModelData::x).into_pyarray(py))?;
        out.set_item("y", series_array(data, n, ModelData::y).into_pyarray(py))?;
        out.set_item("vx", series_array(data, n, ModelData::vx).into_pyarray(py))?;
        out.set_item("vy", series_array(data, n, ModelData::vy).into_pyarray(py))?;
        out.set_item(
            "speed",
            series_array(data, n, ModelData::speed).into_pyarray(py),
        )?;
        Ok(out)
    }

    /// Names of the balls in index order.
    fn get_names(&self) -> Vec<String> {
        self.sim.balls().iter().map(|b: &Ball| b.name.clone()).collect()
    }

    /// Total kinetic energy (unit masses).
    fn get_kinetic_energy(&self) -> f64 {
        self.sim.kinetic_energy()
    }
}

fn rows_to_array(rows: &[[f64; DIM]]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((rows.len(), DIM));
    for (i, row) in rows.iter().enumerate() {
        for (k, &val) in row.iter().enumerate() {
            arr[[i, k]] = val;
        }
    }
    arr
}

/// (M, N) array whose column `i` is `f(data, i)`.
fn series_array(data: &ModelData, n: usize, f: fn(&ModelData, usize) -> Vec<f64>) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((data.len(), n));
    for i in 0..n {
        for (row, val) in f(data, i).into_iter().enumerate() {
            arr[[row, i]] = val;
        }
    }
    arr
}

/// The ballsim Python module entry point.
#[pymodule]
fn ballsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BallSim>()?;
    Ok(())
}
