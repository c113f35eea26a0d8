//! A thin, safe adapter for solving nonlinear programs with
//! [IPOPT](https://coin-or.github.io/Ipopt/), the COIN-OR interior-point
//! optimizer.
//!
//! This crate implements no optimization algorithm of its own. It stages
//! configuration, translates a caller-supplied [`Problem`] into the calling
//! conventions of the IPOPT C interface (bound arrays plus evaluation
//! callbacks), runs one blocking solve, and relays the terminal status and
//! final iterate back to the caller.
//!
//! ```no_run
//! use ipopt_bridge::{IpoptConfig, IpoptSolver, NlpSolver, Problem};
//!
//! // Minimize x^2, unconstrained.
//! struct Parabola {
//!     solution: Vec<f64>,
//! }
//!
//! impl Problem for Parabola {
//!     fn num_variables(&self) -> usize {
//!         1
//!     }
//!     fn variable_bounds(&self, lower: &mut [f64], upper: &mut [f64]) {
//!         lower[0] = ipopt_bridge::NEGATIVE_INFINITY;
//!         upper[0] = ipopt_bridge::POSITIVE_INFINITY;
//!     }
//!     fn initial_point(&self, x: &mut [f64]) {
//!         x[0] = 2.0;
//!     }
//!     fn objective(&self, x: &[f64], value: &mut f64) -> bool {
//!         *value = x[0] * x[0];
//!         true
//!     }
//!     fn objective_gradient(&self, x: &[f64], gradient: &mut [f64]) -> bool {
//!         gradient[0] = 2.0 * x[0];
//!         true
//!     }
//!     fn set_solution(&mut self, x: &[f64], _status: ipopt_bridge::SolveStatus) {
//!         self.solution = x.to_vec();
//!     }
//! }
//!
//! let mut problem = Parabola { solution: Vec::new() };
//! let solver = IpoptSolver::new(IpoptConfig::default());
//! let summary = solver.solve(&mut problem).unwrap();
//! assert!(summary.objective.abs() < 1e-3);
//! ```

pub mod config;
mod fd;
pub mod problem;
pub mod solver;
pub mod status;

pub use config::{HessianApproximation, IpoptConfig};
pub use problem::{Problem, NEGATIVE_INFINITY, POSITIVE_INFINITY};
pub use solver::{IpoptSolver, NlpSolver};
pub use status::{IterationRecord, SolveError, SolveStatus, SolveSummary};
