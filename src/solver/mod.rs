//! Solver backends. The IPOPT adapter is the only implementation; the
//! [`NlpSolver`] trait keeps the backend swappable without touching problem
//! definitions.
mod callbacks;
mod ffi;
mod ipopt;

pub use ipopt::IpoptSolver;

use crate::problem::Problem;
use crate::status::{SolveError, SolveSummary};

/// A backend capable of solving one nonlinear program per call.
///
/// `solve` blocks the calling thread until the backend reaches a terminal
/// state. The problem is borrowed for the duration of the call only; its
/// stored solution is the single observable side effect. Concurrent solves
/// require independent solver instances.
pub trait NlpSolver {
    /// Run one blocking solve and classify the terminal state.
    fn solve(&self, problem: &mut dyn Problem) -> Result<SolveSummary, SolveError>;
}
