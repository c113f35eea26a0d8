//! Terminal solver states and the adapter's error taxonomy.
//!
//! The adapter performs no recovery: IPOPT's terminal status is forwarded
//! unchanged, classified into a small set of error categories. The problem is
//! left at whatever iterate the solver last produced, and that iterate is also
//! carried inside the error so callers can inspect it.

use libc::c_int;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Terminal state of one IPOPT invocation, mirroring the
/// `ApplicationReturnStatus` codes of the C interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A locally optimal point was found within the desired tolerance.
    Succeeded,
    /// Converged to the "acceptable" tolerance but not the desired one.
    AcceptableLevel,
    /// A feasible point for a square problem was found.
    FeasiblePointFound,
    /// The restoration phase converged to a minimizer of the constraint
    /// violation that is not feasible: the problem is likely infeasible.
    Infeasible,
    /// Step sizes became too small to make further progress.
    SearchDirectionTooSmall,
    /// Iterates diverged; the problem may be unbounded below.
    DivergingIterates,
    /// The intermediate callback requested a stop.
    UserRequestedStop,
    /// `max_iter` reached without convergence.
    IterationLimit,
    /// `max_cpu_time` reached without convergence.
    CpuTimeLimit,
    /// `max_wall_time` reached without convergence.
    WallTimeLimit,
    /// The restoration phase failed.
    RestorationFailed,
    /// The search-direction computation broke down.
    StepComputationError,
    /// Fewer degrees of freedom than equality constraints.
    TooFewDegreesOfFreedom,
    /// IPOPT rejected the problem definition (inconsistent dimensions or
    /// bounds).
    InvalidProblemDefinition,
    /// An option name or value was rejected.
    InvalidOption,
    /// NaN or infinity appeared during evaluation.
    InvalidNumberDetected,
    /// Unrecoverable exception inside IPOPT.
    UnrecoverableException,
    /// An evaluation callback failed or threw.
    CallbackError,
    /// IPOPT ran out of memory.
    InsufficientMemory,
    /// Any other solver-internal error.
    InternalError,
}

impl SolveStatus {
    /// Map a raw `ApplicationReturnStatus` code. Unknown codes collapse to
    /// [`SolveStatus::InternalError`].
    pub(crate) fn from_raw(code: c_int) -> Self {
        match code {
            0 => SolveStatus::Succeeded,
            1 => SolveStatus::AcceptableLevel,
            2 => SolveStatus::Infeasible,
            3 => SolveStatus::SearchDirectionTooSmall,
            4 => SolveStatus::DivergingIterates,
            5 => SolveStatus::UserRequestedStop,
            6 => SolveStatus::FeasiblePointFound,
            -1 => SolveStatus::IterationLimit,
            -2 => SolveStatus::RestorationFailed,
            -3 => SolveStatus::StepComputationError,
            -4 => SolveStatus::CpuTimeLimit,
            -5 => SolveStatus::WallTimeLimit,
            -10 => SolveStatus::TooFewDegreesOfFreedom,
            -11 => SolveStatus::InvalidProblemDefinition,
            -12 => SolveStatus::InvalidOption,
            -13 => SolveStatus::InvalidNumberDetected,
            -100 => SolveStatus::UnrecoverableException,
            -101 => SolveStatus::CallbackError,
            -102 => SolveStatus::InsufficientMemory,
            _ => SolveStatus::InternalError,
        }
    }

    /// Whether the status represents a converged (or acceptably converged)
    /// solve. Everything else classifies into a [`SolveError`] category.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            SolveStatus::Succeeded
                | SolveStatus::AcceptableLevel
                | SolveStatus::FeasiblePointFound
        )
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SolveStatus::Succeeded => "optimal solution found",
            SolveStatus::AcceptableLevel => "solved to acceptable level",
            SolveStatus::FeasiblePointFound => "feasible point found",
            SolveStatus::Infeasible => "converged to a point of local infeasibility",
            SolveStatus::SearchDirectionTooSmall => "search direction became too small",
            SolveStatus::DivergingIterates => "iterates diverging",
            SolveStatus::UserRequestedStop => "stopped at user request",
            SolveStatus::IterationLimit => "maximum number of iterations exceeded",
            SolveStatus::CpuTimeLimit => "maximum CPU time exceeded",
            SolveStatus::WallTimeLimit => "maximum wall time exceeded",
            SolveStatus::RestorationFailed => "restoration phase failed",
            SolveStatus::StepComputationError => "error in step computation",
            SolveStatus::TooFewDegreesOfFreedom => "not enough degrees of freedom",
            SolveStatus::InvalidProblemDefinition => "invalid problem definition",
            SolveStatus::InvalidOption => "invalid option",
            SolveStatus::InvalidNumberDetected => "invalid number detected",
            SolveStatus::UnrecoverableException => "unrecoverable exception",
            SolveStatus::CallbackError => "evaluation callback failed",
            SolveStatus::InsufficientMemory => "insufficient memory",
            SolveStatus::InternalError => "internal solver error",
        };
        f.write_str(msg)
    }
}

/// One row of IPOPT's iteration log, captured through the intermediate
/// callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: i32,
    /// Unscaled objective value at the current iterate.
    pub objective: f64,
    /// Unscaled primal infeasibility (max constraint violation).
    pub primal_infeasibility: f64,
    /// Scaled dual infeasibility.
    pub dual_infeasibility: f64,
}

/// Outcome of one solve: the terminal status plus everything IPOPT wrote
/// back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Terminal solver status.
    pub status: SolveStatus,
    /// Final primal iterate. Only a solution when `status.is_success()`.
    pub primal: Vec<f64>,
    /// Objective value at the final iterate.
    pub objective: f64,
    /// Constraint values at the final iterate.
    pub constraint_values: Vec<f64>,
    /// Per-iteration trace.
    pub iterations: Vec<IterationRecord>,
}

impl SolveSummary {
    /// Classify the terminal status into the adapter's error taxonomy.
    pub(crate) fn into_result(self) -> Result<SolveSummary, SolveError> {
        match self.status {
            status if status.is_success() => Ok(self),
            SolveStatus::Infeasible => Err(SolveError::Infeasible(self)),
            SolveStatus::IterationLimit
            | SolveStatus::CpuTimeLimit
            | SolveStatus::WallTimeLimit
            | SolveStatus::UserRequestedStop => Err(SolveError::LimitReached(self)),
            SolveStatus::InvalidOption => Err(SolveError::InvalidConfiguration(
                "an option value was rejected at solve time".to_string(),
            )),
            SolveStatus::InvalidProblemDefinition | SolveStatus::TooFewDegreesOfFreedom => {
                Err(SolveError::InvalidProblem(self.status.to_string()))
            }
            _ => Err(SolveError::Numerical(self)),
        }
    }
}

/// Why a solve did not produce a converged solution.
///
/// The variants carrying a [`SolveSummary`] still expose the solver's last
/// iterate; it was also written back to the problem via
/// [`Problem::set_solution`](crate::Problem::set_solution).
#[derive(Debug, Error)]
pub enum SolveError {
    /// IPOPT rejected an option name or value.
    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),
    /// IPOPT rejected the problem structure itself.
    #[error("invalid problem definition: {0}")]
    InvalidProblem(String),
    /// The solver session could not be created.
    #[error("failed to create an IPOPT session")]
    SessionCreation,
    /// The solver determined that no feasible point exists (locally).
    #[error("problem appears locally infeasible")]
    Infeasible(SolveSummary),
    /// An iteration, CPU-time, or wall-time limit stopped the solve before
    /// convergence.
    #[error("stopped before convergence: {}", .0.status)]
    LimitReached(SolveSummary),
    /// Solver-internal numerical breakdown.
    #[error("numerical failure: {}", .0.status)]
    Numerical(SolveSummary),
}

impl SolveError {
    /// The summary of the failed solve, when the solver ran at all.
    pub fn summary(&self) -> Option<&SolveSummary> {
        match self {
            SolveError::Infeasible(s)
            | SolveError::LimitReached(s)
            | SolveError::Numerical(s) => Some(s),
            _ => None,
        }
    }
}
