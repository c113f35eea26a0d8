//! Solver configuration.
//!
//! All fields have safe defaults, so `IpoptConfig::default()` is usable
//! without tuning. Legal values for string options (such as the linear solver
//! name) are validated by IPOPT itself when the options are applied; the
//! adapter only forwards them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How IPOPT obtains second-derivative information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HessianApproximation {
    /// The problem supplies the Hessian of the Lagrangian through
    /// [`Problem::hessian`](crate::Problem::hessian).
    Exact,
    /// Limited-memory quasi-Newton approximation (L-BFGS). The Hessian
    /// callback is never invoked.
    LimitedMemory,
}

impl HessianApproximation {
    pub(crate) fn as_option_value(self) -> &'static str {
        match self {
            HessianApproximation::Exact => "exact",
            HessianApproximation::LimitedMemory => "limited-memory",
        }
    }
}

/// Configuration for one [`IpoptSolver`](crate::IpoptSolver) instance.
///
/// The record is an explicit, caller-constructed value rather than a set of
/// process-wide defaults, so independent solver instances never share state.
/// Changing a field between solves affects only the next solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpoptConfig {
    /// Linear solver used for the KKT systems at each iteration:
    /// `ma27`, `ma57`, `ma77`, `ma86`, `ma97`, `mumps`, ... The HSL solvers
    /// must be compiled into the local IPOPT; an unavailable or unknown name
    /// is rejected by IPOPT as an invalid configuration.
    pub linear_solver: String,
    /// Second-derivative strategy.
    pub hessian_approximation: HessianApproximation,
    /// Desired relative convergence tolerance (IPOPT `tol`).
    pub tolerance: f64,
    /// CPU time limit in seconds, enforced by IPOPT (`max_cpu_time`).
    pub max_cpu_time: f64,
    /// Optional iteration limit (IPOPT `max_iter`).
    pub max_iterations: Option<i32>,
    /// Console verbosity, 0 (silent) through 12 (IPOPT `print_level`).
    pub print_level: i32,
    /// Echo the full option set at the start of the solve.
    pub print_user_options: bool,
    /// Print timing statistics after the solve.
    pub print_timing_statistics: bool,
    /// Force central finite differences for the constraint Jacobian even when
    /// the problem provides an analytical one.
    pub jacobian_approximation: bool,
    /// Step size for the central-difference derivative fallback.
    pub finite_difference_step: f64,
    /// When set, IPOPT writes its report to this file in addition to the
    /// console.
    pub output_file: Option<PathBuf>,
}

impl Default for IpoptConfig {
    fn default() -> Self {
        IpoptConfig {
            linear_solver: "ma27".to_string(),
            hessian_approximation: HessianApproximation::LimitedMemory,
            tolerance: 1e-3,
            max_cpu_time: 40.0,
            max_iterations: None,
            print_level: 3,
            print_user_options: false,
            print_timing_statistics: false,
            jacobian_approximation: false,
            finite_difference_step: 1e-8,
            output_file: None,
        }
    }
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
