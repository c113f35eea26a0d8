//! The caller-supplied optimization problem.
//!
//! The adapter borrows a [`Problem`] for the duration of one solve. It reads
//! the structural metadata (variable and constraint counts, bounds) once when
//! the session is created, invokes the evaluation methods from inside IPOPT's
//! iteration loop, and hands the final iterate back through
//! [`Problem::set_solution`] before returning.

use crate::status::SolveStatus;

/// Lower bound treated as minus infinity by IPOPT.
pub const NEGATIVE_INFINITY: f64 = -1.0e19;
/// Upper bound treated as plus infinity by IPOPT.
pub const POSITIVE_INFINITY: f64 = 1.0e19;

/// A nonlinear program
///
/// ```text
///     min  f(x)        x in R^n
///     s.t. g_L <= g(x) <= g_U
///          x_L <=  x   <= x_U
/// ```
///
/// Evaluation methods return `bool`: `true` means the output slices were
/// populated, `false` signals an evaluation failure to IPOPT (it will try a
/// smaller step). The derivative methods additionally use `false` to mean
/// "not provided": the adapter then falls back to central finite differences
/// (for the gradient and Jacobian) or requires the limited-memory Hessian
/// approximation.
///
/// An equality constraint is expressed by giving `g_L` and `g_U` the same
/// value.
pub trait Problem {
    /// Number of optimization variables. Must be at least 1.
    fn num_variables(&self) -> usize;

    /// Number of constraint functions. Defaults to an unconstrained problem.
    fn num_constraints(&self) -> usize {
        0
    }

    /// Fill the per-variable lower and upper bounds. Both slices have
    /// `num_variables` elements and arrive pre-filled with
    /// [`NEGATIVE_INFINITY`] and [`POSITIVE_INFINITY`].
    fn variable_bounds(&self, lower: &mut [f64], upper: &mut [f64]);

    /// Fill the per-constraint lower and upper bounds. Both slices have
    /// `num_constraints` elements and arrive zero-filled.
    fn constraint_bounds(&self, _lower: &mut [f64], _upper: &mut [f64]) {}

    /// Fill the initial guess. The slice arrives zero-filled, so leaving it
    /// untouched starts the solve at the origin.
    fn initial_point(&self, _x: &mut [f64]) {}

    /// Evaluate the objective `f(x)`.
    fn objective(&self, x: &[f64], value: &mut f64) -> bool;

    /// Evaluate the objective gradient. Return `false` to have the adapter
    /// approximate it by central differences.
    fn objective_gradient(&self, _x: &[f64], _gradient: &mut [f64]) -> bool {
        false
    }

    /// Evaluate the constraint functions `g(x)`. The output slice has
    /// `num_constraints` elements.
    fn constraints(&self, _x: &[f64], _g: &mut [f64]) -> bool {
        true
    }

    /// Evaluate the dense constraint Jacobian in row-major order:
    /// `values[i * n + j] = d g_i / d x_j`. Return `false` to have the
    /// adapter approximate it by central differences. Also bypassed entirely
    /// when [`IpoptConfig::jacobian_approximation`] is set.
    ///
    /// [`IpoptConfig::jacobian_approximation`]:
    /// crate::IpoptConfig::jacobian_approximation
    fn jacobian(&self, _x: &[f64], _values: &mut [f64]) -> bool {
        false
    }

    /// Evaluate the dense lower triangle of the Hessian of the Lagrangian
    /// `obj_factor * f''(x) + sum_i lambda[i] * g_i''(x)`, row by row:
    /// entry `(i, j)` with `j <= i` lands at index `i * (i + 1) / 2 + j`.
    ///
    /// Only called when the configuration selects
    /// [`HessianApproximation::Exact`](crate::HessianApproximation::Exact);
    /// the default limited-memory approximation needs no second derivatives.
    fn hessian(
        &self,
        _x: &[f64],
        _obj_factor: f64,
        _lambda: &[f64],
        _values: &mut [f64],
    ) -> bool {
        false
    }

    /// Receive the final iterate and terminal status after the solve. Called
    /// on every exit path, including failures, so the stored point is the
    /// solver's last iterate and must not be trusted without inspecting the
    /// status.
    fn set_solution(&mut self, _x: &[f64], _status: SolveStatus) {}
}
