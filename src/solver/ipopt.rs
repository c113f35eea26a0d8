//! The IPOPT adapter: builds a solver session from a configuration and a
//! problem, runs one blocking solve, and relays the result.

use super::callbacks::{self, SessionData};
use super::ffi;
use super::NlpSolver;
use crate::config::{yes_no, HessianApproximation, IpoptConfig};
use crate::problem::{Problem, NEGATIVE_INFINITY, POSITIVE_INFINITY};
use crate::status::{SolveError, SolveStatus, SolveSummary};
use libc::c_void;
use std::ffi::CString;
use std::mem;
use std::ptr;

/// Solves nonlinear programs by delegating to IPOPT.
///
/// The solver owns nothing but its configuration. Each call to
/// [`NlpSolver::solve`] creates a fresh session against the external library,
/// applies the configured options, runs the interior-point iteration to a
/// terminal state, and releases the session before returning.
#[derive(Debug, Clone, Default)]
pub struct IpoptSolver {
    pub config: IpoptConfig,
}

impl IpoptSolver {
    pub fn new(config: IpoptConfig) -> Self {
        IpoptSolver { config }
    }
}

impl NlpSolver for IpoptSolver {
    fn solve(&self, problem: &mut dyn Problem) -> Result<SolveSummary, SolveError> {
        if problem.num_variables() == 0 {
            return Err(SolveError::InvalidProblem(
                "problem declares no optimization variables".to_string(),
            ));
        }
        let mut session = Session::create(problem, &self.config)?;
        session.apply_options(&self.config)?;
        session.run().into_result()
    }
}

/// One invocation of the external solver. Owns the C-side problem object and
/// the callback state; both are released when the session drops, on every
/// exit path.
struct Session<'p> {
    raw: ffi::IpoptProblem,
    data: Box<SessionData<'p>>,
    n: usize,
    m: usize,
}

impl<'p> Session<'p> {
    fn create(problem: &'p mut dyn Problem, config: &IpoptConfig) -> Result<Self, SolveError> {
        let n = problem.num_variables();
        let m = problem.num_constraints();

        let mut x_lower = vec![NEGATIVE_INFINITY; n];
        let mut x_upper = vec![POSITIVE_INFINITY; n];
        problem.variable_bounds(&mut x_lower, &mut x_upper);

        let mut g_lower = vec![0.0; m];
        let mut g_upper = vec![0.0; m];
        problem.constraint_bounds(&mut g_lower, &mut g_upper);

        let exact_hessian = config.hessian_approximation == HessianApproximation::Exact;
        // Dense structures: the adapter never asks problems for sparsity.
        let nele_jac = to_index(n * m, "constraint Jacobian")?;
        let nele_hess = if exact_hessian {
            to_index(n * (n + 1) / 2, "Hessian")?
        } else {
            0
        };

        let data = Box::new(SessionData {
            problem,
            force_jacobian_fd: config.jacobian_approximation,
            fd_step: config.finite_difference_step,
            exact_hessian,
            iterations: Vec::new(),
        });

        // IPOPT copies the bound arrays during creation; the vectors may be
        // dropped afterwards.
        let raw = unsafe {
            ffi::CreateIpoptProblem(
                to_index(n, "variables")?,
                x_lower.as_mut_ptr(),
                x_upper.as_mut_ptr(),
                to_index(m, "constraints")?,
                g_lower.as_mut_ptr(),
                g_upper.as_mut_ptr(),
                nele_jac,
                nele_hess,
                ffi::IndexStyle::C_STYLE,
                Some(callbacks::eval_f),
                Some(callbacks::eval_g),
                Some(callbacks::eval_grad_f),
                Some(callbacks::eval_jac_g),
                Some(callbacks::eval_h),
            )
        };
        if raw.is_null() {
            return Err(SolveError::SessionCreation);
        }

        let session = Session { raw, data, n, m };
        unsafe {
            ffi::SetIntermediateCallback(session.raw, Some(callbacks::record_iteration));
        }
        Ok(session)
    }

    /// Stage the configuration into IPOPT's string-keyed option mechanism.
    /// IPOPT validates names and values; a rejected option surfaces as
    /// [`SolveError::InvalidConfiguration`] without running the solve.
    fn apply_options(&mut self, config: &IpoptConfig) -> Result<(), SolveError> {
        self.set_int("print_level", config.print_level)?;
        self.set_str("linear_solver", &config.linear_solver)?;
        self.set_str(
            "hessian_approximation",
            config.hessian_approximation.as_option_value(),
        )?;
        self.set_num("tol", config.tolerance)?;
        self.set_num("max_cpu_time", config.max_cpu_time)?;
        if let Some(max_iter) = config.max_iterations {
            self.set_int("max_iter", max_iter)?;
        }
        self.set_str("print_user_options", yes_no(config.print_user_options))?;
        self.set_str(
            "print_timing_statistics",
            yes_no(config.print_timing_statistics),
        )?;

        if let Some(path) = &config.output_file {
            let path = path.to_str().ok_or_else(|| {
                SolveError::InvalidConfiguration(
                    "output_file path is not valid UTF-8".to_string(),
                )
            })?;
            let c_path = option_cstring(path)?;
            let ok =
                unsafe { ffi::OpenIpoptOutputFile(self.raw, c_path.as_ptr(), config.print_level) };
            if ok == 0 {
                return Err(SolveError::InvalidConfiguration(format!(
                    "could not open output file `{path}`"
                )));
            }
        }
        Ok(())
    }

    fn set_str(&mut self, name: &str, value: &str) -> Result<(), SolveError> {
        let c_name = option_cstring(name)?;
        let c_value = option_cstring(value)?;
        let ok = unsafe { ffi::AddIpoptStrOption(self.raw, c_name.as_ptr(), c_value.as_ptr()) };
        if ok == 0 {
            return Err(SolveError::InvalidConfiguration(format!(
                "option `{name}` rejected value `{value}`"
            )));
        }
        Ok(())
    }

    fn set_num(&mut self, name: &str, value: f64) -> Result<(), SolveError> {
        let c_name = option_cstring(name)?;
        let ok = unsafe { ffi::AddIpoptNumOption(self.raw, c_name.as_ptr(), value) };
        if ok == 0 {
            return Err(SolveError::InvalidConfiguration(format!(
                "option `{name}` rejected value `{value}`"
            )));
        }
        Ok(())
    }

    fn set_int(&mut self, name: &str, value: i32) -> Result<(), SolveError> {
        let c_name = option_cstring(name)?;
        let ok = unsafe { ffi::AddIpoptIntOption(self.raw, c_name.as_ptr(), value) };
        if ok == 0 {
            return Err(SolveError::InvalidConfiguration(format!(
                "option `{name}` rejected value `{value}`"
            )));
        }
        Ok(())
    }

    /// Run the blocking solve and collect the terminal state. The final
    /// iterate is written back to the problem unconditionally; callers must
    /// inspect the status before trusting it.
    fn run(mut self) -> SolveSummary {
        let mut x = vec![0.0; self.n];
        self.data.problem.initial_point(&mut x);

        let mut g = vec![0.0; self.m];
        let mut objective = 0.0;

        let user_data = &mut *self.data as *mut SessionData as *mut c_void;
        let code = unsafe {
            ffi::IpoptSolve(
                self.raw,
                x.as_mut_ptr(),
                if self.m == 0 {
                    ptr::null_mut()
                } else {
                    g.as_mut_ptr()
                },
                &mut objective,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                user_data,
            )
        };

        let status = SolveStatus::from_raw(code);
        self.data.problem.set_solution(&x, status);

        SolveSummary {
            status,
            primal: x,
            objective,
            constraint_values: g,
            iterations: mem::take(&mut self.data.iterations),
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        unsafe {
            ffi::FreeIpoptProblem(self.raw);
        }
    }
}

fn to_index(value: usize, what: &str) -> Result<ffi::Index, SolveError> {
    ffi::Index::try_from(value).map_err(|_| {
        SolveError::InvalidProblem(format!("{what} dimension exceeds IPOPT's 32-bit index range"))
    })
}

fn option_cstring(value: &str) -> Result<CString, SolveError> {
    CString::new(value).map_err(|_| {
        SolveError::InvalidConfiguration(format!("option string contains a NUL byte: `{value}`"))
    })
}
