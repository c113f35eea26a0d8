//! C-style callback functions that bridge the caller's [`Problem`] to IPOPT.
//!
//! These `extern "C"` functions are handed to the IPOPT C API as function
//! pointers. Each one is a thin trampoline: it recovers the session state
//! from `user_data`, converts the raw buffers to slices, and calls into the
//! safe problem methods. A panic inside a problem method must not unwind
//! across the C boundary, so every evaluation body runs under
//! `catch_unwind` and reports failure to IPOPT instead.

use super::ffi::{Bool, Index, Number};
use crate::fd;
use crate::problem::Problem;
use crate::status::IterationRecord;
use libc::c_void;
use std::panic::{catch_unwind, UnwindSafe};
use std::slice;

/// Per-solve state shared with the callbacks through IPOPT's `user_data`
/// pointer. Lives exactly as long as the session that owns it.
pub(super) struct SessionData<'p> {
    pub problem: &'p mut dyn Problem,
    /// Bypass the problem's Jacobian and always use finite differences.
    pub force_jacobian_fd: bool,
    /// Step size for the central-difference fallbacks.
    pub fd_step: f64,
    /// Whether the Hessian callback should forward to the problem.
    pub exact_hessian: bool,
    pub iterations: Vec<IterationRecord>,
}

/// Run an evaluation body under `catch_unwind`, converting the outcome to
/// IPOPT's C boolean. `false`/panic both surface as an evaluation failure,
/// which makes IPOPT retry with a smaller step or abort the solve.
fn guard<F>(body: F) -> Bool
where
    F: FnOnce() -> bool + UnwindSafe,
{
    match catch_unwind(body) {
        Ok(ok) => ok as Bool,
        Err(_) => {
            eprintln!("ipopt-bridge: panic inside an IPOPT evaluation callback");
            0
        }
    }
}

/// Recover the session state from IPOPT's opaque `user_data` pointer.
unsafe fn session_mut<'a>(user_data: *mut c_void) -> &'a mut SessionData<'a> {
    &mut *(user_data as *mut SessionData)
}

pub(super) extern "C" fn eval_f(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    obj_value: *mut Number,
    user_data: *mut c_void,
) -> Bool {
    guard(move || {
        let session = unsafe { session_mut(user_data) };
        let x = unsafe { slice::from_raw_parts(x, n as usize) };
        let value = unsafe { &mut *obj_value };
        session.problem.objective(x, value)
    })
}

pub(super) extern "C" fn eval_grad_f(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    grad_f: *mut Number,
    user_data: *mut c_void,
) -> Bool {
    guard(move || {
        let session = unsafe { session_mut(user_data) };
        let step = session.fd_step;
        let x = unsafe { slice::from_raw_parts(x, n as usize) };
        let gradient = unsafe { slice::from_raw_parts_mut(grad_f, n as usize) };

        let problem: &dyn Problem = &*session.problem;
        if problem.objective_gradient(x, gradient) {
            return true;
        }
        fd::central_gradient(|p, v| problem.objective(p, v), x, step, gradient)
    })
}

pub(super) extern "C" fn eval_g(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    m: Index,
    g: *mut Number,
    user_data: *mut c_void,
) -> Bool {
    if m == 0 {
        return 1;
    }
    guard(move || {
        let session = unsafe { session_mut(user_data) };
        let x = unsafe { slice::from_raw_parts(x, n as usize) };
        let g = unsafe { slice::from_raw_parts_mut(g, m as usize) };
        session.problem.constraints(x, g)
    })
}

#[allow(non_snake_case)]
pub(super) extern "C" fn eval_jac_g(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    m: Index,
    nele_jac: Index,
    iRow: *mut Index,
    jCol: *mut Index,
    values: *mut Number,
    user_data: *mut c_void,
) -> Bool {
    if nele_jac == 0 {
        return 1;
    }

    // A null `values` pointer means IPOPT is asking for the sparsity
    // structure. The adapter always declares a dense row-major Jacobian.
    if values.is_null() {
        let rows = unsafe { slice::from_raw_parts_mut(iRow, nele_jac as usize) };
        let cols = unsafe { slice::from_raw_parts_mut(jCol, nele_jac as usize) };
        let mut idx = 0;
        for r in 0..m {
            for c in 0..n {
                rows[idx] = r;
                cols[idx] = c;
                idx += 1;
            }
        }
        return 1;
    }

    guard(move || {
        let session = unsafe { session_mut(user_data) };
        let step = session.fd_step;
        let force_fd = session.force_jacobian_fd;
        let x = unsafe { slice::from_raw_parts(x, n as usize) };
        let values = unsafe { slice::from_raw_parts_mut(values, nele_jac as usize) };

        let problem: &dyn Problem = &*session.problem;
        if !force_fd && problem.jacobian(x, values) {
            return true;
        }
        fd::central_jacobian(
            |p, g| problem.constraints(p, g),
            x,
            m as usize,
            step,
            values,
        )
    })
}

#[allow(non_snake_case)]
pub(super) extern "C" fn eval_h(
    n: Index,
    x: *mut Number,
    _new_x: Bool,
    obj_factor: Number,
    m: Index,
    lambda: *mut Number,
    _new_lambda: Bool,
    nele_hess: Index,
    iRow: *mut Index,
    jCol: *mut Index,
    values: *mut Number,
    user_data: *mut c_void,
) -> Bool {
    if values.is_null() {
        // Sparsity structure: dense lower triangle, row by row.
        let rows = unsafe { slice::from_raw_parts_mut(iRow, nele_hess as usize) };
        let cols = unsafe { slice::from_raw_parts_mut(jCol, nele_hess as usize) };
        let mut idx = 0;
        for r in 0..n {
            for c in 0..=r {
                rows[idx] = r;
                cols[idx] = c;
                idx += 1;
            }
        }
        return 1;
    }

    guard(move || {
        let session = unsafe { session_mut(user_data) };
        if !session.exact_hessian {
            // With the quasi-Newton approximation the callback is never
            // invoked; per the IPOPT docs it must still exist and return
            // failure if it is.
            return false;
        }
        let x = unsafe { slice::from_raw_parts(x, n as usize) };
        let lambda = if m == 0 {
            &[][..]
        } else {
            unsafe { slice::from_raw_parts(lambda, m as usize) }
        };
        let values = unsafe { slice::from_raw_parts_mut(values, nele_hess as usize) };
        session.problem.hessian(x, obj_factor, lambda, values)
    })
}

/// Executed by IPOPT at the end of each iteration; captures the iteration
/// trace for the solve summary. Returning `false` here would abort the
/// solve, which the adapter never does.
pub(super) extern "C" fn record_iteration(
    _alg_mod: Index,
    iter_count: Index,
    obj_value: Number,
    inf_pr: Number,
    inf_du: Number,
    _mu: Number,
    _d_norm: Number,
    _regularization_size: Number,
    _alpha_du: Number,
    _alpha_pr: Number,
    _ls_trials: Index,
    user_data: *mut c_void,
) -> Bool {
    guard(move || {
        let session = unsafe { session_mut(user_data) };
        session.iterations.push(IterationRecord {
            iteration: iter_count,
            objective: obj_value,
            primal_infeasibility: inf_pr,
            dual_infeasibility: inf_du,
        });
        true
    })
}
