//! Raw FFI declarations for the IPOPT C interface.
//!
//! These mirror `IpoptStdCInterface.h`. `IpoptSolve` is declared as returning
//! a plain `c_int` rather than a C enum so that status codes added by newer
//! IPOPT releases cannot produce an invalid enum value on the Rust side; the
//! mapping lives in [`SolveStatus::from_raw`](crate::SolveStatus).

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use libc::{c_char, c_int, c_void};

pub type Index = c_int;
pub type Number = f64;
// IPOPT's C interface uses 'int' as its boolean type.
pub type Bool = c_int;

/// Opaque pointer to the C-side problem object.
pub type IpoptProblem = *mut c_void;

/// Zero-based (C) or one-based (Fortran) sparse index numbering.
#[repr(C)]
pub enum IndexStyle {
    C_STYLE = 0,
    #[allow(dead_code)]
    FORTRAN_STYLE = 1,
}

// --- Callback function pointer types ---

pub type Eval_F_CB = extern "C" fn(
    n: Index,
    x: *mut Number,
    new_x: Bool,
    obj_value: *mut Number,
    user_data: *mut c_void,
) -> Bool;

pub type Eval_Grad_F_CB = extern "C" fn(
    n: Index,
    x: *mut Number,
    new_x: Bool,
    grad_f: *mut Number,
    user_data: *mut c_void,
) -> Bool;

pub type Eval_G_CB = extern "C" fn(
    n: Index,
    x: *mut Number,
    new_x: Bool,
    m: Index,
    g: *mut Number,
    user_data: *mut c_void,
) -> Bool;

pub type Eval_Jac_G_CB = extern "C" fn(
    n: Index,
    x: *mut Number,
    new_x: Bool,
    m: Index,
    nele_jac: Index,
    iRow: *mut Index,
    jCol: *mut Index,
    values: *mut Number,
    user_data: *mut c_void,
) -> Bool;

pub type Eval_H_CB = extern "C" fn(
    n: Index,
    x: *mut Number,
    new_x: Bool,
    obj_factor: Number,
    m: Index,
    lambda: *mut Number,
    new_lambda: Bool,
    nele_hess: Index,
    iRow: *mut Index,
    jCol: *mut Index,
    values: *mut Number,
    user_data: *mut c_void,
) -> Bool;

pub type Intermediate_CB = extern "C" fn(
    alg_mod: Index,
    iter_count: Index,
    obj_value: Number,
    inf_pr: Number,
    inf_du: Number,
    mu: Number,
    d_norm: Number,
    regularization_size: Number,
    alpha_du: Number,
    alpha_pr: Number,
    ls_trials: Index,
    user_data: *mut c_void,
) -> Bool;

#[link(name = "ipopt")]
extern "C" {
    pub fn CreateIpoptProblem(
        n: Index,
        x_L: *mut Number,
        x_U: *mut Number,
        m: Index,
        g_L: *mut Number,
        g_U: *mut Number,
        nele_jac: Index,
        nele_hess: Index,
        index_style: IndexStyle,
        eval_f: Option<Eval_F_CB>,
        eval_g: Option<Eval_G_CB>,
        eval_grad_f: Option<Eval_Grad_F_CB>,
        eval_jac_g: Option<Eval_Jac_G_CB>,
        eval_h: Option<Eval_H_CB>,
    ) -> IpoptProblem;

    pub fn FreeIpoptProblem(ipopt_problem: IpoptProblem);

    pub fn AddIpoptStrOption(
        ipopt_problem: IpoptProblem,
        keyword: *const c_char,
        val: *const c_char,
    ) -> Bool;

    pub fn AddIpoptNumOption(
        ipopt_problem: IpoptProblem,
        keyword: *const c_char,
        val: Number,
    ) -> Bool;

    pub fn AddIpoptIntOption(
        ipopt_problem: IpoptProblem,
        keyword: *const c_char,
        val: c_int,
    ) -> Bool;

    pub fn OpenIpoptOutputFile(
        ipopt_problem: IpoptProblem,
        file_name: *const c_char,
        print_level: c_int,
    ) -> Bool;

    pub fn SetIntermediateCallback(
        ipopt_problem: IpoptProblem,
        intermediate_cb: Option<Intermediate_CB>,
    ) -> Bool;

    pub fn IpoptSolve(
        ipopt_problem: IpoptProblem,
        x: *mut Number,
        g: *mut Number,
        obj_val: *mut Number,
        mult_g: *mut Number,
        mult_x_L: *mut Number,
        mult_x_U: *mut Number,
        user_data: *mut c_void,
    ) -> c_int;
}
