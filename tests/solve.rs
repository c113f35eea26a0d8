//! End-to-end solves against the real IPOPT library.
//!
//! The test configurations select MUMPS as the linear solver, which ships
//! with every stock IPOPT build; the multi-solver case additionally probes
//! the HSL solvers and tolerates their absence.

use approx::assert_abs_diff_eq;
use ipopt_bridge::{
    HessianApproximation, IpoptConfig, IpoptSolver, NlpSolver, Problem, SolveError, SolveStatus,
    NEGATIVE_INFINITY, POSITIVE_INFINITY,
};
use rstest::rstest;

fn test_config() -> IpoptConfig {
    IpoptConfig {
        linear_solver: "mumps".to_string(),
        print_level: 0,
        ..IpoptConfig::default()
    }
}

/// Minimize x^2, unconstrained; optimum at x = 0.
struct Parabola {
    analytic_gradient: bool,
    solution: Vec<f64>,
    final_status: Option<SolveStatus>,
}

impl Parabola {
    fn new() -> Self {
        Parabola {
            analytic_gradient: true,
            solution: Vec::new(),
            final_status: None,
        }
    }
}

impl Problem for Parabola {
    fn num_variables(&self) -> usize {
        1
    }

    fn variable_bounds(&self, lower: &mut [f64], upper: &mut [f64]) {
        lower[0] = NEGATIVE_INFINITY;
        upper[0] = POSITIVE_INFINITY;
    }

    fn initial_point(&self, x: &mut [f64]) {
        x[0] = 2.0;
    }

    fn objective(&self, x: &[f64], value: &mut f64) -> bool {
        *value = x[0] * x[0];
        true
    }

    fn objective_gradient(&self, x: &[f64], gradient: &mut [f64]) -> bool {
        if !self.analytic_gradient {
            return false;
        }
        gradient[0] = 2.0 * x[0];
        true
    }

    fn set_solution(&mut self, x: &[f64], status: SolveStatus) {
        self.solution = x.to_vec();
        self.final_status = Some(status);
    }
}

/// Minimize (x-2)^2 + (y-2)^2 subject to x + y = 1; optimum at (0.5, 0.5).
struct ConstrainedDistance {
    analytic_jacobian: bool,
}

impl Problem for ConstrainedDistance {
    fn num_variables(&self) -> usize {
        2
    }

    fn num_constraints(&self) -> usize {
        1
    }

    fn variable_bounds(&self, _lower: &mut [f64], _upper: &mut [f64]) {}

    fn constraint_bounds(&self, lower: &mut [f64], upper: &mut [f64]) {
        lower[0] = 1.0;
        upper[0] = 1.0;
    }

    fn objective(&self, x: &[f64], value: &mut f64) -> bool {
        *value = (x[0] - 2.0).powi(2) + (x[1] - 2.0).powi(2);
        true
    }

    fn objective_gradient(&self, x: &[f64], gradient: &mut [f64]) -> bool {
        gradient[0] = 2.0 * (x[0] - 2.0);
        gradient[1] = 2.0 * (x[1] - 2.0);
        true
    }

    fn constraints(&self, x: &[f64], g: &mut [f64]) -> bool {
        g[0] = x[0] + x[1];
        true
    }

    fn jacobian(&self, _x: &[f64], values: &mut [f64]) -> bool {
        if !self.analytic_jacobian {
            return false;
        }
        values[0] = 1.0;
        values[1] = 1.0;
        true
    }
}

/// x >= 1 and x <= 0 simultaneously: no feasible point exists.
struct Contradiction;

impl Problem for Contradiction {
    fn num_variables(&self) -> usize {
        1
    }

    fn num_constraints(&self) -> usize {
        2
    }

    fn variable_bounds(&self, _lower: &mut [f64], _upper: &mut [f64]) {}

    fn constraint_bounds(&self, lower: &mut [f64], upper: &mut [f64]) {
        lower[0] = 1.0;
        upper[0] = POSITIVE_INFINITY;
        lower[1] = NEGATIVE_INFINITY;
        upper[1] = 0.0;
    }

    fn initial_point(&self, x: &mut [f64]) {
        x[0] = 0.5;
    }

    fn objective(&self, _x: &[f64], value: &mut f64) -> bool {
        *value = 0.0;
        true
    }

    fn constraints(&self, x: &[f64], g: &mut [f64]) -> bool {
        g[0] = x[0];
        g[1] = x[0];
        true
    }
}

/// The Rosenbrock valley; slow to traverse, optimum at (1, 1).
struct Rosenbrock;

impl Problem for Rosenbrock {
    fn num_variables(&self) -> usize {
        2
    }

    fn variable_bounds(&self, _lower: &mut [f64], _upper: &mut [f64]) {}

    fn initial_point(&self, x: &mut [f64]) {
        x[0] = -1.2;
        x[1] = 1.0;
    }

    fn objective(&self, x: &[f64], value: &mut f64) -> bool {
        *value = (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        true
    }

    fn objective_gradient(&self, x: &[f64], gradient: &mut [f64]) -> bool {
        gradient[0] = -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0] * x[0]);
        gradient[1] = 200.0 * (x[1] - x[0] * x[0]);
        true
    }

    fn hessian(&self, x: &[f64], obj_factor: f64, _lambda: &[f64], values: &mut [f64]) -> bool {
        // Dense lower triangle: (0,0), (1,0), (1,1).
        values[0] = obj_factor * (2.0 - 400.0 * (x[1] - x[0] * x[0]) + 800.0 * x[0] * x[0]);
        values[1] = obj_factor * (-400.0 * x[0]);
        values[2] = obj_factor * 200.0;
        true
    }
}

#[rstest]
#[case("mumps")]
#[case("ma27")]
#[case("ma57")]
fn each_available_linear_solver_finds_the_parabola_minimum(#[case] linear_solver: &str) {
    let mut config = test_config();
    config.linear_solver = linear_solver.to_string();
    let solver = IpoptSolver::new(config);

    let mut problem = Parabola::new();
    match solver.solve(&mut problem) {
        Ok(summary) => {
            assert!(summary.status.is_success());
            assert_abs_diff_eq!(summary.primal[0], 0.0, epsilon = 1e-2);
        }
        // HSL solvers are only present in licensed builds; their absence is
        // a configuration rejection, never a crash.
        Err(SolveError::InvalidConfiguration(_)) => {}
        Err(other) => panic!("unexpected failure with {linear_solver}: {other}"),
    }
}

#[test]
fn finite_difference_gradient_converges() {
    let solver = IpoptSolver::new(test_config());
    let mut problem = Parabola::new();
    problem.analytic_gradient = false;

    let summary = solver.solve(&mut problem).unwrap();
    assert_abs_diff_eq!(summary.primal[0], 0.0, epsilon = 1e-2);
}

#[test]
fn solution_and_status_are_written_back_to_the_problem() {
    let solver = IpoptSolver::new(test_config());
    let mut problem = Parabola::new();

    let summary = solver.solve(&mut problem).unwrap();
    assert_eq!(problem.solution, summary.primal);
    assert_eq!(problem.final_status, Some(summary.status));
    assert!(summary.objective < 1e-3);
}

#[test]
fn solving_twice_gives_the_same_answer() {
    let solver = IpoptSolver::new(test_config());
    let mut problem = Parabola::new();

    let first = solver.solve(&mut problem).unwrap();
    let second = solver.solve(&mut problem).unwrap();
    assert_eq!(first.status, second.status);
    assert_abs_diff_eq!(first.primal[0], second.primal[0], epsilon = 1e-8);
}

#[test]
fn analytic_and_approximated_jacobians_agree() {
    let mut analytic = ConstrainedDistance {
        analytic_jacobian: true,
    };
    let with_jacobian = IpoptSolver::new(test_config())
        .solve(&mut analytic)
        .unwrap();

    let mut config = test_config();
    config.jacobian_approximation = true;
    let mut approximated = ConstrainedDistance {
        analytic_jacobian: true,
    };
    let with_fd = IpoptSolver::new(config).solve(&mut approximated).unwrap();

    for summary in [&with_jacobian, &with_fd] {
        assert_abs_diff_eq!(summary.primal[0], 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(summary.primal[1], 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(summary.constraint_values[0], 1.0, epsilon = 1e-4);
    }
    assert_abs_diff_eq!(
        with_jacobian.primal[0],
        with_fd.primal[0],
        epsilon = 1e-4
    );
}

#[test]
fn missing_jacobian_falls_back_to_finite_differences() {
    let mut problem = ConstrainedDistance {
        analytic_jacobian: false,
    };
    let summary = IpoptSolver::new(test_config()).solve(&mut problem).unwrap();
    assert_abs_diff_eq!(summary.primal[0], 0.5, epsilon = 1e-3);
    assert_abs_diff_eq!(summary.primal[1], 0.5, epsilon = 1e-3);
}

#[test]
fn contradictory_constraints_are_reported_infeasible() {
    let solver = IpoptSolver::new(test_config());
    match solver.solve(&mut Contradiction) {
        Err(SolveError::Infeasible(summary)) => {
            assert_eq!(summary.status, SolveStatus::Infeasible);
        }
        other => panic!("expected infeasibility, got {other:?}"),
    }
}

#[test]
fn iteration_limit_stops_without_convergence() {
    let mut config = test_config();
    config.max_iterations = Some(1);
    let solver = IpoptSolver::new(config);

    match solver.solve(&mut Rosenbrock) {
        Err(SolveError::LimitReached(summary)) => {
            assert_eq!(summary.status, SolveStatus::IterationLimit);
        }
        other => panic!("expected an iteration limit, got {other:?}"),
    }
}

#[test]
fn cpu_time_limit_stops_without_convergence() {
    let mut config = test_config();
    config.max_cpu_time = 1e-6;
    let solver = IpoptSolver::new(config);

    match solver.solve(&mut Rosenbrock) {
        Err(SolveError::LimitReached(summary)) => {
            assert!(matches!(
                summary.status,
                SolveStatus::CpuTimeLimit | SolveStatus::WallTimeLimit
            ));
        }
        other => panic!("expected a time limit, got {other:?}"),
    }
}

#[test]
fn limit_errors_still_expose_the_last_iterate() {
    let mut config = test_config();
    config.max_iterations = Some(1);
    let err = IpoptSolver::new(config).solve(&mut Rosenbrock).unwrap_err();
    assert_eq!(err.summary().unwrap().primal.len(), 2);
}

#[test]
fn bogus_linear_solver_is_rejected_as_configuration_error() {
    let mut config = test_config();
    config.linear_solver = "definitely-not-a-linear-solver".to_string();
    let solver = IpoptSolver::new(config);

    match solver.solve(&mut Parabola::new()) {
        Err(SolveError::InvalidConfiguration(msg)) => {
            assert!(msg.contains("linear_solver"), "message was: {msg}");
        }
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn exact_hessian_solves_rosenbrock() {
    let mut config = test_config();
    config.hessian_approximation = HessianApproximation::Exact;
    config.tolerance = 1e-8;
    let solver = IpoptSolver::new(config);

    let summary = solver.solve(&mut Rosenbrock).unwrap();
    assert_abs_diff_eq!(summary.primal[0], 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(summary.primal[1], 1.0, epsilon = 1e-4);
}

#[test]
fn iteration_trace_is_captured() {
    let solver = IpoptSolver::new(test_config());
    let summary = solver.solve(&mut Rosenbrock).unwrap();

    assert!(!summary.iterations.is_empty());
    for window in summary.iterations.windows(2) {
        assert!(window[0].iteration < window[1].iteration);
    }
}

#[test]
fn output_file_receives_the_solver_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ipopt.log");

    let mut config = test_config();
    config.print_level = 4;
    config.output_file = Some(path.clone());
    IpoptSolver::new(config)
        .solve(&mut Parabola::new())
        .unwrap();

    let report = std::fs::read_to_string(&path).unwrap();
    assert!(!report.is_empty());
}

#[test]
fn problem_without_variables_is_rejected() {
    struct Empty;
    impl Problem for Empty {
        fn num_variables(&self) -> usize {
            0
        }
        fn variable_bounds(&self, _lower: &mut [f64], _upper: &mut [f64]) {}
        fn objective(&self, _x: &[f64], _value: &mut f64) -> bool {
            false
        }
    }

    match IpoptSolver::new(test_config()).solve(&mut Empty) {
        Err(SolveError::InvalidProblem(_)) => {}
        other => panic!("expected a problem-definition error, got {other:?}"),
    }
}
