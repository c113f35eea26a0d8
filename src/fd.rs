//! Central-difference derivative approximations.
//!
//! Used when a problem does not provide analytical derivatives, or when the
//! configuration forces the finite-difference Jacobian path.

/// Approximate the gradient of a scalar function by central differences.
///
/// `eval` fills the function value at a probe point and reports success.
/// Returns `false` as soon as any probe evaluation fails.
pub(crate) fn central_gradient<F>(mut eval: F, x: &[f64], step: f64, gradient: &mut [f64]) -> bool
where
    F: FnMut(&[f64], &mut f64) -> bool,
{
    let mut probe = x.to_vec();
    for j in 0..x.len() {
        let xj = probe[j];
        let mut plus = 0.0;
        let mut minus = 0.0;

        probe[j] = xj + step;
        if !eval(&probe, &mut plus) {
            return false;
        }
        probe[j] = xj - step;
        if !eval(&probe, &mut minus) {
            return false;
        }
        probe[j] = xj;

        gradient[j] = (plus - minus) / (2.0 * step);
    }
    true
}

/// Approximate a dense row-major Jacobian of `m` functions by central
/// differences: `jacobian[i * n + j] = d g_i / d x_j`.
pub(crate) fn central_jacobian<F>(
    mut eval: F,
    x: &[f64],
    m: usize,
    step: f64,
    jacobian: &mut [f64],
) -> bool
where
    F: FnMut(&[f64], &mut [f64]) -> bool,
{
    let n = x.len();
    let mut probe = x.to_vec();
    let mut plus = vec![0.0; m];
    let mut minus = vec![0.0; m];

    for j in 0..n {
        let xj = probe[j];

        probe[j] = xj + step;
        if !eval(&probe, &mut plus) {
            return false;
        }
        probe[j] = xj - step;
        if !eval(&probe, &mut minus) {
            return false;
        }
        probe[j] = xj;

        for i in 0..m {
            jacobian[i * n + j] = (plus[i] - minus[i]) / (2.0 * step);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gradient_matches_analytic_derivatives() {
        // f(x, y) = x^2 + 3y, grad = (2x, 3)
        let f = |p: &[f64], v: &mut f64| {
            *v = p[0] * p[0] + 3.0 * p[1];
            true
        };
        let mut gradient = [0.0; 2];
        assert!(central_gradient(f, &[1.0, 2.0], 1e-6, &mut gradient));
        assert_abs_diff_eq!(gradient[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gradient[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn gradient_reports_evaluation_failure() {
        let f = |_: &[f64], _: &mut f64| false;
        let mut gradient = [0.0; 1];
        assert!(!central_gradient(f, &[1.0], 1e-6, &mut gradient));
    }

    #[test]
    fn jacobian_matches_analytic_derivatives() {
        // g(x, y) = (x * y, x + y)
        let g = |p: &[f64], out: &mut [f64]| {
            out[0] = p[0] * p[1];
            out[1] = p[0] + p[1];
            true
        };
        let mut jacobian = [0.0; 4];
        assert!(central_jacobian(g, &[2.0, 5.0], 2, 1e-6, &mut jacobian));
        // Row 0: (y, x); row 1: (1, 1).
        assert_abs_diff_eq!(jacobian[0], 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(jacobian[1], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(jacobian[2], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(jacobian[3], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn probe_point_is_restored_between_columns() {
        // A function sensitive to both coordinates at once would expose a
        // probe that was not reset after the previous column.
        let g = |p: &[f64], out: &mut [f64]| {
            out[0] = p[0] * p[1];
            true
        };
        let mut jacobian = [0.0; 2];
        assert!(central_jacobian(g, &[3.0, 7.0], 1, 1e-6, &mut jacobian));
        assert_abs_diff_eq!(jacobian[0], 7.0, epsilon = 1e-5);
        assert_abs_diff_eq!(jacobian[1], 3.0, epsilon = 1e-5);
    }
}
