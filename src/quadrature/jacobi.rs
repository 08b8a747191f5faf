//! Jacobi polynomials and Gauss-Jacobi rules on [-1, 1]
//!
//! Weight function (1 - x)^a. Roots are found by Newton iteration with
//! deflation against the roots already located; weights follow from the
//! derivative of the degree-m polynomial at each root.

/// Value and first derivative of the Jacobi polynomial P^(a,0)_n at `x`,
/// by the three-term recurrence and its derivative.
fn jacobi_value_deriv(a: f64, n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let mut j = vec![0.0; n + 1];
    let mut jd = vec![0.0; n + 1];
    j[0] = 1.0;
    j[1] = (a + (a + 2.0) * x) / 2.0;
    jd[1] = (a + 2.0) / 2.0;
    for p in 2..=n {
        let pf = p as f64;
        let a1 = 2.0 * pf * (pf + a) * (2.0 * pf + a - 2.0);
        let a2 = (2.0 * pf + a - 1.0) * a * a;
        let a3 = (2.0 * pf + a - 2.0) * (2.0 * pf + a - 1.0) * (2.0 * pf + a);
        let a4 = 2.0 * (pf + a - 1.0) * (pf - 1.0) * (2.0 * pf + a);
        j[p] = ((a2 + a3 * x) * j[p - 1] - a4 * j[p - 2]) / a1;
        jd[p] = ((a2 + a3 * x) * jd[p - 1] + a3 * j[p - 1] - a4 * jd[p - 2]) / a1;
    }
    (j[n], jd[n])
}

/// Roots of P^(a,0)_m, ascending
fn gauss_jacobi_points(a: f64, m: usize) -> Vec<f64> {
    const MAX_ITER: usize = 100;
    const TOL: f64 = 1.0e-14;

    let mut pts = vec![0.0; m];
    for k in 0..m {
        // Chebyshev initial guess, averaged with the previous root
        let mut r = -(std::f64::consts::PI * (2.0 * k as f64 + 1.0) / (2.0 * m as f64)).cos();
        if k > 0 {
            r = 0.5 * (r + pts[k - 1]);
        }
        for _ in 0..MAX_ITER {
            let s: f64 = pts[..k].iter().map(|&p| 1.0 / (r - p)).sum();
            let (f, fp) = jacobi_value_deriv(a, m, r);
            let delta = f / (fp - f * s);
            r -= delta;
            if delta.abs() < TOL {
                break;
            }
        }
        pts[k] = r;
    }
    pts
}

/// m-point Gauss-Jacobi rule for the weight (1 - x)^a on [-1, 1]
pub fn gauss_jacobi_rule(a: f64, m: usize) -> (Vec<f64>, Vec<f64>) {
    let pts = gauss_jacobi_points(a, m);
    let scale = 2.0_f64.powf(a + 1.0);
    let wts = pts
        .iter()
        .map(|&x| {
            let (_, fp) = jacobi_value_deriv(a, m, x);
            scale / ((1.0 - x * x) * fp * fp)
        })
        .collect();
    (pts, wts)
}
