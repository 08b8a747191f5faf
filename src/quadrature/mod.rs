//! Quadrature rules on the reference simplices
//!
//! Gauss-Jacobi product rules collapsed onto the triangle and tetrahedron.
//! The collapsed coordinates absorb the simplex Jacobian into the Jacobi
//! weights (alpha = 1 for the second direction, alpha = 2 for the third),
//! so the rules stay exact for the requested polynomial degree.

mod jacobi;

pub use jacobi::gauss_jacobi_rule;

use ndarray::{Array1, Array2};

/// Create a rule exact for polynomials up to `degree` on the reference cell
/// of topological dimension `tdim`. Returns (points, weights), one point
/// per row in reference coordinates.
pub fn make_quadrature(tdim: usize, degree: usize) -> (Array2<f64>, Array1<f64>) {
    let m = (degree + 2) / 2;
    match tdim {
        1 => interval_rule(m),
        2 => triangle_rule(m),
        3 => tetrahedron_rule(m),
        _ => panic!("no quadrature rule for topological dimension {tdim}"),
    }
}

/// m-point Gauss-Legendre rule rescaled to [0, 1]
fn interval_rule(m: usize) -> (Array2<f64>, Array1<f64>) {
    let (gx, gw) = gauss_jacobi_rule(0.0, m);
    let mut pts = Array2::zeros((m, 1));
    let mut wts = Array1::zeros(m);
    for i in 0..m {
        pts[[i, 0]] = 0.5 * (gx[i] + 1.0);
        wts[i] = 0.5 * gw[i];
    }
    (pts, wts)
}

/// m^2-point collapsed rule on the reference triangle
fn triangle_rule(m: usize) -> (Array2<f64>, Array1<f64>) {
    let (gx, gw) = gauss_jacobi_rule(0.0, m);
    let (gy, gv) = gauss_jacobi_rule(1.0, m);
    let mut pts = Array2::zeros((m * m, 2));
    let mut wts = Array1::zeros(m * m);
    let mut c = 0;
    for i in 0..m {
        for j in 0..m {
            pts[[c, 0]] = 0.25 * (1.0 + gx[i]) * (1.0 - gy[j]);
            pts[[c, 1]] = 0.5 * (1.0 + gy[j]);
            wts[c] = 0.125 * gw[i] * gv[j];
            c += 1;
        }
    }
    (pts, wts)
}

/// m^3-point collapsed rule on the reference tetrahedron
fn tetrahedron_rule(m: usize) -> (Array2<f64>, Array1<f64>) {
    let (gx, gw) = gauss_jacobi_rule(0.0, m);
    let (gy, gv) = gauss_jacobi_rule(1.0, m);
    let (gz, gu) = gauss_jacobi_rule(2.0, m);
    let mut pts = Array2::zeros((m * m * m, 3));
    let mut wts = Array1::zeros(m * m * m);
    let mut c = 0;
    for i in 0..m {
        for j in 0..m {
            for k in 0..m {
                pts[[c, 0]] = 0.125 * (1.0 + gx[i]) * (1.0 - gy[j]) * (1.0 - gz[k]);
                pts[[c, 1]] = 0.25 * (1.0 + gy[j]) * (1.0 - gz[k]);
                pts[[c, 2]] = 0.5 * (1.0 + gz[k]);
                wts[c] = gw[i] * gv[j] * gu[k] / 64.0;
                c += 1;
            }
        }
    }
    (pts, wts)
}
