//! Orthonormal polynomial expansion sets on the reference simplices
//!
//! Tabulates the orthonormal (Dubiner-style) basis of the complete
//! polynomial space for a cell and degree, ordered by total degree. The
//! collapsed-coordinate recurrences are written in a singularity-free form,
//! so evaluation is valid on the whole closed cell.

use crate::cell::CellType;
use ndarray::Array2;

/// Dimension of the complete polynomial space of `degree` on the cell
pub fn size(cell_type: CellType, degree: usize) -> usize {
    let n = degree;
    match cell_type {
        CellType::Interval => n + 1,
        CellType::Triangle => (n + 1) * (n + 2) / 2,
        CellType::Tetrahedron => (n + 1) * (n + 2) * (n + 3) / 6,
    }
}

/// Position of the (p, q) triangle polynomial in the graded ordering
pub fn idx2(p: usize, q: usize) -> usize {
    (p + q) * (p + q + 1) / 2 + q
}

/// Position of the (p, q, r) tetrahedron polynomial in the graded ordering
pub fn idx3(p: usize, q: usize, r: usize) -> usize {
    (p + q + r) * (p + q + r + 1) * (p + q + r + 2) / 6 + (q + r) * (q + r + 1) / 2 + r
}

/// Coefficients (a, b, c) of the Jacobi recurrence
/// P^(alpha,0)_(n+1) = (a x + b) P_n - c P_(n-1)
fn jrc(alpha: f64, n: f64) -> (f64, f64, f64) {
    let a = (alpha + 2.0 * n + 1.0) * (alpha + 2.0 * n + 2.0)
        / (2.0 * (n + 1.0) * (alpha + n + 1.0));
    let b = alpha * alpha * (alpha + 2.0 * n + 1.0)
        / (2.0 * (n + 1.0) * (alpha + n + 1.0) * (alpha + 2.0 * n));
    let c = n * (alpha + n) * (alpha + 2.0 * n + 2.0)
        / ((n + 1.0) * (alpha + n + 1.0) * (alpha + 2.0 * n));
    (a, b, c)
}

/// Tabulate the orthonormal expansion set at the given points, one row per
/// point and one column per polynomial. Points use reference coordinates.
pub fn tabulate(cell_type: CellType, degree: usize, points: &Array2<f64>) -> Array2<f64> {
    assert_eq!(
        points.ncols(),
        cell_type.topological_dimension(),
        "point dimension does not match the cell"
    );
    match cell_type {
        CellType::Interval => tabulate_interval(degree, points),
        CellType::Triangle => tabulate_triangle(degree, points),
        CellType::Tetrahedron => tabulate_tetrahedron(degree, points),
    }
}

/// Legendre polynomials rescaled to [0, 1] and normalized
fn tabulate_interval(n: usize, points: &Array2<f64>) -> Array2<f64> {
    let mut table = Array2::zeros((points.nrows(), n + 1));
    for (ip, pt) in points.rows().into_iter().enumerate() {
        let x = 2.0 * pt[0] - 1.0;
        table[[ip, 0]] = 1.0;
        for p in 1..=n {
            let a = (2 * p - 1) as f64 / p as f64;
            let prev = if p >= 2 { table[[ip, p - 2]] } else { 0.0 };
            table[[ip, p]] = a * x * table[[ip, p - 1]] - (a - 1.0) * prev;
        }
        for p in 0..=n {
            table[[ip, p]] *= ((2 * p + 1) as f64).sqrt();
        }
    }
    table
}

fn tabulate_triangle(n: usize, points: &Array2<f64>) -> Array2<f64> {
    let m = size(CellType::Triangle, n);
    let mut table = Array2::zeros((points.nrows(), m));
    let mut row = vec![0.0; m];
    for (ip, pt) in points.rows().into_iter().enumerate() {
        let x = pt[0];
        let y = pt[1];
        let f3 = (1.0 - y) * (1.0 - y);

        row[idx2(0, 0)] = 1.0;
        for p in 1..=n {
            let a = (2 * p - 1) as f64 / p as f64;
            let prev = if p >= 2 { row[idx2(p - 2, 0)] } else { 0.0 };
            row[idx2(p, 0)] = (2.0 * x - 1.0 + y) * row[idx2(p - 1, 0)] * a - f3 * prev * (a - 1.0);
        }
        for p in 0..n {
            let pf = p as f64;
            row[idx2(p, 1)] = row[idx2(p, 0)] * ((2.0 * y - 1.0) * (1.5 + pf) + 0.5 + pf);
            for q in 1..(n - p) {
                let (aq, bq, cq) = jrc((2 * p + 1) as f64, q as f64);
                row[idx2(p, q + 1)] = row[idx2(p, q)] * ((2.0 * y - 1.0) * aq + bq)
                    - row[idx2(p, q - 1)] * cq;
            }
        }
        for p in 0..=n {
            for q in 0..=(n - p) {
                let scale = ((p as f64 + 0.5) * (p + q + 1) as f64).sqrt() * 2.0;
                table[[ip, idx2(p, q)]] = row[idx2(p, q)] * scale;
            }
        }
    }
    table
}

fn tabulate_tetrahedron(n: usize, points: &Array2<f64>) -> Array2<f64> {
    let m = size(CellType::Tetrahedron, n);
    let mut table = Array2::zeros((points.nrows(), m));
    let mut row = vec![0.0; m];
    for (ip, pt) in points.rows().into_iter().enumerate() {
        let x = pt[0];
        let y = pt[1];
        let z = pt[2];
        let f2 = (1.0 - y - z) * (1.0 - y - z);

        row[idx3(0, 0, 0)] = 1.0;
        for p in 1..=n {
            let a = (2 * p - 1) as f64 / p as f64;
            let prev = if p >= 2 { row[idx3(p - 2, 0, 0)] } else { 0.0 };
            row[idx3(p, 0, 0)] =
                (2.0 * x - 1.0 + y + z) * row[idx3(p - 1, 0, 0)] * a - f2 * prev * (a - 1.0);
        }
        for p in 0..n {
            let pf = p as f64;
            row[idx3(p, 1, 0)] = row[idx3(p, 0, 0)]
                * ((2.0 * y - 1.0 + z) * (1.5 + pf) + (1.0 - z) * (0.5 + pf));
            for q in 1..(n - p) {
                let (aq, bq, cq) = jrc((2 * p + 1) as f64, q as f64);
                row[idx3(p, q + 1, 0)] = row[idx3(p, q, 0)]
                    * ((2.0 * y - 1.0 + z) * aq + (1.0 - z) * bq)
                    - row[idx3(p, q - 1, 0)] * (1.0 - z) * (1.0 - z) * cq;
            }
        }
        for p in 0..n {
            for q in 0..(n - p) {
                let s = (p + q) as f64;
                row[idx3(p, q, 1)] =
                    row[idx3(p, q, 0)] * ((s + 2.0) * (2.0 * z - 1.0) + s + 1.0);
                for r in 1..(n - p - q) {
                    let (ar, br, cr) = jrc((2 * p + 2 * q + 2) as f64, r as f64);
                    row[idx3(p, q, r + 1)] = row[idx3(p, q, r)] * ((2.0 * z - 1.0) * ar + br)
                        - row[idx3(p, q, r - 1)] * cr;
                }
            }
        }
        for p in 0..=n {
            for q in 0..=(n - p) {
                for r in 0..=(n - p - q) {
                    let scale = (2.0
                        * (p as f64 + 0.5)
                        * (p + q + 1) as f64
                        * ((p + q + r) as f64 + 1.5))
                        .sqrt()
                        * 2.0;
                    table[[ip, idx3(p, q, r)]] = row[idx3(p, q, r)] * scale;
                }
            }
        }
    }
    table
}
