//! Column-pivoted QR solver and dense block helpers
//!
//! Householder QR with column pivoting for the square systems that pair a
//! candidate polynomial space with its dual functionals. Pure-Rust, dense,
//! multi-RHS; the factorization never forms an explicit inverse.

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Relative diagonal threshold below which R is treated as rank deficient
const SINGULARITY_TOL: f64 = 1.0e-12;

/// Errors that can occur during QR factorization and solve
#[derive(Error, Debug)]
pub enum QrError {
    #[error("Matrix is singular or nearly singular")]
    SingularMatrix,
    #[error("Matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Column-pivoted Householder factorization A P = Q R
///
/// Stores R, the Householder reflectors of Q, and the column permutation.
#[derive(Debug, Clone)]
pub struct QrFactorization {
    /// Upper triangular factor
    r: Array2<f64>,
    /// Reflector vectors; reflector k acts on rows k.. as I - beta v v^T
    reflectors: Vec<Array1<f64>>,
    /// Scalar factor of each reflector
    betas: Vec<f64>,
    /// Column permutation: position k holds the original column index
    jpvt: Vec<usize>,
    /// Matrix dimension
    n: usize,
}

impl QrFactorization {
    /// Solve A X = B for every column of B using the factorization
    pub fn solve(&self, b: &Array2<f64>) -> Result<Array2<f64>, QrError> {
        if b.nrows() != self.n {
            return Err(QrError::DimensionMismatch {
                expected: self.n,
                got: b.nrows(),
            });
        }
        let n = self.n;

        let rmax = (0..n).map(|i| self.r[[i, i]].abs()).fold(0.0, f64::max);
        if rmax == 0.0 {
            return Err(QrError::SingularMatrix);
        }
        for i in 0..n {
            if self.r[[i, i]].abs() < SINGULARITY_TOL * rmax {
                return Err(QrError::SingularMatrix);
            }
        }

        // y = Q^T b
        let mut y = b.clone();
        for k in 0..n {
            let v = &self.reflectors[k];
            let beta = self.betas[k];
            for j in 0..y.ncols() {
                let mut w = 0.0;
                for i in k..n {
                    w += v[i - k] * y[[i, j]];
                }
                w *= beta;
                for i in k..n {
                    y[[i, j]] -= w * v[i - k];
                }
            }
        }

        // back substitution R z = y
        for j in 0..y.ncols() {
            for i in (0..n).rev() {
                let mut s = y[[i, j]];
                for l in (i + 1)..n {
                    s -= self.r[[i, l]] * y[[l, j]];
                }
                y[[i, j]] = s / self.r[[i, i]];
            }
        }

        // undo the column permutation: x[jpvt[i]] = z[i]
        let mut x = Array2::zeros(b.raw_dim());
        for i in 0..n {
            for j in 0..y.ncols() {
                x[[self.jpvt[i], j]] = y[[i, j]];
            }
        }
        Ok(x)
    }
}

/// Compute the column-pivoted Householder QR factorization of a square matrix
pub fn qr_factorize(a: &Array2<f64>) -> Result<QrFactorization, QrError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(QrError::DimensionMismatch {
            expected: n,
            got: a.ncols(),
        });
    }

    let mut r = a.clone();
    let mut jpvt: Vec<usize> = (0..n).collect();
    let mut reflectors = Vec::with_capacity(n);
    let mut betas = Vec::with_capacity(n);

    for k in 0..n {
        // pivot on the trailing column with the largest remaining norm
        let mut best = k;
        let mut best_norm_sq = 0.0;
        for j in k..n {
            let norm_sq: f64 = (k..n).map(|i| r[[i, j]] * r[[i, j]]).sum();
            if norm_sq > best_norm_sq {
                best_norm_sq = norm_sq;
                best = j;
            }
        }
        if best != k {
            for i in 0..n {
                r.swap([i, k], [i, best]);
            }
            jpvt.swap(k, best);
        }

        let norm = best_norm_sq.sqrt();
        let alpha = if r[[k, k]] >= 0.0 { -norm } else { norm };
        let mut v = Array1::zeros(n - k);
        for i in k..n {
            v[i - k] = r[[i, k]];
        }
        v[0] -= alpha;
        let vtv = v.dot(&v);
        let beta = if vtv > 0.0 { 2.0 / vtv } else { 0.0 };

        for j in (k + 1)..n {
            let mut w = 0.0;
            for i in k..n {
                w += v[i - k] * r[[i, j]];
            }
            w *= beta;
            for i in k..n {
                r[[i, j]] -= w * v[i - k];
            }
        }
        // the reflector maps column k onto alpha e1 exactly
        r[[k, k]] = alpha;
        for i in (k + 1)..n {
            r[[i, k]] = 0.0;
        }

        reflectors.push(v);
        betas.push(beta);
    }

    Ok(QrFactorization {
        r,
        reflectors,
        betas,
        jpvt,
        n,
    })
}

/// Solve A X = B by column-pivoted QR
///
/// Convenience wrapper combining factorization and solve.
pub fn qr_solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, QrError> {
    qr_factorize(a)?.solve(b)
}

/// Copy `block` into `target` with its top-left corner at `(row, col)`
pub fn set_block(target: &mut Array2<f64>, row: usize, col: usize, block: &Array2<f64>) {
    assert!(
        row + block.nrows() <= target.nrows() && col + block.ncols() <= target.ncols(),
        "block does not fit at ({row}, {col})"
    );
    for i in 0..block.nrows() {
        for j in 0..block.ncols() {
            target[[row + i, col + j]] = block[[i, j]];
        }
    }
}

/// Stack matrices with equal column counts into one owned matrix
pub fn stack_rows(blocks: &[Array2<f64>]) -> Array2<f64> {
    assert!(!blocks.is_empty(), "nothing to stack");
    let ncols = blocks[0].ncols();
    let nrows = blocks.iter().map(|b| b.nrows()).sum();
    let mut out = Array2::zeros((nrows, ncols));
    let mut row = 0;
    for block in blocks {
        assert_eq!(block.ncols(), ncols, "column counts differ");
        set_block(&mut out, row, 0, block);
        row += block.nrows();
    }
    out
}
