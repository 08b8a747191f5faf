//! Polynomials over the orthonormal expansion sets
//!
//! A [`Polynomial`] is a coefficient vector over the expansion set of a
//! fixed cell and degree; a [`PolynomialSet`] is an ordered sequence of
//! them, insertion order being dof index order.

use crate::cell::CellType;
use crate::polyset;
use ndarray::{Array1, Array2, ArrayView1};
use std::ops::{Add, Index, Mul};

/// A polynomial stored as coefficients over the orthonormal expansion set
/// of `(cell_type, degree)`. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    cell_type: CellType,
    degree: usize,
    coeffs: Array1<f64>,
}

impl Polynomial {
    /// The zero polynomial over the expansion of `(cell_type, degree)`
    pub fn zero(cell_type: CellType, degree: usize) -> Self {
        Self {
            cell_type,
            degree,
            coeffs: Array1::zeros(polyset::size(cell_type, degree)),
        }
    }

    /// Build from expansion coefficients
    pub fn from_coeffs(cell_type: CellType, degree: usize, coeffs: Array1<f64>) -> Self {
        assert_eq!(
            coeffs.len(),
            polyset::size(cell_type, degree),
            "coefficient count does not match the expansion size"
        );
        Self {
            cell_type,
            degree,
            coeffs,
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Expansion coefficients
    pub fn coeffs(&self) -> ArrayView1<f64> {
        self.coeffs.view()
    }

    /// Evaluate at the given points (one row per point)
    pub fn eval(&self, points: &Array2<f64>) -> Array1<f64> {
        let table = polyset::tabulate(self.cell_type, self.degree, points);
        self.eval_tabulated(&table)
    }

    /// Evaluate against a pre-tabulated expansion table
    pub fn eval_tabulated(&self, table: &Array2<f64>) -> Array1<f64> {
        table.dot(&self.coeffs)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        assert_eq!(self.cell_type, rhs.cell_type);
        assert_eq!(self.degree, rhs.degree);
        Polynomial {
            cell_type: self.cell_type,
            degree: self.degree,
            coeffs: &self.coeffs + &rhs.coeffs,
        }
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Polynomial {
        Polynomial {
            cell_type: self.cell_type,
            degree: self.degree,
            coeffs: &self.coeffs * rhs,
        }
    }
}

/// Ordered sequence of polynomials, one per basis function
#[derive(Debug, Clone, Default)]
pub struct PolynomialSet {
    polys: Vec<Polynomial>,
}

impl PolynomialSet {
    pub fn new() -> Self {
        Self { polys: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            polys: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, poly: Polynomial) {
        self.polys.push(poly);
    }

    pub fn len(&self) -> usize {
        self.polys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Polynomial> {
        self.polys.iter()
    }
}

impl Index<usize> for PolynomialSet {
    type Output = Polynomial;

    fn index(&self, index: usize) -> &Polynomial {
        &self.polys[index]
    }
}
