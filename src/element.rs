//! Finite element aggregation and the dual-basis solve
//!
//! [`apply_dual_basis`] pairs a candidate polynomial space with a matrix of
//! moment functionals and solves for the coefficients that make the basis
//! dual-orthonormal. [`FiniteElement`] owns the result together with the
//! per-generator dof permutations and direction corrections; it is an
//! immutable snapshot, so repeated evaluation never rebuilds the basis.

use crate::cell::CellType;
use crate::linalg::{self, QrError};
use crate::polynomial::{Polynomial, PolynomialSet};
use crate::polyset;
use ndarray::{s, Array2};
use thiserror::Error;

/// Errors raised by element construction and evaluation
#[derive(Error, Debug)]
pub enum ElementError {
    /// Point array dimensionality does not match the cell; recoverable by
    /// fixing the caller's input
    #[error("Point dimension {got} does not match cell dimension {expected}")]
    InvalidPointDimension { expected: usize, got: usize },
    /// The requested cell type is not implemented for the element family
    #[error("Cell type {0:?} is not supported by this element family")]
    UnsupportedCellType(CellType),
    /// The dual system could not be solved; the element definition is
    /// defective for this cell type and degree
    #[error("Singular dual system: {0}")]
    SingularDualSystem(#[from] QrError),
}

/// Shared contract for the per-cell element constructions: a closed set of
/// variants dispatched on [`CellType`], never open-ended inheritance.
pub(crate) trait CellVariant {
    fn ndofs(&self) -> usize;
    fn value_size(&self) -> usize;
    fn build_space(&self) -> Array2<f64>;
    fn build_dual(&self) -> Result<Array2<f64>, ElementError>;
    fn build_permutations(&self) -> Array2<usize>;
    fn build_directions(&self) -> Vec<Array2<f64>>;
}

/// Run the construction pipeline for one variant
pub(crate) fn build_element(
    cell_type: CellType,
    degree: usize,
    variant: &dyn CellVariant,
) -> Result<FiniteElement, ElementError> {
    let wcoeffs = variant.build_space();
    let dualmat = variant.build_dual()?;
    assert_eq!(
        dualmat.nrows(),
        variant.ndofs(),
        "dual row count must equal the dof count"
    );
    let coeffs = apply_dual_basis(&wcoeffs, &dualmat)?;
    Ok(FiniteElement::new(
        cell_type,
        degree,
        variant.value_size(),
        &coeffs,
        variant.build_permutations(),
        variant.build_directions(),
    ))
}

/// Solve the dual system pairing a candidate space with moment functionals
///
/// Forms `A = wcoeffs * dualmat^T` and solves `A * X = wcoeffs` by
/// column-pivoted QR. Each row of the result holds the expansion
/// coefficients of one basis function; applying functional i to basis j
/// then gives the Kronecker delta.
pub fn apply_dual_basis(
    wcoeffs: &Array2<f64>,
    dualmat: &Array2<f64>,
) -> Result<Array2<f64>, ElementError> {
    assert_eq!(
        wcoeffs.ncols(),
        dualmat.ncols(),
        "candidate space and dual functionals disagree on expansion size"
    );
    let a = wcoeffs.dot(&dualmat.t());
    Ok(linalg::qr_solve(&a, wcoeffs)?)
}

/// An immutable finite element: the solved basis polynomials, the
/// per-generator dof permutations, and the per-generator direction
/// corrections
#[derive(Debug, Clone)]
pub struct FiniteElement {
    cell_type: CellType,
    degree: usize,
    value_size: usize,
    ndofs: usize,
    poly_set: PolynomialSet,
    base_permutations: Array2<usize>,
    direction_corrections: Vec<Array2<f64>>,
}

impl FiniteElement {
    /// Assemble an element from solved coefficients
    ///
    /// `coeffs` has one row per dof; each row holds `value_size` contiguous
    /// expansion-coefficient blocks. The polynomial set stacks component
    /// blocks so that dof `i`, component `j` sits at `i + ndofs * j`.
    pub fn new(
        cell_type: CellType,
        degree: usize,
        value_size: usize,
        coeffs: &Array2<f64>,
        base_permutations: Array2<usize>,
        direction_corrections: Vec<Array2<f64>>,
    ) -> Self {
        let psize = polyset::size(cell_type, degree);
        assert_eq!(
            coeffs.ncols(),
            psize * value_size,
            "coefficient columns must cover every value component"
        );
        let ndofs = coeffs.nrows();
        assert_eq!(base_permutations.ncols(), ndofs);
        for correction in &direction_corrections {
            assert_eq!(correction.nrows(), ndofs);
            assert_eq!(correction.ncols(), ndofs);
        }

        let mut poly_set = PolynomialSet::with_capacity(ndofs * value_size);
        for j in 0..value_size {
            for i in 0..ndofs {
                let c = coeffs.slice(s![i, j * psize..(j + 1) * psize]).to_owned();
                poly_set.push(Polynomial::from_coeffs(cell_type, degree, c));
            }
        }

        Self {
            cell_type,
            degree,
            value_size,
            ndofs,
            poly_set,
            base_permutations,
            direction_corrections,
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of vector components of a basis function value
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Number of degrees of freedom
    pub fn ndofs(&self) -> usize {
        self.ndofs
    }

    /// The basis polynomials, component blocks contiguous
    pub fn polynomial_set(&self) -> &PolynomialSet {
        &self.poly_set
    }

    /// Dof index permutation per symmetry generator, one row per generator;
    /// every row is a bijection on `[0, ndofs)`
    pub fn base_permutations(&self) -> &Array2<usize> {
        &self.base_permutations
    }

    /// Direction-correction matrix per symmetry generator, acting
    /// multiplicatively on basis coefficients
    pub fn direction_corrections(&self) -> &[Array2<f64>] {
        &self.direction_corrections
    }

    /// Evaluate every basis polynomial at the given points
    ///
    /// Rows are points, columns are basis polynomials with component blocks
    /// contiguous (`ndofs * value_size` columns). Errors if the point
    /// coordinate count does not match the cell's topological dimension.
    pub fn tabulate_basis(&self, points: &Array2<f64>) -> Result<Array2<f64>, ElementError> {
        let tdim = self.cell_type.topological_dimension();
        if points.ncols() != tdim {
            return Err(ElementError::InvalidPointDimension {
                expected: tdim,
                got: points.ncols(),
            });
        }
        let table = polyset::tabulate(self.cell_type, self.degree, points);
        let mut result = Array2::zeros((points.nrows(), self.poly_set.len()));
        for (j, poly) in self.poly_set.iter().enumerate() {
            let values = poly.eval_tabulated(&table);
            result.column_mut(j).assign(&values);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn scalar_linear_element() -> FiniteElement {
        // Lagrange-like degree-1 interval element built by hand: point
        // evaluation dofs at the two endpoints
        let wcoeffs = Array2::eye(2);
        let dualmat = polyset::tabulate(CellType::Interval, 1, &array![[0.0], [1.0]]);
        let coeffs = apply_dual_basis(&wcoeffs, &dualmat).unwrap();
        FiniteElement::new(
            CellType::Interval,
            1,
            1,
            &coeffs,
            Array2::zeros((0, 2)),
            Vec::new(),
        )
    }

    #[test]
    fn test_dual_basis_kronecker() {
        let element = scalar_linear_element();
        // basis 0 is 1 - x, basis 1 is x
        let vals = element.tabulate_basis(&array![[0.0], [0.5], [1.0]]).unwrap();
        assert_relative_eq!(vals[[0, 0]], 1.0, epsilon = 1e-13);
        assert_relative_eq!(vals[[2, 0]], 0.0, epsilon = 1e-13);
        assert_relative_eq!(vals[[1, 1]], 0.5, epsilon = 1e-13);
        assert_relative_eq!(vals[[2, 1]], 1.0, epsilon = 1e-13);
    }

    #[test]
    fn test_tabulate_shape() {
        let element = scalar_linear_element();
        let vals = element.tabulate_basis(&array![[0.1], [0.2], [0.3], [0.4]]).unwrap();
        assert_eq!(vals.dim(), (4, 2));
    }

    #[test]
    fn test_point_dimension_error() {
        let element = scalar_linear_element();
        let result = element.tabulate_basis(&array![[0.1, 0.2]]);
        assert!(matches!(
            result,
            Err(ElementError::InvalidPointDimension {
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_singular_dual_system() {
        // two identical functionals cannot be dualized
        let wcoeffs = Array2::eye(2);
        let dualmat = array![[1.0, 0.5], [1.0, 0.5]];
        let result = apply_dual_basis(&wcoeffs, &dualmat);
        assert!(matches!(result, Err(ElementError::SingularDualSystem(_))));
    }
}
