//! Discontinuous Lagrange elements
//!
//! Point-evaluation elements on the equispaced lattice, used as the moment
//! spaces of the vector-valued families. All dofs are interior, so every
//! symmetry generator acts as the identity.

use crate::cell::{self, CellType};
use crate::element::{apply_dual_basis, ElementError, FiniteElement};
use crate::polyset;
use ndarray::Array2;

/// Symmetry generators carried by a cell's permutation table: one per edge
/// reflection, plus rotation and reflection per face in 3D
pub(crate) fn num_generators(cell_type: CellType) -> usize {
    match cell_type {
        CellType::Interval => 0,
        CellType::Triangle => 3,
        CellType::Tetrahedron => 6 + 4 * 2,
    }
}

/// Create a discontinuous Lagrange element of the given degree
///
/// Dofs are point evaluations on the equispaced lattice; degree 0 uses the
/// cell midpoint.
pub fn create_discontinuous(
    cell_type: CellType,
    degree: usize,
) -> Result<FiniteElement, ElementError> {
    let psize = polyset::size(cell_type, degree);
    let wcoeffs = Array2::eye(psize);
    let points = cell::create_lattice(cell_type, degree);
    let dualmat = polyset::tabulate(cell_type, degree, &points);
    assert_eq!(
        dualmat.nrows(),
        psize,
        "lattice size must equal the polynomial space dimension"
    );
    let coeffs = apply_dual_basis(&wcoeffs, &dualmat)?;

    let ngen = num_generators(cell_type);
    let mut permutations = Array2::zeros((ngen, psize));
    for g in 0..ngen {
        for i in 0..psize {
            permutations[[g, i]] = i;
        }
    }
    let directions = (0..ngen).map(|_| Array2::eye(psize)).collect();

    Ok(FiniteElement::new(
        cell_type,
        degree,
        1,
        &coeffs,
        permutations,
        directions,
    ))
}
