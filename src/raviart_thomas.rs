//! Raviart-Thomas elements on simplices
//!
//! H(div)-conforming vector elements: the candidate space completes the
//! full degree-(d-1) vector polynomials with x-weighted homogeneous
//! degree-(d-1) scalars, and the dofs are normal facet moments plus
//! interior integral moments. Cell variants share the Nedelec builder
//! contract.

use crate::cell::CellType;
use crate::dofperms;
use crate::element::{build_element, CellVariant, ElementError, FiniteElement};
use crate::lagrange;
use crate::linalg::{set_block, stack_rows};
use crate::moments;
use crate::polyset;
use crate::quadrature;
use ndarray::Array2;

/// Quadrature exactness used when projecting the candidate space
const SPACE_QUAD_FACTOR: usize = 2;
/// Quadrature exactness used for the moment functionals
const MOMENT_QUAD_FACTOR: usize = 5;

/// Create a Raviart-Thomas element of the given degree on a triangle or
/// tetrahedron
pub fn create(cell_type: CellType, degree: usize) -> Result<FiniteElement, ElementError> {
    assert!(degree >= 1, "Raviart-Thomas elements start at degree 1");
    match cell_type {
        CellType::Triangle | CellType::Tetrahedron => {
            build_element(cell_type, degree, &SimplexRaviartThomas { cell_type, degree })
        }
        _ => Err(ElementError::UnsupportedCellType(cell_type)),
    }
}

/// Both simplices share one construction; only the scalar-space dimensions
/// and the facet bookkeeping differ
struct SimplexRaviartThomas {
    cell_type: CellType,
    degree: usize,
}

impl SimplexRaviartThomas {
    fn tdim(&self) -> usize {
        self.cell_type.topological_dimension()
    }

    /// Dofs carried by each facet
    fn facet_dofs(&self) -> usize {
        let d = self.degree;
        match self.cell_type {
            CellType::Triangle => d,
            _ => d * (d + 1) / 2,
        }
    }
}

impl CellVariant for SimplexRaviartThomas {
    fn ndofs(&self) -> usize {
        let d = self.degree;
        match self.cell_type {
            CellType::Triangle => d * (d + 2),
            _ => d * (d + 1) * (d + 3) / 2,
        }
    }

    fn value_size(&self) -> usize {
        self.tdim()
    }

    fn build_space(&self) -> Array2<f64> {
        let d = self.degree;
        let tdim = self.tdim();
        // dimension of the complete degree-(d-1) scalar space
        let nv = polyset::size(self.cell_type, d - 1);
        // dimension of the complete degree-(d-2) scalar space
        let ns0 = if d > 1 {
            polyset::size(self.cell_type, d - 2)
        } else {
            0
        };
        // homogeneous degree-(d-1) scalars, one divergence-completing row each
        let ns = nv - ns0;

        let (qpts, qwts) = quadrature::make_quadrature(tdim, SPACE_QUAD_FACTOR * d);
        let table = polyset::tabulate(self.cell_type, d, &qpts);
        let psize = table.ncols();

        let mut wcoeffs = Array2::zeros((tdim * nv + ns, tdim * psize));
        for c in 0..tdim {
            for i in 0..nv {
                wcoeffs[[c * nv + i, c * psize + i]] = 1.0;
            }
        }
        // project s * (x, y, z) onto the expansion for each homogeneous
        // degree-(d-1) polynomial s
        for i in 0..ns {
            for c in 0..tdim {
                for k in 0..psize {
                    let mut w = 0.0;
                    for q in 0..qpts.nrows() {
                        w += qwts[q] * table[[q, ns0 + i]] * qpts[[q, c]] * table[[q, k]];
                    }
                    wcoeffs[[tdim * nv + i, c * psize + k]] = w;
                }
            }
        }
        wcoeffs
    }

    fn build_dual(&self) -> Result<Array2<f64>, ElementError> {
        let d = self.degree;
        let tdim = self.tdim();
        let quad_degree = MOMENT_QUAD_FACTOR * d;

        let facet_cell = match self.cell_type {
            CellType::Triangle => CellType::Interval,
            _ => CellType::Triangle,
        };
        let facet_space = lagrange::create_discontinuous(facet_cell, d - 1)?;
        let mut blocks = vec![moments::make_normal_integral_moments(
            &facet_space,
            self.cell_type,
            tdim,
            d,
            quad_degree,
        )?];
        if d > 1 {
            let interior_space = lagrange::create_discontinuous(self.cell_type, d - 2)?;
            blocks.push(moments::make_integral_moments(
                &interior_space,
                self.cell_type,
                tdim,
                d,
                quad_degree,
            )?);
        }
        Ok(stack_rows(&blocks))
    }

    fn build_permutations(&self) -> Array2<usize> {
        let d = self.degree;
        let ndofs = self.ndofs();
        let generators = lagrange::num_generators(self.cell_type);
        let mut permutations = Array2::zeros((generators, ndofs));
        for g in 0..generators {
            for i in 0..ndofs {
                permutations[[g, i]] = i;
            }
        }
        let facet_dofs = self.facet_dofs();
        match self.cell_type {
            CellType::Triangle => {
                let edge_ref = dofperms::interval_reflection(d);
                for edge in 0..3 {
                    let start = facet_dofs * edge;
                    for (i, &p) in edge_ref.iter().enumerate() {
                        permutations[[edge, start + i]] = start + p;
                    }
                }
            }
            _ => {
                // no edge dofs; face moments are scalar, so the lattice
                // tables apply directly
                let face_rot = dofperms::triangle_rotation(d);
                let face_ref = dofperms::triangle_reflection(d);
                for face in 0..4 {
                    let start = facet_dofs * face;
                    for (i, &p) in face_rot.iter().enumerate() {
                        permutations[[6 + 2 * face, start + i]] = start + p;
                    }
                    for (i, &p) in face_ref.iter().enumerate() {
                        permutations[[6 + 2 * face + 1, start + i]] = start + p;
                    }
                }
            }
        }
        permutations
    }

    fn build_directions(&self) -> Vec<Array2<f64>> {
        let d = self.degree;
        let ndofs = self.ndofs();
        let generators = lagrange::num_generators(self.cell_type);
        let facet_dofs = self.facet_dofs();
        let mut corrections = Vec::with_capacity(generators);
        match self.cell_type {
            CellType::Triangle => {
                // reversing an edge flips its normal
                let edge_dir = dofperms::interval_reflection_tangent_directions(d);
                for edge in 0..3 {
                    let mut correction = Array2::eye(ndofs);
                    set_block(&mut correction, facet_dofs * edge, facet_dofs * edge, &edge_dir);
                    corrections.push(correction);
                }
            }
            _ => {
                // no edge dofs; rotations keep the face normal, reflections
                // flip it
                for _ in 0..6 {
                    corrections.push(Array2::eye(ndofs));
                }
                let face_dir = dofperms::triangle_reflection_normal_directions(d);
                for face in 0..4 {
                    corrections.push(Array2::eye(ndofs));
                    let mut reflection = Array2::eye(ndofs);
                    set_block(&mut reflection, facet_dofs * face, facet_dofs * face, &face_dir);
                    corrections.push(reflection);
                }
            }
        }
        corrections
    }
}
