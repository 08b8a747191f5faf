//! Nedelec (first kind) edge elements on simplices
//!
//! H(curl)-conforming vector elements: the candidate space completes the
//! full degree-(d-1) vector polynomials with curl-oriented products of the
//! homogeneous degree-(d-1) scalar polynomials, and the dofs are tangential
//! edge moments plus interior/face integral moments. Each cell type is one
//! variant of the shared builder contract.

use crate::cell::CellType;
use crate::dofperms;
use crate::element::{build_element, CellVariant, ElementError, FiniteElement};
use crate::lagrange;
use crate::linalg::{set_block, stack_rows};
use crate::moments;
use crate::polyset;
use crate::quadrature;
use ndarray::Array2;

/// Quadrature exactness used when projecting the candidate space.
/// Empirical; validated by the duality tests for every supported degree.
const SPACE_QUAD_FACTOR: usize = 2;
/// Quadrature exactness used for the moment functionals
const MOMENT_QUAD_FACTOR: usize = 5;

/// Create a Nedelec element of the given degree on a triangle or
/// tetrahedron
pub fn create(cell_type: CellType, degree: usize) -> Result<FiniteElement, ElementError> {
    assert!(degree >= 1, "Nedelec elements start at degree 1");
    match cell_type {
        CellType::Triangle => build_element(cell_type, degree, &TriangleNedelec { degree }),
        CellType::Tetrahedron => build_element(cell_type, degree, &TetrahedronNedelec { degree }),
        _ => Err(ElementError::UnsupportedCellType(cell_type)),
    }
}

struct TriangleNedelec {
    degree: usize,
}

struct TetrahedronNedelec {
    degree: usize,
}

/// Identity permutation rows, one per generator
fn identity_permutations(generators: usize, ndofs: usize) -> Array2<usize> {
    let mut permutations = Array2::zeros((generators, ndofs));
    for g in 0..generators {
        for i in 0..ndofs {
            permutations[[g, i]] = i;
        }
    }
    permutations
}

impl CellVariant for TriangleNedelec {
    fn ndofs(&self) -> usize {
        self.degree * (self.degree + 2)
    }

    fn value_size(&self) -> usize {
        2
    }

    fn build_space(&self) -> Array2<f64> {
        let d = self.degree;
        // dimension of the complete degree-(d-1) scalar space
        let nv = d * (d + 1) / 2;
        // dimension of the complete degree-(d-2) scalar space
        let ns0 = (d - 1) * d / 2;
        // curl-completing polynomials
        let ns = d;

        let (qpts, qwts) = quadrature::make_quadrature(2, SPACE_QUAD_FACTOR * d);
        let table = polyset::tabulate(CellType::Triangle, d, &qpts);
        let psize = table.ncols();

        let mut wcoeffs = Array2::zeros((2 * nv + ns, 2 * psize));
        for i in 0..nv {
            wcoeffs[[i, i]] = 1.0;
            wcoeffs[[nv + i, psize + i]] = 1.0;
        }
        // project s * (y, -x) onto the expansion for each homogeneous
        // degree-(d-1) polynomial s
        for i in 0..ns {
            for k in 0..psize {
                let mut wx = 0.0;
                let mut wy = 0.0;
                for q in 0..qpts.nrows() {
                    let f = qwts[q] * table[[q, ns0 + i]] * table[[q, k]];
                    wx += f * qpts[[q, 1]];
                    wy -= f * qpts[[q, 0]];
                }
                wcoeffs[[2 * nv + i, k]] = wx;
                wcoeffs[[2 * nv + i, psize + k]] = wy;
            }
        }
        wcoeffs
    }

    fn build_dual(&self) -> Result<Array2<f64>, ElementError> {
        let d = self.degree;
        let quad_degree = MOMENT_QUAD_FACTOR * d;

        let edge_space = lagrange::create_discontinuous(CellType::Interval, d - 1)?;
        let mut blocks = vec![moments::make_tangent_integral_moments(
            &edge_space,
            CellType::Triangle,
            2,
            d,
            quad_degree,
        )?];
        if d > 1 {
            let interior_space = lagrange::create_discontinuous(CellType::Triangle, d - 2)?;
            blocks.push(moments::make_integral_moments(
                &interior_space,
                CellType::Triangle,
                2,
                d,
                quad_degree,
            )?);
        }
        Ok(stack_rows(&blocks))
    }

    fn build_permutations(&self) -> Array2<usize> {
        let d = self.degree;
        let mut permutations = identity_permutations(3, self.ndofs());
        let edge_ref = dofperms::interval_reflection(d);
        for edge in 0..3 {
            let start = d * edge;
            for (i, &p) in edge_ref.iter().enumerate() {
                permutations[[edge, start + i]] = start + p;
            }
        }
        permutations
    }

    fn build_directions(&self) -> Vec<Array2<f64>> {
        let d = self.degree;
        let ndofs = self.ndofs();
        let edge_dir = dofperms::interval_reflection_tangent_directions(d);
        (0..3)
            .map(|edge| {
                let mut correction = Array2::eye(ndofs);
                set_block(&mut correction, d * edge, d * edge, &edge_dir);
                correction
            })
            .collect()
    }
}

impl CellVariant for TetrahedronNedelec {
    fn ndofs(&self) -> usize {
        let d = self.degree;
        let interior = if d > 2 { (d - 2) * (d - 1) * d / 2 } else { 0 };
        6 * d + 4 * d * (d - 1) + interior
    }

    fn value_size(&self) -> usize {
        3
    }

    fn build_space(&self) -> Array2<f64> {
        let d = self.degree;
        // dimension of the complete degree-(d-1) scalar space
        let nv = d * (d + 1) * (d + 2) / 6;
        // dimension of the complete degree-(d-2) scalar space
        let ns0 = (d - 1) * d * (d + 1) / 6;
        // homogeneous degree-(d-1) polynomials available per coordinate pair
        let ns = d * (d + 1) / 2;
        // dependent polynomials dropped from the first family
        let ns_remove = d * (d - 1) / 2;
        let ndofs = self.ndofs();

        let (qpts, qwts) = quadrature::make_quadrature(3, SPACE_QUAD_FACTOR * d);
        let table = polyset::tabulate(CellType::Tetrahedron, d, &qpts);
        let psize = table.ncols();

        let mut wcoeffs = Array2::zeros((ndofs, 3 * psize));
        for c in 0..3 {
            for i in 0..nv {
                wcoeffs[[c * nv + i, c * psize + i]] = 1.0;
            }
        }

        let product = |i: usize, k: usize, coord: usize| -> f64 {
            let mut w = 0.0;
            for q in 0..qpts.nrows() {
                w += qwts[q] * table[[q, ns0 + i]] * qpts[[q, coord]] * table[[q, k]];
            }
            w
        };

        // The three families complete the space with s * (0, -z, y),
        // s * (z, 0, -x) and s * (-y, x, 0) for homogeneous degree-(d-1)
        // scalars s, interleaved into disjoint row ranges. The first family
        // drops its ns_remove dependent members.
        for i in 0..ns {
            for k in 0..psize {
                let w = product(i, k, 2);
                if i >= ns_remove {
                    wcoeffs[[3 * nv + i - ns_remove, psize + k]] = -w;
                }
                wcoeffs[[3 * nv + i + ns - ns_remove, k]] = w;
            }
        }
        for i in 0..ns {
            for k in 0..psize {
                let w = product(i, k, 1);
                wcoeffs[[3 * nv + i + 2 * ns - ns_remove, k]] = -w;
                if i >= ns_remove {
                    wcoeffs[[3 * nv + i - ns_remove, 2 * psize + k]] = w;
                }
            }
        }
        for i in 0..ns {
            for k in 0..psize {
                let w = product(i, k, 0);
                wcoeffs[[3 * nv + i + ns - ns_remove, 2 * psize + k]] = -w;
                wcoeffs[[3 * nv + i + 2 * ns - ns_remove, psize + k]] = w;
            }
        }
        wcoeffs
    }

    fn build_dual(&self) -> Result<Array2<f64>, ElementError> {
        let d = self.degree;
        let quad_degree = MOMENT_QUAD_FACTOR * d;

        let edge_space = lagrange::create_discontinuous(CellType::Interval, d - 1)?;
        let mut blocks = vec![moments::make_tangent_integral_moments(
            &edge_space,
            CellType::Tetrahedron,
            3,
            d,
            quad_degree,
        )?];
        if d > 1 {
            let face_space = lagrange::create_discontinuous(CellType::Triangle, d - 2)?;
            blocks.push(moments::make_integral_moments(
                &face_space,
                CellType::Tetrahedron,
                3,
                d,
                quad_degree,
            )?);
        }
        if d > 2 {
            let interior_space = lagrange::create_discontinuous(CellType::Tetrahedron, d - 3)?;
            blocks.push(moments::make_integral_moments(
                &interior_space,
                CellType::Tetrahedron,
                3,
                d,
                quad_degree,
            )?);
        }
        Ok(stack_rows(&blocks))
    }

    fn build_permutations(&self) -> Array2<usize> {
        let d = self.degree;
        let mut permutations = identity_permutations(14, self.ndofs());

        let edge_ref = dofperms::interval_reflection(d);
        for edge in 0..6 {
            let start = d * edge;
            for (i, &p) in edge_ref.iter().enumerate() {
                permutations[[edge, start + i]] = start + p;
            }
        }

        // face dofs pair two tangential components per moment function
        let face_rot = dofperms::triangle_rotation(d - 1);
        let face_ref = dofperms::triangle_reflection(d - 1);
        let face_size = 2 * face_rot.len();
        for face in 0..4 {
            let start = 6 * d + face_size * face;
            for (i, &p) in face_rot.iter().enumerate() {
                for b in 0..2 {
                    permutations[[6 + 2 * face, start + 2 * i + b]] = start + 2 * p + b;
                }
            }
            for (i, &p) in face_ref.iter().enumerate() {
                for b in 0..2 {
                    permutations[[6 + 2 * face + 1, start + 2 * i + b]] = start + 2 * p + b;
                }
            }
        }
        permutations
    }

    fn build_directions(&self) -> Vec<Array2<f64>> {
        let d = self.degree;
        let ndofs = self.ndofs();
        let mut corrections = Vec::with_capacity(14);

        let edge_dir = dofperms::interval_reflection_tangent_directions(d);
        for edge in 0..6 {
            let mut correction = Array2::eye(ndofs);
            set_block(&mut correction, d * edge, d * edge, &edge_dir);
            corrections.push(correction);
        }

        let face_rot_dir = dofperms::triangle_rotation_tangent_directions(d - 1);
        let face_ref_dir = dofperms::triangle_reflection_tangent_directions(d - 1);
        let face_size = face_rot_dir.nrows();
        for face in 0..4 {
            let start = 6 * d + face_size * face;
            let mut rotation = Array2::eye(ndofs);
            set_block(&mut rotation, start, start, &face_rot_dir);
            corrections.push(rotation);
            let mut reflection = Array2::eye(ndofs);
            set_block(&mut reflection, start, start, &face_ref_dir);
            corrections.push(reflection);
        }
        corrections
    }
}
