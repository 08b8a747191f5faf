//! Property tests for the element families
//!
//! Verifies the construction pipeline end to end: duality between the
//! moment functionals and the solved basis, closed-form dof counts,
//! symmetry-generator group orders, the tabulation shape and error
//! contract, and the known degree-1 bases (Whitney edge functions for
//! Nedelec, the published Raviart-Thomas forms).

use approx::assert_relative_eq;
use math_element::element::{ElementError, FiniteElement};
use math_element::linalg::stack_rows;
use math_element::{cell::CellType, lagrange, moments, nedelec, polyset, raviart_thomas};
use ndarray::{array, Array2};

/// Rebuild the dual matrix the way the family builders do, through the
/// public moment API
fn nedelec_dual(cell_type: CellType, degree: usize) -> Array2<f64> {
    let d = degree;
    let tdim = cell_type.topological_dimension();
    let quad_degree = 5 * d;
    let edge_space = lagrange::create_discontinuous(CellType::Interval, d - 1).unwrap();
    let mut blocks = vec![moments::make_tangent_integral_moments(
        &edge_space,
        cell_type,
        tdim,
        d,
        quad_degree,
    )
    .unwrap()];
    if d > 1 {
        let face_space = lagrange::create_discontinuous(CellType::Triangle, d - 2).unwrap();
        blocks.push(
            moments::make_integral_moments(&face_space, cell_type, tdim, d, quad_degree).unwrap(),
        );
    }
    if cell_type == CellType::Tetrahedron && d > 2 {
        let interior_space =
            lagrange::create_discontinuous(CellType::Tetrahedron, d - 3).unwrap();
        blocks.push(
            moments::make_integral_moments(&interior_space, cell_type, tdim, d, quad_degree)
                .unwrap(),
        );
    }
    stack_rows(&blocks)
}

fn raviart_thomas_dual(cell_type: CellType, degree: usize) -> Array2<f64> {
    let d = degree;
    let tdim = cell_type.topological_dimension();
    let quad_degree = 5 * d;
    let facet_cell = match cell_type {
        CellType::Triangle => CellType::Interval,
        _ => CellType::Triangle,
    };
    let facet_space = lagrange::create_discontinuous(facet_cell, d - 1).unwrap();
    let mut blocks = vec![moments::make_normal_integral_moments(
        &facet_space,
        cell_type,
        tdim,
        d,
        quad_degree,
    )
    .unwrap()];
    if d > 1 {
        let interior_space = lagrange::create_discontinuous(cell_type, d - 2).unwrap();
        blocks.push(
            moments::make_integral_moments(&interior_space, cell_type, tdim, d, quad_degree)
                .unwrap(),
        );
    }
    stack_rows(&blocks)
}

/// Apply every functional (row of `dual`) to every basis function of the
/// element; the result must be the identity
fn check_duality(element: &FiniteElement, dual: &Array2<f64>) {
    let ndofs = element.ndofs();
    let vs = element.value_size();
    let psize = polyset::size(element.cell_type(), element.degree());
    assert_eq!(dual.nrows(), ndofs);
    assert_eq!(dual.ncols(), psize * vs);
    for i in 0..ndofs {
        for j in 0..ndofs {
            let mut value = 0.0;
            for c in 0..vs {
                let poly = &element.polynomial_set()[j + ndofs * c];
                for k in 0..psize {
                    value += dual[[i, c * psize + k]] * poly.coeffs()[k];
                }
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(value, expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_nedelec_duality() {
    for degree in 1..=3 {
        let element = nedelec::create(CellType::Triangle, degree).unwrap();
        check_duality(&element, &nedelec_dual(CellType::Triangle, degree));
        let element = nedelec::create(CellType::Tetrahedron, degree).unwrap();
        check_duality(&element, &nedelec_dual(CellType::Tetrahedron, degree));
    }
}

#[test]
fn test_raviart_thomas_duality() {
    for degree in 1..=3 {
        let element = raviart_thomas::create(CellType::Triangle, degree).unwrap();
        check_duality(&element, &raviart_thomas_dual(CellType::Triangle, degree));
        let element = raviart_thomas::create(CellType::Tetrahedron, degree).unwrap();
        check_duality(&element, &raviart_thomas_dual(CellType::Tetrahedron, degree));
    }
}

#[test]
fn test_ndofs_closed_forms() {
    for d in 1..=4 {
        let triangle = nedelec::create(CellType::Triangle, d).unwrap();
        assert_eq!(triangle.ndofs(), d * (d + 2));
        let tetrahedron = nedelec::create(CellType::Tetrahedron, d).unwrap();
        let interior = if d > 2 { (d - 2) * (d - 1) * d / 2 } else { 0 };
        assert_eq!(tetrahedron.ndofs(), 6 * d + 4 * d * (d - 1) + interior);

        let rt_triangle = raviart_thomas::create(CellType::Triangle, d).unwrap();
        assert_eq!(rt_triangle.ndofs(), d * (d + 2));
        let rt_tetrahedron = raviart_thomas::create(CellType::Tetrahedron, d).unwrap();
        assert_eq!(rt_tetrahedron.ndofs(), d * (d + 1) * (d + 3) / 2);
    }
}

#[test]
fn test_nedelec_triangle_whitney_functions() {
    let element = nedelec::create(CellType::Triangle, 1).unwrap();
    let points = array![[0.3, 0.2], [0.1, 0.6], [1.0 / 3.0, 1.0 / 3.0]];
    let values = element.tabulate_basis(&points).unwrap();
    for (p, pt) in points.rows().into_iter().enumerate() {
        let (x, y) = (pt[0], pt[1]);
        // edge i joins the two vertices opposite vertex i
        let expected = [
            [-y, x],
            [y, 1.0 - x],
            [1.0 - y, x],
        ];
        for (j, w) in expected.iter().enumerate() {
            assert_relative_eq!(values[[p, j]], w[0], epsilon = 1e-11);
            assert_relative_eq!(values[[p, 3 + j]], w[1], epsilon = 1e-11);
        }
    }
}

#[test]
fn test_nedelec_tetrahedron_whitney_functions() {
    let element = nedelec::create(CellType::Tetrahedron, 1).unwrap();
    let points = array![[0.1, 0.2, 0.3], [0.25, 0.25, 0.25], [0.0, 0.5, 0.1]];
    let values = element.tabulate_basis(&points).unwrap();
    for (p, pt) in points.rows().into_iter().enumerate() {
        let (x, y, z) = (pt[0], pt[1], pt[2]);
        let expected = [
            [0.0, -z, y],
            [-z, 0.0, x],
            [-y, x, 0.0],
            [z, z, 1.0 - x - y],
            [y, 1.0 - x - z, y],
            [1.0 - y - z, x, x],
        ];
        for (j, w) in expected.iter().enumerate() {
            for c in 0..3 {
                assert_relative_eq!(values[[p, 6 * c + j]], w[c], epsilon = 1e-11);
            }
        }
    }
}

#[test]
fn test_raviart_thomas_triangle_degree_one() {
    let element = raviart_thomas::create(CellType::Triangle, 1).unwrap();
    let points = array![[0.3, 0.2], [0.0, 0.8], [0.5, 0.5]];
    let values = element.tabulate_basis(&points).unwrap();
    for (p, pt) in points.rows().into_iter().enumerate() {
        let (x, y) = (pt[0], pt[1]);
        let expected = [[-x, -y], [x - 1.0, y], [-x, 1.0 - y]];
        for (j, w) in expected.iter().enumerate() {
            assert_relative_eq!(values[[p, j]], w[0], epsilon = 1e-11);
            assert_relative_eq!(values[[p, 3 + j]], w[1], epsilon = 1e-11);
        }
    }
}

#[test]
fn test_raviart_thomas_tetrahedron_degree_one() {
    let element = raviart_thomas::create(CellType::Tetrahedron, 1).unwrap();
    let points = array![[0.1, 0.2, 0.3], [0.25, 0.25, 0.25]];
    let values = element.tabulate_basis(&points).unwrap();
    for (p, pt) in points.rows().into_iter().enumerate() {
        let (x, y, z) = (pt[0], pt[1], pt[2]);
        let expected = [
            [2.0 * x, 2.0 * y, 2.0 * z],
            [2.0 - 2.0 * x, -2.0 * y, -2.0 * z],
            [2.0 * x, 2.0 * y - 2.0, 2.0 * z],
            [-2.0 * x, -2.0 * y, 2.0 - 2.0 * z],
        ];
        for (j, w) in expected.iter().enumerate() {
            for c in 0..3 {
                assert_relative_eq!(values[[p, 4 * c + j]], w[c], epsilon = 1e-11);
            }
        }
    }
}

fn permutation_row(element: &FiniteElement, row: usize) -> Vec<usize> {
    let perms = element.base_permutations();
    (0..perms.ncols()).map(|i| perms[[row, i]]).collect()
}

fn compose(a: &[usize], b: &[usize]) -> Vec<usize> {
    a.iter().map(|&i| b[i]).collect()
}

fn assert_identity(perm: &[usize]) {
    for (i, &p) in perm.iter().enumerate() {
        assert_eq!(i, p);
    }
}

fn assert_bijection(perm: &[usize]) {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        assert!(p < perm.len());
        assert!(!seen[p]);
        seen[p] = true;
    }
}

#[test]
fn test_edge_reflection_permutations_are_involutions() {
    for degree in 1..=4 {
        let element = nedelec::create(CellType::Triangle, degree).unwrap();
        for row in 0..3 {
            let perm = permutation_row(&element, row);
            assert_bijection(&perm);
            assert_identity(&compose(&perm, &perm));
        }
    }
}

#[test]
fn test_tetrahedron_face_permutation_orders() {
    for degree in 1..=3 {
        let element = nedelec::create(CellType::Tetrahedron, degree).unwrap();
        // rows 0..6: edge reflections, involutions
        for row in 0..6 {
            let perm = permutation_row(&element, row);
            assert_bijection(&perm);
            assert_identity(&compose(&perm, &perm));
        }
        // even face rows: rotations of order three; odd: reflections
        for face in 0..4 {
            let rotation = permutation_row(&element, 6 + 2 * face);
            assert_bijection(&rotation);
            assert_identity(&compose(&compose(&rotation, &rotation), &rotation));
            let reflection = permutation_row(&element, 6 + 2 * face + 1);
            assert_bijection(&reflection);
            assert_identity(&compose(&reflection, &reflection));
        }
    }
}

#[test]
fn test_direction_corrections_match_generator_orders() {
    let element = nedelec::create(CellType::Tetrahedron, 2).unwrap();
    let corrections = element.direction_corrections();
    let ndofs = element.ndofs();
    let eye = Array2::<f64>::eye(ndofs);

    let assert_close = |m: &Array2<f64>, expected: &Array2<f64>| {
        for i in 0..ndofs {
            for j in 0..ndofs {
                assert_relative_eq!(m[[i, j]], expected[[i, j]], epsilon = 1e-12);
            }
        }
    };

    for edge in 0..6 {
        let m = &corrections[edge];
        assert_close(&m.dot(m), &eye);
    }
    for face in 0..4 {
        let rotation = &corrections[6 + 2 * face];
        assert_close(&rotation.dot(rotation).dot(rotation), &eye);
        let reflection = &corrections[6 + 2 * face + 1];
        assert_close(&reflection.dot(reflection), &eye);
    }
}

#[test]
fn test_tabulate_shape_and_error_contract() {
    let element = nedelec::create(CellType::Triangle, 2).unwrap();
    let points = Array2::from_elem((5, 2), 0.2);
    let values = element.tabulate_basis(&points).unwrap();
    assert_eq!(values.dim(), (5, 16));

    let bad = Array2::from_elem((5, 3), 0.2);
    assert!(matches!(
        element.tabulate_basis(&bad),
        Err(ElementError::InvalidPointDimension {
            expected: 2,
            got: 3
        })
    ));
}

#[test]
fn test_degree_one_tetrahedron_has_edge_moments_only() {
    let element = nedelec::create(CellType::Tetrahedron, 1).unwrap();
    assert_eq!(element.ndofs(), 6);
    // the tangential edge block alone fills the dual matrix
    let edge_space = lagrange::create_discontinuous(CellType::Interval, 0).unwrap();
    let edge_block =
        moments::make_tangent_integral_moments(&edge_space, CellType::Tetrahedron, 3, 1, 5)
            .unwrap();
    assert_eq!(edge_block.nrows(), element.ndofs());
}

#[test]
fn test_construction_is_deterministic() {
    let points = array![[0.11, 0.22], [0.4, 0.35]];
    let first = nedelec::create(CellType::Triangle, 3).unwrap();
    let second = nedelec::create(CellType::Triangle, 3).unwrap();
    let a = first.tabulate_basis(&points).unwrap();
    let b = second.tabulate_basis(&points).unwrap();
    assert_eq!(a, b);
}
