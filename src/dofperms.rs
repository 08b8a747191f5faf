//! Symmetry-generator tables for a single reference sub-entity
//!
//! Index permutations and direction-correction blocks for the dofs carried
//! by one edge or face, as pure functions of the entity's dof count. The
//! element builders place these as diagonal blocks at each entity's dof
//! offset. Triangular tables use the same lattice ordering as
//! [`crate::cell::create_lattice`], so they line up with the moment-space
//! dof order.

use ndarray::Array2;

/// Reversal of `degree` dofs ordered along an interval
pub fn interval_reflection(degree: usize) -> Vec<usize> {
    (0..degree).map(|i| degree - 1 - i).collect()
}

/// Position of lattice point (i, j) in the triangular ordering of
/// parameter `m`: rows of constant j, i fastest
fn lattice_index(m: usize, i: usize, j: usize) -> usize {
    (0..j).map(|l| m + 1 - l).sum::<usize>() + i
}

/// Rotation by a third of a turn of the `degree * (degree + 1) / 2` dofs on
/// a triangular lattice; composing it three times gives the identity
pub fn triangle_rotation(degree: usize) -> Vec<usize> {
    if degree == 0 {
        return Vec::new();
    }
    let m = degree - 1;
    let mut perm = vec![0; degree * (degree + 1) / 2];
    for j in 0..=m {
        for i in 0..=(m - j) {
            // barycentric cycle: (i, j) -> (m - i - j, i)
            perm[lattice_index(m, i, j)] = lattice_index(m, m - i - j, i);
        }
    }
    perm
}

/// Reflection of the triangular lattice swapping its two axes; an involution
pub fn triangle_reflection(degree: usize) -> Vec<usize> {
    if degree == 0 {
        return Vec::new();
    }
    let m = degree - 1;
    let mut perm = vec![0; degree * (degree + 1) / 2];
    for j in 0..=m {
        for i in 0..=(m - j) {
            perm[lattice_index(m, i, j)] = lattice_index(m, j, i);
        }
    }
    perm
}

/// Direction correction for reflecting an edge: positions reverse (handled
/// by the permutation), the tangent flips sign
pub fn interval_reflection_tangent_directions(degree: usize) -> Array2<f64> {
    let mut directions = Array2::zeros((degree, degree));
    for i in 0..degree {
        directions[[i, i]] = -1.0;
    }
    directions
}

/// Direction correction for rotating the paired tangential dofs of a face:
/// each pair transforms by [[-1, -1], [1, 0]], which has order three
pub fn triangle_rotation_tangent_directions(degree: usize) -> Array2<f64> {
    let n = degree * (degree + 1) / 2;
    let mut directions = Array2::zeros((2 * n, 2 * n));
    for i in 0..n {
        directions[[2 * i, 2 * i]] = -1.0;
        directions[[2 * i, 2 * i + 1]] = -1.0;
        directions[[2 * i + 1, 2 * i]] = 1.0;
    }
    directions
}

/// Direction correction for reflecting the paired tangential dofs of a
/// face: the two tangents swap
pub fn triangle_reflection_tangent_directions(degree: usize) -> Array2<f64> {
    let n = degree * (degree + 1) / 2;
    let mut directions = Array2::zeros((2 * n, 2 * n));
    for i in 0..n {
        directions[[2 * i, 2 * i + 1]] = 1.0;
        directions[[2 * i + 1, 2 * i]] = 1.0;
    }
    directions
}

/// Direction correction for reflecting the scalar normal-moment dofs of a
/// face: the outward normal flips sign. Rotations leave it unchanged, so
/// they need no table.
pub fn triangle_reflection_normal_directions(degree: usize) -> Array2<f64> {
    let n = degree * (degree + 1) / 2;
    let mut directions = Array2::zeros((n, n));
    for i in 0..n {
        directions[[i, i]] = -1.0;
    }
    directions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(a: &[usize], b: &[usize]) -> Vec<usize> {
        a.iter().map(|&i| b[i]).collect()
    }

    fn is_identity(perm: &[usize]) -> bool {
        perm.iter().enumerate().all(|(i, &p)| i == p)
    }

    fn is_bijection(perm: &[usize]) -> bool {
        let mut seen = vec![false; perm.len()];
        for &p in perm {
            if p >= perm.len() || seen[p] {
                return false;
            }
            seen[p] = true;
        }
        true
    }

    #[test]
    fn test_interval_reflection_involution() {
        for degree in 1..6 {
            let perm = interval_reflection(degree);
            assert!(is_bijection(&perm));
            assert!(is_identity(&compose(&perm, &perm)));
        }
    }

    #[test]
    fn test_triangle_rotation_order_three() {
        for degree in 1..6 {
            let perm = triangle_rotation(degree);
            assert_eq!(perm.len(), degree * (degree + 1) / 2);
            assert!(is_bijection(&perm));
            let twice = compose(&perm, &perm);
            assert!(is_identity(&compose(&twice, &perm)));
        }
    }

    #[test]
    fn test_triangle_reflection_involution() {
        for degree in 1..6 {
            let perm = triangle_reflection(degree);
            assert!(is_bijection(&perm));
            assert!(is_identity(&compose(&perm, &perm)));
        }
    }

    #[test]
    fn test_empty_tables_for_degree_zero() {
        assert!(triangle_rotation(0).is_empty());
        assert!(triangle_reflection(0).is_empty());
    }

    #[test]
    fn test_rotation_direction_block_order_three() {
        let d = triangle_rotation_tangent_directions(2);
        let d2 = d.dot(&d);
        let d3 = d2.dot(&d);
        for i in 0..d.nrows() {
            for j in 0..d.ncols() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((d3[[i, j]] - expected).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_reflection_direction_blocks_involutive() {
        for degree in 1..4 {
            let edge = interval_reflection_tangent_directions(degree);
            let e2 = edge.dot(&edge);
            let face = triangle_reflection_tangent_directions(degree);
            let f2 = face.dot(&face);
            for (m, sq) in [(&edge, &e2), (&face, &f2)] {
                assert_eq!(m.nrows(), m.ncols());
                for i in 0..sq.nrows() {
                    for j in 0..sq.ncols() {
                        let expected = if i == j { 1.0 } else { 0.0 };
                        assert!((sq[[i, j]] - expected).abs() < 1e-14);
                    }
                }
            }
        }
    }
}
