//! Reference cells and their topology
//!
//! Vertex coordinates, edge and face vertex lists, sub-entity geometry and
//! equispaced lattices for the simplex reference cells. Edge `i` of a
//! triangle is the edge opposite vertex `i`; the same numbering convention
//! applies to the faces of a tetrahedron.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Reference cell type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// 1D interval [0, 1]
    Interval,
    /// 2D triangle with vertices (0,0), (1,0), (0,1)
    Triangle,
    /// 3D tetrahedron with vertices (0,0,0), (1,0,0), (0,1,0), (0,0,1)
    Tetrahedron,
}

impl CellType {
    /// Topological dimension of the cell
    pub fn topological_dimension(&self) -> usize {
        match self {
            CellType::Interval => 1,
            CellType::Triangle => 2,
            CellType::Tetrahedron => 3,
        }
    }

    /// Number of vertices
    pub fn num_vertices(&self) -> usize {
        match self {
            CellType::Interval => 2,
            CellType::Triangle => 3,
            CellType::Tetrahedron => 4,
        }
    }

    /// Number of sub-entities of the given dimension (the cell itself for
    /// `dim` equal to the topological dimension)
    pub fn num_sub_entities(&self, dim: usize) -> usize {
        if dim == 0 {
            return self.num_vertices();
        }
        topology(*self, dim).len()
    }
}

/// Vertex coordinates of the reference cell, one row per vertex
pub fn geometry(cell_type: CellType) -> Array2<f64> {
    match cell_type {
        CellType::Interval => ndarray::array![[0.0], [1.0]],
        CellType::Triangle => ndarray::array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        CellType::Tetrahedron => ndarray::array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ],
    }
}

/// Vertex indices of each sub-entity of dimension `dim`
pub fn topology(cell_type: CellType, dim: usize) -> Vec<Vec<usize>> {
    match (cell_type, dim) {
        (CellType::Interval, 1) => vec![vec![0, 1]],
        (CellType::Triangle, 1) => vec![vec![1, 2], vec![0, 2], vec![0, 1]],
        (CellType::Triangle, 2) => vec![vec![0, 1, 2]],
        (CellType::Tetrahedron, 1) => vec![
            vec![2, 3],
            vec![1, 3],
            vec![1, 2],
            vec![0, 3],
            vec![0, 2],
            vec![0, 1],
        ],
        (CellType::Tetrahedron, 2) => {
            vec![vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]]
        }
        (CellType::Tetrahedron, 3) => vec![vec![0, 1, 2, 3]],
        _ => panic!("cell {cell_type:?} has no sub-entities of dimension {dim}"),
    }
}

/// Vertex coordinates of sub-entity `index` of dimension `dim`, one row per
/// vertex, in the parent cell's coordinates
pub fn sub_entity_geometry(cell_type: CellType, dim: usize, index: usize) -> Array2<f64> {
    let cell_geom = geometry(cell_type);
    let entity = &topology(cell_type, dim)[index];
    let tdim = cell_type.topological_dimension();
    let mut geom = Array2::zeros((entity.len(), tdim));
    for (row, &v) in entity.iter().enumerate() {
        for d in 0..tdim {
            geom[[row, d]] = cell_geom[[v, d]];
        }
    }
    geom
}

/// Equispaced lattice on the reference cell, one row per point, including
/// the boundary. `n = 0` yields the single midpoint of the cell.
pub fn create_lattice(cell_type: CellType, n: usize) -> Array2<f64> {
    let tdim = cell_type.topological_dimension();
    if n == 0 {
        let geom = geometry(cell_type);
        let nv = geom.nrows() as f64;
        let mut mid = Array2::zeros((1, tdim));
        for d in 0..tdim {
            mid[[0, d]] = geom.column(d).sum() / nv;
        }
        return mid;
    }
    let h = 1.0 / n as f64;
    let mut points = Vec::new();
    match cell_type {
        CellType::Interval => {
            for i in 0..=n {
                points.push(vec![i as f64 * h]);
            }
        }
        CellType::Triangle => {
            for j in 0..=n {
                for i in 0..=(n - j) {
                    points.push(vec![i as f64 * h, j as f64 * h]);
                }
            }
        }
        CellType::Tetrahedron => {
            for k in 0..=n {
                for j in 0..=(n - k) {
                    for i in 0..=(n - j - k) {
                        points.push(vec![i as f64 * h, j as f64 * h, k as f64 * h]);
                    }
                }
            }
        }
    }
    let mut lattice = Array2::zeros((points.len(), tdim));
    for (row, pt) in points.iter().enumerate() {
        for d in 0..tdim {
            lattice[[row, d]] = pt[d];
        }
    }
    lattice
}
