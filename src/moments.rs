//! Integral moment matrices over reference sub-entities
//!
//! Each builder maps a quadrature rule for the moment cell onto every
//! sub-entity of the parent cell, tabulates the moment space there together
//! with the parent expansion set, and fills one dual row per entity, moment
//! function and direction. Rows are ordered entity-major, then moment
//! function, with the entity axis fastest for the generic moments. Tangents
//! and axes are unnormalized vertex differences; normals are the rotated
//! tangent (2D) or the axis cross product (3D).

use crate::cell::{self, CellType};
use crate::element::{ElementError, FiniteElement};
use crate::polyset;
use crate::quadrature;
use ndarray::{Array1, Array2};

/// Map reference points of the moment cell onto a sub-entity of the parent
fn map_points_to_entity(entity_geom: &Array2<f64>, qpts: &Array2<f64>, tdim: usize) -> Array2<f64> {
    let mut points = Array2::zeros((qpts.nrows(), tdim));
    for q in 0..qpts.nrows() {
        for d in 0..tdim {
            let mut value = entity_geom[[0, d]];
            for j in 0..qpts.ncols() {
                value += qpts[[q, j]] * (entity_geom[[j + 1, d]] - entity_geom[[0, d]]);
            }
            points[[q, d]] = value;
        }
    }
    points
}

/// Integrals of each moment function against each parent expansion
/// polynomial over one entity
fn moment_integrals(
    phi: &Array2<f64>,
    parent_table: &Array2<f64>,
    qwts: &Array1<f64>,
) -> Array2<f64> {
    let mut integrals = Array2::zeros((phi.ncols(), parent_table.ncols()));
    for j in 0..phi.ncols() {
        for k in 0..parent_table.ncols() {
            let mut s = 0.0;
            for q in 0..qwts.len() {
                s += qwts[q] * phi[[q, j]] * parent_table[[q, k]];
            }
            integrals[[j, k]] = s;
        }
    }
    integrals
}

/// Generic integral moments: one dual row per entity, moment function and
/// entity axis, pairing the scalar moment space with each axis direction
pub fn make_integral_moments(
    moment_space: &FiniteElement,
    celltype: CellType,
    value_size: usize,
    degree: usize,
    quad_degree: usize,
) -> Result<Array2<f64>, ElementError> {
    let tdim = celltype.topological_dimension();
    assert_eq!(value_size, tdim, "moments pair a scalar space with a vector one");
    let sub_dim = moment_space.cell_type().topological_dimension();

    let (qpts, qwts) = quadrature::make_quadrature(sub_dim, quad_degree);
    let phi = moment_space.tabulate_basis(&qpts)?;
    let psize = polyset::size(celltype, degree);
    let num_entities = celltype.num_sub_entities(sub_dim);

    let mut dual = Array2::zeros((num_entities * phi.ncols() * sub_dim, psize * value_size));
    let mut row = 0;
    for entity in 0..num_entities {
        let geom = cell::sub_entity_geometry(celltype, sub_dim, entity);
        let points = map_points_to_entity(&geom, &qpts, tdim);
        let parent_table = polyset::tabulate(celltype, degree, &points);
        let integrals = moment_integrals(&phi, &parent_table, &qwts);
        for j in 0..phi.ncols() {
            for axis in 0..sub_dim {
                for d in 0..tdim {
                    let component = geom[[axis + 1, d]] - geom[[0, d]];
                    for k in 0..psize {
                        dual[[row, d * psize + k]] = component * integrals[[j, k]];
                    }
                }
                row += 1;
            }
        }
    }
    Ok(dual)
}

/// Tangential integral moments over every edge of the parent cell
pub fn make_tangent_integral_moments(
    moment_space: &FiniteElement,
    celltype: CellType,
    value_size: usize,
    degree: usize,
    quad_degree: usize,
) -> Result<Array2<f64>, ElementError> {
    let tdim = celltype.topological_dimension();
    assert_eq!(value_size, tdim, "moments pair a scalar space with a vector one");
    assert_eq!(
        moment_space.cell_type(),
        CellType::Interval,
        "tangent moments take an interval moment space"
    );

    let (qpts, qwts) = quadrature::make_quadrature(1, quad_degree);
    let phi = moment_space.tabulate_basis(&qpts)?;
    let psize = polyset::size(celltype, degree);
    let num_edges = celltype.num_sub_entities(1);

    let mut dual = Array2::zeros((num_edges * phi.ncols(), psize * value_size));
    let mut row = 0;
    for edge in 0..num_edges {
        let geom = cell::sub_entity_geometry(celltype, 1, edge);
        let points = map_points_to_entity(&geom, &qpts, tdim);
        let parent_table = polyset::tabulate(celltype, degree, &points);
        let integrals = moment_integrals(&phi, &parent_table, &qwts);
        for j in 0..phi.ncols() {
            for d in 0..tdim {
                let tangent = geom[[1, d]] - geom[[0, d]];
                for k in 0..psize {
                    dual[[row, d * psize + k]] = tangent * integrals[[j, k]];
                }
            }
            row += 1;
        }
    }
    Ok(dual)
}

/// Normal integral moments over every facet of the parent cell
pub fn make_normal_integral_moments(
    moment_space: &FiniteElement,
    celltype: CellType,
    value_size: usize,
    degree: usize,
    quad_degree: usize,
) -> Result<Array2<f64>, ElementError> {
    let tdim = celltype.topological_dimension();
    assert_eq!(value_size, tdim, "moments pair a scalar space with a vector one");
    let facet_dim = tdim - 1;
    assert_eq!(
        moment_space.cell_type().topological_dimension(),
        facet_dim,
        "normal moments take a facet moment space"
    );

    let (qpts, qwts) = quadrature::make_quadrature(facet_dim, quad_degree);
    let phi = moment_space.tabulate_basis(&qpts)?;
    let psize = polyset::size(celltype, degree);
    let num_facets = celltype.num_sub_entities(facet_dim);

    let mut dual = Array2::zeros((num_facets * phi.ncols(), psize * value_size));
    let mut row = 0;
    for facet in 0..num_facets {
        let geom = cell::sub_entity_geometry(celltype, facet_dim, facet);
        let normal = facet_normal(&geom, tdim);
        let points = map_points_to_entity(&geom, &qpts, tdim);
        let parent_table = polyset::tabulate(celltype, degree, &points);
        let integrals = moment_integrals(&phi, &parent_table, &qwts);
        for j in 0..phi.ncols() {
            for d in 0..tdim {
                for k in 0..psize {
                    dual[[row, d * psize + k]] = normal[d] * integrals[[j, k]];
                }
            }
            row += 1;
        }
    }
    Ok(dual)
}

/// Unnormalized facet normal: the tangent rotated a quarter turn in 2D, the
/// cross product of the two facet axes in 3D
fn facet_normal(geom: &Array2<f64>, tdim: usize) -> Vec<f64> {
    match tdim {
        2 => {
            let tx = geom[[1, 0]] - geom[[0, 0]];
            let ty = geom[[1, 1]] - geom[[0, 1]];
            vec![-ty, tx]
        }
        3 => {
            let a = [
                geom[[1, 0]] - geom[[0, 0]],
                geom[[1, 1]] - geom[[0, 1]],
                geom[[1, 2]] - geom[[0, 2]],
            ];
            let b = [
                geom[[2, 0]] - geom[[0, 0]],
                geom[[2, 1]] - geom[[0, 1]],
                geom[[2, 2]] - geom[[0, 2]],
            ];
            vec![
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ]
        }
        _ => panic!("no facet normal in dimension {tdim}"),
    }
}
