//! Finite element basis construction on simplex reference cells
//!
//! This crate builds vector-valued finite elements from first principles:
//! a family-specific candidate polynomial space, a dual basis of integral
//! moment functionals, the dual-orthonormal coefficient solve, and the
//! permutation / direction-correction operators that reconcile dof
//! orientations across mesh entities shared by adjacent cells.
//!
//! # Features
//!
//! - **Element families**: Nedelec first kind (H(curl)) and Raviart-Thomas
//!   (H(div)) on triangles and tetrahedra, any degree
//! - **Moment dual bases**: tangential, normal and generic integral moments
//!   over reference sub-entities
//! - **Orientation bookkeeping**: per-generator dof permutations and
//!   direction corrections, read by assembly code during local-to-global
//!   mapping
//! - **Self-contained numerics**: Gauss-Jacobi simplex quadrature,
//!   orthonormal expansion sets, column-pivoted QR
//!
//! Construction is pure and synchronous: a `(cell type, degree)` request
//! yields an immutable [`element::FiniteElement`] owning all of its data,
//! with no caching and no shared state.
//!
//! # Example
//!
//! ```
//! use math_element::{nedelec, CellType};
//!
//! let element = nedelec::create(CellType::Triangle, 2)?;
//! assert_eq!(element.ndofs(), 8);
//!
//! let points = ndarray::array![[0.25, 0.25], [0.5, 0.1]];
//! let values = element.tabulate_basis(&points)?;
//! assert_eq!(values.dim(), (2, 16));
//! # Ok::<(), math_element::ElementError>(())
//! ```

pub mod cell;
pub mod dofperms;
pub mod element;
pub mod lagrange;
pub mod linalg;
pub mod moments;
pub mod nedelec;
pub mod polynomial;
pub mod polyset;
pub mod quadrature;
pub mod raviart_thomas;

pub use cell::CellType;
pub use element::{ElementError, FiniteElement};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
