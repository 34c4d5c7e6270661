//! Constraint-level algebra for convex polyhedra in H-representation.
//!
//! Scope
//! - Membership, constrained dimensions and `(A, b)` conversion (`hrep`).
//! - Redundancy removal by Fukuda's LP method (`redundancy`).
//! - Concrete linear maps with vertex/inverse/division strategies (`linear_map`).
//! - Chebyshev centers (`chebyshev`).
//! - An LP seam (`lp::LpBackend`): `minilp` solves float problems, an in-crate
//!   tableau simplex solves exact-rational ones.
//!
//! Numeric fields
//! - Every algorithm is generic over `field::Scalar` (`f64`, `BigRational`) and
//!   takes an explicit `FieldCfg` carrying the tolerance and LP settings.
//!
//! API Policy
//! - Operations are free functions over the `sets::Polyhedron` capability;
//!   concrete set types only add constructors and in-place helpers.

pub mod cfg;
pub mod chebyshev;
pub mod constraint;
pub mod error;
pub mod field;
pub mod hrep;
pub mod hull;
pub mod linear_map;
pub mod lp;
pub mod matrix;
pub mod redundancy;
pub mod sets;
pub mod vertices;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{PolyError, PolyResult};
pub use num_rational::BigRational;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::chebyshev::{chebyshev_center, chebyshev_center_radius};
    pub use crate::constraint::LinearConstraint;
    pub use crate::error::{PolyError, PolyResult};
    pub use crate::field::{FieldCfg, FieldKind, Scalar};
    pub use crate::hrep::{constrained_dimensions, contains, from_simple_hrep, to_simple_hrep, SimpleHRep};
    pub use crate::linear_map::{linear_map, LinearMapOptions, MapAlgorithm, MapMatrix, MappedSet};
    pub use crate::lp::{is_feasible, solve_lp, LpBackend, LpStatus, MiniLp, Sense, Simplex};
    pub use crate::matrix::SparseMatrix;
    pub use crate::redundancy::{remove_redundant, removed_redundant};
    pub use crate::sets::{
        HPolygon, HPolyhedron, HPolytope, HalfSpace, Hyperplane, Interval, Polyhedron, SetKind, VPolygon,
        VPolytope,
    };
    pub use nalgebra::{DMatrix, DVector};
}
