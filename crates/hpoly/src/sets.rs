//! Set kinds consumed and produced by the constraint algebra.
//!
//! Purpose
//! - `Polyhedron` is the capability the algorithms need: a dimension, an
//!   ordered constraint list, a kind tag, and optional boundedness/vertex
//!   capabilities with LP/enumeration defaults.
//! - Concrete H-kinds: `HalfSpace`, `Hyperplane`, `HPolygon`, `HPolytope`,
//!   `HPolyhedron`. V-kinds (outputs of the vertex map path): `Interval`,
//!   `VPolygon`, `VPolytope`.
//!
//! Conventions
//! - A raw constraint slice is itself a polyhedron whose dimension is that of
//!   its first constraint, and 0 when empty. Callers that know the ambient
//!   dimension should wrap the list in `HPolyhedron::new` instead.

use std::borrow::Cow;

use nalgebra::{DMatrix, DVector};

use crate::constraint::LinearConstraint;
use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, Scalar};
use crate::hull::convex_hull_2d;
use crate::lp::{LpBackend, LpProblem, LpStatus, Sense};
use crate::redundancy::remove_redundant;
use crate::vertices::{enumerate_vertices, is_bounded};

/// Kind tag used to pick the output representation of a linear map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetKind {
    HalfSpace,
    Hyperplane,
    Polygon,
    Polytope,
    Polyhedron,
}

/// Anything with an ordered H-representation.
pub trait Polyhedron<N: Scalar> {
    fn dim(&self) -> usize;

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]>;

    fn kind(&self) -> SetKind {
        SetKind::Polyhedron
    }

    /// Boundedness oracle; defaults to one LP per signed coordinate direction.
    fn is_bounded(&self, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        is_bounded(&self.constraints(), self.dim(), cfg)
    }

    /// Vertex list; defaults to brute-force enumeration.
    fn vertices(&self, cfg: &FieldCfg<N>) -> PolyResult<Vec<DVector<N>>> {
        enumerate_vertices(&self.constraints(), self.dim(), cfg)
    }
}

impl<N: Scalar> Polyhedron<N> for [LinearConstraint<N>] {
    fn dim(&self) -> usize {
        self.first().map_or(0, LinearConstraint::dim)
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]> {
        Cow::Borrowed(self)
    }
}

fn check_dims<N: Scalar>(dim: usize, constraints: &[LinearConstraint<N>]) -> PolyResult<()> {
    match constraints.iter().find(|c| c.dim() != dim) {
        Some(c) => Err(PolyError::DimensionMismatch {
            expected: dim,
            got: c.dim(),
            context: "constraint list",
        }),
        None => Ok(()),
    }
}

/// Closed half-space as a set.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfSpace<N: Scalar> {
    pub constraint: LinearConstraint<N>,
}

impl<N: Scalar> HalfSpace<N> {
    pub fn new(a: DVector<N>, b: N) -> Self {
        Self {
            constraint: LinearConstraint::new(a, b),
        }
    }
}

impl<N: Scalar> Polyhedron<N> for HalfSpace<N> {
    fn dim(&self) -> usize {
        self.constraint.dim()
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]> {
        Cow::Owned(vec![self.constraint.clone()])
    }

    fn kind(&self) -> SetKind {
        SetKind::HalfSpace
    }
}

/// Hyperplane `a · x = b`, i.e. `a · x <= b` and `-a · x <= -b`.
///
/// In 2D this is a line.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperplane<N: Scalar> {
    pub a: DVector<N>,
    pub b: N,
}

impl<N: Scalar> Hyperplane<N> {
    pub fn new(a: DVector<N>, b: N) -> Self {
        Self { a, b }
    }
}

impl<N: Scalar> Polyhedron<N> for Hyperplane<N> {
    fn dim(&self) -> usize {
        self.a.len()
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]> {
        let c = LinearConstraint::new(self.a.clone(), self.b.clone());
        let f = c.flipped();
        Cow::Owned(vec![c, f])
    }

    fn kind(&self) -> SetKind {
        SetKind::Hyperplane
    }
}

/// General H-polyhedron (possibly unbounded or empty).
#[derive(Clone, Debug, PartialEq)]
pub struct HPolyhedron<N: Scalar> {
    dim: usize,
    constraints: Vec<LinearConstraint<N>>,
}

/// Bounded H-polytope; boundedness is the caller's promise.
#[derive(Clone, Debug, PartialEq)]
pub struct HPolytope<N: Scalar> {
    dim: usize,
    constraints: Vec<LinearConstraint<N>>,
}

/// Bounded H-polygon in R^2.
#[derive(Clone, Debug, PartialEq)]
pub struct HPolygon<N: Scalar> {
    constraints: Vec<LinearConstraint<N>>,
}

impl<N: Scalar> HPolyhedron<N> {
    pub fn new(dim: usize, constraints: Vec<LinearConstraint<N>>) -> PolyResult<Self> {
        check_dims(dim, &constraints)?;
        Ok(Self { dim, constraints })
    }

    /// The whole space R^dim.
    pub fn universe(dim: usize) -> Self {
        Self {
            dim,
            constraints: Vec::new(),
        }
    }

    /// Append inequality (intersection).
    pub fn add_constraint(&mut self, c: LinearConstraint<N>) -> PolyResult<()> {
        check_dims(self.dim, std::slice::from_ref(&c))?;
        self.constraints.push(c);
        Ok(())
    }

    /// See `redundancy::remove_redundant`.
    pub fn remove_redundant_constraints(&mut self, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        remove_redundant(&mut self.constraints, cfg)
    }

    pub fn into_constraints(self) -> Vec<LinearConstraint<N>> {
        self.constraints
    }
}

impl<N: Scalar> HPolytope<N> {
    pub fn new(dim: usize, constraints: Vec<LinearConstraint<N>>) -> PolyResult<Self> {
        check_dims(dim, &constraints)?;
        Ok(Self { dim, constraints })
    }

    /// Axis-aligned box `lo <= x <= hi`.
    pub fn from_box(lo: &[N], hi: &[N]) -> PolyResult<Self> {
        if lo.len() != hi.len() {
            return Err(PolyError::DimensionMismatch {
                expected: lo.len(),
                got: hi.len(),
                context: "box bounds",
            });
        }
        let n = lo.len();
        let mut constraints = Vec::with_capacity(2 * n);
        for i in 0..n {
            let e = DVector::from_fn(n, |k, _| if k == i { N::one() } else { N::zero() });
            constraints.push(LinearConstraint::new(e.clone(), hi[i].clone()));
            constraints.push(LinearConstraint::new(e.map(|v| -v), -lo[i].clone()));
        }
        Ok(Self { dim: n, constraints })
    }

    pub fn remove_redundant_constraints(&mut self, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        remove_redundant(&mut self.constraints, cfg)
    }

    pub fn into_constraints(self) -> Vec<LinearConstraint<N>> {
        self.constraints
    }
}

impl<N: Scalar> HPolygon<N> {
    pub fn new(constraints: Vec<LinearConstraint<N>>) -> PolyResult<Self> {
        check_dims(2, &constraints)?;
        Ok(Self { constraints })
    }

    pub fn remove_redundant_constraints(&mut self, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        remove_redundant(&mut self.constraints, cfg)
    }

    pub fn into_constraints(self) -> Vec<LinearConstraint<N>> {
        self.constraints
    }
}

impl<N: Scalar> Polyhedron<N> for HPolyhedron<N> {
    fn dim(&self) -> usize {
        self.dim
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]> {
        Cow::Borrowed(&self.constraints)
    }
}

impl<N: Scalar> Polyhedron<N> for HPolytope<N> {
    fn dim(&self) -> usize {
        self.dim
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]> {
        Cow::Borrowed(&self.constraints)
    }

    fn kind(&self) -> SetKind {
        SetKind::Polytope
    }

    fn is_bounded(&self, _cfg: &FieldCfg<N>) -> PolyResult<bool> {
        Ok(true)
    }
}

impl<N: Scalar> Polyhedron<N> for HPolygon<N> {
    fn dim(&self) -> usize {
        2
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<N>]> {
        Cow::Borrowed(&self.constraints)
    }

    fn kind(&self) -> SetKind {
        SetKind::Polygon
    }

    fn is_bounded(&self, _cfg: &FieldCfg<N>) -> PolyResult<bool> {
        Ok(true)
    }
}

/// Closed interval `[lo, hi]` in R^1.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval<N: Scalar> {
    pub lo: N,
    pub hi: N,
}

impl<N: Scalar> Interval<N> {
    pub fn new(lo: N, hi: N) -> Self {
        Self { lo, hi }
    }

    /// Smallest interval containing the 1D points; `None` for no points.
    pub fn hull_of(points: &[DVector<N>]) -> Option<Self> {
        let mut it = points.iter().map(|p| p[0].clone());
        let first = it.next()?;
        let (lo, hi) = it.fold((first.clone(), first), |(lo, hi), v| {
            let lo = if v < lo { v.clone() } else { lo };
            let hi = if v > hi { v } else { hi };
            (lo, hi)
        });
        Some(Self { lo, hi })
    }

    pub fn contains(&self, point: &DVector<N>, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        cfg.check()?;
        if point.len() != 1 {
            return Err(PolyError::DimensionMismatch {
                expected: 1,
                got: point.len(),
                context: "interval membership",
            });
        }
        Ok(cfg.leq(&self.lo, &point[0]) && cfg.leq(&point[0], &self.hi))
    }
}

/// Polygon given by a raw point list (not necessarily in convex position).
#[derive(Clone, Debug, PartialEq)]
pub struct VPolygon<N: Scalar> {
    pub vertices: Vec<DVector<N>>,
}

impl<N: Scalar> VPolygon<N> {
    pub fn new(vertices: Vec<DVector<N>>) -> Self {
        Self { vertices }
    }

    /// Convex-position vertices in counter-clockwise order.
    pub fn hull(&self, cfg: &FieldCfg<N>) -> Self {
        Self {
            vertices: convex_hull_2d(&self.vertices, cfg),
        }
    }

    pub fn contains(&self, point: &DVector<N>, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        in_convex_hull(2, &self.vertices, point, cfg)
    }
}

/// Polytope given by a raw point list in R^dim.
#[derive(Clone, Debug, PartialEq)]
pub struct VPolytope<N: Scalar> {
    pub dim: usize,
    pub vertices: Vec<DVector<N>>,
}

impl<N: Scalar> VPolytope<N> {
    pub fn new(dim: usize, vertices: Vec<DVector<N>>) -> PolyResult<Self> {
        if let Some(v) = vertices.iter().find(|v| v.len() != dim) {
            return Err(PolyError::DimensionMismatch {
                expected: dim,
                got: v.len(),
                context: "vertex list",
            });
        }
        Ok(Self { dim, vertices })
    }

    pub fn contains(&self, point: &DVector<N>, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        in_convex_hull(self.dim, &self.vertices, point, cfg)
    }
}

/// Convex-combination test `p = Σ λ_i v_i, Σ λ_i = 1, λ >= 0` as an LP
/// feasibility problem; equalities are split into two inequalities with
/// `eps` slack.
fn in_convex_hull<N: Scalar>(
    dim: usize,
    vertices: &[DVector<N>],
    point: &DVector<N>,
    cfg: &FieldCfg<N>,
) -> PolyResult<bool> {
    cfg.check()?;
    if point.len() != dim {
        return Err(PolyError::DimensionMismatch {
            expected: dim,
            got: point.len(),
            context: "V-polytope membership",
        });
    }
    if vertices.is_empty() {
        return Ok(false);
    }
    let k = vertices.len();
    let rows = 2 * dim + 2;
    let mut a = DMatrix::from_element(rows, k, N::zero());
    let mut b = DVector::from_element(rows, N::zero());
    for d in 0..dim {
        for (i, v) in vertices.iter().enumerate() {
            a[(2 * d, i)] = v[d].clone();
            a[(2 * d + 1, i)] = -v[d].clone();
        }
        b[2 * d] = point[d].clone() + cfg.eps.clone();
        b[2 * d + 1] = -point[d].clone() + cfg.eps.clone();
    }
    for i in 0..k {
        a[(2 * dim, i)] = N::one();
        a[(2 * dim + 1, i)] = -N::one();
    }
    b[2 * dim] = N::one();
    b[2 * dim + 1] = -N::one();
    let problem = LpProblem::new(Sense::Minimize, DVector::from_element(k, N::zero()), a, b)?
        .with_bounds(vec![Some(N::zero()); k], vec![None; k])?;
    let solution = cfg
        .backend()
        .solve(&problem)
        .expect_decided("V-polytope membership")?;
    Ok(solution.status == LpStatus::Optimal)
}
