//! Concrete linear map `M · P = {M x : x ∈ P}` of an H-polyhedron.
//!
//! Purpose
//! - Pick one of three strategies and return the image in the most specific
//!   representation the input kind allows.
//!
//! Strategies
//! - `Inverse`: for invertible square `M`, `M x ∈ M·P` iff `a · M⁻¹ y <= b`, so
//!   each half-space maps to `((M⁻¹)ᵀ a, b)`.
//! - `Division`: same normals obtained by solving `Mᵀ a' = a` (least squares
//!   through the normal equations when `M` is wide with full row rank). The
//!   solution is only used when `Mᵀ a' = a` holds up to the field tolerance;
//!   a normal outside the row space of `M` has no exact image normal.
//! - `Vrep`: enumerate vertices of a bounded `P` and map them. Points are
//!   returned raw; consumers normalize with `hull::convex_hull_2d` if needed.
//!
//! Selection when no algorithm is given
//! - sparse or non-square `M`: `Division` when `M` has full row rank, else
//!   `Vrep`;
//! - dense square `M`: `Inverse` when invertibility checks are disabled or the
//!   check passes, else `Vrep`.
//! - an automatically selected `Division` whose normals fail the residual
//!   check falls back to `Vrep` for bounded `P`. A forced `Division` reports
//!   `InvalidAlgorithmChoice` instead.
//!
//! Invertibility check: condition number below `cond_tol` for floats, exact
//! rank for rationals (see `matrix::is_invertible`).

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::cfg::DEFAULT_COND_TOL;
use crate::constraint::LinearConstraint;
use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, Scalar};
use crate::hrep;
use crate::matrix::{is_invertible, left_divide, rank, scale_of, try_inverse, SparseMatrix};
use crate::sets::{
    HPolygon, HPolyhedron, HPolytope, HalfSpace, Hyperplane, Interval, Polyhedron, SetKind, VPolygon,
    VPolytope,
};

/// Strategy of the linear map engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapAlgorithm {
    Vrep,
    Inverse,
    Division,
}

impl FromStr for MapAlgorithm {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vrep" => Ok(MapAlgorithm::Vrep),
            "inverse" => Ok(MapAlgorithm::Inverse),
            "division" => Ok(MapAlgorithm::Division),
            other => Err(PolyError::InvalidAlgorithmChoice(format!(
                "unknown algorithm '{}' (expected vrep, inverse or division)",
                other
            ))),
        }
    }
}

impl fmt::Display for MapAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MapAlgorithm::Vrep => "vrep",
            MapAlgorithm::Inverse => "inverse",
            MapAlgorithm::Division => "division",
        })
    }
}

/// Knobs of [`linear_map`].
#[derive(Clone, Debug, PartialEq)]
pub struct LinearMapOptions<N: Scalar> {
    /// `None` selects automatically.
    pub algorithm: Option<MapAlgorithm>,
    /// Verify invertibility before taking the inverse path.
    pub check_invertibility: bool,
    /// Largest condition number accepted as invertible (float fields).
    pub cond_tol: f64,
    /// Precomputed `M⁻¹`; when present the inverse path is taken unconditionally.
    pub inverse: Option<DMatrix<N>>,
}

impl<N: Scalar> Default for LinearMapOptions<N> {
    fn default() -> Self {
        Self {
            algorithm: None,
            check_invertibility: true,
            cond_tol: DEFAULT_COND_TOL,
            inverse: None,
        }
    }
}

/// Map matrix, dense or coordinate-sparse.
#[derive(Clone, Debug, PartialEq)]
pub enum MapMatrix<N: Scalar> {
    Dense(DMatrix<N>),
    Sparse(SparseMatrix<N>),
}

impl<N: Scalar> MapMatrix<N> {
    pub fn nrows(&self) -> usize {
        match self {
            MapMatrix::Dense(m) => m.nrows(),
            MapMatrix::Sparse(m) => m.nrows(),
        }
    }

    pub fn ncols(&self) -> usize {
        match self {
            MapMatrix::Dense(m) => m.ncols(),
            MapMatrix::Sparse(m) => m.ncols(),
        }
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        matches!(self, MapMatrix::Sparse(_))
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    pub fn to_dense(&self) -> DMatrix<N> {
        match self {
            MapMatrix::Dense(m) => m.clone(),
            MapMatrix::Sparse(m) => m.to_dense(),
        }
    }

    /// `M x`.
    pub fn apply(&self, x: &DVector<N>) -> DVector<N> {
        match self {
            MapMatrix::Dense(m) => m * x,
            MapMatrix::Sparse(m) => m.mul_vec(x),
        }
    }
}

impl<N: Scalar> From<DMatrix<N>> for MapMatrix<N> {
    fn from(m: DMatrix<N>) -> Self {
        MapMatrix::Dense(m)
    }
}

impl<N: Scalar> From<SparseMatrix<N>> for MapMatrix<N> {
    fn from(m: SparseMatrix<N>) -> Self {
        MapMatrix::Sparse(m)
    }
}

/// Image of a linear map: one of the H-kinds (inverse/division paths) or one of
/// the V-kinds (vertex path).
#[derive(Clone, Debug, PartialEq)]
pub enum MappedSet<N: Scalar> {
    HalfSpace(HalfSpace<N>),
    Hyperplane(Hyperplane<N>),
    Polygon(HPolygon<N>),
    Polytope(HPolytope<N>),
    Polyhedron(HPolyhedron<N>),
    Interval(Interval<N>),
    VPolygon(VPolygon<N>),
    VPolytope(VPolytope<N>),
}

impl<N: Scalar> MappedSet<N> {
    /// H-representation view, `None` for the V-kinds.
    pub fn as_hrep(&self) -> Option<&dyn Polyhedron<N>> {
        match self {
            MappedSet::HalfSpace(s) => Some(s),
            MappedSet::Hyperplane(s) => Some(s),
            MappedSet::Polygon(s) => Some(s),
            MappedSet::Polytope(s) => Some(s),
            MappedSet::Polyhedron(s) => Some(s),
            MappedSet::Interval(_) | MappedSet::VPolygon(_) | MappedSet::VPolytope(_) => None,
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            MappedSet::Interval(_) => 1,
            MappedSet::VPolygon(_) => 2,
            MappedSet::VPolytope(v) => v.dim,
            h => h.as_hrep().map_or(0, |p| p.dim()),
        }
    }

    /// Kind tag; V-kinds report the bounded kind of their dimension.
    pub fn kind(&self) -> SetKind {
        match self {
            MappedSet::Interval(_) | MappedSet::VPolytope(_) => SetKind::Polytope,
            MappedSet::VPolygon(_) => SetKind::Polygon,
            h => h.as_hrep().map_or(SetKind::Polyhedron, |p| p.kind()),
        }
    }

    pub fn contains(&self, point: &DVector<N>, cfg: &FieldCfg<N>) -> PolyResult<bool> {
        match self {
            MappedSet::Interval(i) => i.contains(point, cfg),
            MappedSet::VPolygon(v) => v.contains(point, cfg),
            MappedSet::VPolytope(v) => v.contains(point, cfg),
            h => match h.as_hrep() {
                Some(p) => hrep::contains(point, p, cfg),
                None => Ok(false),
            },
        }
    }
}

/// Algorithm the engine would pick for `m` when `options.algorithm` is `None`.
pub fn select_algorithm<N: Scalar>(
    m: &MapMatrix<N>,
    options: &LinearMapOptions<N>,
    cfg: &FieldCfg<N>,
) -> MapAlgorithm {
    choose(m, options, cfg).0
}

/// Selected algorithm and whether invertibility was already verified.
fn choose<N: Scalar>(
    m: &MapMatrix<N>,
    options: &LinearMapOptions<N>,
    cfg: &FieldCfg<N>,
) -> (MapAlgorithm, bool) {
    if m.is_sparse() || !m.is_square() {
        if rank(&m.to_dense(), cfg) == m.nrows() {
            (MapAlgorithm::Division, false)
        } else {
            (MapAlgorithm::Vrep, false)
        }
    } else if !options.check_invertibility {
        (MapAlgorithm::Inverse, false)
    } else if is_invertible(&m.to_dense(), options.cond_tol, cfg) {
        (MapAlgorithm::Inverse, true)
    } else {
        (MapAlgorithm::Vrep, false)
    }
}

/// `M · P`.
pub fn linear_map<N, P>(
    m: &MapMatrix<N>,
    p: &P,
    options: &LinearMapOptions<N>,
    cfg: &FieldCfg<N>,
) -> PolyResult<MappedSet<N>>
where
    N: Scalar,
    P: Polyhedron<N> + ?Sized,
{
    cfg.check()?;
    if m.ncols() != p.dim() {
        return Err(PolyError::DimensionMismatch {
            expected: p.dim(),
            got: m.ncols(),
            context: "linear map columns",
        });
    }

    if let Some(inv) = &options.inverse {
        if inv.nrows() != m.nrows() || inv.ncols() != m.nrows() || !m.is_square() {
            return Err(PolyError::DimensionMismatch {
                expected: m.ncols(),
                got: inv.nrows(),
                context: "precomputed inverse",
            });
        }
        debug!(n = m.nrows(), "linear map via precomputed inverse");
        return map_by_inverse(inv, p);
    }

    let (algorithm, verified) = match options.algorithm {
        Some(a) => (a, false),
        None => choose(m, options, cfg),
    };
    debug!(
        %algorithm,
        rows = m.nrows(),
        cols = m.ncols(),
        sparse = m.is_sparse(),
        forced = options.algorithm.is_some(),
        "linear map"
    );

    match algorithm {
        MapAlgorithm::Vrep => map_by_vertices(m, p, cfg),
        MapAlgorithm::Inverse => {
            if !m.is_square() {
                return Err(PolyError::InvalidAlgorithmChoice(format!(
                    "inverse needs a square matrix, got {}x{}",
                    m.nrows(),
                    m.ncols()
                )));
            }
            let dense = m.to_dense();
            if options.check_invertibility && !verified && !is_invertible(&dense, options.cond_tol, cfg) {
                return Err(PolyError::InvalidAlgorithmChoice(
                    "inverse requested but the matrix failed the invertibility check".into(),
                ));
            }
            let inv = try_inverse(&dense, cfg).ok_or_else(|| {
                PolyError::InvalidAlgorithmChoice("inverse requested but the matrix is singular".into())
            })?;
            map_by_inverse(&inv, p)
        }
        MapAlgorithm::Division => match map_by_division(m, p, cfg)? {
            Some(img) => Ok(img),
            None if options.algorithm.is_some() => Err(PolyError::InvalidAlgorithmChoice(
                "division requested but a normal lies outside the row space of the matrix".into(),
            )),
            None => {
                if !p.is_bounded(cfg)? {
                    return Err(PolyError::InvalidAlgorithmChoice(
                        "division cannot represent this image and vrep needs a bounded set".into(),
                    ));
                }
                debug!("division residual too large; falling back to vrep");
                map_by_vertices(m, p, cfg)
            }
        },
    }
}

fn map_by_inverse<N, P>(inv: &DMatrix<N>, p: &P) -> PolyResult<MappedSet<N>>
where
    N: Scalar,
    P: Polyhedron<N> + ?Sized,
{
    let mapped = p
        .constraints()
        .iter()
        .map(|c| LinearConstraint::new(inv.tr_mul(&c.a), c.b.clone()))
        .collect();
    wrap_hrep(p.kind(), inv.nrows(), mapped)
}

/// `Ok(None)` when some normal `a` has no exact solution of `Mᵀ a' = a`.
fn map_by_division<N, P>(m: &MapMatrix<N>, p: &P, cfg: &FieldCfg<N>) -> PolyResult<Option<MappedSet<N>>>
where
    N: Scalar,
    P: Polyhedron<N> + ?Sized,
{
    let mt = m.to_dense().transpose();
    let mut mapped = Vec::with_capacity(p.constraints().len());
    for (i, c) in p.constraints().iter().enumerate() {
        let a = left_divide(&mt, &c.a, cfg).ok_or_else(|| {
            PolyError::InvalidAlgorithmChoice(format!(
                "division needs a {}x{} matrix of full row rank",
                m.nrows(),
                m.ncols()
            ))
        })?;
        // residual measured in units of the original normal
        let s = scale_of(c.a.iter());
        let residual = &mt * &a - &c.a;
        if !residual.iter().all(|r| cfg.approx_zero(&(r.clone() / s.clone()))) {
            debug!(constraint = i, "normal outside the row space of the map");
            return Ok(None);
        }
        mapped.push(LinearConstraint::new(a, c.b.clone()));
    }
    wrap_hrep(p.kind(), m.nrows(), mapped).map(Some)
}

fn map_by_vertices<N, P>(m: &MapMatrix<N>, p: &P, cfg: &FieldCfg<N>) -> PolyResult<MappedSet<N>>
where
    N: Scalar,
    P: Polyhedron<N> + ?Sized,
{
    if !p.is_bounded(cfg)? {
        return Err(PolyError::InvalidAlgorithmChoice(
            "vrep needs a bounded set".into(),
        ));
    }
    let points: Vec<DVector<N>> = p.vertices(cfg)?.iter().map(|v| m.apply(v)).collect();
    let out_dim = m.nrows();
    Ok(match out_dim {
        1 => match Interval::hull_of(&points) {
            Some(i) => MappedSet::Interval(i),
            None => MappedSet::VPolytope(VPolytope::new(1, points)?),
        },
        2 => MappedSet::VPolygon(VPolygon::new(points)),
        _ => MappedSet::VPolytope(VPolytope::new(out_dim, points)?),
    })
}

/// Keep the input kind where the output dimension allows it.
fn wrap_hrep<N: Scalar>(
    kind: SetKind,
    out_dim: usize,
    mut constraints: Vec<LinearConstraint<N>>,
) -> PolyResult<MappedSet<N>> {
    Ok(match kind {
        SetKind::HalfSpace if constraints.len() == 1 => {
            let c = constraints.remove(0);
            MappedSet::HalfSpace(HalfSpace::new(c.a, c.b))
        }
        SetKind::Hyperplane if !constraints.is_empty() => {
            let c = constraints.remove(0);
            MappedSet::Hyperplane(Hyperplane::new(c.a, c.b))
        }
        SetKind::Polygon if out_dim == 2 => MappedSet::Polygon(HPolygon::new(constraints)?),
        SetKind::Polygon | SetKind::Polytope => {
            MappedSet::Polytope(HPolytope::new(out_dim, constraints)?)
        }
        _ => MappedSet::Polyhedron(HPolyhedron::new(out_dim, constraints)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};
    use num_rational::BigRational;

    fn unit_square() -> HPolytope<f64> {
        HPolytope::from_box(&[0.0, 0.0], &[1.0, 1.0]).unwrap()
    }

    fn forced(a: MapAlgorithm) -> LinearMapOptions<f64> {
        LinearMapOptions {
            algorithm: Some(a),
            ..Default::default()
        }
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("vrep".parse::<MapAlgorithm>().unwrap(), MapAlgorithm::Vrep);
        assert_eq!("division".parse::<MapAlgorithm>().unwrap(), MapAlgorithm::Division);
        assert_eq!(MapAlgorithm::Inverse.to_string(), "inverse");
        assert!(matches!(
            "qr".parse::<MapAlgorithm>(),
            Err(PolyError::InvalidAlgorithmChoice(_))
        ));
    }

    #[test]
    fn inverse_and_vrep_agree_on_shear() {
        let cfg = FieldCfg::float();
        let m = MapMatrix::Dense(dmatrix![2.0, 1.0; 0.0, 1.0]);
        let sq = unit_square();
        assert_eq!(select_algorithm(&m, &LinearMapOptions::default(), &cfg), MapAlgorithm::Inverse);
        let h = linear_map(&m, &sq, &LinearMapOptions::default(), &cfg).unwrap();
        assert_eq!(h.kind(), SetKind::Polytope);
        let v = linear_map(&m, &sq, &forced(MapAlgorithm::Vrep), &cfg).unwrap();
        assert!(matches!(v, MappedSet::VPolygon(_)));
        // sample grid avoids the boundary of the image parallelogram
        for k in 0..18 {
            for l in 0..7 {
                let p = dvector![-0.9 + 0.3 * k as f64, -0.45 + 0.3 * l as f64];
                assert_eq!(
                    h.contains(&p, &cfg).unwrap(),
                    v.contains(&p, &cfg).unwrap(),
                    "disagreement at {:?}",
                    p
                );
            }
        }
        assert!(h.contains(&dvector![3.0, 1.0], &cfg).unwrap());
        assert!(!h.contains(&dvector![0.0, 1.0], &cfg).unwrap());
    }

    #[test]
    fn singular_matrix_falls_back_to_vertices() {
        let cfg = FieldCfg::float();
        let m = MapMatrix::Dense(dmatrix![1.0, 1.0; 1.0, 1.0]);
        let sq = unit_square();
        assert_eq!(select_algorithm(&m, &LinearMapOptions::default(), &cfg), MapAlgorithm::Vrep);
        let img = linear_map(&m, &sq, &LinearMapOptions::default(), &cfg).unwrap();
        assert!(matches!(img, MappedSet::VPolygon(_)));
        assert!(img.contains(&dvector![1.0, 1.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![1.0, 0.0], &cfg).unwrap());
        assert!(matches!(
            linear_map(&m, &sq, &forced(MapAlgorithm::Inverse), &cfg),
            Err(PolyError::InvalidAlgorithmChoice(_))
        ));
        let unchecked = LinearMapOptions {
            algorithm: Some(MapAlgorithm::Inverse),
            check_invertibility: false,
            ..Default::default()
        };
        assert!(matches!(
            linear_map(&m, &sq, &unchecked, &cfg),
            Err(PolyError::InvalidAlgorithmChoice(_))
        ));
    }

    #[test]
    fn ill_conditioned_matrix_respects_tolerance() {
        let cfg = FieldCfg::float();
        let m = MapMatrix::Dense(dmatrix![1.0, 0.0; 0.0, 1e-8]);
        let default = LinearMapOptions::default();
        assert_eq!(select_algorithm(&m, &default, &cfg), MapAlgorithm::Vrep);
        let loose = LinearMapOptions {
            cond_tol: 1e12,
            ..Default::default()
        };
        assert_eq!(select_algorithm(&m, &loose, &cfg), MapAlgorithm::Inverse);
        let unchecked = LinearMapOptions {
            check_invertibility: false,
            ..Default::default()
        };
        assert_eq!(select_algorithm(&m, &unchecked, &cfg), MapAlgorithm::Inverse);
    }

    #[test]
    fn sparse_and_rectangular_matrices_use_division() {
        let cfg = FieldCfg::float();
        let sparse = MapMatrix::Sparse(
            SparseMatrix::from_triplets(2, 2, vec![(0, 0, 2.0), (1, 1, 3.0)]).unwrap(),
        );
        assert_eq!(
            select_algorithm(&sparse, &LinearMapOptions::default(), &cfg),
            MapAlgorithm::Division
        );
        let img = linear_map(&sparse, &unit_square(), &LinearMapOptions::default(), &cfg).unwrap();
        assert_eq!(img.kind(), SetKind::Polytope);
        assert!(img.contains(&dvector![2.0, 3.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![2.1, 1.0], &cfg).unwrap());

        let cube = HPolytope::from_box(&[0.0; 3], &[1.0; 3]).unwrap();
        let proj = MapMatrix::Dense(dmatrix![1.0, 0.0, 0.0; 0.0, 1.0, 0.0]);
        assert_eq!(
            select_algorithm(&proj, &LinearMapOptions::default(), &cfg),
            MapAlgorithm::Division
        );
        // the cube's x3 facets have no image normal, so the result is vertex-based
        let img = linear_map(&proj, &cube, &LinearMapOptions::default(), &cfg).unwrap();
        assert!(matches!(img, MappedSet::VPolygon(_)));
        assert_eq!(img.dim(), 2);
        assert!(img.contains(&dvector![0.5, 0.5], &cfg).unwrap());
        assert!(!img.contains(&dvector![1.5, 0.0], &cfg).unwrap());

        // rank-deficient rectangular map: vertex path
        let flat = MapMatrix::Dense(dmatrix![1.0, 1.0, 0.0; 2.0, 2.0, 0.0]);
        assert_eq!(select_algorithm(&flat, &LinearMapOptions::default(), &cfg), MapAlgorithm::Vrep);
    }

    #[test]
    fn oblique_normals_are_checked_before_division() {
        let cfg = FieldCfg::float();
        // triangle x1 <= x2 <= 1, x1 >= 0; its shadow on x1 is [0, 1]
        let tri = HPolytope::new(
            2,
            vec![
                LinearConstraint::new(dvector![1.0, -1.0], 0.0),
                LinearConstraint::new(dvector![0.0, 1.0], 1.0),
                LinearConstraint::new(dvector![-1.0, 0.0], 0.0),
            ],
        )
        .unwrap();
        let m = MapMatrix::Dense(dmatrix![1.0, 0.0]);
        assert_eq!(select_algorithm(&m, &LinearMapOptions::default(), &cfg), MapAlgorithm::Division);
        let img = linear_map(&m, &tri, &LinearMapOptions::default(), &cfg).unwrap();
        let MappedSet::Interval(shadow) = &img else {
            panic!("expected an interval, got {:?}", img);
        };
        assert!(shadow.lo.abs() < 1e-9 && (shadow.hi - 1.0).abs() < 1e-9);
        for (y, inside) in [(0.0, true), (0.5, true), (1.0, true), (1.5, false), (-0.5, false)] {
            assert_eq!(img.contains(&dvector![y], &cfg).unwrap(), inside, "y = {}", y);
        }
        assert!(matches!(
            linear_map(&m, &tri, &forced(MapAlgorithm::Division), &cfg),
            Err(PolyError::InvalidAlgorithmChoice(_))
        ));
        // unbounded input with the same defect has no fallback
        let wedge = HPolyhedron::new(2, vec![LinearConstraint::new(dvector![1.0, -1.0], 0.0)]).unwrap();
        assert!(matches!(
            linear_map(&m, &wedge, &LinearMapOptions::default(), &cfg),
            Err(PolyError::InvalidAlgorithmChoice(_))
        ));
    }

    #[test]
    fn normals_in_the_row_space_divide_exactly() {
        let cfg = FieldCfg::float();
        // strip -1 <= x1 + x2 <= 1 is a cylinder along ker [1 1]
        let strip = HPolyhedron::new(
            2,
            vec![
                LinearConstraint::new(dvector![1.0, 1.0], 1.0),
                LinearConstraint::new(dvector![-1.0, -1.0], 1.0),
            ],
        )
        .unwrap();
        let m = MapMatrix::Dense(dmatrix![1.0, 1.0]);
        let img = linear_map(&m, &strip, &LinearMapOptions::default(), &cfg).unwrap();
        assert!(matches!(img, MappedSet::Polyhedron(_)));
        assert!(img.contains(&dvector![0.5], &cfg).unwrap());
        assert!(img.contains(&dvector![-1.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![1.5], &cfg).unwrap());
    }

    #[test]
    fn tiny_but_well_conditioned_matrix_inverts() {
        let cfg = FieldCfg::float();
        let m = MapMatrix::Dense(dmatrix![1e-10, 0.0; 0.0, 1e-10]);
        assert_eq!(select_algorithm(&m, &LinearMapOptions::default(), &cfg), MapAlgorithm::Inverse);
        let img = linear_map(&m, &unit_square(), &LinearMapOptions::default(), &cfg).unwrap();
        assert_eq!(img.kind(), SetKind::Polytope);
        // facet normals come out as 1e10 · e_i; membership is judged at unit scale
        assert!(img.contains(&dvector![1e-10, 1e-10], &cfg).unwrap());
        assert!(img.contains(&dvector![5e-11, 0.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![1e-8, 0.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![0.0, -1e-8], &cfg).unwrap());
        assert!(!img.contains(&dvector![1.0, 1.0], &cfg).unwrap());
    }

    #[test]
    fn one_dimensional_image_is_an_interval() {
        let cfg = FieldCfg::float();
        let m = MapMatrix::Dense(dmatrix![1.0, 1.0]);
        let img = linear_map(&m, &unit_square(), &forced(MapAlgorithm::Vrep), &cfg).unwrap();
        assert_eq!(img, MappedSet::Interval(Interval::new(0.0, 2.0)));
        assert_eq!(img.dim(), 1);
    }

    #[test]
    fn shape_and_choice_errors() {
        let cfg = FieldCfg::float();
        let sq = unit_square();
        let wide = MapMatrix::Dense(dmatrix![1.0, 0.0, 0.0; 0.0, 1.0, 0.0]);
        assert!(matches!(
            linear_map(&wide, &sq, &LinearMapOptions::default(), &cfg),
            Err(PolyError::DimensionMismatch { expected: 2, got: 3, .. })
        ));
        let id = MapMatrix::Dense(DMatrix::<f64>::identity(2, 2));
        let bad_inverse = LinearMapOptions {
            inverse: Some(DMatrix::identity(3, 3)),
            ..Default::default()
        };
        assert!(matches!(
            linear_map(&id, &sq, &bad_inverse, &cfg),
            Err(PolyError::DimensionMismatch { .. })
        ));
        let hs = HalfSpace::new(dvector![1.0, 0.0], 1.0);
        assert!(matches!(
            linear_map(&id, &hs, &forced(MapAlgorithm::Vrep), &cfg),
            Err(PolyError::InvalidAlgorithmChoice(_))
        ));
    }

    #[test]
    fn precomputed_inverse_is_used_as_given() {
        let cfg = FieldCfg::float();
        let m = MapMatrix::Dense(dmatrix![2.0, 0.0; 0.0, 2.0]);
        let options = LinearMapOptions {
            inverse: Some(dmatrix![0.5, 0.0; 0.0, 0.5]),
            ..Default::default()
        };
        let img = linear_map(&m, &unit_square(), &options, &cfg).unwrap();
        assert!(img.contains(&dvector![2.0, 2.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![2.5, 0.0], &cfg).unwrap());
    }

    #[test]
    fn input_kind_is_preserved() {
        let cfg = FieldCfg::float();
        let rot = MapMatrix::Dense(dmatrix![0.0, -1.0; 1.0, 0.0]);
        let opts = LinearMapOptions::default();

        let hs = HalfSpace::new(dvector![1.0, 0.0], 1.0);
        let img = linear_map(&rot, &hs, &opts, &cfg).unwrap();
        assert!(matches!(img, MappedSet::HalfSpace(_)));
        // x <= 1 rotated by 90 degrees is y <= 1
        assert!(img.contains(&dvector![5.0, 1.0], &cfg).unwrap());
        assert!(!img.contains(&dvector![0.0, 1.5], &cfg).unwrap());

        let line = Hyperplane::new(dvector![1.0, 0.0], 1.0);
        let img = linear_map(&rot, &line, &opts, &cfg).unwrap();
        assert_eq!(img.kind(), SetKind::Hyperplane);
        assert!(img.contains(&dvector![-3.0, 1.0], &cfg).unwrap());

        let tri = HPolygon::new(vec![
            LinearConstraint::new(dvector![-1.0, 0.0], 0.0),
            LinearConstraint::new(dvector![0.0, -1.0], 0.0),
            LinearConstraint::new(dvector![1.0, 1.0], 1.0),
        ])
        .unwrap();
        let img = linear_map(&rot, &tri, &opts, &cfg).unwrap();
        assert!(matches!(img, MappedSet::Polygon(_)));

        let general = HPolyhedron::new(2, vec![LinearConstraint::new(dvector![1.0, 1.0], 0.0)]).unwrap();
        let img = linear_map(&rot, &general, &opts, &cfg).unwrap();
        assert!(matches!(img, MappedSet::Polyhedron(_)));
    }

    #[test]
    fn exact_field_uses_exact_rank() {
        let cfg = FieldCfg::exact();
        let q = |n: i64| BigRational::from_integer(n.into());
        let m = MapMatrix::Dense(DMatrix::from_row_slice(2, 2, &[q(1), q(2), q(3), q(4)]));
        let options = LinearMapOptions::default();
        assert_eq!(select_algorithm(&m, &options, &cfg), MapAlgorithm::Inverse);
        let sq = HPolytope::from_box(&[q(0), q(0)], &[q(1), q(1)]).unwrap();
        let img = linear_map(&m, &sq, &options, &cfg).unwrap();
        // image of (1, 1) is (3, 7); of (1, 0) is (1, 3)
        let p = |a: i64, b: i64| DVector::from_vec(vec![q(a), q(b)]);
        assert!(img.contains(&p(3, 7), &cfg).unwrap());
        assert!(img.contains(&p(1, 3), &cfg).unwrap());
        assert!(!img.contains(&p(3, 6), &cfg).unwrap());
    }
}
