//! H-representation plumbing: `(A, b)` conversion, membership, constrained
//! dimensions.
//!
//! Conventions
//! - Row `i` of `A` and entry `i` of `b` belong to constraint `i`; order is
//!   preserved both ways.
//! - An empty list converts to a 0×0 matrix. The ambient dimension of an empty
//!   list is unknown here; callers that need it go through `Polyhedron::dim()`.

use nalgebra::{DMatrix, DVector};

use crate::constraint::LinearConstraint;
use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, Scalar};
use crate::sets::Polyhedron;

/// Matrix form `A x <= b` of a constraint list.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleHRep<N: Scalar> {
    pub a: DMatrix<N>,
    pub b: DVector<N>,
}

impl<N: Scalar> SimpleHRep<N> {
    #[inline]
    pub fn dim(&self) -> usize {
        self.a.ncols()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }
}

/// Stack the constraints into `(A, b)`.
pub fn to_simple_hrep<N: Scalar>(constraints: &[LinearConstraint<N>]) -> PolyResult<SimpleHRep<N>> {
    let m = constraints.len();
    let n = constraints.first().map_or(0, LinearConstraint::dim);
    if let Some(c) = constraints.iter().find(|c| c.dim() != n) {
        return Err(PolyError::DimensionMismatch {
            expected: n,
            got: c.dim(),
            context: "H-representation rows",
        });
    }
    let a = DMatrix::from_fn(m, n, |i, j| constraints[i].a[j].clone());
    let b = DVector::from_fn(m, |i, _| constraints[i].b.clone());
    Ok(SimpleHRep { a, b })
}

/// Split `(A, b)` back into one constraint per row.
pub fn from_simple_hrep<N: Scalar>(hrep: &SimpleHRep<N>) -> PolyResult<Vec<LinearConstraint<N>>> {
    if hrep.a.nrows() != hrep.b.len() {
        return Err(PolyError::DimensionMismatch {
            expected: hrep.a.nrows(),
            got: hrep.b.len(),
            context: "H-representation right-hand side",
        });
    }
    Ok((0..hrep.a.nrows())
        .map(|i| {
            let a = DVector::from_iterator(hrep.a.ncols(), hrep.a.row(i).iter().cloned());
            LinearConstraint::new(a, hrep.b[i].clone())
        })
        .collect())
}

/// `point ∈ P`, checking every half-space with the field tolerance.
pub fn contains<N, P>(point: &DVector<N>, p: &P, cfg: &FieldCfg<N>) -> PolyResult<bool>
where
    N: Scalar,
    P: Polyhedron<N> + ?Sized,
{
    cfg.check()?;
    if point.len() != p.dim() {
        return Err(PolyError::DimensionMismatch {
            expected: p.dim(),
            got: point.len(),
            context: "membership point",
        });
    }
    contains_in(point, &p.constraints(), cfg)
}

/// Membership against a raw constraint list; every constraint must have the
/// point's dimension. The empty list is the whole space.
pub fn contains_in<N: Scalar>(
    point: &DVector<N>,
    constraints: &[LinearConstraint<N>],
    cfg: &FieldCfg<N>,
) -> PolyResult<bool> {
    cfg.check()?;
    for c in constraints {
        if c.dim() != point.len() {
            return Err(PolyError::DimensionMismatch {
                expected: c.dim(),
                got: point.len(),
                context: "membership point",
            });
        }
        if !c.satisfies(point, cfg) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Ascending indices of coordinates that appear with a nonzero coefficient in
/// some constraint.
pub fn constrained_dimensions<N, P>(p: &P) -> Vec<usize>
where
    N: Scalar,
    P: Polyhedron<N> + ?Sized,
{
    let constraints = p.constraints();
    let mut used = vec![false; p.dim()];
    for c in constraints.iter() {
        for (j, v) in c.a.iter().enumerate() {
            if !v.is_zero() {
                if let Some(slot) = used.get_mut(j) {
                    *slot = true;
                }
            }
        }
    }
    used.iter()
        .enumerate()
        .filter_map(|(j, &u)| u.then_some(j))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::{HPolyhedron, HPolytope};
    use nalgebra::{dmatrix, dvector};
    use num_rational::BigRational;

    fn unit_square() -> HPolytope<f64> {
        HPolytope::from_box(&[0.0, 0.0], &[1.0, 1.0]).unwrap()
    }

    #[test]
    fn unit_square_membership() {
        let cfg = FieldCfg::float();
        let sq = unit_square();
        assert!(contains(&dvector![0.5, 0.5], &sq, &cfg).unwrap());
        assert!(!contains(&dvector![1.5, 0.5], &sq, &cfg).unwrap());
        // boundary is inclusive
        assert!(contains(&dvector![1.0, 1.0], &sq, &cfg).unwrap());
        assert!(contains(&dvector![1.0 + 1e-12, 0.0], &sq, &cfg).unwrap());
        assert!(matches!(
            contains(&dvector![0.5], &sq, &cfg),
            Err(PolyError::DimensionMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn empty_list_is_whole_space() {
        let cfg = FieldCfg::float();
        let universe = HPolyhedron::<f64>::universe(3);
        assert!(contains(&dvector![1e9, -1e9, 0.0], &universe, &cfg).unwrap());
        assert!(contains_in(&dvector![7.0], &[], &cfg).unwrap());
    }

    #[test]
    fn exact_membership_has_no_slack() {
        let cfg = FieldCfg::exact();
        let third = BigRational::new(1.into(), 3.into());
        let three = BigRational::from_integer(3.into());
        let one = BigRational::from_integer(1.into());
        let c = vec![LinearConstraint::from_slice(&[three], one)];
        assert!(contains_in(&DVector::from_vec(vec![third.clone()]), &c, &cfg).unwrap());
        let above = third + BigRational::new(1.into(), 1_000_000_000_000i64.into());
        assert!(!contains_in(&DVector::from_vec(vec![above]), &c, &cfg).unwrap());
    }

    #[test]
    fn constrained_dimensions_ignore_zero_columns() {
        let p = HPolyhedron::new(
            4,
            vec![
                LinearConstraint::new(dvector![0.0, 1.0, 0.0, 0.0], 1.0),
                LinearConstraint::new(dvector![0.0, 0.0, 0.0, -2.0], 1.0),
                LinearConstraint::new(dvector![0.0, 3.0, 0.0, 0.0], 1.0),
            ],
        )
        .unwrap();
        assert_eq!(constrained_dimensions(&p), vec![1, 3]);
        assert!(constrained_dimensions(&HPolyhedron::<f64>::universe(2)).is_empty());
        assert_eq!(constrained_dimensions(&unit_square()), vec![0, 1]);
    }

    #[test]
    fn simple_hrep_round_trip_and_shapes() {
        let cs = unit_square().into_constraints();
        let h = to_simple_hrep(&cs).unwrap();
        assert_eq!(h.a, dmatrix![1.0, 0.0; -1.0, 0.0; 0.0, 1.0; 0.0, -1.0]);
        assert_eq!(h.b, dvector![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(h.dim(), 2);
        assert_eq!(from_simple_hrep(&h).unwrap(), cs);

        let empty = to_simple_hrep::<f64>(&[]).unwrap();
        assert_eq!((empty.a.nrows(), empty.a.ncols(), empty.b.len()), (0, 0, 0));
        assert!(empty.is_empty());

        let mixed = vec![
            LinearConstraint::new(dvector![1.0], 0.0),
            LinearConstraint::new(dvector![1.0, 2.0], 0.0),
        ];
        assert!(to_simple_hrep(&mixed).is_err());
        let bad = SimpleHRep {
            a: dmatrix![1.0, 0.0],
            b: dvector![1.0, 2.0],
        };
        assert!(from_simple_hrep(&bad).is_err());
    }
}
