//! Chebyshev center: center of the largest inscribed Euclidean ball.
//!
//! LP over `(x, r)`:
//!
//! ```text
//! maximize r   s.t.   a_i · x + ‖a_i‖ r <= b_i,   r >= 0
//! ```
//!
//! Norms need square roots, so this is float-only by type. The radius is
//! unique; the center is not in general (e.g. for a long rectangle).

use nalgebra::{DMatrix, DVector};

use crate::error::{PolyError, PolyResult};
use crate::field::FieldCfg;
use crate::lp::{LpBackend, LpProblem, LpStatus, Sense};
use crate::sets::Polyhedron;

/// A Chebyshev center of `p`.
pub fn chebyshev_center<P>(p: &P, cfg: &FieldCfg<f64>) -> PolyResult<DVector<f64>>
where
    P: Polyhedron<f64> + ?Sized,
{
    chebyshev_center_radius(p, cfg).map(|(center, _)| center)
}

/// A Chebyshev center of `p` together with the inscribed radius.
pub fn chebyshev_center_radius<P>(p: &P, cfg: &FieldCfg<f64>) -> PolyResult<(DVector<f64>, f64)>
where
    P: Polyhedron<f64> + ?Sized,
{
    cfg.check()?;
    let n = p.dim();
    let constraints = p.constraints();
    let m = constraints.len();
    let mut a = DMatrix::<f64>::zeros(m, n + 1);
    let mut b = DVector::<f64>::zeros(m);
    for (i, c) in constraints.iter().enumerate() {
        if c.dim() != n {
            return Err(PolyError::DimensionMismatch {
                expected: n,
                got: c.dim(),
                context: "Chebyshev center constraints",
            });
        }
        for (j, v) in c.a.iter().enumerate() {
            a[(i, j)] = *v;
        }
        a[(i, n)] = c.a.norm();
        b[i] = c.b;
    }
    let mut objective = DVector::<f64>::zeros(n + 1);
    objective[n] = 1.0;
    let mut lower = vec![None; n + 1];
    lower[n] = Some(0.0);
    let problem = LpProblem::new(Sense::Maximize, objective, a, b)?.with_bounds(lower, vec![None; n + 1])?;

    let solution = cfg.backend().solve(&problem);
    match (solution.status, solution.x) {
        (LpStatus::Optimal, Some(xr)) => {
            let radius = xr[n];
            Ok((xr.rows(0, n).into_owned(), radius))
        }
        (LpStatus::Infeasible, _) => Err(PolyError::EmptySet {
            context: "Chebyshev center",
        }),
        (status, _) => Err(PolyError::LpBackendFailure {
            status,
            context: "Chebyshev center",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::LinearConstraint;
    use crate::hrep::contains;
    use crate::sets::{HPolyhedron, HPolytope, HalfSpace};
    use nalgebra::dvector;

    #[test]
    fn unit_square_center() {
        let cfg = FieldCfg::float();
        let sq = HPolytope::from_box(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let (c, r) = chebyshev_center_radius(&sq, &cfg).unwrap();
        assert!((c - dvector![0.5, 0.5]).amax() < 1e-9);
        assert!((r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rectangle_radius_is_unique() {
        let cfg = FieldCfg::float();
        let rect = HPolytope::from_box(&[0.0, 0.0], &[4.0, 1.0]).unwrap();
        let (c, r) = chebyshev_center_radius(&rect, &cfg).unwrap();
        assert!((r - 0.5).abs() < 1e-9);
        assert!((c[1] - 0.5).abs() < 1e-9);
        assert!(contains(&c, &rect, &cfg).unwrap());
    }

    #[test]
    fn triangle_inradius() {
        let cfg = FieldCfg::float();
        let tri = HPolyhedron::new(
            2,
            vec![
                LinearConstraint::new(dvector![-1.0, 0.0], 0.0),
                LinearConstraint::new(dvector![0.0, -1.0], 0.0),
                LinearConstraint::new(dvector![1.0, 1.0], 1.0),
            ],
        )
        .unwrap();
        let expected = (2.0 - 2f64.sqrt()) / 2.0;
        let (c, r) = chebyshev_center_radius(&tri, &cfg).unwrap();
        assert!((r - expected).abs() < 1e-9);
        assert!((c.clone() - dvector![expected, expected]).amax() < 1e-9);
        assert!((chebyshev_center(&tri, &cfg).unwrap() - c).amax() < 1e-9);
    }

    #[test]
    fn empty_and_unbounded_sets() {
        let cfg = FieldCfg::float();
        let empty = vec![
            LinearConstraint::new(dvector![1.0], 0.0),
            LinearConstraint::new(dvector![-1.0], -1.0),
        ];
        assert_eq!(
            chebyshev_center(empty.as_slice(), &cfg),
            Err(PolyError::EmptySet {
                context: "Chebyshev center"
            })
        );
        let hs = HalfSpace::new(dvector![1.0, 0.0], 1.0);
        assert!(matches!(
            chebyshev_center(&hs, &cfg),
            Err(PolyError::LpBackendFailure {
                status: LpStatus::Unbounded,
                ..
            })
        ));
    }
}
