//! Redundancy removal for H-representations (Fukuda's LP method).
//!
//! Purpose
//! - Drop every half-space whose removal does not change the set, keeping the
//!   survivors in their original order.
//!
//! Algorithm
//! - Walk the original constraints in order while maintaining the set of
//!   surviving indices and a cursor into it. For constraint `j`, relax its own
//!   row to `b_j + 1` inside the surviving system and maximize `a_j · x`. If the
//!   optimum still satisfies `a_j · x <= b_j`, the other survivors imply `j`
//!   and it is dropped; otherwise it stays and the cursor advances.
//! - Each LP depends on the survivors of all earlier steps, so the solves are
//!   strictly sequential.
//! - Rows are divided by their largest coefficient magnitude first; the
//!   relaxation and the final comparison happen in those units.
//!
//! Return contract
//! - `Ok(true)` means the pass completed without the LP reporting
//!   infeasibility. It does not certify non-emptiness: some empty systems
//!   (e.g. `x <= 0, x >= 1`) stay feasible under every relaxation and pass.
//!   Use `lp::is_feasible` when emptiness matters.
//! - `Ok(false)` means an LP was infeasible; the list is left untouched.
//!
//! References
//! - K. Fukuda, "Frequently Asked Questions in Polyhedral Computation", §2.21.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::constraint::LinearConstraint;
use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, Scalar};
use crate::hrep::to_simple_hrep;
use crate::lp::{LpBackend, LpProblem, LpStatus, Sense};
use crate::matrix::scale_of;

/// Remove redundant constraints in place. See the module docs for the meaning
/// of the returned flag.
pub fn remove_redundant<N: Scalar>(
    constraints: &mut Vec<LinearConstraint<N>>,
    cfg: &FieldCfg<N>,
) -> PolyResult<bool> {
    cfg.check()?;
    let mut hrep = to_simple_hrep(constraints)?;
    let (m, n) = (hrep.a.nrows(), hrep.a.ncols());
    for i in 0..m {
        let s = scale_of(hrep.a.row(i).iter());
        for v in hrep.a.row_mut(i).iter_mut() {
            *v = v.clone() / s.clone();
        }
        hrep.b[i] = hrep.b[i].clone() / s;
    }
    let backend = cfg.backend();
    let mut kept: Vec<usize> = (0..m).collect();
    let mut cursor = 0usize;

    for j in 0..m {
        let alpha = hrep.a.row(j).transpose();
        let a = DMatrix::from_fn(kept.len(), n, |r, c| hrep.a[(kept[r], c)].clone());
        let mut b = DVector::from_fn(kept.len(), |r, _| hrep.b[kept[r]].clone());
        b[cursor] = hrep.b[j].clone() + N::one();

        let problem = LpProblem::new(Sense::Maximize, alpha, a, b)?;
        let solution = backend.solve(&problem);
        match (solution.status, solution.objective) {
            (LpStatus::Infeasible, _) => {
                debug!(constraint = j, "relaxed system is infeasible; list left untouched");
                return Ok(false);
            }
            (LpStatus::Optimal, Some(value)) => {
                if cfg.leq(&value, &hrep.b[j]) {
                    debug!(constraint = j, "redundant");
                    kept.remove(cursor);
                } else {
                    cursor += 1;
                }
            }
            (status, _) => {
                return Err(PolyError::LpBackendFailure {
                    status,
                    context: "redundancy removal",
                })
            }
        }
    }

    if kept.len() < m {
        debug!(before = m, after = kept.len(), "removed redundant constraints");
        let mut survivors = kept.into_iter().peekable();
        let mut idx = 0usize;
        constraints.retain(|_| {
            let keep = survivors.peek() == Some(&idx);
            if keep {
                survivors.next();
            }
            idx += 1;
            keep
        });
    }
    Ok(true)
}

/// Copying variant of [`remove_redundant`]; `None` when an LP reported
/// infeasibility.
pub fn removed_redundant<N: Scalar>(
    constraints: &[LinearConstraint<N>],
    cfg: &FieldCfg<N>,
) -> PolyResult<Option<Vec<LinearConstraint<N>>>> {
    let mut out = constraints.to_vec();
    Ok(remove_redundant(&mut out, cfg)?.then_some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::is_feasible;
    use nalgebra::dvector;
    use num_rational::BigRational;

    fn hs(a: &[f64], b: f64) -> LinearConstraint<f64> {
        LinearConstraint::from_slice(a, b)
    }

    #[test]
    fn drops_weaker_parallel_constraint() {
        let cfg = FieldCfg::float();
        let mut cs = vec![hs(&[1.0], 1.0), hs(&[1.0], 2.0)];
        assert!(remove_redundant(&mut cs, &cfg).unwrap());
        assert_eq!(cs, vec![hs(&[1.0], 1.0)]);
    }

    #[test]
    fn square_with_slack_constraints() {
        let cfg = FieldCfg::float();
        let mut cs = vec![
            hs(&[1.0, 0.0], 1.0),
            hs(&[1.0, 1.0], 5.0),
            hs(&[-1.0, 0.0], 0.0),
            hs(&[0.0, 1.0], 1.0),
            hs(&[0.0, 1.0], 1.0),
            hs(&[0.0, -1.0], 0.0),
        ];
        assert!(remove_redundant(&mut cs, &cfg).unwrap());
        assert_eq!(
            cs,
            vec![
                hs(&[1.0, 0.0], 1.0),
                hs(&[-1.0, 0.0], 0.0),
                hs(&[0.0, 1.0], 1.0),
                hs(&[0.0, -1.0], 0.0),
            ]
        );
        // a second pass changes nothing
        let snapshot = cs.clone();
        assert!(remove_redundant(&mut cs, &cfg).unwrap());
        assert_eq!(cs, snapshot);
    }

    #[test]
    fn tiny_coefficients_keep_their_constraint() {
        // 1e-10 x <= 1e-10 is x <= 1; the second row is x <= 2
        let cfg = FieldCfg::float();
        let mut cs = vec![hs(&[1e-10], 1e-10), hs(&[1e-10], 2e-10)];
        assert!(remove_redundant(&mut cs, &cfg).unwrap());
        assert_eq!(cs, vec![hs(&[1e-10], 1e-10)]);
        assert!(!crate::hrep::contains(&dvector![5.0], cs.as_slice(), &cfg).unwrap());
        assert!(crate::hrep::contains(&dvector![1.0], cs.as_slice(), &cfg).unwrap());
    }

    #[test]
    fn empty_and_single_lists() {
        let cfg = FieldCfg::float();
        let mut none: Vec<LinearConstraint<f64>> = Vec::new();
        assert!(remove_redundant(&mut none, &cfg).unwrap());
        assert!(none.is_empty());
        let mut one = vec![hs(&[1.0, -1.0], 3.0)];
        assert!(remove_redundant(&mut one, &cfg).unwrap());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn empty_set_that_survives_every_relaxation() {
        // x <= 0 and x >= 1: relaxing either row by one makes the system feasible
        let cfg = FieldCfg::float();
        let mut cs = vec![hs(&[1.0], 0.0), hs(&[-1.0], -1.0)];
        assert!(remove_redundant(&mut cs, &cfg).unwrap());
        assert_eq!(cs.len(), 2);
        assert!(!is_feasible(&cs, &cfg).unwrap());
    }

    #[test]
    fn detected_infeasibility_leaves_list_untouched() {
        // x <= 0 and x >= 2
        let cfg = FieldCfg::float();
        let original = vec![hs(&[1.0], 0.0), hs(&[-1.0], -2.0), hs(&[1.0], 5.0)];
        let mut cs = original.clone();
        assert!(!remove_redundant(&mut cs, &cfg).unwrap());
        assert_eq!(cs, original);
        assert_eq!(removed_redundant(&original, &cfg).unwrap(), None);
    }

    #[test]
    fn exact_field_keeps_tight_duplicates_once() {
        let cfg = FieldCfg::exact();
        let q = |n: i64, d: i64| BigRational::new(n.into(), d.into());
        let c = |a: &[BigRational], b: BigRational| LinearConstraint::from_slice(a, b);
        // 3x <= 1 and x <= 1/3 describe the same half-line; x <= 1/3 + 1e-12 is weaker
        let cs = vec![
            c(&[q(3, 1)], q(1, 1)),
            c(&[q(1, 1)], q(1, 3)),
            c(&[q(1, 1)], q(1, 3) + q(1, 1_000_000_000_000)),
            c(&[q(-1, 1)], q(0, 1)),
        ];
        let out = removed_redundant(&cs, &cfg).unwrap().unwrap();
        assert_eq!(out, vec![cs[1].clone(), cs[3].clone()]);
    }

    #[test]
    fn mismatched_field_configuration_is_rejected() {
        let cfg = FieldCfg::<f64> {
            kind: crate::field::FieldKind::Exact,
            ..FieldCfg::float()
        };
        let mut cs = vec![LinearConstraint::new(dvector![1.0], 1.0)];
        assert!(matches!(
            remove_redundant(&mut cs, &cfg),
            Err(PolyError::NumericTypeMismatch { .. })
        ));
    }
}
