//! Vertex enumeration and boundedness oracle (default polyhedron capabilities).
//!
//! Vertex enumeration intersects every `n`-subset of constraint hyperplanes and
//! keeps the feasible intersection points. Complexity: O(C(m, n)) linear
//! solves. Acceptable here because it only backs the vertex map path on small
//! inputs. For larger inputs, override `Polyhedron::vertices` with the
//! double-description method of the `howzat` crate (its `howzat-kit` wraps it
//! as the `howzat-dd` backend); the vertex map path only calls the trait
//! method.

use nalgebra::{DMatrix, DVector};

use crate::constraint::LinearConstraint;
use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, Scalar};
use crate::lp::{LpBackend, LpProblem, LpStatus, Sense};
use crate::matrix::solve;

/// k-combinations of `0..n` in lexicographic order.
pub(crate) fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn rec(n: usize, k: usize, start: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            rec(n, k, i + 1, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut cur = Vec::with_capacity(k);
    rec(n, k, 0, &mut cur, &mut out);
    out
}

fn check_dims<N: Scalar>(constraints: &[LinearConstraint<N>], dim: usize) -> PolyResult<()> {
    match constraints.iter().find(|c| c.dim() != dim) {
        Some(c) => Err(PolyError::DimensionMismatch {
            expected: dim,
            got: c.dim(),
            context: "vertex enumeration",
        }),
        None => Ok(()),
    }
}

/// Vertices of `{x : A x <= b}` in R^dim, deduplicated with the field tolerance.
///
/// Unbounded or lower-dimensional sets yield only the vertices they have (for
/// example none for a half-space).
pub fn enumerate_vertices<N: Scalar>(
    constraints: &[LinearConstraint<N>],
    dim: usize,
    cfg: &FieldCfg<N>,
) -> PolyResult<Vec<DVector<N>>> {
    cfg.check()?;
    check_dims(constraints, dim)?;
    let mut out: Vec<DVector<N>> = Vec::new();
    if dim == 0 {
        return Ok(out);
    }
    for comb in combinations(constraints.len(), dim) {
        let a = DMatrix::from_fn(dim, dim, |i, j| constraints[comb[i]].a[j].clone());
        let b = DVector::from_fn(dim, |i, _| constraints[comb[i]].b.clone());
        let Some(x) = solve(&a, &b, cfg) else {
            continue;
        };
        if !constraints.iter().all(|c| c.satisfies(&x, cfg)) {
            continue;
        }
        let seen = out
            .iter()
            .any(|v| v.iter().zip(x.iter()).all(|(p, q)| cfg.approx_eq(p, q)));
        if !seen {
            out.push(x);
        }
    }
    Ok(out)
}

/// `true` iff `{x : A x <= b}` is bounded; the empty set counts as bounded.
///
/// Maximizes `±e_i` for every coordinate; any unbounded direction decides.
pub fn is_bounded<N: Scalar>(
    constraints: &[LinearConstraint<N>],
    dim: usize,
    cfg: &FieldCfg<N>,
) -> PolyResult<bool> {
    cfg.check()?;
    check_dims(constraints, dim)?;
    let m = constraints.len();
    let a = DMatrix::from_fn(m, dim, |i, j| constraints[i].a[j].clone());
    let b = DVector::from_fn(m, |i, _| constraints[i].b.clone());
    let backend = cfg.backend();
    for i in 0..dim {
        for sign in [N::one(), -N::one()] {
            let c = DVector::from_fn(dim, |k, _| if k == i { sign.clone() } else { N::zero() });
            let problem = LpProblem::new(Sense::Maximize, c, a.clone(), b.clone())?;
            match backend.solve(&problem).status {
                LpStatus::Optimal => {}
                LpStatus::Infeasible => return Ok(true),
                LpStatus::Unbounded => return Ok(false),
                status => {
                    return Err(PolyError::LpBackendFailure {
                        status,
                        context: "boundedness check",
                    })
                }
            }
        }
    }
    Ok(true)
}
