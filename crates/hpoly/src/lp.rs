//! LP backend adapter: problem/solution types, the `LpBackend` seam, the
//! `minilp` float backend and an in-crate two-phase tableau simplex.
//!
//! Conventions
//! - Problems are `opt c·x  s.t.  A x <= b,  lower <= x <= upper` with optional
//!   (possibly absent) bounds per variable.
//! - The reported objective is `c·x` in the caller's sense (no sign flips leak
//!   out of the backend).
//! - `Optimal` and `Infeasible` are the only statuses algorithms act on; every
//!   other status is fatal for the caller (`LpSolution::expect_decided`).
//! - Both backends divide every row and the objective by their largest
//!   coefficient magnitude before solving, so solver tolerances act on
//!   scale-free numbers.
//!
//! Simplex
//! - Variables are rewritten to non-negative form: shifted by a finite lower
//!   bound, mirrored at a finite upper bound, or split into two parts when free.
//!   A variable with both bounds gets an extra row for the width of its box.
//! - Phase 1 minimizes the artificial variables of rows with negative
//!   right-hand side; phase 2 optimizes the real objective over the feasible
//!   basis. Pivoting follows `SimplexCfg::rule`.
//! - It is the default backend for `BigRational`, where it runs with `eps = 0`.

use std::fmt;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::constraint::LinearConstraint;
use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, PivotRule, Scalar, SimplexCfg};
use crate::matrix::scale_of;

/// Optimization direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Outcome of an LP query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
}

impl LpStatus {
    /// `Optimal` or `Infeasible`: the two outcomes algorithms can act on.
    #[inline]
    pub fn is_decided(self) -> bool {
        matches!(self, LpStatus::Optimal | LpStatus::Infeasible)
    }
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LpStatus::Optimal => "optimal",
            LpStatus::Infeasible => "infeasible",
            LpStatus::Unbounded => "unbounded",
            LpStatus::IterationLimit => "iteration limit",
        };
        f.write_str(s)
    }
}

/// `opt c·x  s.t.  A x <= b,  lower <= x <= upper`.
#[derive(Clone, Debug)]
pub struct LpProblem<N: Scalar> {
    pub sense: Sense,
    pub c: DVector<N>,
    pub a: DMatrix<N>,
    pub b: DVector<N>,
    pub lower: Vec<Option<N>>,
    pub upper: Vec<Option<N>>,
}

impl<N: Scalar> LpProblem<N> {
    /// Problem over free variables.
    pub fn new(sense: Sense, c: DVector<N>, a: DMatrix<N>, b: DVector<N>) -> PolyResult<Self> {
        let n = c.len();
        if a.nrows() > 0 && a.ncols() != n {
            return Err(PolyError::DimensionMismatch {
                expected: n,
                got: a.ncols(),
                context: "LP constraint matrix columns",
            });
        }
        if a.nrows() != b.len() {
            return Err(PolyError::DimensionMismatch {
                expected: a.nrows(),
                got: b.len(),
                context: "LP right-hand side",
            });
        }
        Ok(Self {
            sense,
            c,
            a,
            b,
            lower: vec![None; n],
            upper: vec![None; n],
        })
    }

    /// Attach per-variable bounds (`None` = unbounded on that side).
    pub fn with_bounds(mut self, lower: Vec<Option<N>>, upper: Vec<Option<N>>) -> PolyResult<Self> {
        let n = self.c.len();
        for (len, context) in [(lower.len(), "LP lower bounds"), (upper.len(), "LP upper bounds")] {
            if len != n {
                return Err(PolyError::DimensionMismatch {
                    expected: n,
                    got: len,
                    context,
                });
            }
        }
        self.lower = lower;
        self.upper = upper;
        Ok(self)
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.c.len()
    }
}

/// Status, objective (present iff optimal) and primal point (present iff optimal).
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution<N: Scalar> {
    pub status: LpStatus,
    pub objective: Option<N>,
    pub x: Option<DVector<N>>,
}

impl<N: Scalar> LpSolution<N> {
    fn undecided(status: LpStatus) -> Self {
        Self {
            status,
            objective: None,
            x: None,
        }
    }

    /// Map statuses other than optimal/infeasible to `LpBackendFailure`.
    pub fn expect_decided(self, context: &'static str) -> PolyResult<Self> {
        if self.status.is_decided() {
            Ok(self)
        } else {
            Err(PolyError::LpBackendFailure {
                status: self.status,
                context,
            })
        }
    }
}

/// Seam for LP solvers. Implementations are stateless and blocking.
pub trait LpBackend<N: Scalar> {
    fn solve(&self, problem: &LpProblem<N>) -> LpSolution<N>;
}

/// Solve with the field's default backend.
pub fn solve_lp<N: Scalar>(
    sense: Sense,
    c: &DVector<N>,
    a: &DMatrix<N>,
    b: &DVector<N>,
    lower: &[Option<N>],
    upper: &[Option<N>],
    cfg: &FieldCfg<N>,
) -> PolyResult<LpSolution<N>> {
    cfg.check()?;
    let problem = LpProblem::new(sense, c.clone(), a.clone(), b.clone())?
        .with_bounds(lower.to_vec(), upper.to_vec())?;
    Ok(cfg.backend().solve(&problem))
}

/// Feasibility of a constraint list via a zero-objective LP.
///
/// The empty list is feasible. Constraints must share one dimension.
pub fn is_feasible<N: Scalar>(constraints: &[LinearConstraint<N>], cfg: &FieldCfg<N>) -> PolyResult<bool> {
    cfg.check()?;
    let hrep = crate::hrep::to_simple_hrep(constraints)?;
    let n = hrep.a.ncols();
    let problem = LpProblem::new(
        Sense::Minimize,
        DVector::from_element(n, N::zero()),
        hrep.a,
        hrep.b,
    )?;
    let solution = cfg.backend().solve(&problem).expect_decided("feasibility check")?;
    Ok(solution.status == LpStatus::Optimal)
}

/// Float backend on the `minilp` crate; the default for `f64`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MiniLp;

impl LpBackend<f64> for MiniLp {
    fn solve(&self, problem: &LpProblem<f64>) -> LpSolution<f64> {
        let n = problem.num_vars();
        if (0..n).any(|j| matches!((problem.lower[j], problem.upper[j]), (Some(l), Some(u)) if l > u)) {
            return LpSolution::undecided(LpStatus::Infeasible);
        }
        let direction = match problem.sense {
            Sense::Minimize => OptimizationDirection::Minimize,
            Sense::Maximize => OptimizationDirection::Maximize,
        };
        let c_scale = scale_of(problem.c.iter());
        let mut lp = Problem::new(direction);
        let vars: Vec<Variable> = (0..n)
            .map(|j| {
                let lo = problem.lower[j].unwrap_or(f64::NEG_INFINITY);
                let hi = problem.upper[j].unwrap_or(f64::INFINITY);
                lp.add_var(problem.c[j] / c_scale, (lo, hi))
            })
            .collect();
        let mut rows = 0usize;
        for i in 0..problem.a.nrows() {
            let row = problem.a.row(i);
            let scale = row.amax();
            if scale == 0.0 {
                if problem.b[i] < 0.0 {
                    trace!(row = i, "zero row with negative right-hand side");
                    return LpSolution::undecided(LpStatus::Infeasible);
                }
                continue;
            }
            let mut expr = LinearExpr::empty();
            for (j, v) in row.iter().enumerate() {
                if *v != 0.0 {
                    expr.add(vars[j], v / scale);
                }
            }
            lp.add_constraint(expr, ComparisonOp::Le, problem.b[i] / scale);
            rows += 1;
        }
        if rows == 0 {
            return box_optimum(problem);
        }
        match lp.solve() {
            Ok(sol) => {
                let x = DVector::from_iterator(n, vars.iter().map(|&v| sol[v]));
                LpSolution {
                    status: LpStatus::Optimal,
                    objective: Some(problem.c.dot(&x)),
                    x: Some(x),
                }
            }
            Err(minilp::Error::Infeasible) => LpSolution::undecided(LpStatus::Infeasible),
            Err(minilp::Error::Unbounded) => LpSolution::undecided(LpStatus::Unbounded),
        }
    }
}

/// Problems without constraint rows: every variable sits at the bound its
/// objective coefficient pushes it to.
fn box_optimum(problem: &LpProblem<f64>) -> LpSolution<f64> {
    let mut x = DVector::zeros(problem.num_vars());
    for j in 0..problem.num_vars() {
        let up = match problem.sense {
            Sense::Maximize => problem.c[j] > 0.0,
            Sense::Minimize => problem.c[j] < 0.0,
        };
        let (lo, hi) = (problem.lower[j], problem.upper[j]);
        x[j] = match (problem.c[j] == 0.0, up) {
            (true, _) => lo.or(hi).unwrap_or(0.0),
            (false, true) => match hi {
                Some(h) => h,
                None => return LpSolution::undecided(LpStatus::Unbounded),
            },
            (false, false) => match lo {
                Some(l) => l,
                None => return LpSolution::undecided(LpStatus::Unbounded),
            },
        };
    }
    LpSolution {
        status: LpStatus::Optimal,
        objective: Some(problem.c.dot(&x)),
        x: Some(x),
    }
}

/// Dense two-phase tableau simplex over any `Scalar` field.
#[derive(Clone, Debug)]
pub struct Simplex<N: Scalar> {
    eps: N,
    cfg: SimplexCfg,
}

impl<N: Scalar> Simplex<N> {
    pub fn new(eps: N, cfg: SimplexCfg) -> Self {
        Self { eps, cfg }
    }
}

impl<N: Scalar> LpBackend<N> for Simplex<N> {
    fn solve(&self, problem: &LpProblem<N>) -> LpSolution<N> {
        let form = StandardForm::build(problem);
        let mut tab = Tableau::new(&form, &self.eps);
        let scale = form
            .rhs
            .iter()
            .fold(N::one(), |acc, v| if v.abs() > acc { v.abs() } else { acc });

        // Phase 1: drive artificials to zero.
        if tab.art_start < tab.ncols {
            let mut cost = vec![N::zero(); tab.ncols];
            for c in cost.iter_mut().skip(tab.art_start) {
                *c = N::one();
            }
            let (mut d, mut z) = tab.reduced_costs(&cost);
            let allowed = tab.ncols;
            if let Err(status) = self.optimize(&mut tab, &mut d, &mut z, allowed) {
                // Phase 1 is bounded below by zero; only the iteration cap can stop it.
                return LpSolution::undecided(status);
            }
            if z > self.eps.clone() * scale {
                trace!("phase 1 residual is positive: infeasible");
                return LpSolution::undecided(LpStatus::Infeasible);
            }
            tab.evict_artificials(&self.eps);
        }

        // Phase 2: real objective over the feasible basis.
        let mut cost = vec![N::zero(); tab.ncols];
        for (j, cj) in form.cost.iter().enumerate() {
            cost[j] = cj.clone();
        }
        let (mut d, mut z) = tab.reduced_costs(&cost);
        let allowed = tab.art_start;
        if let Err(status) = self.optimize(&mut tab, &mut d, &mut z, allowed) {
            return LpSolution::undecided(status);
        }

        let mut y = vec![N::zero(); form.num_structural];
        for (i, &bv) in tab.basis.iter().enumerate() {
            if bv < form.num_structural {
                y[bv] = tab.rhs[i].clone();
            }
        }
        let x = form.recover(&y);
        let objective = problem.c.dot(&x);
        LpSolution {
            status: LpStatus::Optimal,
            objective: Some(objective),
            x: Some(x),
        }
    }
}

impl<N: Scalar> Simplex<N> {
    /// Minimize over the current basis; columns `>= allowed` never enter.
    fn optimize(
        &self,
        tab: &mut Tableau<N>,
        d: &mut [N],
        z: &mut N,
        allowed: usize,
    ) -> Result<(), LpStatus> {
        let mut degenerate = 0usize;
        for _ in 0..self.cfg.max_iter {
            let bland = self.cfg.rule == PivotRule::Bland || degenerate >= self.cfg.bland_after;
            let Some(col) = self.entering(d, allowed, bland) else {
                return Ok(());
            };
            let Some(row) = self.leaving(tab, col) else {
                return Err(LpStatus::Unbounded);
            };
            let step = tab.rhs[row].clone() / tab.rows[row][col].clone();
            if step.abs() <= self.eps {
                degenerate += 1;
            } else {
                degenerate = 0;
            }
            tab.pivot(row, col, d, z);
        }
        Err(LpStatus::IterationLimit)
    }

    fn entering(&self, d: &[N], allowed: usize, bland: bool) -> Option<usize> {
        let threshold = -self.eps.clone();
        let mut best: Option<usize> = None;
        for (j, dj) in d.iter().enumerate().take(allowed) {
            if *dj >= threshold {
                continue;
            }
            if bland {
                return Some(j);
            }
            match best {
                Some(b) if d[b] <= *dj => {}
                _ => best = Some(j),
            }
        }
        best
    }

    /// Minimum-ratio test; ties go to the smallest basic variable index.
    fn leaving(&self, tab: &Tableau<N>, col: usize) -> Option<usize> {
        let mut best: Option<(usize, N)> = None;
        for i in 0..tab.rows.len() {
            let a = &tab.rows[i][col];
            if *a <= self.eps {
                continue;
            }
            let ratio = tab.rhs[i].clone() / a.clone();
            let better = match &best {
                None => true,
                Some((bi, br)) => {
                    if ratio.clone() + self.eps.clone() < *br {
                        true
                    } else {
                        (ratio.clone() - br.clone()).abs() <= self.eps && tab.basis[i] < tab.basis[*bi]
                    }
                }
            };
            if better {
                best = Some((i, ratio));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// How an original variable is expressed through non-negative columns.
#[derive(Clone, Debug)]
enum VarMap<N> {
    /// `x = lower + y`
    Shifted { col: usize, lower: N },
    /// `x = upper - y`
    Mirrored { col: usize, upper: N },
    /// `x = y⁺ - y⁻`
    Split { pos: usize, neg: usize },
}

/// `min cost·y  s.t.  rows y <= rhs,  y >= 0`.
struct StandardForm<N: Scalar> {
    rows: Vec<Vec<N>>,
    rhs: Vec<N>,
    cost: Vec<N>,
    num_structural: usize,
    vars: Vec<VarMap<N>>,
}

impl<N: Scalar> StandardForm<N> {
    fn build(p: &LpProblem<N>) -> Self {
        let n = p.num_vars();
        let mut vars = Vec::with_capacity(n);
        let mut next = 0usize;
        let mut box_rows: Vec<(usize, N)> = Vec::new();
        for j in 0..n {
            match (&p.lower[j], &p.upper[j]) {
                (Some(l), u) => {
                    if let Some(u) = u {
                        box_rows.push((next, u.clone() - l.clone()));
                    }
                    vars.push(VarMap::Shifted {
                        col: next,
                        lower: l.clone(),
                    });
                    next += 1;
                }
                (None, Some(u)) => {
                    vars.push(VarMap::Mirrored {
                        col: next,
                        upper: u.clone(),
                    });
                    next += 1;
                }
                (None, None) => {
                    vars.push(VarMap::Split {
                        pos: next,
                        neg: next + 1,
                    });
                    next += 2;
                }
            }
        }
        let num_structural = next;

        // Substitute into each row and into the objective.
        let sign = match p.sense {
            Sense::Minimize => N::one(),
            Sense::Maximize => -N::one(),
        };
        let mut cost = vec![N::zero(); num_structural];
        let mut rows = Vec::with_capacity(p.a.nrows() + box_rows.len());
        let mut rhs = Vec::with_capacity(p.a.nrows() + box_rows.len());
        for i in 0..p.a.nrows() {
            let scale = scale_of(p.a.row(i).iter());
            let mut row = vec![N::zero(); num_structural];
            let mut bi = p.b[i].clone() / scale.clone();
            for (j, var) in vars.iter().enumerate() {
                let aij = p.a[(i, j)].clone() / scale.clone();
                substitute(var, aij, &mut row, &mut bi);
            }
            rows.push(row);
            rhs.push(bi);
        }
        let c_scale = scale_of(p.c.iter());
        for (j, var) in vars.iter().enumerate() {
            let mut unused = N::zero();
            let cj = sign.clone() * p.c[j].clone() / c_scale.clone();
            substitute(var, cj, &mut cost, &mut unused);
        }
        for (col, width) in box_rows {
            let mut row = vec![N::zero(); num_structural];
            row[col] = N::one();
            rows.push(row);
            rhs.push(width);
        }
        Self {
            rows,
            rhs,
            cost,
            num_structural,
            vars,
        }
    }

    fn recover(&self, y: &[N]) -> DVector<N> {
        DVector::from_iterator(
            self.vars.len(),
            self.vars.iter().map(|v| match v {
                VarMap::Shifted { col, lower } => lower.clone() + y[*col].clone(),
                VarMap::Mirrored { col, upper } => upper.clone() - y[*col].clone(),
                VarMap::Split { pos, neg } => y[*pos].clone() - y[*neg].clone(),
            }),
        )
    }
}

/// Add coefficient `coef` of an original variable into `row`, moving constant
/// parts to `rhs`.
fn substitute<N: Scalar>(var: &VarMap<N>, coef: N, row: &mut [N], rhs: &mut N) {
    if coef.is_zero() {
        return;
    }
    match var {
        VarMap::Shifted { col, lower } => {
            row[*col] = row[*col].clone() + coef.clone();
            *rhs = rhs.clone() - coef * lower.clone();
        }
        VarMap::Mirrored { col, upper } => {
            row[*col] = row[*col].clone() - coef.clone();
            *rhs = rhs.clone() - coef * upper.clone();
        }
        VarMap::Split { pos, neg } => {
            row[*pos] = row[*pos].clone() + coef.clone();
            row[*neg] = row[*neg].clone() - coef;
        }
    }
}

/// Simplex tableau with columns `[structural | slack | artificial]`.
struct Tableau<N: Scalar> {
    rows: Vec<Vec<N>>,
    rhs: Vec<N>,
    basis: Vec<usize>,
    ncols: usize,
    art_start: usize,
}

impl<N: Scalar> Tableau<N> {
    fn new(form: &StandardForm<N>, eps: &N) -> Self {
        let m = form.rows.len();
        let ns = form.num_structural;
        let negative: Vec<bool> = form.rhs.iter().map(|b| *b < -eps.clone()).collect();
        let num_art = negative.iter().filter(|&&neg| neg).count();
        let art_start = ns + m;
        let ncols = art_start + num_art;
        let mut rows = Vec::with_capacity(m);
        let mut rhs = Vec::with_capacity(m);
        let mut basis = Vec::with_capacity(m);
        let mut next_art = art_start;
        for i in 0..m {
            let mut row = vec![N::zero(); ncols];
            row[..ns].clone_from_slice(&form.rows[i]);
            row[ns + i] = N::one();
            if negative[i] {
                for v in row.iter_mut() {
                    *v = -v.clone();
                }
                row[next_art] = N::one();
                rhs.push(-form.rhs[i].clone());
                basis.push(next_art);
                next_art += 1;
            } else {
                rhs.push(form.rhs[i].clone());
                basis.push(ns + i);
            }
            rows.push(row);
        }
        Self {
            rows,
            rhs,
            basis,
            ncols,
            art_start,
        }
    }

    /// Reduced costs `d = c - c_B B⁻¹ A` and objective value `c_B B⁻¹ b`.
    fn reduced_costs(&self, cost: &[N]) -> (Vec<N>, N) {
        let mut d = cost.to_vec();
        let mut z = N::zero();
        for (i, &bv) in self.basis.iter().enumerate() {
            let cb = cost[bv].clone();
            if cb.is_zero() {
                continue;
            }
            for (dj, aij) in d.iter_mut().zip(self.rows[i].iter()) {
                *dj = dj.clone() - cb.clone() * aij.clone();
            }
            z = z + cb * self.rhs[i].clone();
        }
        (d, z)
    }

    fn pivot(&mut self, r: usize, c: usize, d: &mut [N], z: &mut N) {
        let p = self.rows[r][c].clone();
        for v in self.rows[r].iter_mut() {
            *v = v.clone() / p.clone();
        }
        self.rhs[r] = self.rhs[r].clone() / p;
        let pivot_row = self.rows[r].clone();
        let pivot_rhs = self.rhs[r].clone();
        for i in 0..self.rows.len() {
            if i == r || self.rows[i][c].is_zero() {
                continue;
            }
            let f = self.rows[i][c].clone();
            for (v, pv) in self.rows[i].iter_mut().zip(pivot_row.iter()) {
                *v = v.clone() - f.clone() * pv.clone();
            }
            self.rhs[i] = self.rhs[i].clone() - f * pivot_rhs.clone();
        }
        let dc = d[c].clone();
        if !dc.is_zero() {
            for (dj, pv) in d.iter_mut().zip(pivot_row.iter()) {
                *dj = dj.clone() - dc.clone() * pv.clone();
            }
            *z = z.clone() + dc * pivot_rhs;
        }
        self.basis[r] = c;
    }

    /// After phase 1, pivot basic artificials out where a real column allows it.
    /// Rows where none does are redundant and keep a zero-valued artificial.
    fn evict_artificials(&mut self, eps: &N) {
        let mut scratch = vec![N::zero(); self.ncols];
        let mut z = N::zero();
        for r in 0..self.rows.len() {
            if self.basis[r] < self.art_start {
                continue;
            }
            let col = (0..self.art_start).find(|&j| self.rows[r][j].abs() > *eps);
            if let Some(col) = col {
                self.pivot(r, col, &mut scratch, &mut z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};
    use num_rational::BigRational;

    fn q(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    #[test]
    fn maximize_over_unit_square() {
        let cfg = FieldCfg::float();
        let a = dmatrix![1.0, 0.0; 0.0, 1.0; -1.0, 0.0; 0.0, -1.0];
        let b = dvector![1.0, 1.0, 0.0, 0.0];
        let free = vec![None; 2];
        let sol = solve_lp(Sense::Maximize, &dvector![1.0, 2.0], &a, &b, &free, &free, &cfg).unwrap();
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.objective.unwrap() - 3.0).abs() < 1e-9);
        let x = sol.x.unwrap();
        assert!((x - dvector![1.0, 1.0]).amax() < 1e-9);

        let sol = solve_lp(Sense::Minimize, &dvector![1.0, 2.0], &a, &b, &free, &free, &cfg).unwrap();
        assert!(sol.objective.unwrap().abs() < 1e-9);
    }

    #[test]
    fn detects_infeasible_and_unbounded() {
        let cfg = FieldCfg::float();
        // x <= 0 and x >= 2
        let a = dmatrix![1.0; -1.0];
        let b = dvector![0.0, -2.0];
        let free = vec![None];
        let sol = solve_lp(Sense::Maximize, &dvector![1.0], &a, &b, &free, &free, &cfg).unwrap();
        assert_eq!(sol.status, LpStatus::Infeasible);
        assert!(sol.objective.is_none());

        // x <= 1 only, minimize x
        let a = dmatrix![1.0];
        let b = dvector![1.0];
        let sol = solve_lp(Sense::Minimize, &dvector![1.0], &a, &b, &free, &free, &cfg).unwrap();
        assert_eq!(sol.status, LpStatus::Unbounded);
        assert!(matches!(
            sol.expect_decided("test"),
            Err(PolyError::LpBackendFailure {
                status: LpStatus::Unbounded,
                ..
            })
        ));
    }

    #[test]
    fn box_bounds_are_respected() {
        let cfg = FieldCfg::float();
        // no rows; -1 <= x <= 2, y <= 3 (no lower), maximize x + y
        let a = DMatrix::<f64>::zeros(0, 2);
        let b = DVector::<f64>::zeros(0);
        let lower = vec![Some(-1.0), None];
        let upper = vec![Some(2.0), Some(3.0)];
        let sol = solve_lp(Sense::Maximize, &dvector![1.0, 1.0], &a, &b, &lower, &upper, &cfg).unwrap();
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.objective.unwrap() - 5.0).abs() < 1e-9);
        // minimizing x alone hits the lower bound; y has none but zero cost
        let sol = solve_lp(Sense::Minimize, &dvector![1.0, 0.0], &a, &b, &lower, &upper, &cfg).unwrap();
        assert!((sol.objective.unwrap() + 1.0).abs() < 1e-9);
        // lower > upper is infeasible
        let sol = solve_lp(
            Sense::Minimize,
            &dvector![1.0, 0.0],
            &a,
            &b,
            &[Some(1.0), None],
            &[Some(0.0), None],
            &cfg,
        )
        .unwrap();
        assert_eq!(sol.status, LpStatus::Infeasible);
    }

    #[test]
    fn exact_backend_returns_exact_vertex() {
        let cfg = FieldCfg::exact();
        // x + 2y <= 4, 3x + y <= 6, x, y >= 0; maximize x + y -> (8/5, 6/5), value 14/5
        let a = DMatrix::from_row_slice(4, 2, &[q(1), q(2), q(3), q(1), q(-1), q(0), q(0), q(-1)]);
        let b = DVector::from_vec(vec![q(4), q(6), q(0), q(0)]);
        let free = vec![None, None];
        let c = DVector::from_vec(vec![q(1), q(1)]);
        let sol = solve_lp(Sense::Maximize, &c, &a, &b, &free, &free, &cfg).unwrap();
        assert_eq!(sol.status, LpStatus::Optimal);
        assert_eq!(sol.objective.unwrap(), BigRational::new(14.into(), 5.into()));
        let x = sol.x.unwrap();
        assert_eq!(x[0], BigRational::new(8.into(), 5.into()));
        assert_eq!(x[1], BigRational::new(6.into(), 5.into()));
    }

    #[test]
    fn feasibility_helper() {
        let cfg = FieldCfg::float();
        let ok = vec![
            LinearConstraint::new(dvector![1.0], 1.0),
            LinearConstraint::new(dvector![-1.0], 0.0),
        ];
        assert!(is_feasible(&ok, &cfg).unwrap());
        let bad = vec![
            LinearConstraint::new(dvector![1.0], 0.0),
            LinearConstraint::new(dvector![-1.0], -1.0),
        ];
        assert!(!is_feasible(&bad, &cfg).unwrap());
        assert!(is_feasible::<f64>(&[], &cfg).unwrap());
    }

    #[test]
    fn tiny_coefficients_are_not_treated_as_zero() {
        // maximize 1e-10 x  s.t.  1e-10 x <= 2e-10
        let a = dmatrix![1e-10];
        let b = dvector![2e-10];
        let c = dvector![1e-10];
        let problem = LpProblem::new(Sense::Maximize, c, a, b).unwrap();
        let cfg = FieldCfg::float();
        let by_minilp = MiniLp.solve(&problem);
        let by_simplex = Simplex::new(cfg.eps, cfg.lp.clone()).solve(&problem);
        for sol in [by_minilp, by_simplex] {
            assert_eq!(sol.status, LpStatus::Optimal);
            assert!((sol.x.unwrap()[0] - 2.0).abs() < 1e-9);
            assert!((sol.objective.unwrap() - 2e-10).abs() < 1e-18);
        }
    }

    #[test]
    fn backends_agree_on_a_float_problem() {
        let cfg = FieldCfg::float();
        let a = dmatrix![1.0, 2.0; 3.0, 1.0; -1.0, 0.0; 0.0, -1.0];
        let b = dvector![4.0, 6.0, 0.0, 0.0];
        let problem = LpProblem::new(Sense::Maximize, dvector![1.0, 1.0], a, b).unwrap();
        let x = MiniLp.solve(&problem).x.unwrap();
        let y = Simplex::new(cfg.eps, cfg.lp.clone()).solve(&problem).x.unwrap();
        assert!((x - dvector![1.6, 1.2]).amax() < 1e-9);
        assert!((y - dvector![1.6, 1.2]).amax() < 1e-9);
        // exact configurations hand out the tableau simplex
        let _: Simplex<BigRational> = FieldCfg::exact().backend();
        let _: MiniLp = cfg.backend();
    }

    #[test]
    fn shape_errors_are_reported() {
        let cfg = FieldCfg::float();
        let a = dmatrix![1.0, 0.0];
        let b = dvector![1.0, 2.0];
        let free = vec![None; 2];
        assert!(matches!(
            solve_lp(Sense::Minimize, &dvector![1.0, 0.0], &a, &b, &free, &free, &cfg),
            Err(PolyError::DimensionMismatch { .. })
        ));
    }
}
