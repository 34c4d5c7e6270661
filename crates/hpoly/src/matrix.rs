//! Field-generic dense linear algebra and a small sparse matrix.
//!
//! Why hand-rolled elimination
//! - nalgebra's decompositions need a `ComplexField`; exact rationals are not
//!   one. Gauss–Jordan with max-magnitude pivoting works for both fields: with
//!   `eps = 0` it is exact, with `eps > 0` it is the usual partial-pivoting
//!   scheme.
//! - The condition-number test is float-only and goes through nalgebra's SVD.

use nalgebra::{DMatrix, DVector, SVD};

use crate::error::{PolyError, PolyResult};
use crate::field::{FieldCfg, Scalar};

/// Largest magnitude among `values`, or one when every value is zero.
///
/// Used to make tolerances scale-free: rows, objectives and pivot thresholds
/// are measured against it.
pub(crate) fn scale_of<'a, N: Scalar>(values: impl Iterator<Item = &'a N>) -> N {
    let m = values.fold(N::zero(), |acc, v| if v.abs() > acc { v.abs() } else { acc });
    if m.is_zero() {
        N::one()
    } else {
        m
    }
}

/// In-place reduced row echelon form; returns the pivot columns.
///
/// Pivot choice: largest magnitude in the column among the remaining rows;
/// magnitudes `<= tol` count as zero.
fn rref<N: Scalar>(m: &mut DMatrix<N>, tol: &N) -> Vec<usize> {
    let (rows, cols) = (m.nrows(), m.ncols());
    let mut pivots = Vec::new();
    let mut r = 0usize;
    for c in 0..cols {
        if r == rows {
            break;
        }
        let mut best = r;
        for i in r + 1..rows {
            if m[(i, c)].abs() > m[(best, c)].abs() {
                best = i;
            }
        }
        if m[(best, c)].abs() <= *tol {
            continue;
        }
        m.swap_rows(r, best);
        let p = m[(r, c)].clone();
        for j in 0..cols {
            m[(r, j)] = m[(r, j)].clone() / p.clone();
        }
        for i in 0..rows {
            if i == r || m[(i, c)].is_zero() {
                continue;
            }
            let f = m[(i, c)].clone();
            for j in 0..cols {
                m[(i, j)] = m[(i, j)].clone() - f.clone() * m[(r, j)].clone();
            }
        }
        pivots.push(c);
        r += 1;
    }
    pivots
}

/// Pivot threshold for `m`: `eps` relative to its largest entry.
fn pivot_tol<N: Scalar>(m: &DMatrix<N>, cfg: &FieldCfg<N>) -> N {
    cfg.eps.clone() * scale_of(m.iter())
}

/// Numerical rank (exact for exact fields).
pub fn rank<N: Scalar>(m: &DMatrix<N>, cfg: &FieldCfg<N>) -> usize {
    let mut work = m.clone();
    rref(&mut work, &pivot_tol(m, cfg)).len()
}

/// Inverse via Gauss–Jordan on `[M | I]`; `None` for singular or non-square input.
pub fn try_inverse<N: Scalar>(m: &DMatrix<N>, cfg: &FieldCfg<N>) -> Option<DMatrix<N>> {
    if !m.is_square() {
        return None;
    }
    let n = m.nrows();
    let mut aug = DMatrix::from_fn(n, 2 * n, |i, j| {
        if j < n {
            m[(i, j)].clone()
        } else if j - n == i {
            N::one()
        } else {
            N::zero()
        }
    });
    let pivots = rref(&mut aug, &pivot_tol(m, cfg));
    if pivots.len() < n || pivots[n - 1] != n - 1 {
        return None;
    }
    Some(DMatrix::from_fn(n, n, |i, j| aug[(i, n + j)].clone()))
}

/// Solve the square system `M x = rhs`; `None` when `M` is singular.
pub fn solve<N: Scalar>(m: &DMatrix<N>, rhs: &DVector<N>, cfg: &FieldCfg<N>) -> Option<DVector<N>> {
    if !m.is_square() || m.nrows() != rhs.len() {
        return None;
    }
    let n = m.nrows();
    let mut aug = DMatrix::from_fn(n, n + 1, |i, j| {
        if j < n {
            m[(i, j)].clone()
        } else {
            rhs[i].clone()
        }
    });
    let pivots = rref(&mut aug, &pivot_tol(m, cfg));
    if pivots.len() < n || pivots[..n].iter().enumerate().any(|(k, &c)| k != c) {
        return None;
    }
    Some(DVector::from_fn(n, |i, _| aug[(i, n)].clone()))
}

/// Left division `M \ rhs`.
///
/// Square `M`: exact solve. Tall `M` (more rows than columns) with full
/// column rank: least-squares solution through the normal equations
/// `(Mᵀ M) x = Mᵀ rhs`. Anything else: `None`.
pub fn left_divide<N: Scalar>(
    m: &DMatrix<N>,
    rhs: &DVector<N>,
    cfg: &FieldCfg<N>,
) -> Option<DVector<N>> {
    if m.nrows() != rhs.len() {
        return None;
    }
    if m.is_square() {
        return solve(m, rhs, cfg);
    }
    if m.nrows() < m.ncols() {
        return None;
    }
    solve(&m.tr_mul(m), &m.tr_mul(rhs), cfg)
}

/// Ratio of extreme singular values, computed in `f64`.
///
/// Entries that do not convert to `f64` make the matrix count as
/// ill-conditioned (`+inf`).
pub fn condition_number<N: Scalar>(m: &DMatrix<N>) -> f64 {
    if m.is_empty() {
        return 1.0;
    }
    let mut values = Vec::with_capacity(m.len());
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            match m[(i, j)].to_f64() {
                Some(v) if v.is_finite() => values.push(v),
                _ => return f64::INFINITY,
            }
        }
    }
    let mf = DMatrix::from_vec(m.nrows(), m.ncols(), values);
    let sv = SVD::new(mf, false, false).singular_values;
    let (hi, lo) = (sv.max(), sv.min());
    if lo <= 0.0 || !lo.is_finite() {
        f64::INFINITY
    } else {
        hi / lo
    }
}

/// Invertibility test: condition number below `cond_tol` for floats, exact full
/// rank for exact fields.
pub fn is_invertible<N: Scalar>(m: &DMatrix<N>, cond_tol: f64, cfg: &FieldCfg<N>) -> bool {
    if !m.is_square() {
        return false;
    }
    match N::KIND {
        crate::field::FieldKind::Float => condition_number(m) < cond_tol,
        crate::field::FieldKind::Exact => rank(m, cfg) == m.nrows(),
    }
}

/// Coordinate-format sparse matrix.
///
/// Duplicate coordinates are summed on densification. Only what the linear map
/// engine needs: products, densification, shape queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix<N: Scalar> {
    nrows: usize,
    ncols: usize,
    entries: Vec<(usize, usize, N)>,
}

impl<N: Scalar> SparseMatrix<N> {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            entries: Vec::new(),
        }
    }

    /// Build from triplets; rejects out-of-range coordinates.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, N)>,
    ) -> PolyResult<Self> {
        let mut out = Self::new(nrows, ncols);
        for (i, j, v) in triplets {
            out.push(i, j, v)?;
        }
        Ok(out)
    }

    /// Sparse copy of `m` keeping entries with `|v| > eps`.
    pub fn from_dense(m: &DMatrix<N>, cfg: &FieldCfg<N>) -> Self {
        let mut out = Self::new(m.nrows(), m.ncols());
        for j in 0..m.ncols() {
            for i in 0..m.nrows() {
                if !cfg.approx_zero(&m[(i, j)]) {
                    out.entries.push((i, j, m[(i, j)].clone()));
                }
            }
        }
        out
    }

    pub fn push(&mut self, i: usize, j: usize, v: N) -> PolyResult<()> {
        if i >= self.nrows {
            return Err(PolyError::DimensionMismatch {
                expected: self.nrows,
                got: i + 1,
                context: "sparse row index",
            });
        }
        if j >= self.ncols {
            return Err(PolyError::DimensionMismatch {
                expected: self.ncols,
                got: j + 1,
                context: "sparse column index",
            });
        }
        self.entries.push((i, j, v));
        Ok(())
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn to_dense(&self) -> DMatrix<N> {
        let mut m = DMatrix::from_element(self.nrows, self.ncols, N::zero());
        for (i, j, v) in &self.entries {
            m[(*i, *j)] = m[(*i, *j)].clone() + v.clone();
        }
        m
    }

    /// `M x`.
    pub fn mul_vec(&self, x: &DVector<N>) -> DVector<N> {
        let mut y = DVector::from_element(self.nrows, N::zero());
        for (i, j, v) in &self.entries {
            y[*i] = y[*i].clone() + v.clone() * x[*j].clone();
        }
        y
    }
}
