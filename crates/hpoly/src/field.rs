//! Numeric fields: the scalar trait and the explicit per-field strategy object.
//!
//! Purpose
//! - Keep every algorithm generic over `f64` and exact rationals.
//! - Field-specific choices (tolerance, LP pivoting rule) live in `FieldCfg`,
//!   which callers pass explicitly instead of relying on type-based dispatch.
//! - The default LP backend is per field: `minilp` for `f64`, the in-crate
//!   tableau simplex for `BigRational` (no registry LP crate pivots over
//!   `num-rational`).
//!
//! Conventions
//! - `eps` is an absolute/relative slack for comparisons; it is zero for exact
//!   fields, which makes `leq` and `approx_zero` exact predicates.

use std::fmt;

use num_rational::BigRational;
use num_traits::{FromPrimitive, Num, Signed, ToPrimitive, Zero};

use crate::cfg::{DEGENERATE_STREAK, FLOAT_EPS, LP_MAX_ITER};
use crate::error::{PolyError, PolyResult};
use crate::lp::{LpBackend, MiniLp, Simplex};

/// Numeric field tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// IEEE-754 doubles with tolerance-based comparisons.
    Float,
    /// Exact rationals; comparisons are exact.
    Exact,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Float => write!(f, "float"),
            FieldKind::Exact => write!(f, "exact-rational"),
        }
    }
}

/// Scalars the constraint algebra computes with.
///
/// The `Closed*Assign` bounds unlock nalgebra's generic arithmetic (`dot`, `*`,
/// `-`, `tr_mul`) for both fields.
pub trait Scalar:
    nalgebra::Scalar
    + nalgebra::ClosedAddAssign
    + nalgebra::ClosedSubAssign
    + nalgebra::ClosedMulAssign
    + PartialOrd
    + Num
    + Signed
    + FromPrimitive
    + ToPrimitive
{
    /// Field this scalar type belongs to.
    const KIND: FieldKind;

    /// LP backend handed out by `FieldCfg::backend`.
    type Backend: LpBackend<Self>;

    fn default_backend(cfg: &FieldCfg<Self>) -> Self::Backend;
}

impl Scalar for f64 {
    const KIND: FieldKind = FieldKind::Float;
    type Backend = MiniLp;

    fn default_backend(_cfg: &FieldCfg<Self>) -> MiniLp {
        MiniLp
    }
}

impl Scalar for BigRational {
    const KIND: FieldKind = FieldKind::Exact;
    type Backend = Simplex<BigRational>;

    fn default_backend(cfg: &FieldCfg<Self>) -> Simplex<BigRational> {
        Simplex::new(cfg.eps.clone(), cfg.lp.clone())
    }
}

/// Entering-variable rule of the simplex backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PivotRule {
    /// Most negative reduced cost; falls back to Bland after a degenerate streak.
    Dantzig,
    /// Smallest eligible index; never cycles.
    Bland,
}

/// Configuration of the in-crate simplex (`lp::Simplex`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplexCfg {
    pub rule: PivotRule,
    pub max_iter: usize,
    /// Degenerate pivots tolerated before switching to Bland's rule.
    pub bland_after: usize,
}

/// Per-field strategy object threaded through comparisons and LP calls.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldCfg<N: Scalar> {
    pub kind: FieldKind,
    pub eps: N,
    pub lp: SimplexCfg,
}

impl FieldCfg<f64> {
    /// Approximate field: `1e-9` tolerance. The simplex settings only apply
    /// when a caller runs `lp::Simplex` on floats explicitly.
    pub fn float() -> Self {
        Self {
            kind: FieldKind::Float,
            eps: FLOAT_EPS,
            lp: SimplexCfg {
                rule: PivotRule::Dantzig,
                max_iter: LP_MAX_ITER,
                bland_after: DEGENERATE_STREAK,
            },
        }
    }
}

impl FieldCfg<BigRational> {
    /// Exact field: zero tolerance, Bland pivoting.
    pub fn exact() -> Self {
        Self {
            kind: FieldKind::Exact,
            eps: BigRational::zero(),
            lp: SimplexCfg {
                rule: PivotRule::Bland,
                max_iter: LP_MAX_ITER,
                bland_after: 0,
            },
        }
    }
}

impl Default for FieldCfg<f64> {
    fn default() -> Self {
        Self::float()
    }
}

impl Default for FieldCfg<BigRational> {
    fn default() -> Self {
        Self::exact()
    }
}

impl<N: Scalar> FieldCfg<N> {
    /// Fail loudly when this configuration belongs to another field than `N`.
    pub fn check(&self) -> PolyResult<()> {
        if self.kind != N::KIND {
            return Err(PolyError::NumericTypeMismatch {
                expected: N::KIND,
                got: self.kind,
            });
        }
        Ok(())
    }

    /// Default LP backend for this field.
    pub fn backend(&self) -> N::Backend {
        N::default_backend(self)
    }

    /// `a <= b` up to the field tolerance (relative for magnitudes above 1).
    pub fn leq(&self, a: &N, b: &N) -> bool {
        if a <= b {
            return true;
        }
        if self.eps.is_zero() {
            return false;
        }
        let scale = max_of(N::one(), max_of(a.abs(), b.abs()));
        (a.clone() - b.clone()).abs() <= self.eps.clone() * scale
    }

    /// `|a| <= eps`.
    #[inline]
    pub fn approx_zero(&self, a: &N) -> bool {
        a.abs() <= self.eps
    }

    /// `a == b` up to the field tolerance.
    #[inline]
    pub fn approx_eq(&self, a: &N, b: &N) -> bool {
        self.leq(a, b) && self.leq(b, a)
    }
}

#[inline]
fn max_of<N: Scalar>(a: N, b: N) -> N {
    if a >= b {
        a
    } else {
        b
    }
}

/// Convert an `f64` literal into the field; exact fields get the exact binary
/// value of the double.
pub fn from_f64<N: Scalar>(x: f64) -> N {
    N::from_f64(x).unwrap_or_else(N::zero)
}

/// Integer literal in the field.
pub fn from_i64<N: Scalar>(x: i64) -> N {
    N::from_i64(x).unwrap_or_else(N::zero)
}
