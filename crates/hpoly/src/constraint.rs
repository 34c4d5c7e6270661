//! The atomic half-space `a · x <= b`.

use nalgebra::DVector;

use crate::field::{FieldCfg, Scalar};
use crate::matrix::scale_of;

/// Closed half-space `a · x <= b` in R^n.
///
/// Invariants:
/// - `a` is not normalized; `b` is any value of the field.
/// - Membership uses `FieldCfg::leq` after dividing the row by its largest
///   coefficient magnitude, so the tolerance does not depend on how the row
///   was scaled.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint<N: Scalar> {
    pub a: DVector<N>,
    pub b: N,
}

impl<N: Scalar> LinearConstraint<N> {
    #[inline]
    pub fn new(a: DVector<N>, b: N) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn from_slice(a: &[N], b: N) -> Self {
        Self {
            a: DVector::from_column_slice(a),
            b,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.len()
    }

    /// `a · x`; the caller guarantees `x.len() == self.dim()`.
    #[inline]
    pub fn eval(&self, x: &DVector<N>) -> N {
        self.a.dot(x)
    }

    pub fn satisfies(&self, x: &DVector<N>, cfg: &FieldCfg<N>) -> bool {
        let s = scale_of(self.a.iter());
        cfg.leq(&(self.eval(x) / s.clone()), &(self.b.clone() / s))
    }

    /// The complementary closed half-space `-a · x <= -b`.
    pub fn flipped(&self) -> Self {
        Self {
            a: self.a.map(|v| -v),
            b: -self.b.clone(),
        }
    }
}
