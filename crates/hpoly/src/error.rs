//! Error type shared by all operations of the crate.

use std::fmt;

use crate::field::FieldKind;
use crate::lp::LpStatus;

/// Result alias used across the crate.
pub type PolyResult<T> = Result<T, PolyError>;

/// Errors surfaced by the constraint algebra.
///
/// Infeasibility detected during redundancy removal is not an error; it is
/// reported as `Ok(false)` by `remove_redundant`.
#[derive(Clone, Debug, PartialEq)]
pub enum PolyError {
    /// Operand dimensions disagree.
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: &'static str,
    },
    /// Unknown algorithm name, forced `inverse` on a non-invertible matrix, or
    /// forced `vrep` on an unbounded set.
    InvalidAlgorithmChoice(String),
    /// The LP backend returned a status that is neither optimal nor infeasible.
    LpBackendFailure {
        status: LpStatus,
        context: &'static str,
    },
    /// A field configuration was used with scalars of a different field.
    NumericTypeMismatch { expected: FieldKind, got: FieldKind },
    /// The operation needs a non-empty set.
    EmptySet { context: &'static str },
}

impl fmt::Display for PolyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolyError::DimensionMismatch {
                expected,
                got,
                context,
            } => write!(
                f,
                "dimension mismatch in {}: expected {}, got {}",
                context, expected, got
            ),
            PolyError::InvalidAlgorithmChoice(msg) => write!(f, "invalid algorithm choice: {}", msg),
            PolyError::LpBackendFailure { status, context } => {
                write!(f, "LP backend failed in {} with status {}", context, status)
            }
            PolyError::NumericTypeMismatch { expected, got } => write!(
                f,
                "numeric field mismatch: scalars are {}, configuration is {}",
                expected, got
            ),
            PolyError::EmptySet { context } => write!(f, "{} requires a non-empty set", context),
        }
    }
}

impl std::error::Error for PolyError {}
