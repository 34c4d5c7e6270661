//! Tolerance and iteration defaults (internal).
//!
//! Policy
//! - Defaults are fixed constants; per-call overrides go through `FieldCfg`
//!   and `LinearMapOptions` rather than new knobs here.

/// Feasibility/comparison epsilon for floating-point fields.
pub const FLOAT_EPS: f64 = 1e-9;
/// Default condition-number bound used by the invertibility test of the
/// linear map engine.
pub const DEFAULT_COND_TOL: f64 = 1e6;
/// Simplex iteration cap; reaching it yields `LpStatus::IterationLimit`.
pub(crate) const LP_MAX_ITER: usize = 10_000;
/// Consecutive degenerate pivots after which Dantzig pivoting switches to
/// Bland's rule.
pub(crate) const DEGENERATE_STREAK: usize = 50;
