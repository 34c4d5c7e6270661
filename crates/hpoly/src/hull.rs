//! Planar convex hull for consumers of V-polygon output.
//!
//! The linear map engine returns mapped vertices raw; callers that want convex
//! position normalize with `convex_hull_2d` (or `VPolygon::hull`).

use std::cmp::Ordering;

use nalgebra::DVector;

use crate::field::{FieldCfg, Scalar};

/// Andrew's monotone chain; returns hull vertices in CCW order without
/// collinear points. Fewer than three distinct points are returned as-is
/// (deduplicated, sorted).
pub fn convex_hull_2d<N: Scalar>(points: &[DVector<N>], cfg: &FieldCfg<N>) -> Vec<DVector<N>> {
    let mut pts: Vec<DVector<N>> = points.iter().filter(|p| p.len() == 2).cloned().collect();
    pts.sort_by(|a, b| match a[0].partial_cmp(&b[0]).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a[1].partial_cmp(&b[1]).unwrap_or(Ordering::Equal),
        o => o,
    });
    pts.dedup_by(|a, b| cfg.approx_eq(&a[0], &b[0]) && cfg.approx_eq(&a[1], &b[1]));
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<DVector<N>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= cfg.eps {
            lower.pop();
        }
        lower.push(p.clone());
    }
    let mut upper: Vec<DVector<N>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= cfg.eps {
            upper.pop();
        }
        upper.push(p.clone());
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// z-component of `(b - a) × (c - a)`.
#[inline]
fn cross<N: Scalar>(a: &DVector<N>, b: &DVector<N>, c: &DVector<N>) -> N {
    let (abx, aby) = (b[0].clone() - a[0].clone(), b[1].clone() - a[1].clone());
    let (acx, acy) = (c[0].clone() - a[0].clone(), c[1].clone() - a[1].clone());
    abx * acy - aby * acx
}
