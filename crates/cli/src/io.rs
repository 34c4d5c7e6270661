//! JSON files in and out of the CLI.
//!
//! Polyhedron files look like
//! `{"a": [[1.0, 0.0], [0.0, 1.0]], "b": [1.0, 1.0], "kind": "polytope"}`;
//! `kind` defaults to `polyhedron` and `dim` is only needed when `a` is empty.
//! For `hyperplane` the single row is the equation `a · x = b`.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use hpoly::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PolyFile {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub dim: Option<usize>,
}

/// Constraint list with the kind tag it was declared with.
///
/// The tag is not trusted for boundedness: `is_bounded` is the trait's LP
/// oracle, since nothing checked that a file tagged `polytope` is bounded.
#[derive(Clone, Debug)]
pub struct LoadedSet {
    pub dim: usize,
    pub kind: SetKind,
    pub constraints: Vec<LinearConstraint<f64>>,
}

impl Polyhedron<f64> for LoadedSet {
    fn dim(&self) -> usize {
        self.dim
    }

    fn constraints(&self) -> Cow<'_, [LinearConstraint<f64>]> {
        Cow::Borrowed(&self.constraints)
    }

    fn kind(&self) -> SetKind {
        self.kind
    }
}

pub fn parse_kind(s: &str) -> Result<SetKind> {
    Ok(match s {
        "halfspace" => SetKind::HalfSpace,
        "hyperplane" => SetKind::Hyperplane,
        "polygon" => SetKind::Polygon,
        "polytope" => SetKind::Polytope,
        "polyhedron" => SetKind::Polyhedron,
        other => bail!("unknown set kind '{}'", other),
    })
}

pub fn kind_name(kind: SetKind) -> &'static str {
    match kind {
        SetKind::HalfSpace => "halfspace",
        SetKind::Hyperplane => "hyperplane",
        SetKind::Polygon => "polygon",
        SetKind::Polytope => "polytope",
        SetKind::Polyhedron => "polyhedron",
    }
}

impl PolyFile {
    pub fn into_set(self) -> Result<LoadedSet> {
        ensure!(
            self.a.len() == self.b.len(),
            "'a' has {} rows but 'b' has {} entries",
            self.a.len(),
            self.b.len()
        );
        let dim = match (self.a.first(), self.dim) {
            (Some(row), Some(d)) => {
                ensure!(row.len() == d, "'dim' is {} but rows have length {}", d, row.len());
                d
            }
            (Some(row), None) => row.len(),
            (None, Some(d)) => d,
            (None, None) => bail!("'dim' is required when 'a' is empty"),
        };
        let kind = parse_kind(self.kind.as_deref().unwrap_or("polyhedron"))?;
        let mut constraints = Vec::with_capacity(self.a.len());
        for (i, (row, b)) in self.a.iter().zip(self.b.iter()).enumerate() {
            ensure!(row.len() == dim, "row {} has length {}, expected {}", i, row.len(), dim);
            constraints.push(LinearConstraint::from_slice(row, *b));
        }
        match kind {
            SetKind::HalfSpace => ensure!(constraints.len() == 1, "a halfspace has exactly one row"),
            SetKind::Hyperplane => {
                ensure!(constraints.len() == 1, "a hyperplane has exactly one row");
                let flipped = constraints[0].flipped();
                constraints.push(flipped);
            }
            SetKind::Polygon => ensure!(dim == 2, "a polygon lives in 2 dimensions, got {}", dim),
            SetKind::Polytope | SetKind::Polyhedron => {}
        }
        Ok(LoadedSet {
            dim,
            kind,
            constraints,
        })
    }
}

pub fn read_set(path: &Path) -> Result<LoadedSet> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: PolyFile =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    file.into_set().with_context(|| format!("validating {}", path.display()))
}

/// Row-major `[[f64]]` matrix file.
pub fn read_matrix(path: &Path) -> Result<DMatrix<f64>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<Vec<f64>> =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    let ncols = rows.first().map_or(0, Vec::len);
    ensure!(
        rows.iter().all(|r| r.len() == ncols),
        "matrix rows in {} have different lengths",
        path.display()
    );
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &flat))
}

pub fn constraints_json(constraints: &[LinearConstraint<f64>]) -> Value {
    let a: Vec<Vec<f64>> = constraints.iter().map(|c| c.a.iter().copied().collect()).collect();
    let b: Vec<f64> = constraints.iter().map(|c| c.b).collect();
    json!({ "a": a, "b": b })
}

fn points_json(points: &[DVector<f64>]) -> Value {
    let pts: Vec<Vec<f64>> = points.iter().map(|p| p.iter().copied().collect()).collect();
    json!(pts)
}

pub fn mapped_json(img: &MappedSet<f64>) -> Value {
    match img {
        MappedSet::Interval(i) => json!({
            "representation": "interval",
            "lo": i.lo,
            "hi": i.hi,
        }),
        MappedSet::VPolygon(v) => json!({
            "representation": "vrep",
            "dim": 2,
            "vertices": points_json(&v.vertices),
        }),
        MappedSet::VPolytope(v) => json!({
            "representation": "vrep",
            "dim": v.dim,
            "vertices": points_json(&v.vertices),
        }),
        h => {
            let mut doc = json!({
                "representation": "hrep",
                "kind": kind_name(h.kind()),
                "dim": h.dim(),
            });
            if let Some(p) = h.as_hrep() {
                let body = constraints_json(&p.constraints());
                doc["a"] = body["a"].clone();
                doc["b"] = body["b"].clone();
            }
            doc
        }
    }
}

/// Pretty JSON to `out` (creating parent directories) or stdout.
pub fn emit(doc: &Value, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(doc)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating output dir {}", parent.display()))?;
                }
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{}", text),
    }
    Ok(())
}
