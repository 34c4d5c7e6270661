use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hpoly::prelude::*;
use serde_json::json;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;

#[derive(Parser)]
#[command(name = "hpoly")]
#[command(about = "Constraint-level operations on H-polyhedra stored as JSON")]
struct Cmd {
    /// Write the result here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Log selection decisions and LP outcomes
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Membership test for a point
    Contains {
        #[arg(long)]
        poly: PathBuf,
        /// Comma-separated coordinates
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        point: Vec<f64>,
    },
    /// Remove redundant constraints
    Reduce {
        #[arg(long)]
        poly: PathBuf,
    },
    /// Concrete linear map M · P
    Map {
        #[arg(long)]
        poly: PathBuf,
        /// Row-major JSON matrix `[[f64]]`
        #[arg(long)]
        matrix: PathBuf,
        /// vrep | inverse | division (selected automatically when absent)
        #[arg(long)]
        algorithm: Option<String>,
        /// Skip the invertibility check of the inverse path
        #[arg(long)]
        no_check: bool,
        #[arg(long, default_value_t = hpoly::cfg::DEFAULT_COND_TOL)]
        cond_tol: f64,
        /// Treat the matrix as sparse
        #[arg(long)]
        sparse: bool,
    },
    /// Chebyshev center and inscribed radius
    Chebyshev {
        #[arg(long)]
        poly: PathBuf,
    },
    /// Coordinates that appear in some constraint
    ConstrainedDims {
        #[arg(long)]
        poly: PathBuf,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.debug { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let cfg = FieldCfg::float();
    let doc = match cmd.action {
        Action::Contains { poly, point } => {
            let set = io::read_set(&poly)?;
            let x = DVector::from_vec(point);
            let inside = contains(&x, &set, &cfg).context("membership test")?;
            json!({ "contains": inside })
        }
        Action::Reduce { poly } => {
            let mut set = io::read_set(&poly)?;
            let before = set.constraints.len();
            let completed = remove_redundant(&mut set.constraints, &cfg).context("redundancy removal")?;
            tracing::info!(before, after = set.constraints.len(), completed, "reduce");
            let mut doc = io::constraints_json(&set.constraints);
            doc["kind"] = json!(io::kind_name(set.kind));
            doc["dim"] = json!(set.dim);
            doc["removed"] = json!(before - set.constraints.len());
            doc["infeasible"] = json!(!completed);
            doc
        }
        Action::Map {
            poly,
            matrix,
            algorithm,
            no_check,
            cond_tol,
            sparse,
        } => {
            let set = io::read_set(&poly)?;
            let dense = io::read_matrix(&matrix)?;
            let m = if sparse {
                MapMatrix::Sparse(SparseMatrix::from_dense(&dense, &cfg))
            } else {
                MapMatrix::Dense(dense)
            };
            let algorithm = algorithm
                .as_deref()
                .map(|s| s.parse::<MapAlgorithm>())
                .transpose()?;
            let options = LinearMapOptions {
                algorithm,
                check_invertibility: !no_check,
                cond_tol,
                inverse: None,
            };
            let img = linear_map(&m, &set, &options, &cfg).context("linear map")?;
            io::mapped_json(&img)
        }
        Action::Chebyshev { poly } => {
            let set = io::read_set(&poly)?;
            let (center, radius) = chebyshev_center_radius(&set, &cfg).context("Chebyshev center")?;
            json!({
                "center": center.iter().copied().collect::<Vec<f64>>(),
                "radius": radius,
            })
        }
        Action::ConstrainedDims { poly } => {
            let set = io::read_set(&poly)?;
            json!({ "dims": constrained_dimensions::<f64, _>(&set) })
        }
    };
    io::emit(&doc, cmd.out.as_deref())
}
