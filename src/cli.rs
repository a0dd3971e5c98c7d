//! CLI argument parsing for simregress

use crate::adapter::{ModelKind, ModelVariant};
use crate::loader::SeriesLocator;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simregress")]
#[command(version)]
#[command(
    about = "Regression comparison of simulation results against reference baselines",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run regression cases from the case tree
    Suite(SuiteArgs),
    /// Compare two arbitrary series files
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Run every configured case
    #[arg(long)]
    pub all: bool,

    /// IEA sphere decay
    #[arg(long = "sphere-decay")]
    pub sphere_decay: bool,

    /// OSWEC flap decay
    #[arg(long = "oswec-decay")]
    pub oswec_decay: bool,

    /// RM3 float/plate decay
    #[arg(long = "rm3-decay")]
    pub rm3_decay: bool,

    /// F3OF base surge decay
    #[arg(long = "f3of-dt1")]
    pub f3of_dt1: bool,

    /// F3OF base pitch decay
    #[arg(long = "f3of-dt2")]
    pub f3of_dt2: bool,

    /// F3OF fore/aft flap pitch decay
    #[arg(long = "f3of-dt3")]
    pub f3of_dt3: bool,

    /// Every F3OF decay case (dt1, dt2 and dt3)
    #[arg(long = "f3of")]
    pub f3of: bool,

    /// Additional case as MODEL/VARIANT (repeatable)
    #[arg(long = "case", value_name = "MODEL/VARIANT")]
    pub cases: Vec<ModelVariant>,

    /// Suite configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the regression case tree (overrides the config)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Older reference tree searched after each case's expected/ directory
    #[arg(long = "legacy-refs", value_name = "DIR")]
    pub legacy_refs: Option<PathBuf>,

    /// Tolerance for every case (overrides the config)
    #[arg(long = "tol", value_name = "X", value_parser = parse_tolerance)]
    pub tolerance: Option<f64>,

    /// Replace references with the current results after scoring
    #[arg(long = "update-baseline")]
    pub update_baseline: bool,

    /// Print plot-data locations and curve extents
    #[arg(long)]
    pub show: bool,

    /// Only print comparison lines
    #[arg(short, long)]
    pub quiet: bool,
}

/// Which cases a suite invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Cases(Vec<ModelVariant>),
    Nothing,
}

impl SuiteArgs {
    pub fn selection(&self) -> Selection {
        if self.all {
            return Selection::All;
        }

        let flags = [
            (self.sphere_decay, ModelKind::IeaSphere, "decay"),
            (self.oswec_decay, ModelKind::Oswec, "decay"),
            (self.rm3_decay, ModelKind::Rm3, "decay"),
            (self.f3of || self.f3of_dt1, ModelKind::F3of, "decay_dt1"),
            (self.f3of || self.f3of_dt2, ModelKind::F3of, "decay_dt2"),
            (self.f3of || self.f3of_dt3, ModelKind::F3of, "decay_dt3"),
        ];
        let mut picked: Vec<ModelVariant> = flags
            .into_iter()
            .filter(|(on, _, _)| *on)
            .map(|(_, model, variant)| ModelVariant::new(model, variant))
            .collect();
        for case in &self.cases {
            if !picked.contains(case) {
                picked.push(case.clone());
            }
        }

        if picked.is_empty() {
            Selection::Nothing
        } else {
            Selection::Cases(picked)
        }
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Reference file (.h5/.json/.csv/.txt/.npy/.npz)
    #[arg(long = "ref", value_name = "FILE")]
    pub reference: PathBuf,

    /// Simulation (candidate) file
    #[arg(long = "sim", value_name = "FILE")]
    pub simulation: PathBuf,

    #[arg(long = "ref-time-dset", value_name = "PATH")]
    pub ref_time_dset: Option<String>,
    #[arg(long = "ref-val-dset", value_name = "PATH")]
    pub ref_val_dset: Option<String>,
    /// Column of a 2-D reference value dataset
    #[arg(long = "ref-col", value_name = "N")]
    pub ref_col: Option<usize>,
    #[arg(long = "ref-time-col", value_name = "N")]
    pub ref_time_col: Option<usize>,
    #[arg(long = "ref-val-col", value_name = "N")]
    pub ref_val_col: Option<usize>,
    #[arg(long = "ref-npz-time-key", value_name = "KEY")]
    pub ref_npz_time_key: Option<String>,
    #[arg(long = "ref-npz-val-key", value_name = "KEY")]
    pub ref_npz_val_key: Option<String>,

    #[arg(long = "sim-time-dset", value_name = "PATH")]
    pub sim_time_dset: Option<String>,
    #[arg(long = "sim-val-dset", value_name = "PATH")]
    pub sim_val_dset: Option<String>,
    /// Column of a 2-D simulation value dataset
    #[arg(long = "sim-col", value_name = "N")]
    pub sim_col: Option<usize>,
    #[arg(long = "sim-time-col", value_name = "N")]
    pub sim_time_col: Option<usize>,
    #[arg(long = "sim-val-col", value_name = "N")]
    pub sim_val_col: Option<usize>,
    #[arg(long = "sim-npz-time-key", value_name = "KEY")]
    pub sim_npz_time_key: Option<String>,
    #[arg(long = "sim-npz-val-key", value_name = "KEY")]
    pub sim_npz_val_key: Option<String>,

    /// RMS relative error tolerance
    #[arg(long = "tol", value_name = "X", default_value = "0.02", value_parser = parse_tolerance)]
    pub tolerance: f64,

    /// Title stored with the plot data
    #[arg(long, default_value = "Comparison")]
    pub title: String,

    /// Axis label stored with the plot data
    #[arg(long, default_value = "Value")]
    pub ylabel: String,

    /// Directory for comparison.json
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub outdir: PathBuf,

    /// Print plot-data location and curve extents
    #[arg(long)]
    pub show: bool,
}

impl CompareArgs {
    pub fn reference_locator(&self) -> SeriesLocator {
        SeriesLocator {
            time_path: self.ref_time_dset.clone(),
            value_path: self.ref_val_dset.clone(),
            time_column: self.ref_time_col,
            value_column: self.ref_val_col.or(self.ref_col),
            time_key: self.ref_npz_time_key.clone(),
            value_key: self.ref_npz_val_key.clone(),
        }
    }

    pub fn simulation_locator(&self) -> SeriesLocator {
        SeriesLocator {
            time_path: self.sim_time_dset.clone(),
            value_path: self.sim_val_dset.clone(),
            time_column: self.sim_time_col,
            value_column: self.sim_val_col.or(self.sim_col),
            time_key: self.sim_npz_time_key.clone(),
            value_key: self.sim_npz_val_key.clone(),
        }
    }
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("tolerance must be finite and >= 0, got {s}"));
    }
    Ok(value)
}
