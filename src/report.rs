//! Plot-data payloads and human-readable report lines
//!
//! The chart itself is drawn by an external renderer; this module only
//! persists the aligned curves it needs as JSON.

use crate::compare::PlotData;
use crate::error::{RegressError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name for a comparison payload; bundle members get their own file
pub fn plot_file_name(signal: Option<&str>) -> String {
    match signal {
        Some(name) => format!("comparison_{name}.json"),
        None => "comparison.json".to_string(),
    }
}

/// Serialize `plot` into `dir`, returning the written path
pub fn write_plot_data(dir: &Path, signal: Option<&str>, plot: &PlotData) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| RegressError::io(dir, e))?;
    let path = dir.join(plot_file_name(signal));
    let json = serde_json::to_string_pretty(plot)
        .map_err(|e| RegressError::malformed("plot data", e.to_string()))?;
    fs::write(&path, json).map_err(|e| RegressError::io(&path, e))?;
    tracing::debug!(path = %path.display(), samples = plot.time.len(), "plot data written");
    Ok(path)
}

/// `--show` line: where the payload went and the curve extents
pub fn show_line(path: &Path, plot: &PlotData) -> String {
    let extent = match plot.value_range() {
        Some((lo, hi)) => format!("{lo:.6} .. {hi:.6}"),
        None => "empty".to_string(),
    };
    let span = match (plot.time.first(), plot.time.last()) {
        (Some(t0), Some(t1)) => format!("t={t0:.3}..{t1:.3}"),
        _ => "t=empty".to_string(),
    };
    let mut line = format!(
        "PLOT | {} | {} | {} | {} [{}]",
        plot.title,
        path.display(),
        span,
        plot.unit_label,
        extent
    );
    if plot.candidate_source.is_some() || plot.reference_source.is_some() {
        let src = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".to_string());
        line.push_str(&format!(
            " | sim={} ref={}",
            src(&plot.candidate_source),
            src(&plot.reference_source)
        ));
    }
    line
}
