//! Alignment and scoring of a candidate series against a reference
//!
//! The candidate is resampled onto the reference time base by piecewise-linear
//! interpolation (values outside the candidate's time range clamp to its
//! boundary values), then scored with the RMS error normalised by the RMS of
//! the reference:
//!
//! ```text
//!   err = sqrt(mean((cand_i - ref_i)^2)) / sqrt(mean(ref_i^2))
//! ```
//!
//! When the reference RMS is exactly zero the metric falls back to the
//! unnormalised RMS of the candidate. In that case the error carries the
//! signal's units instead of being a ratio; see [`ComparisonResult::normalized`].

use crate::error::{RegressError, Result};
use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// PASS/FAIL classification of one comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Outcome of scoring one candidate against one reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Samples on the reference time base
    pub sample_count: usize,
    /// RMS relative error (or candidate RMS when the reference is all zeros)
    pub error: f64,
    pub tolerance: f64,
    pub passed: bool,
    /// False when the zero-reference fallback was used
    pub normalized: bool,
}

impl ComparisonResult {
    pub fn verdict(&self) -> Verdict {
        if self.passed {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// One-line report: `PASS | label | N=.. | RMSrel=.. | tol=..`
    pub fn summary_line(&self, label: &str) -> String {
        format!(
            "{} | {} | N={} | RMSrel={:.6} | tol={:.6}",
            self.verdict(),
            label,
            self.sample_count,
            self.error,
            self.tolerance
        )
    }
}

/// Curves an external renderer needs for a two-line comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub title: String,
    pub unit_label: String,
    /// Reference time base
    pub time: Vec<f64>,
    pub reference: Vec<f64>,
    /// Candidate resampled onto `time`
    pub candidate: Vec<f64>,
    /// Dataset the candidate came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_source: Option<String>,
    /// Dataset the reference came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_source: Option<String>,
}

impl PlotData {
    /// (min, max) over both curves, ignoring NaN
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.reference
            .iter()
            .chain(&self.candidate)
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Alignment plus score for one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedComparison {
    pub result: ComparisonResult,
    pub plot: PlotData,
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`
///
/// `xp` must be non-decreasing. Points left of `xp[0]` take `fp[0]`, points
/// right of the last sample take the last value.
pub fn interpolate(x: &[f64], xp: &[f64], fp: &[f64]) -> Result<Vec<f64>> {
    if xp.is_empty() || xp.len() != fp.len() {
        return Err(RegressError::InsufficientData(format!(
            "cannot interpolate from {} time samples and {} values",
            xp.len(),
            fp.len()
        )));
    }
    let last = xp.len() - 1;

    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return Ok(fp[0]);
            }
            if xi >= xp[last] {
                return Ok(fp[last]);
            }
            // First sample strictly after xi; 1..=last unless xi or xp holds NaN
            let hi = xp.partition_point(|&t| t <= xi);
            if hi == 0 || hi > last {
                return Err(RegressError::InsufficientData(format!(
                    "cannot place t={xi} on the candidate time base"
                )));
            }
            let lo = hi - 1;
            let span = xp[hi] - xp[lo];
            let frac = (xi - xp[lo]) / span;
            Ok(fp[lo] + frac * (fp[hi] - fp[lo]))
        })
        .collect()
}

/// Root mean square
fn rms(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v * v, n + 1));
    if n == 0 {
        0.0
    } else {
        (sum / n as f64).sqrt()
    }
}

/// RMS error of `candidate` relative to `reference` (same length)
///
/// Returns the error and whether it was normalised.
pub fn rms_relative_error(reference: &[f64], candidate: &[f64]) -> (f64, bool) {
    let ref_rms = rms(reference.iter().copied());
    if ref_rms == 0.0 {
        return (rms(candidate.iter().copied()), false);
    }
    let diff = rms(candidate.iter().zip(reference).map(|(c, r)| c - r));
    (diff / ref_rms, true)
}

/// Score `candidate` against `reference`
///
/// PASS iff the error is `<= tolerance`. The tolerance is whatever the caller
/// passes; this function has no default.
pub fn compare(
    reference: &TimeSeries,
    candidate: &TimeSeries,
    tolerance: f64,
) -> Result<ComparisonResult> {
    align(reference, candidate, tolerance, "", "").map(|a| a.result)
}

/// [`compare`] plus the aligned curves for plotting
pub fn align(
    reference: &TimeSeries,
    candidate: &TimeSeries,
    tolerance: f64,
    title: &str,
    unit_label: &str,
) -> Result<AlignedComparison> {
    if reference.is_empty() {
        return Err(RegressError::InsufficientData(
            "reference series is empty".to_string(),
        ));
    }
    if candidate.is_empty() {
        return Err(RegressError::InsufficientData(
            "candidate series is empty".to_string(),
        ));
    }

    let resampled = interpolate(reference.time(), candidate.time(), candidate.values())?;
    let (error, normalized) = rms_relative_error(reference.values(), &resampled);
    if !normalized {
        tracing::warn!(
            error,
            "reference RMS is zero; reporting unnormalised candidate RMS"
        );
    }

    let result = ComparisonResult {
        sample_count: reference.len(),
        error,
        tolerance,
        passed: error <= tolerance,
        normalized,
    };
    tracing::debug!(?result, "comparison scored");

    Ok(AlignedComparison {
        result,
        plot: PlotData {
            title: title.to_string(),
            unit_label: unit_label.to_string(),
            time: reference.time().to_vec(),
            reference: reference.values().to_vec(),
            candidate: resampled,
            candidate_source: None,
            reference_source: None,
        },
    })
}
