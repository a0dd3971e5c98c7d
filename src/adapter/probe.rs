//! Ordered candidate-path probing
//!
//! Result files from different solver versions put the same quantity under
//! different paths. Each adapter lists its candidates in priority order and
//! the first dataset that is present and has a usable shape wins.

use super::orientation::QuaternionDecode;
use super::Quantity;
use crate::container::{Dataset, ResultContainer};
use crate::error::{RegressError, Result};
use crate::series::{NamedSignal, TimeSeries};

/// Time vector candidates, tried in order
pub const TIME_CANDIDATES: &[&str] = &["/results/time/time", "/results/time", "/time"];

/// Placeholder replaced by the body name in path templates
const BODY: &str = "{body}";

/// One way of obtaining a signal from a result container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalSource {
    /// Small-angle orientation field; column 1 is the in-plane rotation
    AngleField { paths: &'static [&'static str] },

    /// `[w, x, y, z]` quaternion decoded to pitch
    Quaternion {
        paths: &'static [&'static str],
        decode: QuaternionDecode,
    },

    /// Position field; multi-column data is reduced to the quantity's axis
    Position {
        paths: &'static [&'static str],
        quantity: Quantity,
    },
}

impl SignalSource {
    fn paths(&self) -> &'static [&'static str] {
        match self {
            SignalSource::AngleField { paths }
            | SignalSource::Quaternion { paths, .. }
            | SignalSource::Position { paths, .. } => paths,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SignalSource::AngleField { .. } | SignalSource::Quaternion { .. } => {
                Quantity::Pitch.unit_label()
            }
            SignalSource::Position { quantity, .. } => quantity.unit_label(),
        }
    }

    /// Values from `dataset`, or `None` when its shape does not fit this source
    fn values_from(&self, dataset: &Dataset) -> Option<Vec<f64>> {
        match self {
            SignalSource::AngleField { .. } => {
                if dataset.ndim() == 2 && dataset.cols() >= 2 {
                    dataset.column(1)
                } else {
                    None
                }
            }
            SignalSource::Quaternion { decode, .. } => {
                if dataset.ndim() != 2 || !decode.accepts_width(dataset.cols()) {
                    return None;
                }
                let rows = dataset.shape()[0];
                (0..rows)
                    .map(|i| {
                        dataset
                            .row(i)
                            .map(|r| decode.pitch([r[0], r[1], r[2], r[3]]))
                    })
                    .collect()
            }
            SignalSource::Position { quantity, .. } => match dataset.ndim() {
                1 => Some(dataset.flatten()),
                2 => quantity.axis().and_then(|axis| dataset.column(axis)),
                _ => None,
            },
        }
    }
}

/// Substitute the body name into a path template
pub fn expand(template: &str, body: &str) -> String {
    template.replace(BODY, body)
}

/// First time vector present among [`TIME_CANDIDATES`]
pub fn find_time(container: &dyn ResultContainer) -> Result<Vec<f64>> {
    for path in TIME_CANDIDATES {
        if let Some(ds) = container.dataset(path)? {
            tracing::debug!(path, samples = ds.flatten().len(), "time vector found");
            return Ok(ds.flatten());
        }
    }
    Err(RegressError::TimeVectorNotFound {
        tried: TIME_CANDIDATES.iter().map(|p| p.to_string()).collect(),
    })
}

/// Resolve a signal for `body` from the first source that yields data
///
/// Sources are tried in order, and within each source its paths in order.
pub fn resolve(
    container: &dyn ResultContainer,
    time: &[f64],
    sources: &[SignalSource],
    body: &str,
    variant: &str,
) -> Result<NamedSignal> {
    for source in sources {
        for template in source.paths() {
            let path = expand(template, body);
            let Some(dataset) = container.dataset(&path)? else {
                continue;
            };
            match source.values_from(&dataset) {
                Some(values) => {
                    tracing::debug!(%path, label = source.label(), "signal resolved");
                    let series = TimeSeries::new(time.to_vec(), values)?;
                    return Ok(NamedSignal::new(series, source.label()).with_source(path));
                }
                None => {
                    tracing::debug!(%path, shape = ?dataset.shape(), "shape not usable, skipping");
                }
            }
        }
    }

    Err(RegressError::SignalNotFound {
        body: body.to_string(),
        variant: variant.to_string(),
    })
}
