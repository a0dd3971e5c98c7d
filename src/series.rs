//! Time series, named signals and signal bundles

use crate::error::{RegressError, Result};

/// Ordered `(time, value)` samples with non-decreasing time
///
/// Sampling may be non-uniform. Each extraction produces its own series;
/// nothing is shared between loader and adapter call sites.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series, checking equal lengths and finite, non-decreasing time
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if time.len() != values.len() {
            return Err(RegressError::malformed(
                "time series",
                format!(
                    "time has {} samples but values has {}",
                    time.len(),
                    values.len()
                ),
            ));
        }

        if let Some(i) = time.iter().position(|t| !t.is_finite()) {
            return Err(RegressError::malformed(
                "time series",
                format!("non-finite time {} at sample {}", time[i], i),
            ));
        }

        if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(RegressError::malformed(
                "time series",
                format!(
                    "time decreases at sample {} ({} -> {})",
                    i + 1,
                    time[i],
                    time[i + 1]
                ),
            ));
        }

        Ok(Self { time, values })
    }

    /// Build a series from `(time, value)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let (time, values) = pairs.into_iter().unzip();
        Self::new(time, values)
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Iterate over `(time, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }

    /// Same time base, every value multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            time: self.time.clone(),
            values: self.values.iter().map(|v| v * factor).collect(),
        }
    }
}

/// A time series with the axis label it should be plotted under
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSignal {
    pub series: TimeSeries,
    /// e.g. "Pitch (rad)", "Heave (m)"
    pub unit_label: String,
    /// Container dataset the values were read from, when known
    pub source: Option<String>,
}

impl NamedSignal {
    pub fn new(series: TimeSeries, unit_label: impl Into<String>) -> Self {
        Self {
            series,
            unit_label: unit_label.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Named signals compared together for one test variant
///
/// Insertion order is preserved; the first entry is the primary signal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalBundle {
    entries: Vec<(String, NamedSignal)>,
}

impl SignalBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signal, replacing an existing one with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, signal: NamedSignal) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = signal;
        } else {
            self.entries.push((name, signal));
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamedSignal> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// First inserted signal
    pub fn primary(&self) -> Option<(&str, &NamedSignal)> {
        self.entries.first().map(|(n, s)| (n.as_str(), s))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedSignal)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
