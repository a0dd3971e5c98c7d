//! Hierarchical result containers
//!
//! Result files store datasets under slash-separated paths rooted at
//! `/results/...`. Adapters only ever ask "is there a dataset at this path, and
//! if so what is in it", so every backend is reduced to [`ResultContainer`].
//!
//! ```text
//!  results.still.h5 / results.still.json
//!        │
//!        ▼
//!  ┌──────────────────┐
//!  │ ResultContainer   │  dataset("/results/model/bodies/body1/position")
//!  └──────────────────┘
//!        │
//!        ▼
//!     Dataset { shape: [N, 3], data: row-major f64 }
//! ```

mod json;
mod memory;

#[cfg(feature = "hdf5")]
mod h5;

pub use json::JsonContainer;
pub use memory::MemoryContainer;

#[cfg(feature = "hdf5")]
pub use h5::Hdf5Container;

use crate::error::{RegressError, Result};
use std::path::Path;

/// Dense numeric dataset of rank 1 or 2, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Dataset {
    /// Rank-1 dataset
    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Rank-2 dataset from row-major data
    pub fn matrix(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows * cols != data.len() {
            return Err(RegressError::malformed(
                "dataset",
                format!(
                    "shape ({rows}, {cols}) needs {} values, got {}",
                    rows * cols,
                    data.len()
                ),
            ));
        }
        Ok(Self {
            shape: vec![rows, cols],
            data,
        })
    }

    /// Rank-2 dataset from rows of equal length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(i) = rows.iter().position(|r| r.len() != cols) {
            return Err(RegressError::malformed(
                "dataset",
                format!("row {i} has {} columns, expected {cols}", rows[i].len()),
            ));
        }
        Self::matrix(rows.len(), cols, rows.concat())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of columns for rank 2, 1 otherwise
    pub fn cols(&self) -> usize {
        if self.shape.len() >= 2 {
            self.shape[1..].iter().product()
        } else {
            1
        }
    }

    /// Column `index` of a rank-2 dataset
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if self.ndim() != 2 || index >= self.cols() {
            return None;
        }
        let cols = self.cols();
        Some(
            self.data
                .chunks_exact(cols)
                .map(|row| row[index])
                .collect(),
        )
    }

    /// Row `index` of a rank-2 dataset
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if self.ndim() != 2 {
            return None;
        }
        self.data.chunks_exact(self.cols()).nth(index)
    }

    /// All values in storage order (numpy `reshape(-1)`)
    pub fn flatten(&self) -> Vec<f64> {
        self.data.clone()
    }
}

/// Read-only access to datasets addressed by slash-separated paths
pub trait ResultContainer {
    /// Dataset at `path`, or `None` when the path is absent or names a group
    fn dataset(&self, path: &str) -> Result<Option<Dataset>>;

    /// Source the container was opened from, for error messages
    fn source(&self) -> &Path;

    /// Whether a dataset exists at `path`
    fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.dataset(path)?.is_some())
    }
}

/// Open a container, choosing the backend by file extension
pub fn open_container(path: &Path) -> Result<Box<dyn ResultContainer>> {
    match extension(path).as_str() {
        "json" => Ok(Box::new(JsonContainer::open(path)?)),
        "h5" | "hdf5" => open_hdf5(path),
        other => Err(RegressError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("'.{other}' is not a hierarchical container"),
        }),
    }
}

/// Whether `path` has an extension handled by [`open_container`]
pub fn is_container_path(path: &Path) -> bool {
    matches!(extension(path).as_str(), "json" | "h5" | "hdf5")
}

#[cfg(feature = "hdf5")]
fn open_hdf5(path: &Path) -> Result<Box<dyn ResultContainer>> {
    Ok(Box::new(Hdf5Container::open(path)?))
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(path: &Path) -> Result<Box<dyn ResultContainer>> {
    Err(RegressError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: "built without the `hdf5` feature".to_string(),
    })
}

pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}
