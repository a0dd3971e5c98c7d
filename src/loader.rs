//! Generic time/value extraction from result and reference files
//!
//! No knowledge of which physical signal is wanted: the caller says where the
//! time and value live through a [`SeriesLocator`]. Dispatch is by extension.
//!
//! Supported formats:
//! * `.h5` / `.hdf5` / `.json` – hierarchical container; `time_path` and
//!   `value_path` required, `value_column` picks a column of a 2-D value set
//! * `.csv` – comma separated numeric table, `#` comments
//! * `.txt` / `.dat` / `.tsv` / `.out` – whitespace or comma separated table
//! * `.npy` – `(N, 2)` or `(2, N)` float64 array
//! * `.npz` – named arrays, `time_key` and `value_key` required

use crate::container::{extension, open_container, Dataset};
use crate::error::{RegressError, Result};
use crate::series::TimeSeries;
use std::fs;
use std::path::Path;

/// Format-specific hints telling the loader where the series lives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesLocator {
    /// Container: time dataset path
    pub time_path: Option<String>,
    /// Container: value dataset path
    pub value_path: Option<String>,
    /// Text: time column (default 0)
    pub time_column: Option<usize>,
    /// Text: value column (default 1). Container: column of a 2-D value set
    pub value_column: Option<usize>,
    /// npz: time array name
    pub time_key: Option<String>,
    /// npz: value array name
    pub value_key: Option<String>,
}

impl SeriesLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container dataset paths
    pub fn datasets(time_path: impl Into<String>, value_path: impl Into<String>) -> Self {
        Self {
            time_path: Some(time_path.into()),
            value_path: Some(value_path.into()),
            ..Self::default()
        }
    }

    /// npz array names
    pub fn keys(time_key: impl Into<String>, value_key: impl Into<String>) -> Self {
        Self {
            time_key: Some(time_key.into()),
            value_key: Some(value_key.into()),
            ..Self::default()
        }
    }

    pub fn with_time_column(mut self, column: usize) -> Self {
        self.time_column = Some(column);
        self
    }

    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = Some(column);
        self
    }
}

/// Load a time series from `path` using `locator`
pub fn load_series(path: &Path, locator: &SeriesLocator) -> Result<TimeSeries> {
    let ext = extension(path);
    tracing::debug!(path = %path.display(), format = %ext, "loading series");

    match ext.as_str() {
        "h5" | "hdf5" | "json" => load_container(path, locator),
        "csv" => load_csv(path, locator),
        "txt" | "dat" | "tsv" | "out" => load_text(path, locator),
        "npy" => load_npy(path),
        "npz" => load_npz(path, locator),
        other => Err(RegressError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("unrecognized extension '.{other}'"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Hierarchical containers
// ---------------------------------------------------------------------------

fn load_container(path: &Path, locator: &SeriesLocator) -> Result<TimeSeries> {
    let (Some(time_path), Some(value_path)) = (&locator.time_path, &locator.value_path) else {
        return Err(RegressError::MissingLocator(format!(
            "{} needs both a time dataset path and a value dataset path",
            path.display()
        )));
    };

    let container = open_container(path)?;
    let missing = |p: &str| {
        RegressError::malformed(path.display().to_string(), format!("no dataset at {p}"))
    };
    let time = container
        .dataset(time_path)?
        .ok_or_else(|| missing(time_path))?
        .flatten();
    let value_set = container
        .dataset(value_path)?
        .ok_or_else(|| missing(value_path))?;

    let values = match locator.value_column {
        Some(col) if value_set.ndim() >= 2 => value_set.column(col).ok_or_else(|| {
            RegressError::malformed(
                format!("{}:{value_path}", path.display()),
                format!("column {col} out of range for shape {:?}", value_set.shape()),
            )
        })?,
        _ => value_set.flatten(),
    };

    TimeSeries::new(time, values)
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Build a series from numeric rows, selecting time/value columns
fn from_rows(path: &Path, rows: Vec<Vec<f64>>, locator: &SeriesLocator) -> Result<TimeSeries> {
    let context = path.display().to_string();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() {
        return Err(RegressError::malformed(context, "no valid numeric rows"));
    }
    if width < 2 {
        return Err(RegressError::malformed(
            context,
            format!("need at least 2 numeric columns, found {width}"),
        ));
    }

    let tc = locator.time_column.unwrap_or(0);
    let vc = locator.value_column.unwrap_or(1);
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|r| Some((*r.get(tc)?, *r.get(vc)?)))
        .collect();
    if pairs.is_empty() {
        return Err(RegressError::malformed(
            context,
            format!("no row has columns {tc} and {vc}"),
        ));
    }
    TimeSeries::from_pairs(pairs)
}

/// Parse every token or drop the row
fn parse_row<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<Vec<f64>> {
    let row = tokens
        .map(|t| t.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    (!row.is_empty()).then_some(row)
}

fn load_csv(path: &Path, locator: &SeriesLocator) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| RegressError::malformed(path.display().to_string(), e.to_string()))?;

    let mut rows = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            RegressError::malformed(format!("{} row {row_no}", path.display()), e.to_string())
        })?;
        if let Some(row) = parse_row(record.iter().filter(|f| !f.is_empty())) {
            rows.push(row);
        }
    }
    from_rows(path, rows, locator)
}

fn load_text(path: &Path, locator: &SeriesLocator) -> Result<TimeSeries> {
    let text = fs::read_to_string(path).map_err(|e| RegressError::io(path, e))?;
    let rows = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            parse_row(
                line.split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|t| !t.is_empty()),
            )
        })
        .collect();
    from_rows(path, rows, locator)
}

// ---------------------------------------------------------------------------
// NumPy arrays
// ---------------------------------------------------------------------------

fn npy_error(path: &Path, e: impl std::fmt::Display) -> RegressError {
    RegressError::malformed(path.display().to_string(), e.to_string())
}

/// Read an npy payload into a rank-2 dataset, honouring Fortran order
fn npy_to_dataset<R: std::io::Read>(path: &Path, npy: npyz::NpyFile<R>) -> Result<Dataset> {
    let shape: Vec<usize> = npy.shape().iter().map(|&d| d as usize).collect();
    let fortran = matches!(npy.order(), npyz::Order::Fortran);
    let data: Vec<f64> = npy.into_vec::<f64>().map_err(|e| npy_error(path, e))?;

    match shape.as_slice() {
        [_] => Ok(Dataset::vector(data)),
        [rows, cols] if fortran => {
            let (rows, cols) = (*rows, *cols);
            let row_major = (0..rows)
                .flat_map(|i| (0..cols).map(move |j| (i, j)))
                .map(|(i, j)| data[j * rows + i])
                .collect();
            Dataset::matrix(rows, cols, row_major)
        }
        [rows, cols] => Dataset::matrix(*rows, *cols, data),
        other => Err(npy_error(
            path,
            format!("expected a 1-D or 2-D array, got shape {other:?}"),
        )),
    }
}

fn load_npy(path: &Path) -> Result<TimeSeries> {
    let bytes = fs::read(path).map_err(|e| RegressError::io(path, e))?;
    let npy = npyz::NpyFile::new(&bytes[..]).map_err(|e| npy_error(path, e))?;
    let ds = npy_to_dataset(path, npy)?;

    let (time, values) = match ds.shape() {
        [_, 2] => (ds.column(0), ds.column(1)),
        // (2, N): time is the first row
        [2, _] => (
            ds.row(0).map(<[f64]>::to_vec),
            ds.row(1).map(<[f64]>::to_vec),
        ),
        other => {
            return Err(npy_error(
                path,
                format!("expected an (N, 2) or (2, N) array, got shape {other:?}"),
            ))
        }
    };
    match (time, values) {
        (Some(t), Some(v)) => TimeSeries::new(t, v),
        _ => Err(npy_error(path, "array has no rows")),
    }
}

fn load_npz(path: &Path, locator: &SeriesLocator) -> Result<TimeSeries> {
    let (Some(time_key), Some(value_key)) = (&locator.time_key, &locator.value_key) else {
        return Err(RegressError::MissingLocator(format!(
            "{} needs both a time array key and a value array key",
            path.display()
        )));
    };

    let mut archive = npyz::npz::NpzArchive::open(path).map_err(|e| RegressError::io(path, e))?;
    let mut read_key = |key: &str| -> Result<Vec<f64>> {
        let npy = archive
            .by_name(key)
            .map_err(|e| npy_error(path, e))?
            .ok_or_else(|| npy_error(path, format!("no array named '{key}'")))?;
        npy.into_vec::<f64>().map_err(|e| npy_error(path, e))
    };
    let time = read_key(time_key)?;
    let values = read_key(value_key)?;
    TimeSeries::new(time, values)
}
