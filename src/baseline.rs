//! Reference ("baseline") series persisted as plain text
//!
//! Format:
//!
//! ```text
//! # time value
//! 0.000000000 0.500000000
//! 0.010000000 0.499876543
//! ```
//!
//! Reading is lenient about layout (whitespace or commas, `#` comments,
//! extra columns); writing always produces the two-column form above.
//! Baselines are only written on an explicit update request, and every write
//! goes to a temporary file in the target directory that is then renamed over
//! the destination, so a failed write never leaves a partial baseline.

use crate::error::{RegressError, Result};
use crate::series::TimeSeries;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Header comment written at the top of every text baseline
pub const HEADER: &str = "# time value";

/// Split a line into numeric tokens, ignoring anything after `#`
fn numeric_tokens(line: &str) -> Vec<f64> {
    let content = line.split('#').next().unwrap_or("");
    content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| tok.parse::<f64>().ok())
        .collect()
}

/// Parse reference text into a series
///
/// Rows with fewer than two numeric tokens are skipped. Column 0 is time;
/// `column` selects the value, falling back to column 1 when the row is too
/// short for it.
pub fn parse_reference(text: &str, column: usize) -> Vec<(f64, f64)> {
    text.lines()
        .map(numeric_tokens)
        .filter(|tokens| tokens.len() >= 2)
        .map(|tokens| {
            let value = tokens.get(column).copied().unwrap_or(tokens[1]);
            (tokens[0], value)
        })
        .collect()
}

/// Read a text reference file
pub fn read(path: &Path, column: usize) -> Result<TimeSeries> {
    let text = fs::read_to_string(path).map_err(|e| RegressError::io(path, e))?;
    let pairs = parse_reference(&text, column);
    if pairs.is_empty() {
        return Err(RegressError::EmptyReference {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), rows = pairs.len(), column, "reference loaded");
    TimeSeries::from_pairs(pairs)
}

/// Write `series` as a text baseline, replacing `path` atomically
pub fn write(path: &Path, series: &TimeSeries) -> Result<()> {
    let mut tmp = temp_beside(path)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        writeln!(out, "{HEADER}").map_err(|e| RegressError::io(path, e))?;
        for (t, v) in series.iter() {
            writeln!(out, "{t:.9} {v:.9}").map_err(|e| RegressError::io(path, e))?;
        }
        out.flush().map_err(|e| RegressError::io(path, e))?;
    }
    persist(tmp, path)?;
    tracing::info!(path = %path.display(), samples = series.len(), "baseline written");
    Ok(())
}

/// Copy a result container into place as the new hierarchical baseline
pub fn adopt_container(source: &Path, dest: &Path) -> Result<()> {
    let mut input = fs::File::open(source).map_err(|e| RegressError::io(source, e))?;
    let mut tmp = temp_beside(dest)?;
    std::io::copy(&mut input, tmp.as_file_mut()).map_err(|e| RegressError::io(dest, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| RegressError::io(dest, e))?;
    persist(tmp, dest)?;
    tracing::info!(
        source = %source.display(),
        dest = %dest.display(),
        "container baseline adopted"
    );
    Ok(())
}

fn temp_beside(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RegressError::io(dir, e))?;
    NamedTempFile::new_in(dir).map_err(|e| RegressError::io(dir, e))
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .map(|_| ())
        .map_err(|e| RegressError::io(path, e.error))
}
