//! JSON hierarchical container
//!
//! Objects are groups; numeric arrays are rank-1 datasets; arrays of equal
//! length numeric arrays are rank-2 datasets.
//!
//! ```json
//! {
//!   "results": {
//!     "time": { "time": [0.0, 0.01, 0.02] },
//!     "model": { "bodies": { "body1": { "position": [[0, 0, -0.5], ...] } } }
//!   }
//! }
//! ```

use super::{Dataset, ResultContainer};
use crate::error::{RegressError, Result};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonContainer {
    source: PathBuf,
    root: JsonValue,
}

impl JsonContainer {
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RegressError::io(path, e))?;
        let root: JsonValue = serde_json::from_str(&text).map_err(|e| RegressError::Container {
            path: path.to_path_buf(),
            reason: format!("parsing JSON: {e}"),
        })?;
        Ok(Self::from_value(path, root))
    }

    pub fn from_value(source: impl Into<PathBuf>, root: JsonValue) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    fn lookup(&self, path: &str) -> Option<&JsonValue> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(&self.root, |node, part| node.as_object()?.get(part))
    }
}

impl ResultContainer for JsonContainer {
    fn dataset(&self, path: &str) -> Result<Option<Dataset>> {
        match self.lookup(path) {
            None | Some(JsonValue::Object(_)) => Ok(None),
            Some(JsonValue::Array(items)) => to_dataset(items, path).map(Some),
            Some(other) => Err(RegressError::malformed(
                format!("{}:{path}", self.source.display()),
                format!("expected an array, found {other}"),
            )),
        }
    }

    fn source(&self) -> &Path {
        &self.source
    }
}

fn to_dataset(items: &[JsonValue], path: &str) -> Result<Dataset> {
    if items.iter().all(JsonValue::is_array) && !items.is_empty() {
        let rows = items
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
                numbers(cells, &format!("{path}[{i}]"))
            })
            .collect::<Result<Vec<_>>>()?;
        return Dataset::from_rows(&rows);
    }
    Ok(Dataset::vector(numbers(items, path)?))
}

fn numbers(items: &[JsonValue], path: &str) -> Result<Vec<f64>> {
    items
        .iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64().ok_or_else(|| {
                RegressError::malformed(path.to_string(), format!("element {j} is not a number"))
            })
        })
        .collect()
}
