//! HDF5 result files (enabled with the `hdf5` feature)

use super::{Dataset, ResultContainer};
use crate::error::{RegressError, Result};
use std::path::{Path, PathBuf};

pub struct Hdf5Container {
    source: PathBuf,
    file: hdf5::File,
}

impl Hdf5Container {
    pub fn open(path: &Path) -> Result<Self> {
        let file = hdf5::File::open(path).map_err(|e| RegressError::Container {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: path.to_path_buf(),
            file,
        })
    }
}

impl ResultContainer for Hdf5Container {
    fn dataset(&self, path: &str) -> Result<Option<Dataset>> {
        if !self.file.link_exists(path) {
            return Ok(None);
        }
        // A link that is not a dataset is a group
        let Ok(ds) = self.file.dataset(path) else {
            return Ok(None);
        };

        let shape = ds.shape();
        let data = ds.read_raw::<f64>().map_err(|e| RegressError::Container {
            path: self.source.clone(),
            reason: format!("reading {path}: {e}"),
        })?;

        match shape.as_slice() {
            [] | [_] => Ok(Some(Dataset::vector(data))),
            [rows, rest @ ..] => {
                let cols = rest.iter().product();
                Dataset::matrix(*rows, cols, data).map(Some)
            }
        }
    }

    fn source(&self) -> &Path {
        &self.source
    }
}
