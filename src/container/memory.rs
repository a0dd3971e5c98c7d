use super::{Dataset, ResultContainer};
use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// In-memory container keyed by absolute dataset path
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    source: PathBuf,
    datasets: BTreeMap<String, Dataset>,
}

impl MemoryContainer {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            datasets: BTreeMap::new(),
        }
    }

    /// Add a dataset; paths are normalised to a single leading slash
    pub fn insert(&mut self, path: &str, dataset: Dataset) {
        self.datasets.insert(normalize(path), dataset);
    }

    /// Builder form of [`MemoryContainer::insert`]
    pub fn with(mut self, path: &str, dataset: Dataset) -> Self {
        self.insert(path, dataset);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}

impl ResultContainer for MemoryContainer {
    fn dataset(&self, path: &str) -> Result<Option<Dataset>> {
        Ok(self.datasets.get(&normalize(path)).cloned())
    }

    fn source(&self) -> &Path {
        &self.source
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}
