// Suite configuration and case layout
//
// Defaults live here and are threaded into each run through `CaseSettings`;
// nothing downstream reads ambient state.

use crate::adapter::{ModelKind, ModelVariant, TestVariant};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// RMS relative error accepted when nothing else is configured
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Value column of a text reference when nothing else is configured
pub const DEFAULT_REFERENCE_COLUMN: usize = 1;

/// Regression suite configuration
///
/// # Example TOML
/// ```toml
/// root = "tests/regression"
/// tolerance = 0.02
/// legacy_reference_dir = "reference_data"
///
/// [[case]]
/// model = "rm3"
/// variant = "decay"
/// tolerance = 0.05
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Directory holding `<model>/<variant>/` case trees
    pub root: PathBuf,

    /// Default tolerance for every case without its own
    pub tolerance: f64,

    /// Default value column for text references
    pub reference_column: usize,

    /// Write `PlotData` JSON next to each case's outputs
    pub write_plot_data: bool,

    /// Older `<model>/<variant>/hc_ref_<model>_<variant>.txt` reference tree,
    /// consulted after each case's `expected/` directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_reference_dir: Option<PathBuf>,

    /// Explicit case list; the built-in catalog is used when absent
    #[serde(rename = "case", skip_serializing_if = "Option::is_none")]
    pub cases: Option<Vec<CaseConfig>>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            tolerance: DEFAULT_TOLERANCE,
            reference_column: DEFAULT_REFERENCE_COLUMN,
            write_plot_data: true,
            legacy_reference_dir: None,
            cases: None,
        }
    }
}

/// One `[[case]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseConfig {
    pub model: ModelKind,
    pub variant: TestVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_column: Option<usize>,
    /// Result file, relative to `root` unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PathBuf>,
    /// Reference file, relative to `root` unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,
}

impl CaseConfig {
    pub fn new(model: ModelKind, variant: impl Into<TestVariant>) -> Self {
        Self {
            model,
            variant: variant.into(),
            tolerance: None,
            reference_column: None,
            result: None,
            reference: None,
        }
    }

    pub fn id(&self) -> ModelVariant {
        ModelVariant::new(self.model, self.variant.clone())
    }
}

/// The six decay cases shipped with the regression tree
pub fn builtin_cases() -> Vec<CaseConfig> {
    vec![
        CaseConfig::new(ModelKind::IeaSphere, "decay"),
        CaseConfig::new(ModelKind::Oswec, "decay"),
        CaseConfig::new(ModelKind::Rm3, "decay"),
        CaseConfig::new(ModelKind::F3of, "decay_dt1"),
        CaseConfig::new(ModelKind::F3of, "decay_dt2"),
        CaseConfig::new(ModelKind::F3of, "decay_dt3"),
    ]
}

impl SuiteConfig {
    /// Load and validate a TOML configuration file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite config: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid suite config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), cases = config.cases().len(), "suite config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SuiteConfig =
            toml::from_str(content).context("Failed to parse TOML suite config")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        check_tolerance("tolerance", self.tolerance)?;

        if let Some(cases) = &self.cases {
            if cases.is_empty() {
                return Err("case list is present but empty".to_string());
            }
            for case in cases {
                if let Some(tol) = case.tolerance {
                    check_tolerance(&format!("tolerance of {}", case.id()), tol)?;
                }
            }
        }

        Ok(())
    }

    /// Configured cases, or the built-in catalog
    pub fn cases(&self) -> Vec<CaseConfig> {
        self.cases.clone().unwrap_or_else(builtin_cases)
    }

    /// Cases matching `wanted`, in the order requested
    ///
    /// A wanted pair missing from the configured list still runs, with the
    /// suite defaults and the standard layout.
    pub fn select(&self, wanted: &[ModelVariant]) -> Vec<CaseConfig> {
        let known = self.cases();
        wanted
            .iter()
            .map(|id| {
                known
                    .iter()
                    .find(|c| c.id() == *id)
                    .cloned()
                    .unwrap_or_else(|| CaseConfig::new(id.model, id.variant.clone()))
            })
            .collect()
    }

    /// Force one tolerance on the suite and every case
    pub fn override_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
        if let Some(cases) = &mut self.cases {
            for case in cases {
                case.tolerance = None;
            }
        }
    }

    /// Resolve everything a single run needs
    pub fn settings(&self, case: &CaseConfig) -> CaseSettings {
        let anchor = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.root.join(p)
            }
        };
        let mut layout = CaseLayout::new(&self.root, case.model, &case.variant);
        if let Some(dir) = &self.legacy_reference_dir {
            layout = layout.with_legacy_root(&anchor(dir));
        }

        CaseSettings {
            case: case.id(),
            tolerance: case.tolerance.unwrap_or(self.tolerance),
            reference_column: case.reference_column.unwrap_or(self.reference_column),
            result: case.result.as_ref().map(&anchor),
            reference: case.reference.as_ref().map(&anchor),
            write_plot_data: self.write_plot_data,
            layout,
        }
    }
}

fn check_tolerance(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "{name} must be a finite non-negative number, got {value}"
        ));
    }
    Ok(())
}

/// Fully resolved inputs for one (model, variant) run
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSettings {
    pub case: ModelVariant,
    pub tolerance: f64,
    pub reference_column: usize,
    /// Explicit result path, overriding the layout
    pub result: Option<PathBuf>,
    /// Explicit reference path, overriding the layout
    pub reference: Option<PathBuf>,
    pub write_plot_data: bool,
    pub layout: CaseLayout,
}

impl CaseSettings {
    /// Result file to read, if one exists
    pub fn result_path(&self) -> Option<PathBuf> {
        match &self.result {
            Some(p) => p.exists().then(|| p.clone()),
            None => self.layout.find_result(),
        }
    }

    /// Reference file to read, if one exists
    pub fn reference_path(&self) -> Option<PathBuf> {
        match &self.reference {
            Some(p) => p.exists().then(|| p.clone()),
            None => self.layout.find_reference(),
        }
    }
}

/// Fixed file layout of one case directory
///
/// ```text
/// <root>/<model>/<variant>/
///   outputs/results.still.{h5,json}
///   outputs/plots/
///   expected/baseline.{h5,json}
///   expected/hc_ref_<model>_<variant>.txt
/// <legacy>/<model>/<variant>/hc_ref_<model>_<variant>.txt   (optional)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseLayout {
    dir: PathBuf,
    model: ModelKind,
    variant: TestVariant,
    legacy_reference: Option<PathBuf>,
}

impl CaseLayout {
    pub fn new(root: &Path, model: ModelKind, variant: &TestVariant) -> Self {
        Self {
            dir: root.join(model.as_str()).join(variant.as_str()),
            model,
            variant: variant.clone(),
            legacy_reference: None,
        }
    }

    /// Also look for a text reference under an older reference tree
    pub fn with_legacy_root(mut self, root: &Path) -> Self {
        self.legacy_reference = Some(
            root.join(self.model.as_str())
                .join(self.variant.as_str())
                .join(self.text_reference_name()),
        );
        self
    }

    fn text_reference_name(&self) -> String {
        format!("hc_ref_{}_{}.txt", self.model, self.variant)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Result candidates in priority order
    pub fn result_candidates(&self) -> Vec<PathBuf> {
        let outputs = self.dir.join("outputs");
        vec![
            outputs.join("results.still.h5"),
            outputs.join("results.still.json"),
        ]
    }

    /// Reference candidates in priority order
    pub fn reference_candidates(&self) -> Vec<PathBuf> {
        let expected = self.dir.join("expected");
        let mut candidates = vec![
            expected.join("baseline.h5"),
            expected.join("baseline.json"),
            self.text_reference(),
        ];
        candidates.extend(self.legacy_reference.clone());
        candidates
    }

    /// Where a text baseline for this case lives
    pub fn text_reference(&self) -> PathBuf {
        self.dir.join("expected").join(self.text_reference_name())
    }

    /// Where a container baseline copied from `result` lives
    pub fn container_reference(&self, result: &Path) -> PathBuf {
        let ext = result
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json");
        self.dir.join("expected").join(format!("baseline.{ext}"))
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.dir.join("outputs").join("plots")
    }

    pub fn find_result(&self) -> Option<PathBuf> {
        self.result_candidates().into_iter().find(|p| p.exists())
    }

    pub fn find_reference(&self) -> Option<PathBuf> {
        self.reference_candidates().into_iter().find(|p| p.exists())
    }
}
