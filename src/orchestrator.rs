//! Drives one (model, variant) run from result file to report
//!
//! ```text
//!   NotRun ──extract──► Extracted ──align──► Aligned ──score──► Scored ──report──► Reported
//! ```
//!
//! A run never retries and never substitutes a default signal: any error
//! ends it in [`CaseOutcome::Errored`] together with the last state reached.
//! The one tolerated gap is a missing result file, which is reported as a
//! skip because the simulation for that case has not produced output yet.

use crate::adapter::{
    adapter_for, extract_bundle_from_file, extract_reference_from_file, ModelVariant, Strategy,
};
use crate::baseline;
use crate::compare::{align, AlignedComparison, ComparisonResult, PlotData};
use crate::config::{CaseConfig, CaseSettings, SuiteConfig};
use crate::container::{extension, is_container_path};
use crate::error::{RegressError, Result};
use crate::loader::{load_series, SeriesLocator};
use crate::report;
use crate::series::{NamedSignal, SignalBundle};
use std::fmt;
use std::path::{Path, PathBuf};

/// Progress of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    NotRun,
    Extracted,
    Aligned,
    Scored,
    Reported,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::NotRun => "not run",
            RunState::Extracted => "extracted",
            RunState::Aligned => "aligned",
            RunState::Scored => "scored",
            RunState::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Switches that change what a run does, not what it compares
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Replace the reference with the current result after scoring
    pub update_baseline: bool,
}

/// Score of one named signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
    /// Bundle member name, `None` for single-signal cases
    pub signal: Option<String>,
    pub result: ComparisonResult,
    pub plot: PlotData,
    /// Where the plot payload was written, if it was
    pub plot_path: Option<PathBuf>,
}

/// How a run ended
#[derive(Debug)]
pub enum CaseOutcome {
    /// Every shared signal was scored; passes iff all of them pass
    Scored(Vec<SignalScore>),
    /// Nothing to compare yet
    Skipped { reason: String },
    /// Aborted after reaching `state`
    Errored { state: RunState, error: RegressError },
}

/// Result of one (model, variant) run
#[derive(Debug)]
pub struct CaseReport {
    pub case: ModelVariant,
    pub outcome: CaseOutcome,
    /// Baseline written during this run (update requested)
    pub baseline_written: Option<PathBuf>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        match &self.outcome {
            CaseOutcome::Scored(scores) => scores.iter().all(|s| s.result.passed),
            CaseOutcome::Skipped { .. } | CaseOutcome::Errored { .. } => false,
        }
    }

    pub fn failed(&self) -> bool {
        matches!(&self.outcome, CaseOutcome::Scored(_)) && !self.passed()
    }

    pub fn skipped(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Skipped { .. })
    }

    pub fn errored(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Errored { .. })
    }

    /// One line per comparison, or one SKIP/ERROR line
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = match &self.outcome {
            CaseOutcome::Scored(scores) => scores
                .iter()
                .map(|s| {
                    let label = match &s.signal {
                        Some(name) => format!("{}:{name}", self.case),
                        None => self.case.to_string(),
                    };
                    s.result.summary_line(&label)
                })
                .collect(),
            CaseOutcome::Skipped { reason } => vec![format!("SKIP | {} | {reason}", self.case)],
            CaseOutcome::Errored { state, error } => {
                vec![format!("ERROR | {} | after '{state}': {error}", self.case)]
            }
        };
        if let Some(path) = &self.baseline_written {
            lines.push(format!("UPDATED | {} | {}", self.case, path.display()));
        }
        lines
    }
}

/// Outcomes of a whole suite, in run order
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.cases.iter().filter(|c| c.skipped()).count()
    }

    pub fn errored_count(&self) -> usize {
        self.cases.iter().filter(|c| c.errored()).count()
    }

    /// No failures and no errors; skips are allowed
    pub fn success(&self) -> bool {
        self.failed_count() == 0 && self.errored_count() == 0
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Summary: {} passed, {} failed, {} skipped, {} errors",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.errored_count()
        )
    }

    /// Every case line followed by the summary
    pub fn to_report_string(&self) -> String {
        let mut out = String::new();
        for case in &self.cases {
            for line in case.lines() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str(&self.summary_line());
        out.push('\n');
        out
    }
}

/// One (model, variant) run and its state
pub struct CaseRun<'a> {
    settings: &'a CaseSettings,
    options: RunOptions,
    state: RunState,
    baseline_written: Option<PathBuf>,
}

impl<'a> CaseRun<'a> {
    pub fn new(settings: &'a CaseSettings, options: RunOptions) -> Self {
        Self {
            settings,
            options,
            state: RunState::NotRun,
            baseline_written: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn advance(&mut self, next: RunState) {
        tracing::debug!(case = %self.settings.case, from = %self.state, to = %next, "run state");
        self.state = next;
    }

    /// Run to completion
    pub fn execute(mut self) -> CaseReport {
        let outcome = match self.drive() {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(case = %self.settings.case, state = %self.state, %error, "run aborted");
                CaseOutcome::Errored {
                    state: self.state,
                    error,
                }
            }
        };
        CaseReport {
            case: self.settings.case.clone(),
            outcome,
            baseline_written: self.baseline_written,
        }
    }

    fn drive(&mut self) -> Result<CaseOutcome> {
        let settings = self.settings;
        let case = &settings.case;
        let strategy = case.strategy();
        if strategy == Strategy::Unsupported {
            return Err(adapter_for(case.model).unsupported(&case.variant));
        }

        let Some(result_path) = settings.result_path() else {
            let expected = settings
                .result
                .clone()
                .unwrap_or_else(|| settings.layout.result_candidates()[0].clone());
            tracing::info!(case = %case, "no result file; skipping");
            return Ok(CaseOutcome::Skipped {
                reason: format!("result file not found: {}", expected.display()),
            });
        };

        let candidate = extract_bundle_from_file(&result_path, case)?;
        self.advance(RunState::Extracted);

        let reference_path = match settings.reference_path() {
            Some(path) => path,
            None if self.options.update_baseline => {
                let written = self.write_baseline(&result_path, None, &candidate, strategy)?;
                written.clone()
            }
            None => {
                return Err(RegressError::ReferenceNotFound {
                    case: case.to_string(),
                })
            }
        };
        let reference = match self.load_reference(&reference_path, &candidate) {
            Ok(reference) => reference,
            // An unreadable reference is still replaced on request; its error is kept
            Err(error) if self.options.update_baseline && self.baseline_written.is_none() => {
                tracing::warn!(case = %case, %error, "existing reference unreadable; replacing it");
                self.write_baseline(&result_path, Some(&reference_path), &candidate, strategy)?;
                return Err(error);
            }
            Err(error) => return Err(error),
        };

        let aligned = self.align_shared(&candidate, &reference)?;
        self.advance(RunState::Aligned);

        let mut scores: Vec<SignalScore> = aligned
            .into_iter()
            .map(|(signal, a)| SignalScore {
                signal,
                result: a.result,
                plot: a.plot,
                plot_path: None,
            })
            .collect();
        self.advance(RunState::Scored);

        // Existing reference is replaced only after the drift was scored
        if self.options.update_baseline && self.baseline_written.is_none() {
            self.write_baseline(&result_path, Some(&reference_path), &candidate, strategy)?;
        }

        if settings.write_plot_data {
            let dir = settings.layout.plots_dir();
            for score in &mut scores {
                score.plot_path = Some(report::write_plot_data(
                    &dir,
                    score.signal.as_deref(),
                    &score.plot,
                )?);
            }
        }
        self.advance(RunState::Reported);

        Ok(CaseOutcome::Scored(scores))
    }

    /// Reference signals keyed like the candidate bundle
    ///
    /// A container reference may lack some members; those are not scored. A
    /// text reference holds one series and stands in for the candidate's
    /// primary signal.
    fn load_reference(&self, path: &Path, candidate: &SignalBundle) -> Result<SignalBundle> {
        let case = &self.settings.case;
        if is_container_path(path) {
            return extract_reference_from_file(path, case);
        }

        let series = baseline::read(path, self.settings.reference_column)?;
        let (name, primary) = candidate.primary().ok_or_else(|| {
            RegressError::InsufficientData(format!("{case}: candidate bundle is empty"))
        })?;
        let mut bundle = SignalBundle::new();
        let signal = NamedSignal::new(series, primary.unit_label.clone())
            .with_source(path.display().to_string());
        bundle.insert(name, signal);
        Ok(bundle)
    }

    /// Align every candidate signal that also exists in the reference
    fn align_shared(
        &self,
        candidate: &SignalBundle,
        reference: &SignalBundle,
    ) -> Result<Vec<(Option<String>, AlignedComparison)>> {
        let case = &self.settings.case;
        let bundle = case.strategy().is_bundle();
        let mut aligned = Vec::new();

        for (name, cand) in candidate.iter() {
            let Some(expected) = reference.get(name) else {
                tracing::debug!(case = %case, signal = name, "signal missing from reference; ignored");
                continue;
            };
            let title = if bundle {
                format!("{case} {name}")
            } else {
                case.to_string()
            };
            let mut a = align(
                &expected.series,
                &cand.series,
                self.settings.tolerance,
                &title,
                &cand.unit_label,
            )?;
            a.plot.candidate_source = cand.source.clone();
            a.plot.reference_source = expected.source.clone();
            aligned.push((bundle.then(|| name.to_string()), a));
        }

        if aligned.is_empty() {
            return Err(RegressError::InsufficientData(format!(
                "{case}: no signal shared by result and reference"
            )));
        }
        Ok(aligned)
    }

    /// Persist the current result as the case baseline
    ///
    /// Containers are copied whole so bundle cases keep every signal; text
    /// references receive the primary series.
    fn write_baseline(
        &mut self,
        result_path: &Path,
        existing: Option<&Path>,
        candidate: &SignalBundle,
        strategy: Strategy,
    ) -> Result<&PathBuf> {
        let settings = self.settings;
        let layout = &settings.layout;
        let dest = match (existing, &settings.reference) {
            (Some(path), _) if is_container_path(path) => {
                if extension(path) == extension(result_path) {
                    path.to_path_buf()
                } else {
                    layout.container_reference(result_path)
                }
            }
            (Some(path), _) => path.to_path_buf(),
            (None, Some(explicit)) => explicit.clone(),
            (None, None) if strategy.is_bundle() => layout.container_reference(result_path),
            (None, None) => layout.text_reference(),
        };

        if is_container_path(&dest) {
            baseline::adopt_container(result_path, &dest)?;
        } else {
            let (_, primary) = candidate.primary().ok_or_else(|| {
                RegressError::InsufficientData(format!(
                    "{}: nothing to write as baseline",
                    settings.case
                ))
            })?;
            baseline::write(&dest, &primary.series)?;
        }
        Ok(self.baseline_written.insert(dest))
    }
}

/// Run a single configured case
pub fn run_case(settings: &CaseSettings, options: RunOptions) -> CaseReport {
    CaseRun::new(settings, options).execute()
}

/// Run `cases` sequentially under `config`
pub fn run_suite(config: &SuiteConfig, cases: &[CaseConfig], options: RunOptions) -> SuiteReport {
    let reports = cases
        .iter()
        .map(|case| {
            let settings = config.settings(case);
            tracing::info!(case = %settings.case, tolerance = settings.tolerance, "running case");
            run_case(&settings, options)
        })
        .collect();
    SuiteReport { cases: reports }
}

/// Generic two-file comparison through the series loader
pub fn compare_files(
    reference: &Path,
    reference_locator: &SeriesLocator,
    candidate: &Path,
    candidate_locator: &SeriesLocator,
    tolerance: f64,
    title: &str,
    unit_label: &str,
) -> Result<AlignedComparison> {
    let reference = load_series(reference, reference_locator)?;
    let candidate = load_series(candidate, candidate_locator)?;
    align(&reference, &candidate, tolerance, title, unit_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ModelKind;
    use serde_json::json;
    use std::fs;

    fn sphere_result(heave: &[f64]) -> serde_json::Value {
        let time: Vec<f64> = (0..heave.len()).map(|i| i as f64 * 0.5).collect();
        let position: Vec<[f64; 3]> = heave.iter().map(|&z| [0.0, 0.0, z]).collect();
        json!({ "results": {
            "time": { "time": time },
            "model": { "bodies": { "body1": { "position": position } } }
        }})
    }

    fn rm3_result(float: &[f64], plate: &[f64]) -> serde_json::Value {
        let time: Vec<f64> = (0..float.len()).map(|i| i as f64).collect();
        json!({ "results": {
            "time": { "time": time },
            "bodies": {
                "body1": { "z": float },
                "body2": { "z": plate }
            }
        }})
    }

    fn write_json(path: &Path, value: &serde_json::Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, value.to_string()).unwrap();
    }

    fn settings(root: &Path, case: CaseConfig) -> CaseSettings {
        let config = SuiteConfig {
            root: root.to_path_buf(),
            ..SuiteConfig::default()
        };
        config.settings(&case)
    }

    fn sphere(root: &Path) -> CaseSettings {
        settings(root, CaseConfig::new(ModelKind::IeaSphere, "decay"))
    }

    #[test]
    fn test_text_reference_pass() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(
            &s.layout.result_candidates()[1],
            &sphere_result(&[1.0, 0.5, 0.0, -0.5]),
        );
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(
            s.layout.text_reference(),
            "# time heave\n0.0 1.0\n0.5 0.5\n1.0 0.0\n1.5 -0.5\n",
        )
        .unwrap();

        let report = run_case(&s, RunOptions::default());
        assert!(report.passed(), "{:?}", report.outcome);
        assert_eq!(
            report.lines(),
            vec!["PASS | iea_sphere/decay | N=4 | RMSrel=0.000000 | tol=0.020000"]
        );
        assert!(s.layout.plots_dir().join("comparison.json").exists());
    }

    #[test]
    fn test_drifted_result_fails() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[1.2, 0.6]));
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "0.0 1.0\n0.5 0.5\n").unwrap();

        let report = run_case(&s, RunOptions::default());
        assert!(report.failed());
        assert!(report.lines()[0].starts_with("FAIL | iea_sphere/decay | N=2 | RMSrel=0.200000"));
    }

    #[test]
    fn test_missing_result_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let report = run_case(&sphere(dir.path()), RunOptions::default());
        assert!(report.skipped());
        assert!(report.lines()[0].starts_with("SKIP | iea_sphere/decay | result file not found"));
    }

    #[test]
    fn test_missing_reference_without_update_errors() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[1.0, 0.5]));

        let report = run_case(&s, RunOptions::default());
        match &report.outcome {
            CaseOutcome::Errored { state, error } => {
                assert_eq!(*state, RunState::Extracted);
                assert!(matches!(error, RegressError::ReferenceNotFound { .. }));
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(!s.layout.text_reference().exists());
    }

    #[test]
    fn test_update_without_reference_writes_then_passes() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[1.0, 0.5, 0.25]));

        let report = run_case(&s, RunOptions { update_baseline: true });
        assert!(report.passed(), "{:?}", report.outcome);
        assert_eq!(report.baseline_written, Some(s.layout.text_reference()));
        let written = baseline::read(&s.layout.text_reference(), 1).unwrap();
        assert_eq!(written.values(), &[1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_update_scores_drift_before_replacing() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[2.0, 1.0]));
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "0.0 1.0\n0.5 0.5\n").unwrap();

        let report = run_case(&s, RunOptions { update_baseline: true });
        // Scored against the old reference
        assert!(report.failed());
        assert_eq!(report.lines()[1], format!(
            "UPDATED | iea_sphere/decay | {}",
            s.layout.text_reference().display()
        ));
        // ...and the next run compares against the new one
        let again = run_case(&s, RunOptions::default());
        assert!(again.passed());
    }

    #[test]
    fn test_rm3_bundle_scores_each_signal() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Rm3, "decay"));
        write_json(
            &s.layout.result_candidates()[1],
            &rm3_result(&[1.0, 0.5, 0.0], &[-2.0, -2.4, -2.0]),
        );
        write_json(
            &s.layout.dir().join("expected/baseline.json"),
            &rm3_result(&[1.0, 0.5, 0.0], &[-2.0, -2.0, -2.0]),
        );

        let report = run_case(&s, RunOptions::default());
        let CaseOutcome::Scored(scores) = &report.outcome else {
            panic!("expected scores, got {:?}", report.outcome);
        };
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].signal.as_deref(), Some("float"));
        assert!(scores[0].result.passed);
        assert!(!scores[1].result.passed);
        assert!(report.failed());

        let lines = report.lines();
        assert!(lines[0].starts_with("PASS | rm3/decay:float |"));
        assert!(lines[1].starts_with("FAIL | rm3/decay:plate |"));
        let plots = s.layout.plots_dir();
        assert!(plots.join("comparison_float.json").exists());
        assert!(plots.join("comparison_plate.json").exists());
    }

    #[test]
    fn test_bundle_member_missing_from_reference_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Rm3, "decay"));
        write_json(
            &s.layout.result_candidates()[1],
            &rm3_result(&[1.0, 0.5, 0.0], &[-2.0, -2.4, -2.0]),
        );
        // Older baseline that only recorded the float
        write_json(
            &s.layout.dir().join("expected/baseline.json"),
            &json!({ "results": {
                "time": { "time": [0.0, 1.0, 2.0] },
                "bodies": { "body1": { "z": [1.0, 0.5, 0.0] } }
            }}),
        );

        let report = run_case(&s, RunOptions::default());
        assert!(report.passed(), "{:?}", report.outcome);
        let lines = report.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("PASS | rm3/decay:float |"));

        let CaseOutcome::Scored(scores) = &report.outcome else {
            unreachable!();
        };
        assert_eq!(
            scores[0].plot.candidate_source.as_deref(),
            Some("/results/bodies/body1/z")
        );
        assert_eq!(
            scores[0].plot.reference_source.as_deref(),
            Some("/results/bodies/body1/z")
        );
    }

    #[test]
    fn test_reference_without_any_member_errors() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Rm3, "decay"));
        write_json(
            &s.layout.result_candidates()[1],
            &rm3_result(&[1.0, 0.0], &[-1.0, -1.0]),
        );
        write_json(
            &s.layout.dir().join("expected/baseline.json"),
            &json!({ "results": { "time": { "time": [0.0, 1.0] } } }),
        );

        let report = run_case(&s, RunOptions::default());
        match &report.outcome {
            CaseOutcome::Errored { state, error } => {
                assert_eq!(*state, RunState::Extracted);
                assert!(matches!(error, RegressError::SignalNotFound { .. }));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_candidate_bundle_stays_strict() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Rm3, "decay"));
        write_json(
            &s.layout.result_candidates()[1],
            &json!({ "results": {
                "time": { "time": [0.0, 1.0] },
                "bodies": { "body1": { "z": [1.0, 0.0] } }
            }}),
        );
        write_json(
            &s.layout.dir().join("expected/baseline.json"),
            &rm3_result(&[1.0, 0.0], &[-1.0, -1.0]),
        );

        let report = run_case(&s, RunOptions::default());
        match &report.outcome {
            CaseOutcome::Errored { state, error } => {
                assert_eq!(*state, RunState::NotRun);
                assert!(matches!(error, RegressError::SignalNotFound { .. }));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_update_replaces_unreadable_reference() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[1.0, 0.5]));
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "# nothing numeric here
").unwrap();

        let report = run_case(&s, RunOptions { update_baseline: true });
        assert!(report.errored());
        let lines = report.lines();
        assert!(lines[0].contains("after 'extracted'"), "{lines:?}");
        assert!(lines[1].starts_with("UPDATED | iea_sphere/decay |"));
        assert_eq!(report.baseline_written, Some(s.layout.text_reference()));

        let again = run_case(&s, RunOptions::default());
        assert!(again.passed(), "{:?}", again.outcome);
    }

    #[test]
    fn test_unreadable_reference_without_update_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[1.0, 0.5]));
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "# nothing numeric here
").unwrap();

        let report = run_case(&s, RunOptions::default());
        assert!(matches!(
            report.outcome,
            CaseOutcome::Errored { error: RegressError::EmptyReference { .. }, .. }
        ));
        assert!(report.baseline_written.is_none());
        assert_eq!(
            fs::read_to_string(s.layout.text_reference()).unwrap(),
            "# nothing numeric here\n"
        );
    }

    #[test]
    fn test_bundle_against_text_reference_uses_primary() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Rm3, "decay"));
        write_json(
            &s.layout.result_candidates()[1],
            &rm3_result(&[1.0, 0.0], &[9.0, 9.0]),
        );
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "0 1\n1 0\n").unwrap();

        let report = run_case(&s, RunOptions::default());
        assert_eq!(report.lines().len(), 1);
        assert!(report.lines()[0].starts_with("PASS | rm3/decay:float |"));
    }

    #[test]
    fn test_bundle_update_adopts_container() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Rm3, "decay"));
        let result = s.layout.result_candidates()[1].clone();
        write_json(&result, &rm3_result(&[1.0, 0.0], &[-1.0, -1.0]));

        let report = run_case(&s, RunOptions { update_baseline: true });
        assert!(report.passed(), "{:?}", report.outcome);
        let dest = s.layout.dir().join("expected/baseline.json");
        assert_eq!(report.baseline_written, Some(dest.clone()));
        assert_eq!(fs::read(&result).unwrap(), fs::read(&dest).unwrap());
    }

    #[test]
    fn test_unsupported_variant_errors_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path(), CaseConfig::new(ModelKind::Oswec, "regular_waves"));
        let report = run_case(&s, RunOptions::default());
        match report.outcome {
            CaseOutcome::Errored { state, error } => {
                assert_eq!(state, RunState::NotRun);
                assert!(error.is_configuration());
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_result_is_an_error_not_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        let s = sphere(dir.path());
        write_json(&s.layout.result_candidates()[1], &json!({ "results": {} }));
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "0 1\n").unwrap();

        let report = run_case(&s, RunOptions::default());
        assert!(report.errored());
        assert!(report.lines()[0].contains("Time vector not found"));
    }

    #[test]
    fn test_suite_report_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = SuiteConfig {
            root: dir.path().to_path_buf(),
            write_plot_data: false,
            ..SuiteConfig::default()
        };
        let s = config.settings(&CaseConfig::new(ModelKind::IeaSphere, "decay"));
        write_json(&s.layout.result_candidates()[1], &sphere_result(&[1.0, 0.5]));
        fs::create_dir_all(s.layout.dir().join("expected")).unwrap();
        fs::write(s.layout.text_reference(), "0.0 1.0\n0.5 0.5\n").unwrap();

        let report = run_suite(&config, &config.cases(), RunOptions::default());
        assert_eq!(report.cases.len(), 6);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.skipped_count(), 5);
        assert!(report.success());
        assert!(report
            .to_report_string()
            .ends_with("Summary: 1 passed, 0 failed, 5 skipped, 0 errors\n"));
        assert!(!s.layout.plots_dir().exists());
    }

    #[test]
    fn test_compare_files_mixed_formats() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.txt");
        fs::write(&reference, "0 0\n1 1\n2 0\n").unwrap();
        let candidate = dir.path().join("sim.csv");
        fs::write(&candidate, "0,0\n0.5,0.5\n1,1\n1.5,0.5\n2,0\n").unwrap();

        let aligned = compare_files(
            &reference,
            &SeriesLocator::new(),
            &candidate,
            &SeriesLocator::new(),
            0.02,
            "triangle",
            "Value",
        )
        .unwrap();
        assert_eq!(aligned.result.error, 0.0);
        assert_eq!(aligned.plot.candidate, vec![0.0, 1.0, 0.0]);
    }
}
