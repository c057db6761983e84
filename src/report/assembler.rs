//! Drift report assembler.
//!
//! Runs one evaluation through a linear sequence of stages:
//! `LOADING → SCHEMA_CHECK → FEATURE_EVAL → QUALITY_EVAL → VERDICT → PERSIST`,
//! ending in `COMPLETE` or `FAILED`. Nothing survives between runs.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::persist::write_atomic_all;
use super::render::{render, ReportFormat};
use super::types::{DatasetSummary, Report};
use crate::data::{load_csv, sample_rows, SchemaDiff, Snapshot};
use crate::error::{Error, Result};
use crate::eval::drift::{FeatureDriftEvaluator, DEFAULT_BINS};
use crate::eval::quality::{QualityEvaluator, Scorer};
use crate::eval::retrain::VerdictPolicy;

/// Assembler stage, logged as the run progresses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loading,
    SchemaCheck,
    FeatureEval,
    QualityEval,
    Verdict,
    Persist,
    Complete,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "LOADING",
            Stage::SchemaCheck => "SCHEMA_CHECK",
            Stage::FeatureEval => "FEATURE_EVAL",
            Stage::QualityEval => "QUALITY_EVAL",
            Stage::Verdict => "VERDICT",
            Stage::Persist => "PERSIST",
            Stage::Complete => "COMPLETE",
            Stage::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// A snapshot on disk or already in memory
#[derive(Clone, Debug)]
pub enum SnapshotSource {
    /// Headered CSV file
    Path(PathBuf),
    /// Prebuilt table with a label for the report
    InMemory { label: String, snapshot: Snapshot },
}

impl SnapshotSource {
    /// Label recorded in the report
    pub fn label(&self) -> String {
        match self {
            SnapshotSource::Path(path) => path.display().to_string(),
            SnapshotSource::InMemory { label, .. } => label.clone(),
        }
    }

    fn resolve(&self) -> Result<Cow<'_, Snapshot>> {
        match self {
            SnapshotSource::Path(path) => load_csv(path).map(Cow::Owned),
            SnapshotSource::InMemory { snapshot, .. } => Ok(Cow::Borrowed(snapshot)),
        }
    }
}

impl From<PathBuf> for SnapshotSource {
    fn from(path: PathBuf) -> Self {
        SnapshotSource::Path(path)
    }
}

impl From<&Path> for SnapshotSource {
    fn from(path: &Path) -> Self {
        SnapshotSource::Path(path.to_path_buf())
    }
}

/// Seeded sample that stands in for missing current data
#[derive(Clone, Debug)]
pub struct FallbackPolicy {
    /// Pool to sample from, e.g. a held-out evaluation set
    pub pool: SnapshotSource,
    /// Rows drawn without replacement; must be positive
    pub sample_size: usize,
    /// RNG seed, so repeated runs draw the same rows
    pub seed: u64,
}

/// A rendered report destination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOutput {
    pub path: PathBuf,
    pub format: ReportFormat,
}

impl ReportOutput {
    /// Destination whose format follows the path extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ReportFormat::resolve(None, Some(&path));
        Self { path, format }
    }

    /// Destination with an explicit format
    pub fn with_format(path: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self { path: path.into(), format }
    }
}

/// Orchestrates loading, feature drift, quality evaluation and the verdict
pub struct DriftMonitor {
    target: String,
    features: Vec<String>,
    excluded: Vec<String>,
    bins: usize,
    parallel: bool,
    policy: VerdictPolicy,
    scorer: Option<Box<dyn Scorer>>,
    fallback: Option<FallbackPolicy>,
}

impl fmt::Debug for DriftMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriftMonitor")
            .field("target", &self.target)
            .field("features", &self.features)
            .field("bins", &self.bins)
            .field("policy", &self.policy)
            .field("scorer", &self.scorer.as_ref().map(|s| s.name().to_string()))
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl DriftMonitor {
    /// Monitor for the given ground-truth column
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            features: Vec::new(),
            excluded: Vec::new(),
            bins: DEFAULT_BINS,
            parallel: false,
            policy: VerdictPolicy::default(),
            scorer: None,
            fallback: None,
        }
    }

    /// Features to evaluate; empty means every shared column except the
    /// target and excluded columns
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    /// Columns never treated as features (e.g. precomputed predictions)
    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_policy(mut self, policy: VerdictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Inject the scorer used for quality evaluation
    pub fn with_scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Evaluate without persisting.
    ///
    /// `current` may be absent; the fallback sample is used when configured.
    pub fn run(
        &self,
        reference: &SnapshotSource,
        current: Option<&SnapshotSource>,
    ) -> Result<Report> {
        let report = self.run_inner(reference, current).inspect_err(fail)?;
        enter(Stage::Complete);
        Ok(report)
    }

    /// Evaluate and persist the report to every output.
    ///
    /// All outputs are rendered and staged before any is renamed into place,
    /// so a failed run leaves every previous artifact untouched.
    pub fn run_and_persist(
        &self,
        reference: &SnapshotSource,
        current: Option<&SnapshotSource>,
        outputs: &[ReportOutput],
    ) -> Result<Report> {
        let report = self.run_inner(reference, current).inspect_err(fail)?;
        enter(Stage::Persist);
        let rendered = outputs
            .iter()
            .map(|output| render(&report, output.format))
            .collect::<Result<Vec<_>>>()
            .inspect_err(fail)?;
        let artifacts: Vec<(&Path, &[u8])> = outputs
            .iter()
            .zip(&rendered)
            .map(|(output, text)| (output.path.as_path(), text.as_bytes()))
            .collect();
        write_atomic_all(&artifacts).inspect_err(fail)?;
        for output in outputs {
            tracing::info!(path = %output.path.display(), format = %output.format, "report written");
        }
        enter(Stage::Complete);
        Ok(report)
    }

    fn run_inner(
        &self,
        reference: &SnapshotSource,
        current: Option<&SnapshotSource>,
    ) -> Result<Report> {
        enter(Stage::Loading);
        let mut warnings = Vec::new();
        let reference_snapshot = reference.resolve()?;
        let (current_snapshot, current_summary) = self.load_current(current, &mut warnings)?;
        let reference_summary = DatasetSummary::of(reference.label(), &reference_snapshot, false);

        enter(Stage::SchemaCheck);
        let schema = SchemaDiff::between(&reference_snapshot, &current_snapshot);
        for warning in schema.warnings() {
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        enter(Stage::FeatureEval);
        let features = self.feature_list(&schema);
        let evaluator = FeatureDriftEvaluator::new(self.bins, self.policy.thresholds())
            .with_parallel(self.parallel);
        let evaluation =
            evaluator.evaluate_features(&reference_snapshot, &current_snapshot, &features);
        warnings.extend(evaluation.warnings.iter().cloned());
        if evaluation.results.is_empty() {
            let warning = "No features could be evaluated".to_string();
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        let quality = match &self.scorer {
            Some(scorer) => {
                enter(Stage::QualityEval);
                let evaluated = QualityEvaluator::new(evaluator).evaluate_quality(
                    scorer.as_ref(),
                    &reference_snapshot,
                    &current_snapshot,
                    &self.target,
                );
                match evaluated {
                    Ok(block) => Some(block),
                    Err(e) if e.is_isolated() => {
                        let warning = format!("{}: quality evaluation skipped: {e}", e.kind());
                        tracing::warn!("{warning}");
                        warnings.push(warning);
                        None
                    }
                    Err(e) => return Err(e),
                }
            }
            None => None,
        };

        enter(Stage::Verdict);
        let verdict = self.policy.decide(&evaluation.results, quality.as_ref());
        tracing::info!(
            drift_detected = verdict.drift_detected,
            reasons = verdict.reasons.len(),
            "verdict"
        );

        Ok(Report {
            generated_at: Utc::now(),
            reference: reference_summary,
            current: current_summary,
            summary: evaluation.summary(),
            features: evaluation.results,
            quality,
            drift_detected: verdict.drift_detected,
            reasons: verdict.reasons,
            warnings,
            policy: self.policy.clone(),
        })
    }

    fn load_current<'a>(
        &self,
        current: Option<&'a SnapshotSource>,
        warnings: &mut Vec<String>,
    ) -> Result<(Cow<'a, Snapshot>, DatasetSummary)> {
        let unavailable = match current {
            Some(source) => match source.resolve() {
                Ok(snapshot) => {
                    let summary = DatasetSummary::of(source.label(), &snapshot, false);
                    return Ok((snapshot, summary));
                }
                Err(Error::DataUnavailable(reason)) => reason,
                Err(e) => return Err(e),
            },
            None => "no current data source given".to_string(),
        };

        let Some(fallback) = &self.fallback else {
            return Err(Error::DataUnavailable(unavailable));
        };
        if fallback.sample_size == 0 {
            return Err(Error::DataUnavailable(format!(
                "{unavailable}; fallback sample size must be positive"
            )));
        }
        let pool = fallback.pool.resolve()?;
        let sample = sample_rows(&pool, fallback.sample_size, fallback.seed)?;
        let warning = format!(
            "Current data unavailable ({unavailable}); using fallback sample of {} rows from {} (seed {})",
            sample.n_rows(),
            fallback.pool.label(),
            fallback.seed
        );
        tracing::warn!("{warning}");
        warnings.push(warning);
        let summary = DatasetSummary::of(fallback.pool.label(), &sample, true);
        Ok((Cow::Owned(sample), summary))
    }

    fn feature_list(&self, schema: &SchemaDiff) -> Vec<String> {
        if !self.features.is_empty() {
            return self.features.clone();
        }
        schema
            .shared
            .iter()
            .filter(|name| **name != self.target && !self.excluded.contains(name))
            .cloned()
            .collect()
    }
}

fn enter(stage: Stage) {
    tracing::info!(%stage, "drift monitor");
}

fn fail(error: &Error) {
    tracing::error!(stage = %Stage::Failed, kind = error.kind(), "{error}");
}
