//! Feature drift evaluator.

use rayon::prelude::*;

use super::psi::{compute_categorical_psi, compute_psi, finite_values, DEFAULT_BINS};
use super::statistical::{ks_statistic, ks_two_sample_p_value, sorted};
use super::types::{FeatureDrift, FeatureEvaluation, Tier, TierThresholds};
use crate::data::{Column, ColumnKind, Snapshot};
use crate::error::{Error, Result};

/// Applies PSI across named columns of two snapshots
#[derive(Clone, Debug)]
pub struct FeatureDriftEvaluator {
    bins: usize,
    thresholds: TierThresholds,
    parallel: bool,
}

impl Default for FeatureDriftEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_BINS, TierThresholds::default())
    }
}

enum Outcome {
    Scored(FeatureDrift),
    Skipped(String),
}

impl FeatureDriftEvaluator {
    /// Create an evaluator with the given bin count and tier thresholds
    pub fn new(bins: usize, thresholds: TierThresholds) -> Self {
        Self { bins, thresholds, parallel: false }
    }

    /// Evaluate features on the rayon pool; result order is unaffected
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Tier thresholds in use
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Score every named feature present in both snapshots.
    ///
    /// Features missing from either side, and features whose score cannot be
    /// computed, are reported as warnings instead of failing the evaluation.
    pub fn evaluate_features(
        &self,
        reference: &Snapshot,
        current: &Snapshot,
        features: &[String],
    ) -> FeatureEvaluation {
        let outcomes: Vec<Outcome> = if self.parallel {
            features
                .par_iter()
                .map(|name| self.evaluate_named(reference, current, name))
                .collect()
        } else {
            features
                .iter()
                .map(|name| self.evaluate_named(reference, current, name))
                .collect()
        };

        let mut evaluation = FeatureEvaluation::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Scored(drift) => evaluation.results.push(drift),
                Outcome::Skipped(warning) => {
                    tracing::warn!("{warning}");
                    evaluation.warnings.push(warning);
                }
            }
        }
        evaluation
    }

    fn evaluate_named(&self, reference: &Snapshot, current: &Snapshot, name: &str) -> Outcome {
        let (ref_col, cur_col) = match (reference.column(name), current.column(name)) {
            (Some(r), Some(c)) => (r, c),
            (None, None) => {
                return Outcome::Skipped(format!(
                    "Feature '{name}' missing in reference and current data; skipped"
                ))
            }
            (None, Some(_)) => {
                return Outcome::Skipped(format!(
                    "Feature '{name}' missing in reference data; skipped"
                ))
            }
            (Some(_), None) => {
                return Outcome::Skipped(format!(
                    "Feature '{name}' missing in current data; skipped"
                ))
            }
        };
        match self.evaluate_column(name, ref_col, cur_col) {
            Ok(drift) => Outcome::Scored(drift),
            Err(e) => Outcome::Skipped(format!("{}: feature '{name}': {e}", e.kind())),
        }
    }

    /// Score one pair of columns
    pub fn evaluate_column(
        &self,
        name: &str,
        reference: &Column,
        current: &Column,
    ) -> Result<FeatureDrift> {
        match (reference, current) {
            (Column::Numeric(r), Column::Numeric(c)) => self.evaluate_values(name, r, c),
            (Column::Categorical(r), Column::Categorical(c)) => {
                let score = compute_categorical_psi(r, c)?;
                Ok(self.drift(name, ColumnKind::Categorical, score, None, r.len(), c.len()))
            }
            _ => Err(Error::InvalidInput(format!(
                "column kind differs: reference is {:?}, current is {:?}",
                reference.kind(),
                current.kind()
            ))),
        }
    }

    /// Score two numeric samples; also used for pseudo-features such as
    /// predicted probabilities.
    pub fn evaluate_values(
        &self,
        name: &str,
        reference: &[f64],
        current: &[f64],
    ) -> Result<FeatureDrift> {
        let score = compute_psi(reference, current, self.bins)?;
        let reference = sorted(&finite_values(reference));
        let current = sorted(&finite_values(current));
        let d = ks_statistic(&reference, &current);
        let p = ks_two_sample_p_value(d, reference.len(), current.len());
        Ok(self.drift(
            name,
            ColumnKind::Numeric,
            score,
            Some((d, p)),
            reference.len(),
            current.len(),
        ))
    }

    fn drift(
        &self,
        name: &str,
        kind: ColumnKind,
        score: f64,
        ks: Option<(f64, f64)>,
        reference_count: usize,
        current_count: usize,
    ) -> FeatureDrift {
        let tier = Tier::classify(score, &self.thresholds);
        tracing::debug!(feature = name, score, %tier, "feature drift");
        FeatureDrift {
            feature: name.to_string(),
            kind,
            score,
            tier,
            ks_statistic: ks.map(|(d, _)| d),
            ks_p_value: ks.map(|(_, p)| p),
            reference_count,
            current_count,
        }
    }
}
