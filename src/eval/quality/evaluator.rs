//! Prediction and quality degradation evaluator.

use super::scorer::Scorer;
use super::types::{MetricDelta, QualityBlock};
use crate::data::Snapshot;
use crate::error::{Error, Result};
use crate::eval::classification::{Metric, QualityMetrics};
use crate::eval::drift::FeatureDriftEvaluator;

/// Pseudo-feature name for predicted-probability drift
pub const PREDICTION_FEATURE: &str = "predicted_probability";

/// Scores both snapshots with the same scorer and compares the outcomes
#[derive(Clone, Debug, Default)]
pub struct QualityEvaluator {
    drift: FeatureDriftEvaluator,
}

struct Scored {
    predictions: Vec<u8>,
    probabilities: Vec<f64>,
}

impl QualityEvaluator {
    /// Use the given drift evaluator for prediction and target drift
    pub fn new(drift: FeatureDriftEvaluator) -> Self {
        Self { drift }
    }

    /// Evaluate target drift, prediction drift and the quality delta.
    ///
    /// Fails with `MissingTarget` when the reference lacks `target`, and with
    /// `ScorerFailure` when the scorer errors or returns malformed output.
    /// Missing or unusable current labels only omit the quality delta.
    pub fn evaluate_quality(
        &self,
        scorer: &dyn Scorer,
        reference: &Snapshot,
        current: &Snapshot,
        target: &str,
    ) -> Result<QualityBlock> {
        let ref_target = reference
            .column(target)
            .ok_or_else(|| Error::MissingTarget { column: target.to_string() })?;
        let ref_target = ref_target.as_numeric().ok_or_else(|| {
            Error::InvalidInput(format!("target column '{target}' is not numeric"))
        })?;
        let ref_labels = to_labels(target, ref_target)?;

        let ref_scored = score(scorer, reference)?;
        let cur_scored = score(scorer, current)?;

        let mut warnings = Vec::new();

        let prediction_drift = self.drift.evaluate_values(
            PREDICTION_FEATURE,
            &ref_scored.probabilities,
            &cur_scored.probabilities,
        )?;

        let cur_target = match current.column(target).map(|c| c.as_numeric()) {
            Some(Some(values)) => Some(values),
            Some(None) => {
                warnings.push(format!("Target column '{target}' in current data is not numeric"));
                None
            }
            None => {
                warnings.push(format!(
                    "Target column '{target}' missing in current data; target drift and quality delta unavailable"
                ));
                None
            }
        };

        let target_drift = match cur_target {
            Some(values) => match self.drift.evaluate_values(target, ref_target, values) {
                Ok(drift) => Some(drift),
                Err(e) => {
                    warnings.push(format!("{}: target drift: {e}", e.kind()));
                    None
                }
            },
            None => None,
        };

        let cur_labels = match cur_target.map(|values| to_labels(target, values)) {
            Some(Ok(labels)) => Some(labels),
            Some(Err(e)) => {
                warnings.push(format!("{}: current labels unusable: {e}", e.kind()));
                None
            }
            None => None,
        };

        let ref_quality =
            QualityMetrics::compute(&ref_scored.predictions, &ref_scored.probabilities, &ref_labels)?;
        let cur_quality = match &cur_labels {
            Some(labels) => Some(QualityMetrics::compute(
                &cur_scored.predictions,
                &cur_scored.probabilities,
                labels,
            )?),
            None => None,
        };

        let mut metrics = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let Some(reference_value) = ref_quality.get(metric) else {
                warnings.push(format!(
                    "Metric '{}' undefined on reference data (single class); omitted",
                    metric.name()
                ));
                continue;
            };
            let current_value = cur_quality.as_ref().and_then(|q| q.get(metric));
            if cur_quality.is_some() && current_value.is_none() {
                warnings.push(format!(
                    "Metric '{}' undefined on current data (single class); delta omitted",
                    metric.name()
                ));
            }
            metrics.push(MetricDelta::new(metric, reference_value, current_value));
        }

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        Ok(QualityBlock {
            scorer: scorer.name().to_string(),
            prediction_drift,
            target_drift,
            current_labels_available: cur_labels.is_some(),
            metrics,
            warnings,
        })
    }
}

fn score(scorer: &dyn Scorer, table: &Snapshot) -> Result<Scored> {
    let predictions = scorer.predict(table).map_err(as_scorer_failure)?;
    let probabilities = scorer.predict_probability(table).map_err(as_scorer_failure)?;

    let n = table.n_rows();
    if predictions.len() != n || probabilities.len() != n {
        return Err(Error::ScorerFailure(format!(
            "scorer returned {} predictions and {} probabilities for {n} rows",
            predictions.len(),
            probabilities.len()
        )));
    }
    if let Some(p) = predictions.iter().find(|&&p| p > 1) {
        return Err(Error::ScorerFailure(format!("non-binary prediction {p}")));
    }
    if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(Error::ScorerFailure(format!("probability {p} outside [0, 1]")));
    }
    Ok(Scored { predictions, probabilities })
}

fn as_scorer_failure(e: Error) -> Error {
    match e {
        Error::ScorerFailure(_) => e,
        other => Error::ScorerFailure(other.to_string()),
    }
}

fn to_labels(column: &str, values: &[f64]) -> Result<Vec<u8>> {
    values
        .iter()
        .map(|&v| {
            if v == 0.0 {
                Ok(0)
            } else if v == 1.0 {
                Ok(1)
            } else {
                Err(Error::InvalidInput(format!(
                    "target column '{column}' must hold 0/1 labels, found {v}"
                )))
            }
        })
        .collect()
}
