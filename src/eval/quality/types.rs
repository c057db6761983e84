//! Quality evaluation result types.

use serde::{Deserialize, Serialize};

use crate::eval::classification::Metric;
use crate::eval::drift::FeatureDrift;

/// One quality metric on reference and current data.
///
/// `current` and `delta` are omitted (never zero-filled) when current ground
/// truth is unavailable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: Metric,
    pub reference: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    /// `current - reference`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl MetricDelta {
    /// Build from reference and optional current values
    pub fn new(metric: Metric, reference: f64, current: Option<f64>) -> Self {
        Self { metric, reference, current, delta: current.map(|c| c - reference) }
    }

    /// How much the metric fell from reference to current, if known
    pub fn drop(&self) -> Option<f64> {
        self.delta.map(|d| -d)
    }
}

/// Prediction drift, target drift and quality decay for one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityBlock {
    /// Scorer used for both snapshots
    pub scorer: String,
    /// PSI of the predicted-probability distributions
    pub prediction_drift: FeatureDrift,
    /// PSI of the ground-truth label distributions, when current labels exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_drift: Option<FeatureDrift>,
    /// Whether the current snapshot carried usable ground truth
    pub current_labels_available: bool,
    /// Quality metrics with signed deltas
    pub metrics: Vec<MetricDelta>,
    /// Non-fatal issues met during quality evaluation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl QualityBlock {
    /// Look up a metric
    pub fn metric(&self, metric: Metric) -> Option<&MetricDelta> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}
