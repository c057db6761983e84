//! Binary classification quality metrics

use serde::{Deserialize, Serialize};

use super::confusion::ConfusionMatrix;
use crate::error::{Error, Result};

/// Quality metric computed on one snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1,
    /// Area under the ROC curve (discrimination)
    RocAuc,
}

impl Metric {
    /// All metrics in report order
    pub const ALL: [Metric; 5] =
        [Metric::Accuracy, Metric::Precision, Metric::Recall, Metric::F1, Metric::RocAuc];

    /// Metric name as written in reports
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::F1 => "f1",
            Metric::RocAuc => "roc_auc",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accuracy" => Ok(Metric::Accuracy),
            "precision" => Ok(Metric::Precision),
            "recall" => Ok(Metric::Recall),
            "f1" => Ok(Metric::F1),
            "roc_auc" | "auc" => Ok(Metric::RocAuc),
            _ => Err(format!(
                "Unknown metric: {s}. Valid metrics: accuracy, precision, recall, f1, roc_auc"
            )),
        }
    }
}

/// Quality of one snapshot's predictions against its ground truth
#[derive(Clone, Debug, PartialEq)]
pub struct QualityMetrics {
    pub confusion: ConfusionMatrix,
    /// `None` when the labels hold a single class
    pub roc_auc: Option<f64>,
}

impl QualityMetrics {
    /// Compute from hard predictions, positive-class probabilities and labels
    pub fn compute(y_pred: &[u8], y_proba: &[f64], y_true: &[u8]) -> Result<Self> {
        let confusion = ConfusionMatrix::from_predictions(y_pred, y_true)?;
        let roc_auc = roc_auc(y_true, y_proba)?;
        Ok(Self { confusion, roc_auc })
    }

    /// Value of a metric, `None` if undefined for this snapshot
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Accuracy => Some(self.confusion.accuracy()),
            Metric::Precision => Some(self.confusion.precision()),
            Metric::Recall => Some(self.confusion.recall()),
            Metric::F1 => Some(self.confusion.f1()),
            Metric::RocAuc => self.roc_auc,
        }
    }
}

/// Rank-based ROC AUC (Mann-Whitney U) with average ranks for tied scores.
///
/// Returns `Ok(None)` when the labels contain only one class.
pub fn roc_auc(y_true: &[u8], scores: &[f64]) -> Result<Option<f64>> {
    if y_true.len() != scores.len() {
        return Err(Error::InvalidInput(format!(
            "labels ({}) and scores ({}) must have same length",
            y_true.len(),
            scores.len()
        )));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(Error::InvalidInput("scores contain NaN".to_string()));
    }

    let n_pos = y_true.iter().filter(|&&y| y == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Ok(None);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based; tied block i..=j shares the mean rank
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        rank_sum_pos += order[i..=j].iter().filter(|&&k| y_true[k] == 1).count() as f64 * avg_rank;
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    let u = rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0;
    Ok(Some(u / (n_pos * n_neg)))
}
