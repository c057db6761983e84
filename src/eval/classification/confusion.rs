//! Confusion matrix for binary classification

use std::fmt;

use crate::error::{Error, Result};

/// Confusion counts for a binary classifier, positive class = 1
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Predicted 1, actually 1
    pub true_positives: usize,
    /// Predicted 1, actually 0
    pub false_positives: usize,
    /// Predicted 0, actually 0
    pub true_negatives: usize,
    /// Predicted 0, actually 1
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Create from predictions and ground truth (labels must be 0 or 1)
    pub fn from_predictions(y_pred: &[u8], y_true: &[u8]) -> Result<Self> {
        if y_pred.len() != y_true.len() {
            return Err(Error::InvalidInput(format!(
                "predictions ({}) and targets ({}) must have same length",
                y_pred.len(),
                y_true.len()
            )));
        }

        let mut cm = Self::default();
        for (&pred, &actual) in y_pred.iter().zip(y_true) {
            match (pred, actual) {
                (1, 1) => cm.true_positives += 1,
                (1, 0) => cm.false_positives += 1,
                (0, 0) => cm.true_negatives += 1,
                (0, 1) => cm.false_negatives += 1,
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "binary labels expected, got prediction {pred} / target {actual}"
                    )))
                }
            }
        }
        Ok(cm)
    }

    /// Total number of samples
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Fraction of correct predictions
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// TP / (TP + FP), zero when nothing was predicted positive
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN), zero when there are no positives
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "            pred 0   pred 1")?;
        writeln!(f, "actual 0  {:>7}  {:>7}", self.true_negatives, self.false_positives)?;
        write!(f, "actual 1  {:>7}  {:>7}", self.false_negatives, self.true_positives)
    }
}
