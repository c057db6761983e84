//! Classification metrics for model evaluation
//!
//! Binary classification quality, positive class = 1:
//! - Confusion matrix
//! - Accuracy, precision, recall, F1
//! - ROC AUC as the discrimination score

mod confusion;
mod metrics;


pub use confusion::ConfusionMatrix;
pub use metrics::{roc_auc, Metric, QualityMetrics};
