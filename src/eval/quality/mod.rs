//! Prediction and quality degradation
//!
//! Detects concept drift: the same scorer is applied to reference and current
//! data, and the resulting prediction distributions and classification
//! quality are compared.

mod evaluator;
mod scorer;
mod types;


pub use evaluator::{QualityEvaluator, PREDICTION_FEATURE};
pub use scorer::{resolve_scorer, ColumnScorer, LinearScorer, Scorer, ScorerSource};
pub use types::{MetricDelta, QualityBlock};
