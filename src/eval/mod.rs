//! Drift and quality evaluation
//!
//! ## Architecture
//!
//! - `drift`: PSI distribution comparison, KS diagnostics, severity tiers
//! - `classification`: binary confusion matrix and quality metrics
//! - `quality`: scorer capability and prediction/quality degradation
//! - `retrain`: verdict policy and retraining trigger dispatch
//!
//! ## Example
//!
//! ```ignore
//! use deriva::eval::{FeatureDriftEvaluator, VerdictPolicy};
//!
//! let evaluation = FeatureDriftEvaluator::default()
//!     .evaluate_features(&reference, &current, &["LIMIT_BAL".to_string()]);
//! let verdict = VerdictPolicy::default().decide(&evaluation.results, None);
//! println!("drift_detected={}", verdict.drift_detected);
//! ```

pub mod classification;
pub mod drift;
pub mod quality;
pub mod retrain;

pub use classification::{ConfusionMatrix, Metric, QualityMetrics};
pub use drift::{
    compute_categorical_psi, compute_psi, DriftSummary, FeatureDrift, FeatureDriftEvaluator,
    FeatureEvaluation, Tier, TierThresholds,
};
pub use quality::{
    resolve_scorer, ColumnScorer, LinearScorer, MetricDelta, QualityBlock, QualityEvaluator,
    Scorer, ScorerSource,
};
pub use retrain::{
    dispatch, Action, CallbackTrigger, QualityTrigger, RetrainTrigger, TriggerSignal, Verdict,
    VerdictPolicy,
};
