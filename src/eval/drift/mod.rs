//! Drift Detection Module
//!
//! Compares reference and current distributions column by column:
//! - Population Stability Index over reference-quantile bins (numeric)
//! - Population Stability Index over categories (categorical)
//! - Kolmogorov-Smirnov statistic as a diagnostic alongside PSI
//!
//! Scores are classified into `stable` / `moderate` / `severe` tiers.

mod evaluator;
mod psi;
mod statistical;
mod types;

#[cfg(test)]
mod tests;

pub use evaluator::FeatureDriftEvaluator;
pub use psi::{
    compute_categorical_psi, compute_psi, psi_from_proportions, BinPartition, DEFAULT_BINS,
    MAX_BINS, MIN_PROPORTION,
};
pub use types::{
    DriftSummary, FeatureDrift, FeatureEvaluation, Tier, TierThresholds, MODERATE_THRESHOLD,
    SEVERE_THRESHOLD,
};

// Re-export statistical functions for testing/advanced use
pub use statistical::{bin_counts, ks_p_value, ks_statistic, ks_two_sample_p_value, percentile};
