//! Type definitions for drift detection.

use serde::{Deserialize, Serialize};

use crate::data::ColumnKind;

/// PSI boundary between `stable` and `moderate`
pub const MODERATE_THRESHOLD: f64 = 0.1;

/// PSI boundary between `moderate` and `severe`
pub const SEVERE_THRESHOLD: f64 = 0.25;

/// Severity tier of a drift score
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Score below the moderate threshold
    Stable,
    /// Score in `[moderate, severe)`
    Moderate,
    /// Score at or above the severe threshold
    Severe,
}

impl Tier {
    /// Classify a score against tier thresholds
    pub fn classify(score: f64, thresholds: &TierThresholds) -> Self {
        if score >= thresholds.severe {
            Tier::Severe
        } else if score >= thresholds.moderate {
            Tier::Moderate
        } else {
            Tier::Stable
        }
    }

    /// Whether this tier counts as drift
    pub fn is_drift(self) -> bool {
        self != Tier::Stable
    }

    /// Status word used in console output
    pub fn status(self) -> &'static str {
        match self {
            Tier::Stable => "OK",
            Tier::Moderate => "Moderate",
            Tier::Severe => "High",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Stable => write!(f, "stable"),
            Tier::Moderate => write!(f, "moderate"),
            Tier::Severe => write!(f, "severe"),
        }
    }
}

/// Tier boundaries
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Lowest score classified as `moderate`
    pub moderate: f64,
    /// Lowest score classified as `severe`
    pub severe: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { moderate: MODERATE_THRESHOLD, severe: SEVERE_THRESHOLD }
    }
}

/// Drift score of one feature between reference and current data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureDrift {
    /// Feature (or pseudo-feature) name
    pub feature: String,
    /// Column kind the score was computed over
    pub kind: ColumnKind,
    /// Population stability index
    pub score: f64,
    /// Severity tier of `score`
    pub tier: Tier,
    /// Two-sample KS statistic (numeric features only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ks_statistic: Option<f64>,
    /// Asymptotic KS p-value (numeric features only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ks_p_value: Option<f64>,
    /// Values used from the reference snapshot
    pub reference_count: usize,
    /// Values used from the current snapshot
    pub current_count: usize,
}

/// Result of evaluating a list of features
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureEvaluation {
    /// Scored features, in requested order
    pub results: Vec<FeatureDrift>,
    /// Skipped or failed features
    pub warnings: Vec<String>,
}

impl FeatureEvaluation {
    /// Look up the result for a feature
    pub fn get(&self, feature: &str) -> Option<&FeatureDrift> {
        self.results.iter().find(|r| r.feature == feature)
    }

    /// Summary counts over the scored features
    pub fn summary(&self) -> DriftSummary {
        DriftSummary::from_results(&self.results)
    }
}

/// Summary of drift detection results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Total number of features scored
    pub total_features: usize,
    /// Number of features at moderate or severe tier
    pub drifted_features: usize,
    /// Number of moderate-tier features
    pub moderate: usize,
    /// Number of severe-tier features
    pub severe: usize,
}

impl DriftSummary {
    /// Tally tiers of the given results
    pub fn from_results(results: &[FeatureDrift]) -> Self {
        let moderate = results.iter().filter(|r| r.tier == Tier::Moderate).count();
        let severe = results.iter().filter(|r| r.tier == Tier::Severe).count();
        Self {
            total_features: results.len(),
            drifted_features: moderate + severe,
            moderate,
            severe,
        }
    }

    /// Whether any severe drift was detected
    pub fn has_severe(&self) -> bool {
        self.severe > 0
    }

    /// Whether any drift was detected (moderate or severe)
    pub fn has_drift(&self) -> bool {
        self.drifted_features > 0
    }

    /// Percentage of features that drifted
    pub fn drift_percentage(&self) -> f64 {
        if self.total_features == 0 {
            0.0
        } else {
            100.0 * self.drifted_features as f64 / self.total_features as f64
        }
    }
}
