//! Verdict aggregation policy.

use serde::{Deserialize, Serialize};

use crate::eval::classification::Metric;
use crate::eval::drift::{FeatureDrift, Tier, TierThresholds, MODERATE_THRESHOLD, SEVERE_THRESHOLD};
use crate::eval::quality::QualityBlock;

/// Quality decay that triggers retraining on its own
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityTrigger {
    /// Metric to watch
    pub metric: Metric,
    /// Largest tolerated `reference - current` drop
    pub max_drop: f64,
}

/// Rules turning drift scores into the boolean `drift_detected`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictPolicy {
    /// Lowest feature score classified as `moderate`
    pub moderate: f64,
    /// Lowest feature score classified as `severe`
    pub severe: f64,
    /// Prediction drift score at or above which drift is declared
    pub prediction_drift: f64,
    /// Whether target (label) drift alone declares drift
    pub target_drift_triggers: bool,
    /// Optional quality decay rule; disabled by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityTrigger>,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            moderate: MODERATE_THRESHOLD,
            severe: SEVERE_THRESHOLD,
            prediction_drift: MODERATE_THRESHOLD,
            target_drift_triggers: false,
            quality: None,
        }
    }
}

/// Outcome of applying a policy
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    pub drift_detected: bool,
    /// Human-readable reasons, empty when no drift
    pub reasons: Vec<String>,
}

impl VerdictPolicy {
    /// Tier thresholds derived from this policy
    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds { moderate: self.moderate, severe: self.severe }
    }

    /// Check that thresholds are ordered and positive
    pub fn validate(&self) -> Result<(), String> {
        if !(self.moderate > 0.0 && self.moderate < self.severe) {
            return Err(format!(
                "tier thresholds must satisfy 0 < moderate < severe, got moderate={} severe={}",
                self.moderate, self.severe
            ));
        }
        if self.prediction_drift <= 0.0 {
            return Err(format!(
                "prediction drift threshold must be > 0, got {}",
                self.prediction_drift
            ));
        }
        if let Some(q) = &self.quality {
            if q.max_drop < 0.0 {
                return Err(format!("quality max_drop must be >= 0, got {}", q.max_drop));
            }
        }
        Ok(())
    }

    /// Aggregate feature and quality results into a verdict.
    ///
    /// Drift is declared when any feature is `moderate` or `severe`, or when
    /// prediction drift reaches `prediction_drift`. Target drift and quality
    /// decay count only when enabled.
    pub fn decide(&self, features: &[FeatureDrift], quality: Option<&QualityBlock>) -> Verdict {
        let thresholds = self.thresholds();
        let mut reasons: Vec<String> = features
            .iter()
            .filter_map(|f| {
                let tier = Tier::classify(f.score, &thresholds);
                tier.is_drift()
                    .then(|| format!("feature '{}' PSI {:.4} is {tier}", f.feature, f.score))
            })
            .collect();

        if let Some(q) = quality {
            if q.prediction_drift.score >= self.prediction_drift {
                reasons.push(format!(
                    "prediction drift PSI {:.4} >= {:.4}",
                    q.prediction_drift.score, self.prediction_drift
                ));
            }
            if self.target_drift_triggers {
                if let Some(t) = &q.target_drift {
                    if Tier::classify(t.score, &thresholds).is_drift() {
                        reasons.push(format!("target drift PSI {:.4}", t.score));
                    }
                }
            }
            if let Some(trigger) = &self.quality {
                if let Some(drop) = q.metric(trigger.metric).and_then(|m| m.drop()) {
                    if drop > trigger.max_drop {
                        reasons.push(format!(
                            "{} dropped by {drop:.4} (> {:.4})",
                            trigger.metric.name(),
                            trigger.max_drop
                        ));
                    }
                }
            }
        }

        Verdict { drift_detected: !reasons.is_empty(), reasons }
    }
}
