//! Drift report value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::Snapshot;
use crate::eval::drift::{DriftSummary, FeatureDrift, Tier};
use crate::eval::quality::QualityBlock;
use crate::eval::retrain::{TriggerSignal, VerdictPolicy};

/// Where a snapshot came from and how big it was
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Path or label of the snapshot
    pub source: String,
    pub rows: usize,
    pub columns: usize,
    /// Whether the snapshot is a fallback sample standing in for missing data
    #[serde(default)]
    pub fallback: bool,
}

impl DatasetSummary {
    /// Describe a loaded snapshot
    pub fn of(source: impl Into<String>, snapshot: &Snapshot, fallback: bool) -> Self {
        Self {
            source: source.into(),
            rows: snapshot.n_rows(),
            columns: snapshot.n_columns(),
            fallback,
        }
    }
}

/// Outcome of one drift evaluation run.
///
/// Every renderer derives its output from this value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub reference: DatasetSummary,
    pub current: DatasetSummary,
    /// Per-feature scores, in configured feature order
    pub features: Vec<FeatureDrift>,
    pub summary: DriftSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityBlock>,
    pub drift_detected: bool,
    /// Why `drift_detected` is true
    #[serde(default)]
    pub reasons: Vec<String>,
    /// Schema mismatches, skipped features, fallback usage, isolated failures
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Policy the verdict was decided under
    pub policy: VerdictPolicy,
}

impl Report {
    /// Look up a feature result
    pub fn feature(&self, name: &str) -> Option<&FeatureDrift> {
        self.features.iter().find(|f| f.feature == name)
    }

    /// Features at the given tier
    pub fn features_at(&self, tier: Tier) -> impl Iterator<Item = &FeatureDrift> {
        self.features.iter().filter(move |f| f.tier == tier)
    }

    /// Signal published to the workflow scheduler
    pub fn signal(&self, report_location: impl Into<String>) -> TriggerSignal {
        TriggerSignal {
            drift_detected: self.drift_detected,
            report_location: report_location.into(),
        }
    }
}
