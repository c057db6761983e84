//! Scorer capability and built-in scorers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::Snapshot;
use crate::error::{Error, Result};

/// Anything able to produce class predictions and positive-class probabilities
/// for a table of feature rows.
///
/// Implementations must be deterministic for identical input and must not
/// retain state between calls.
pub trait Scorer: Send + Sync {
    /// Name shown in reports
    fn name(&self) -> &str;

    /// Hard class prediction (0 or 1) per row
    fn predict(&self, table: &Snapshot) -> Result<Vec<u8>>;

    /// Probability of the positive class per row, in `[0, 1]`
    fn predict_probability(&self, table: &Snapshot) -> Result<Vec<f64>>;
}

/// Logistic model stored as JSON: `sigmoid(intercept + Σ weight * column)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScorer {
    /// Bias term
    pub intercept: f64,
    /// Weight per input column
    pub weights: BTreeMap<String, f64>,
    /// Probability at or above which the positive class is predicted
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(skip)]
    name: String,
}

fn default_threshold() -> f64 {
    0.5
}

impl LinearScorer {
    /// Create a scorer from explicit coefficients
    pub fn new(intercept: f64, weights: BTreeMap<String, f64>) -> Self {
        Self { intercept, weights, threshold: default_threshold(), name: "linear".to_string() }
    }

    /// Load coefficients from a JSON model file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read model file {}: {e}", path.display()))
        })?;
        let mut scorer: LinearScorer = serde_json::from_str(&content).map_err(|e| {
            Error::ConfigError(format!("Failed to parse model file {}: {e}", path.display()))
        })?;
        if !(0.0..=1.0).contains(&scorer.threshold) {
            return Err(Error::ConfigError(format!(
                "model threshold {} outside [0, 1]",
                scorer.threshold
            )));
        }
        scorer.name = format!("linear:{}", path.display());
        Ok(scorer)
    }
}

impl Scorer for LinearScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, table: &Snapshot) -> Result<Vec<u8>> {
        Ok(self
            .predict_probability(table)?
            .into_iter()
            .map(|p| u8::from(p >= self.threshold))
            .collect())
    }

    fn predict_probability(&self, table: &Snapshot) -> Result<Vec<f64>> {
        let mut logits = vec![self.intercept; table.n_rows()];
        for (column, weight) in &self.weights {
            let values = table.numeric(column).ok_or_else(|| {
                Error::ScorerFailure(format!("numeric input column '{column}' not found"))
            })?;
            for (logit, &x) in logits.iter_mut().zip(values) {
                if !x.is_finite() {
                    return Err(Error::ScorerFailure(format!(
                        "non-finite value in input column '{column}'"
                    )));
                }
                *logit += weight * x;
            }
        }
        Ok(logits.into_iter().map(|z| 1.0 / (1.0 + (-z).exp())).collect())
    }
}

/// Reads predictions the serving layer already attached to each row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnScorer {
    prediction: String,
    probability: String,
}

impl ColumnScorer {
    /// Use the given hard-prediction and probability columns
    pub fn new(prediction: impl Into<String>, probability: impl Into<String>) -> Self {
        Self { prediction: prediction.into(), probability: probability.into() }
    }
}

impl Scorer for ColumnScorer {
    fn name(&self) -> &str {
        "prediction-columns"
    }

    /// Uses the prediction column if present, else thresholds probabilities at 0.5
    fn predict(&self, table: &Snapshot) -> Result<Vec<u8>> {
        match table.numeric(&self.prediction) {
            Some(values) => values
                .iter()
                .map(|&v| {
                    if v == 0.0 {
                        Ok(0)
                    } else if v == 1.0 {
                        Ok(1)
                    } else {
                        Err(Error::ScorerFailure(format!(
                            "non-binary value {v} in column '{}'",
                            self.prediction
                        )))
                    }
                })
                .collect(),
            None => Ok(self
                .predict_probability(table)?
                .into_iter()
                .map(|p| u8::from(p >= 0.5))
                .collect()),
        }
    }

    fn predict_probability(&self, table: &Snapshot) -> Result<Vec<f64>> {
        table
            .numeric(&self.probability)
            .map(<[f64]>::to_vec)
            .ok_or_else(|| {
                Error::ScorerFailure(format!(
                    "numeric probability column '{}' not found",
                    self.probability
                ))
            })
    }
}

/// A way of obtaining a scorer, tried in priority order
#[derive(Clone, Debug, PartialEq)]
pub enum ScorerSource {
    /// JSON logistic model on disk
    ModelFile(PathBuf),
    /// Precomputed prediction columns in the snapshots
    PredictionColumns { prediction: String, probability: String },
}

/// Resolve the first available scorer from a fixed priority list.
///
/// Called once at startup; the rest of the run only sees the resolved scorer.
/// A model file that does not exist falls through to the next candidate;
/// one that exists but cannot be parsed is an error.
pub fn resolve_scorer(candidates: &[ScorerSource]) -> Result<Option<Box<dyn Scorer>>> {
    for candidate in candidates {
        match candidate {
            ScorerSource::ModelFile(path) => {
                if path.exists() {
                    let scorer = LinearScorer::load(path)?;
                    tracing::info!(scorer = scorer.name(), "resolved scorer");
                    return Ok(Some(Box::new(scorer)));
                }
                tracing::warn!(path = %path.display(), "model file not found, trying next scorer");
            }
            ScorerSource::PredictionColumns { prediction, probability } => {
                tracing::info!(%prediction, %probability, "resolved scorer from prediction columns");
                return Ok(Some(Box::new(ColumnScorer::new(prediction, probability))));
            }
        }
    }
    Ok(None)
}
