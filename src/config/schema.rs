//! YAML schema for drift monitoring configuration
//!
//! Every field has a default, so an empty document is a valid configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::eval::drift::MAX_BINS;
use crate::eval::quality::ScorerSource;
use crate::eval::retrain::VerdictPolicy;

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Complete monitoring specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSpec {
    /// Snapshot locations
    pub data: DataSpec,

    /// Target, feature and prediction column names
    pub columns: ColumnSpec,

    /// Scorer capability used for quality evaluation
    pub scorer: ScorerSpec,

    /// PSI computation settings
    pub psi: PsiSpec,

    /// Verdict thresholds and triggers
    pub policy: VerdictPolicy,

    /// Report destinations
    pub output: OutputSpec,
}

/// Snapshot locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSpec {
    /// Reference (training) snapshot
    pub reference: PathBuf,
    /// Current (production) snapshot
    pub current: PathBuf,
    /// Sample used when current data is unavailable
    pub fallback: FallbackSpec,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self {
            reference: PathBuf::from("data/processed/train.csv"),
            current: PathBuf::from("data/processed/current.csv"),
            fallback: FallbackSpec::default(),
        }
    }
}

/// Fallback sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSpec {
    /// Disabled unless explicitly approved
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub enabled: bool,
    /// Held-out pool to sample from
    pub pool: PathBuf,
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for FallbackSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            pool: PathBuf::from("data/processed/test.csv"),
            sample_size: 1000,
            seed: 42,
        }
    }
}

/// Column names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// Ground-truth label column
    pub target: String,
    /// Features to monitor; empty means all shared columns
    pub features: Vec<String>,
    /// Precomputed hard prediction column
    pub prediction: String,
    /// Precomputed positive-class probability column
    pub probability: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            target: "default.payment.next.month".to_string(),
            features: ["LIMIT_BAL", "AGE", "PAY_0", "BILL_AMT1", "PAY_AMT1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            prediction: "prediction".to_string(),
            probability: "prediction_proba".to_string(),
        }
    }
}

/// Scorer capability candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerSpec {
    /// JSON logistic model; tried first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    /// Fall back to the precomputed prediction columns
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub use_prediction_columns: bool,
}

/// PSI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiSpec {
    /// Number of quantile bins
    pub bins: usize,
    /// Evaluate features on the rayon pool
    #[serde(deserialize_with = "deserialize_bool_lenient")]
    pub parallel: bool,
}

impl Default for PsiSpec {
    fn default() -> Self {
        Self { bins: crate::eval::drift::DEFAULT_BINS, parallel: false }
    }
}

/// Report destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Machine-readable report
    pub report: PathBuf,
    /// Optional HTML rendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<PathBuf>,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self { report: PathBuf::from("monitoring/reports/drift_status.json"), html: None }
    }
}

impl MonitorSpec {
    /// Read, parse and validate a YAML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let spec = Self::from_yaml(&yaml)?;
        tracing::debug!(path = %path.display(), "loaded monitor config");
        Ok(spec)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: MonitorSpec = serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_BINS).contains(&self.psi.bins) {
            return Err(Error::ConfigError(format!(
                "Invalid config: psi.bins must be in 2..={MAX_BINS}, got {}",
                self.psi.bins
            )));
        }
        if self.data.fallback.sample_size == 0 {
            return Err(Error::ConfigError(
                "Invalid config: data.fallback.sample_size must be > 0".to_string(),
            ));
        }
        if self.columns.target.is_empty() {
            return Err(Error::ConfigError("Invalid config: columns.target is empty".to_string()));
        }
        self.policy.validate().map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))
    }

    /// Scorer candidates in priority order
    pub fn scorer_sources(&self) -> Vec<ScorerSource> {
        let mut sources = Vec::new();
        if let Some(model) = &self.scorer.model {
            sources.push(ScorerSource::ModelFile(model.clone()));
        }
        if self.scorer.use_prediction_columns {
            sources.push(ScorerSource::PredictionColumns {
                prediction: self.columns.prediction.clone(),
                probability: self.columns.probability.clone(),
            });
        }
        sources
    }

    /// Columns never monitored as input features
    pub fn excluded_columns(&self) -> Vec<String> {
        vec![self.columns.prediction.clone(), self.columns.probability.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::classification::Metric;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let spec = MonitorSpec::from_yaml("{}").unwrap();
        assert_eq!(spec, MonitorSpec::default());
        assert_eq!(spec.psi.bins, 10);
        assert_eq!(spec.data.fallback.sample_size, 1000);
        assert_eq!(spec.data.fallback.seed, 42);
        assert!(!spec.data.fallback.enabled);
        assert_eq!(spec.columns.features.len(), 5);
        assert_eq!(spec.output.report, PathBuf::from("monitoring/reports/drift_status.json"));
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let yaml = r#"
data:
  fallback:
    enabled: "true"
    sample_size: 250
policy:
  severe: 0.3
  quality:
    metric: roc_auc
    max_drop: 0.05
"#;
        let spec = MonitorSpec::from_yaml(yaml).unwrap();
        assert!(spec.data.fallback.enabled);
        assert_eq!(spec.data.fallback.sample_size, 250);
        assert_eq!(spec.data.fallback.seed, 42);
        assert_eq!(spec.data.reference, PathBuf::from("data/processed/train.csv"));
        assert!((spec.policy.severe - 0.3).abs() < 1e-12);
        assert_eq!(spec.policy.quality.unwrap().metric, Metric::RocAuc);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            MonitorSpec::from_yaml("psi:\n  bins: 1"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            MonitorSpec::from_yaml("psi:\n  bins: 18446744073709551615"),
            Err(Error::ConfigError(_))
        ));
        assert!(MonitorSpec::from_yaml(&format!("psi:\n  bins: {MAX_BINS}")).is_ok());
        assert!(MonitorSpec::from_yaml("policy:\n  moderate: 0.5\n  severe: 0.2").is_err());
        assert!(MonitorSpec::from_yaml("data:\n  fallback:\n    sample_size: 0").is_err());
        assert!(MonitorSpec::from_yaml("data:\n  fallback:\n    enabled: maybe").is_err());
        assert!(MonitorSpec::from_yaml("psi: [").is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut spec = MonitorSpec::default();
        spec.output.html = Some(PathBuf::from("monitoring/reports/drift_report.html"));
        let yaml = spec.to_yaml().unwrap();
        assert_eq!(MonitorSpec::from_yaml(&yaml).unwrap(), spec);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns:\n  features: [AGE]").unwrap();
        file.flush().unwrap();
        let spec = MonitorSpec::load(file.path()).unwrap();
        assert_eq!(spec.columns.features, vec!["AGE".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MonitorSpec::load("/nonexistent/deriva.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_scorer_sources_priority() {
        let mut spec = MonitorSpec::default();
        assert!(spec.scorer_sources().is_empty());

        spec.scorer.use_prediction_columns = true;
        spec.scorer.model = Some(PathBuf::from("models/scorer.json"));
        let sources = spec.scorer_sources();
        assert_eq!(sources.len(), 2);
        assert!(matches!(sources[0], ScorerSource::ModelFile(_)));
        assert!(matches!(sources[1], ScorerSource::PredictionColumns { .. }));
    }
}
