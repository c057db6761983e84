//! Tests for the retraining trigger module.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::data::ColumnKind;
use crate::error::Error;
use crate::eval::classification::Metric;
use crate::eval::drift::{FeatureDrift, Tier, TierThresholds};
use crate::eval::quality::{MetricDelta, QualityBlock};

fn feature(name: &str, score: f64) -> FeatureDrift {
    FeatureDrift {
        feature: name.to_string(),
        kind: ColumnKind::Numeric,
        score,
        tier: Tier::classify(score, &TierThresholds::default()),
        ks_statistic: None,
        ks_p_value: None,
        reference_count: 100,
        current_count: 100,
    }
}

fn quality(prediction_psi: f64, target_psi: f64, auc: (f64, f64)) -> QualityBlock {
    QualityBlock {
        scorer: "test".into(),
        prediction_drift: feature("predicted_probability", prediction_psi),
        target_drift: Some(feature("target", target_psi)),
        current_labels_available: true,
        metrics: vec![MetricDelta::new(Metric::RocAuc, auc.0, Some(auc.1))],
        warnings: vec![],
    }
}

#[test]
fn test_policy_default() {
    let policy = VerdictPolicy::default();
    assert!((policy.moderate - 0.1).abs() < 1e-12);
    assert!((policy.severe - 0.25).abs() < 1e-12);
    assert!(!policy.target_drift_triggers);
    assert!(policy.quality.is_none());
    assert!(policy.validate().is_ok());
}

#[test]
fn test_verdict_moderate_feature_triggers() {
    let features = [feature("A", 0.05), feature("B", 0.12), feature("C", 0.02)];
    let verdict = VerdictPolicy::default().decide(&features, None);
    assert!(verdict.drift_detected);
    assert_eq!(verdict.reasons.len(), 1);
    assert!(verdict.reasons[0].contains("'B'"));
}

#[test]
fn test_verdict_all_stable() {
    let features = [feature("A", 0.03), feature("B", 0.08)];
    let verdict = VerdictPolicy::default().decide(&features, None);
    assert!(!verdict.drift_detected);
    assert!(verdict.reasons.is_empty());
}

#[test]
fn test_verdict_no_features() {
    assert!(!VerdictPolicy::default().decide(&[], None).drift_detected);
}

#[test]
fn test_prediction_drift_triggers() {
    let features = [feature("A", 0.01)];
    let q = quality(0.15, 0.0, (0.8, 0.8));
    let verdict = VerdictPolicy::default().decide(&features, Some(&q));
    assert!(verdict.drift_detected);
    assert!(verdict.reasons[0].contains("prediction drift"));

    let q = quality(0.05, 0.0, (0.8, 0.8));
    assert!(!VerdictPolicy::default().decide(&features, Some(&q)).drift_detected);
}

#[test]
fn test_target_drift_only_when_enabled() {
    let q = quality(0.0, 0.5, (0.8, 0.8));
    assert!(!VerdictPolicy::default().decide(&[], Some(&q)).drift_detected);

    let policy = VerdictPolicy { target_drift_triggers: true, ..Default::default() };
    assert!(policy.decide(&[], Some(&q)).drift_detected);
}

#[test]
fn test_quality_trigger_only_when_configured() {
    let q = quality(0.0, 0.0, (0.80, 0.70));
    assert!(!VerdictPolicy::default().decide(&[], Some(&q)).drift_detected);

    let policy = VerdictPolicy {
        quality: Some(QualityTrigger { metric: Metric::RocAuc, max_drop: 0.05 }),
        ..Default::default()
    };
    let verdict = policy.decide(&[], Some(&q));
    assert!(verdict.drift_detected);
    assert!(verdict.reasons[0].contains("roc_auc"));

    let improved = quality(0.0, 0.0, (0.70, 0.80));
    assert!(!policy.decide(&[], Some(&improved)).drift_detected);
}

#[test]
fn test_custom_thresholds() {
    let policy = VerdictPolicy { moderate: 0.2, severe: 0.4, ..Default::default() };
    assert!(!policy.decide(&[feature("A", 0.15)], None).drift_detected);
    assert!(policy.decide(&[feature("A", 0.2)], None).drift_detected);
}

#[test]
fn test_policy_validate() {
    let bad = VerdictPolicy { moderate: 0.3, severe: 0.2, ..Default::default() };
    assert!(bad.validate().is_err());
    let bad = VerdictPolicy { prediction_drift: 0.0, ..Default::default() };
    assert!(bad.validate().is_err());
}

#[test]
fn test_policy_yaml_defaults() {
    let policy: VerdictPolicy = serde_yaml::from_str("severe: 0.3").unwrap();
    assert!((policy.severe - 0.3).abs() < 1e-12);
    assert!((policy.moderate - 0.1).abs() < 1e-12);

    let policy: VerdictPolicy =
        serde_yaml::from_str("quality:\n  metric: roc_auc\n  max_drop: 0.05").unwrap();
    assert_eq!(policy.quality.unwrap().metric, Metric::RocAuc);
}

#[test]
fn test_dispatch_skips_without_drift() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let trigger = CallbackTrigger::new(move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        Ok("job".to_string())
    });

    let signal = TriggerSignal { drift_detected: false, report_location: "r.json".into() };
    let action = dispatch(&signal, &trigger).unwrap();
    assert_eq!(action, Action::Skip);
    assert_eq!(action.branch(), "skip_retraining");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_dispatch_triggers_on_drift() {
    let trigger = CallbackTrigger::new(|signal| Ok(format!("retrain:{}", signal.report_location)));
    let signal = TriggerSignal { drift_detected: true, report_location: "r.json".into() };
    let action = dispatch(&signal, &trigger).unwrap();
    assert_eq!(action, Action::RetrainTriggered("retrain:r.json".to_string()));
    assert_eq!(action.branch(), "trigger_retraining");
}

#[test]
fn test_dispatch_propagates_trigger_error() {
    let trigger = CallbackTrigger::new(|_| Err(Error::ConfigError("scheduler offline".into())));
    let signal = TriggerSignal { drift_detected: true, report_location: "r.json".into() };
    assert!(dispatch(&signal, &trigger).is_err());
}
