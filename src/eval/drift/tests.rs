//! Tests for the feature drift evaluator.

use super::*;
use crate::data::{Column, ColumnKind, Snapshot};
use crate::error::Error;

fn numeric(values: impl Iterator<Item = f64>) -> Column {
    Column::Numeric(values.collect())
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn reference() -> Snapshot {
    Snapshot::from_columns(vec![
        ("A", numeric((0..500).map(f64::from))),
        ("B", numeric((0..500).map(|i| f64::from(i % 7)))),
        ("C", numeric((0..500).map(|i| f64::from(i) * 2.0))),
    ])
    .unwrap()
}

#[test]
fn test_schema_mismatch_tolerance() {
    let current = Snapshot::from_columns(vec![
        ("A", numeric((0..500).map(f64::from))),
        ("B", numeric((0..500).map(|i| f64::from(i % 7)))),
    ])
    .unwrap();

    let evaluation = FeatureDriftEvaluator::default().evaluate_features(
        &reference(),
        &current,
        &names(&["A", "B", "C"]),
    );

    assert_eq!(evaluation.results.len(), 2);
    assert!(evaluation.get("A").is_some());
    assert!(evaluation.get("B").is_some());
    assert!(evaluation.get("C").is_none());
    assert_eq!(evaluation.warnings.len(), 1);
    assert!(evaluation.warnings[0].contains("'C'"));
}

#[test]
fn test_identical_snapshots_are_stable() {
    let r = reference();
    let evaluation =
        FeatureDriftEvaluator::default().evaluate_features(&r, &r, &names(&["A", "B", "C"]));
    assert_eq!(evaluation.results.len(), 3);
    assert!(evaluation.results.iter().all(|d| d.tier == Tier::Stable));
    assert!(!evaluation.summary().has_drift());
}

#[test]
fn test_shifted_feature_is_severe() {
    let current = Snapshot::from_columns(vec![
        ("A", numeric((0..500).map(|i| f64::from(i) + 400.0))),
        ("B", numeric((0..500).map(|i| f64::from(i % 7)))),
        ("C", numeric((0..500).map(|i| f64::from(i) * 2.0))),
    ])
    .unwrap();

    let evaluation = FeatureDriftEvaluator::default().evaluate_features(
        &reference(),
        &current,
        &names(&["A", "B", "C"]),
    );

    let a = evaluation.get("A").unwrap();
    assert_eq!(a.tier, Tier::Severe);
    assert!(a.ks_statistic.unwrap() > 0.7);
    assert_eq!(evaluation.get("B").unwrap().tier, Tier::Stable);
    assert_eq!(evaluation.summary().drifted_features, 1);
}

#[test]
fn test_results_follow_requested_order() {
    let r = reference();
    let evaluation = FeatureDriftEvaluator::default()
        .with_parallel(true)
        .evaluate_features(&r, &r, &names(&["C", "A", "B"]));
    let order: Vec<&str> = evaluation.results.iter().map(|d| d.feature.as_str()).collect();
    assert_eq!(order, vec!["C", "A", "B"]);
}

#[test]
fn test_bad_column_is_isolated() {
    let r = Snapshot::from_columns(vec![
        ("A", numeric((0..100).map(f64::from))),
        ("EMPTY", Column::Numeric(vec![f64::NAN; 100])),
        ("MIXED", Column::Categorical(vec!["x".to_string(); 100])),
    ])
    .unwrap();
    let c = Snapshot::from_columns(vec![
        ("A", numeric((0..100).map(f64::from))),
        ("EMPTY", numeric((0..100).map(f64::from))),
        ("MIXED", numeric((0..100).map(f64::from))),
    ])
    .unwrap();

    let evaluation =
        FeatureDriftEvaluator::default().evaluate_features(&r, &c, &names(&["A", "EMPTY", "MIXED"]));
    assert_eq!(evaluation.results.len(), 1);
    assert_eq!(evaluation.warnings.len(), 2);
    assert!(evaluation.warnings.iter().all(|w| w.starts_with("InvalidInput")));
}

#[test]
fn test_categorical_feature() {
    let cats = |v: &[&str]| Column::Categorical(v.iter().map(|s| s.to_string()).collect());
    let evaluator = FeatureDriftEvaluator::default();
    let drift = evaluator
        .evaluate_column("SEX", &cats(&["1", "2", "2", "1"]), &cats(&["1", "2", "1", "2"]))
        .unwrap();
    assert_eq!(drift.kind, ColumnKind::Categorical);
    assert_eq!(drift.tier, Tier::Stable);
    assert!(drift.ks_statistic.is_none());
}

#[test]
fn test_evaluate_values_pseudo_feature() {
    let reference: Vec<f64> = (0..200).map(|i| f64::from(i) / 200.0).collect();
    let current: Vec<f64> = reference.iter().map(|p| (p * 0.3 + 0.7).min(1.0)).collect();
    let drift = FeatureDriftEvaluator::default()
        .evaluate_values("predicted_probability", &reference, &current)
        .unwrap();
    assert_eq!(drift.feature, "predicted_probability");
    assert!(drift.tier.is_drift());
}

#[test]
fn test_evaluate_values_empty() {
    let err = FeatureDriftEvaluator::default()
        .evaluate_values("p", &[], &[0.5])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_degenerate_identical_constant() {
    let x = vec![42.0; 300];
    let drift = FeatureDriftEvaluator::default().evaluate_values("k", &x, &x).unwrap();
    assert!(drift.score.abs() < 1e-12);
    assert_eq!(drift.tier, Tier::Stable);
}
