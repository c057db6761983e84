//! End-to-end drift pipeline through CSV files
//!
//! reference/current CSV → DriftMonitor → persisted report → trigger dispatch

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use deriva::data::{load_csv, ColumnKind};
use deriva::eval::classification::Metric;
use deriva::eval::drift::Tier;
use deriva::eval::quality::{resolve_scorer, ScorerSource};
use deriva::eval::retrain::{dispatch, Action, CallbackTrigger, QualityTrigger, VerdictPolicy};
use deriva::report::{DriftMonitor, FallbackPolicy, Report, ReportOutput, SnapshotSource};
use deriva::Error;

const TARGET: &str = "default.payment.next.month";

/// Credit-style table; `shift` moves LIMIT_BAL, `flip` inverts labels on odd rows
fn write_snapshot(dir: &Path, name: &str, rows: usize, shift: f64, flip: bool) -> PathBuf {
    let mut csv = format!("LIMIT_BAL,AGE,EDUCATION,{TARGET}\n");
    for i in 0..rows {
        let limit = 10_000.0 + 500.0 * i as f64 + shift;
        let age = 21 + i % 45;
        let education = ["graduate", "university", "high_school"][i % 3];
        let mut label = usize::from(age >= 43);
        if flip && i % 2 == 1 {
            label = 1 - label;
        }
        let _ = writeln!(csv, "{limit},{age},{education},{label}");
    }
    let path = dir.join(name);
    fs::write(&path, csv).unwrap();
    path
}

/// Logistic model that predicts default from AGE
fn write_model(dir: &Path) -> PathBuf {
    let path = dir.join("model.json");
    fs::write(&path, r#"{"intercept": -42.5, "weights": {"AGE": 1.0}, "threshold": 0.5}"#)
        .unwrap();
    path
}

fn features() -> Vec<String> {
    ["LIMIT_BAL", "AGE", "EDUCATION", "PAY_0"].iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_csv_loading_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path(), "train.csv", 30, 0.0, false);
    let snapshot = load_csv(&path).unwrap();
    assert_eq!(snapshot.n_rows(), 30);
    assert_eq!(snapshot.column("LIMIT_BAL").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(snapshot.column("EDUCATION").unwrap().kind(), ColumnKind::Categorical);
    assert_eq!(snapshot.column(TARGET).unwrap().kind(), ColumnKind::Numeric);
}

#[test]
fn test_stable_pipeline_skips_retraining() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_snapshot(dir.path(), "train.csv", 450, 0.0, false);
    let current = write_snapshot(dir.path(), "current.csv", 450, 0.0, false);
    let output = dir.path().join("monitoring/reports/drift_status.json");
    let scorer = resolve_scorer(&[ScorerSource::ModelFile(write_model(dir.path()))])
        .unwrap()
        .unwrap();

    let report = DriftMonitor::new(TARGET)
        .with_features(features())
        .with_scorer(scorer)
        .run_and_persist(
            &SnapshotSource::Path(reference),
            Some(&SnapshotSource::Path(current)),
            &[ReportOutput::new(&output)],
        )
        .unwrap();

    assert!(!report.drift_detected);
    assert_eq!(report.features.len(), 3);
    assert_eq!(report.feature("EDUCATION").unwrap().kind, ColumnKind::Categorical);
    assert!(report.warnings.iter().any(|w| w.contains("PAY_0")));

    let quality = report.quality.as_ref().unwrap();
    assert!(quality.current_labels_available);
    assert!((quality.metric(Metric::Accuracy).unwrap().reference - 1.0).abs() < 1e-9);

    let persisted: Report = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(persisted.drift_detected, report.drift_detected);

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let trigger = CallbackTrigger::new(move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        Ok("job-1".to_string())
    });
    let action = dispatch(&report.signal(output.display().to_string()), &trigger).unwrap();
    assert_eq!(action, Action::Skip);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_shifted_pipeline_triggers_retraining() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_snapshot(dir.path(), "train.csv", 450, 0.0, false);
    let current = write_snapshot(dir.path(), "current.csv", 450, 200_000.0, false);

    let report = DriftMonitor::new(TARGET)
        .with_features(features())
        .run(&SnapshotSource::Path(reference), Some(&SnapshotSource::Path(current)))
        .unwrap();

    assert!(report.drift_detected);
    assert_eq!(report.feature("LIMIT_BAL").unwrap().tier, Tier::Severe);
    assert_eq!(report.feature("AGE").unwrap().tier, Tier::Stable);

    let trigger = CallbackTrigger::new(|signal| Ok(format!("retrain<{}>", signal.report_location)));
    let action = dispatch(&report.signal("drift_status.json"), &trigger).unwrap();
    assert_eq!(action, Action::RetrainTriggered("retrain<drift_status.json>".to_string()));
}

#[test]
fn test_concept_drift_only_with_quality_trigger() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_snapshot(dir.path(), "train.csv", 450, 0.0, false);
    let current = write_snapshot(dir.path(), "current.csv", 450, 0.0, true);
    let model = write_model(dir.path());
    let monitor = |policy: VerdictPolicy| {
        let scorer = resolve_scorer(&[ScorerSource::ModelFile(model.clone())]).unwrap().unwrap();
        DriftMonitor::new(TARGET).with_features(features()).with_scorer(scorer).with_policy(policy)
    };
    let reference = SnapshotSource::Path(reference);
    let current = SnapshotSource::Path(current);

    // Inputs unchanged: only accuracy decays
    let report = monitor(VerdictPolicy::default()).run(&reference, Some(&current)).unwrap();
    let accuracy = report.quality.as_ref().unwrap().metric(Metric::Accuracy).unwrap();
    assert!(accuracy.drop().unwrap() > 0.3);
    assert!(!report.drift_detected);

    let policy = VerdictPolicy {
        quality: Some(QualityTrigger { metric: Metric::Accuracy, max_drop: 0.1 }),
        ..Default::default()
    };
    let report = monitor(policy).run(&reference, Some(&current)).unwrap();
    assert!(report.drift_detected);
    assert!(report.reasons.iter().any(|r| r.contains("accuracy")));
}

#[test]
fn test_missing_current_uses_fallback_or_fails() {
    let dir = tempfile::tempdir().unwrap();
    let reference = SnapshotSource::Path(write_snapshot(dir.path(), "train.csv", 300, 0.0, false));
    let pool = write_snapshot(dir.path(), "test.csv", 300, 0.0, false);
    let missing = SnapshotSource::Path(dir.path().join("current.csv"));
    let output = dir.path().join("drift_status.json");

    let err = DriftMonitor::new(TARGET)
        .with_features(features())
        .run_and_persist(&reference, Some(&missing), &[ReportOutput::new(&output)])
        .unwrap_err();
    assert!(matches!(err, Error::DataUnavailable(_)));
    assert!(!output.exists());

    let fallback = FallbackPolicy { pool: SnapshotSource::Path(pool), sample_size: 100, seed: 42 };
    let run = || {
        DriftMonitor::new(TARGET)
            .with_features(features())
            .with_fallback(fallback.clone())
            .run_and_persist(&reference, Some(&missing), &[ReportOutput::new(&output)])
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.current.fallback);
    assert_eq!(first.current.rows, 100);
    assert_eq!(first.features, second.features);
}
