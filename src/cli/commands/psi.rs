//! Psi command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::PsiArgs;
use crate::data::load_csv;
use crate::error::Error;
use crate::eval::drift::{FeatureDrift, FeatureDriftEvaluator, TierThresholds, MAX_BINS};

pub fn run_psi(args: PsiArgs, level: LogLevel) -> Result<(), String> {
    let drift = column_drift(&args).map_err(|e| e.to_string())?;

    log(level, LogLevel::Normal, &format!("Column: {}", drift.feature));
    log(
        level,
        LogLevel::Normal,
        &format!("  PSI: {:.4} ({}, {})", drift.score, drift.tier, drift.tier.status()),
    );
    if let (Some(d), Some(p)) = (drift.ks_statistic, drift.ks_p_value) {
        log(level, LogLevel::Normal, &format!("  KS statistic: {d:.4} (p = {p:.4})"));
    }
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Values: {} reference, {} current ({} bins)",
            drift.reference_count, drift.current_count, args.bins
        ),
    );
    Ok(())
}

pub(crate) fn column_drift(args: &PsiArgs) -> crate::error::Result<FeatureDrift> {
    if !(2..=MAX_BINS).contains(&args.bins) {
        return Err(Error::ConfigError(format!(
            "--bins must be in 2..={MAX_BINS}, got {}",
            args.bins
        )));
    }
    let reference = load_csv(&args.reference)?;
    let current = load_csv(&args.current)?;
    let missing = |side: &str| {
        Error::InvalidInput(format!(
            "column '{}' not found in {side} data",
            args.column
        ))
    };
    let ref_col = reference.column(&args.column).ok_or_else(|| missing("reference"))?;
    let cur_col = current.column(&args.column).ok_or_else(|| missing("current"))?;
    FeatureDriftEvaluator::new(args.bins, TierThresholds::default()).evaluate_column(
        &args.column,
        ref_col,
        cur_col,
    )
}
