//! Check command implementation

use std::path::{Path, PathBuf};

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, CheckArgs, MonitorSpec, OutputFormat};
use crate::error;
use crate::eval::quality::resolve_scorer;
use crate::report::{
    render, DriftMonitor, FallbackPolicy, Report, ReportFormat, ReportOutput, SnapshotSource,
};

pub fn run_check(args: CheckArgs, level: LogLevel) -> Result<(), String> {
    let (report, location) = execute_check(&args, level).map_err(|e| e.to_string())?;
    let console =
        console_output(&report, &location, args.format, level).map_err(|e| e.to_string())?;
    print!("{}", console.stdout);
    eprint!("{}", console.stderr);
    Ok(())
}

/// What the check command prints, split by stream
#[derive(Debug, Default)]
pub(crate) struct ConsoleOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Render the console summary and the trigger signal.
///
/// The signal lines are printed at every log level. With JSON output they go
/// to stderr so stdout stays a single JSON document.
pub(crate) fn console_output(
    report: &Report,
    location: &Path,
    format: OutputFormat,
    level: LogLevel,
) -> error::Result<ConsoleOutput> {
    let mut console = ConsoleOutput::default();
    if format == OutputFormat::Json || level != LogLevel::Quiet {
        console.stdout = render(report, format.report_format())?;
        if !console.stdout.ends_with('\n') {
            console.stdout.push('\n');
        }
    }

    let signal = report.signal(location.display().to_string());
    let lines = format!(
        "drift_detected={}\nreport={}\n",
        signal.drift_detected, signal.report_location
    );
    match format {
        OutputFormat::Json => console.stderr = lines,
        OutputFormat::Text => console.stdout.push_str(&lines),
    }
    Ok(console)
}

/// Build the monitor from configuration, run it and persist the report.
///
/// Returns the report and the location of the machine-readable artifact.
pub(crate) fn execute_check(
    args: &CheckArgs,
    level: LogLevel,
) -> error::Result<(Report, PathBuf)> {
    let mut spec = match &args.config {
        Some(path) => {
            log(level, LogLevel::Verbose, &format!("Config: {}", path.display()));
            MonitorSpec::load(path)?
        }
        None => MonitorSpec::default(),
    };
    apply_overrides(&mut spec, args);
    spec.validate()?;

    log(level, LogLevel::Normal, &format!("Reference: {}", spec.data.reference.display()));
    log(level, LogLevel::Normal, &format!("Current:   {}", spec.data.current.display()));

    let scorer = resolve_scorer(&spec.scorer_sources())?;
    if let Some(scorer) = &scorer {
        log(level, LogLevel::Verbose, &format!("Scorer: {}", scorer.name()));
    }

    let mut monitor = DriftMonitor::new(spec.columns.target.clone())
        .with_features(spec.columns.features.clone())
        .with_excluded(spec.excluded_columns())
        .with_bins(spec.psi.bins)
        .with_parallel(spec.psi.parallel)
        .with_policy(spec.policy.clone());
    if let Some(scorer) = scorer {
        monitor = monitor.with_scorer(scorer);
    }
    if spec.data.fallback.enabled {
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "Fallback: {} ({} rows, seed {})",
                spec.data.fallback.pool.display(),
                spec.data.fallback.sample_size,
                spec.data.fallback.seed
            ),
        );
        monitor = monitor.with_fallback(FallbackPolicy {
            pool: SnapshotSource::Path(spec.data.fallback.pool.clone()),
            sample_size: spec.data.fallback.sample_size,
            seed: spec.data.fallback.seed,
        });
    }

    let mut outputs = vec![ReportOutput::new(spec.output.report.clone())];
    if let Some(html) = &spec.output.html {
        outputs.push(ReportOutput::with_format(html.clone(), ReportFormat::Html));
    }

    let reference = SnapshotSource::Path(spec.data.reference.clone());
    let current = SnapshotSource::Path(spec.data.current.clone());
    let report = monitor.run_and_persist(&reference, Some(&current), &outputs)?;

    for warning in &report.warnings {
        log(level, LogLevel::Verbose, &format!("Warning: {warning}"));
    }
    Ok((report, spec.output.report))
}
