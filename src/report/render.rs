//! Report renderers: JSON (machine-readable), text and HTML (human-readable).

use std::fmt::{self, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::Report;
use crate::error::{Error, Result};
use crate::eval::drift::FeatureDrift;
use crate::eval::quality::QualityBlock;

/// Report rendering format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    #[default]
    Text,
    Html,
}

impl ReportFormat {
    /// Pick a renderer: explicit format, then path extension, then text.
    pub fn resolve(explicit: Option<ReportFormat>, path: Option<&Path>) -> ReportFormat {
        if let Some(format) = explicit {
            return format;
        }
        path.and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "json" => Some(ReportFormat::Json),
                "html" | "htm" => Some(ReportFormat::Html),
                "txt" | "text" => Some(ReportFormat::Text),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "text" | "txt" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            _ => Err(format!("Unknown report format: {s}. Valid formats: json, text, html")),
        }
    }
}

/// Render a report in the given format
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => render_json(report),
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Html => Ok(render_html(report)),
    }
}

/// Pretty-printed JSON
pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| Error::Serialization(e.to_string()))
}

/// Console summary
pub fn render_text(report: &Report) -> String {
    let mut output = String::new();

    // Writing to String never fails, so we ignore the Result
    let _ = writeln!(output, "═══════════════════════════════════════════════════════════════");
    let _ = writeln!(output, "                       DRIFT MONITORING REPORT                  ");
    let _ = writeln!(output, "═══════════════════════════════════════════════════════════════");
    let _ = writeln!(output);
    let _ = writeln!(output, "Generated: {}", report.generated_at.to_rfc3339());
    let _ = writeln!(
        output,
        "Reference: {} ({} rows, {} columns)",
        report.reference.source, report.reference.rows, report.reference.columns
    );
    let fallback = if report.current.fallback { " [fallback sample]" } else { "" };
    let _ = writeln!(
        output,
        "Current:   {} ({} rows, {} columns){fallback}",
        report.current.source, report.current.rows, report.current.columns
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "─── Feature Drift (PSI) ────────────────────────────────────────");
    for feature in &report.features {
        let _ = writeln!(output, "  {}", feature_line(feature));
    }
    let _ = writeln!(
        output,
        "  {} of {} features drifted ({:.1}%)",
        report.summary.drifted_features,
        report.summary.total_features,
        report.summary.drift_percentage()
    );
    let _ = writeln!(output);

    if let Some(quality) = &report.quality {
        write_quality_text(&mut output, quality);
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(output, "─── Warnings ───────────────────────────────────────────────────");
        for warning in &report.warnings {
            let _ = writeln!(output, "  ! {warning}");
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "─── Verdict ────────────────────────────────────────────────────");
    let _ = writeln!(output, "  drift_detected = {}", report.drift_detected);
    for reason in &report.reasons {
        let _ = writeln!(output, "  → {reason}");
    }
    let _ = writeln!(output, "═══════════════════════════════════════════════════════════════");

    output
}

fn feature_line(feature: &FeatureDrift) -> String {
    format!("{:<24} PSI = {:.4}  [{}]", feature.feature, feature.score, feature.tier.status())
}

fn write_quality_text(output: &mut String, quality: &QualityBlock) {
    let _ = writeln!(output, "─── Prediction & Quality ({}) ─────────────────────", quality.scorer);
    let _ = writeln!(output, "  {}", feature_line(&quality.prediction_drift));
    match &quality.target_drift {
        Some(target) => {
            let _ = writeln!(output, "  {}", feature_line(target));
        }
        None => {
            let _ = writeln!(output, "  target drift unavailable");
        }
    }
    for m in &quality.metrics {
        match (m.current, m.delta) {
            (Some(current), Some(delta)) => {
                let _ = writeln!(
                    output,
                    "  {:<10} reference {:.4}  current {:.4}  delta {:+.4}",
                    m.metric.name(),
                    m.reference,
                    current,
                    delta
                );
            }
            _ => {
                let _ = writeln!(
                    output,
                    "  {:<10} reference {:.4}  current unavailable",
                    m.metric.name(),
                    m.reference
                );
            }
        }
    }
    for warning in &quality.warnings {
        let _ = writeln!(output, "  ! {warning}");
    }
    let _ = writeln!(output);
}

/// Standalone HTML page
pub fn render_html(report: &Report) -> String {
    let mut html = String::new();
    let verdict_class = if report.drift_detected { "drift" } else { "ok" };

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Drift Report</title>\n<style>\n");
    html.push_str("body { font-family: sans-serif; margin: 2em; }\n");
    html.push_str("table { border-collapse: collapse; }\n");
    html.push_str("td, th { border: 1px solid #ccc; padding: 4px 10px; text-align: left; }\n");
    html.push_str(".stable, .ok { color: #1a7f37; }\n.moderate { color: #9a6700; }\n");
    html.push_str(".severe, .drift { color: #cf222e; font-weight: bold; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(html, "<h1>Drift Report</h1>");
    let _ = writeln!(
        html,
        "<p class=\"{verdict_class}\">drift_detected = {}</p>",
        report.drift_detected
    );
    let _ = writeln!(html, "<p>Generated {}</p>", escape_html(&report.generated_at.to_rfc3339()));
    let _ = writeln!(html, "<table>\n<tr><th>Snapshot</th><th>Source</th><th>Rows</th><th>Columns</th></tr>");
    for (label, summary) in [("reference", &report.reference), ("current", &report.current)] {
        let fallback = if summary.fallback { " (fallback)" } else { "" };
        let _ = writeln!(
            html,
            "<tr><td>{label}{fallback}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&summary.source),
            summary.rows,
            summary.columns
        );
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Feature drift</h2>\n<table>\n");
    html.push_str("<tr><th>Feature</th><th>PSI</th><th>Tier</th><th>KS</th><th>KS p-value</th></tr>\n");
    for feature in &report.features {
        html_feature_row(&mut html, feature);
    }
    html.push_str("</table>\n");

    if let Some(quality) = &report.quality {
        let _ = writeln!(html, "<h2>Prediction &amp; quality ({})</h2>", escape_html(&quality.scorer));
        html.push_str("<table>\n");
        html.push_str("<tr><th>Feature</th><th>PSI</th><th>Tier</th><th>KS</th><th>KS p-value</th></tr>\n");
        html_feature_row(&mut html, &quality.prediction_drift);
        if let Some(target) = &quality.target_drift {
            html_feature_row(&mut html, target);
        }
        html.push_str("</table>\n<table>\n");
        html.push_str("<tr><th>Metric</th><th>Reference</th><th>Current</th><th>Delta</th></tr>\n");
        for m in &quality.metrics {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{:.4}</td><td>{}</td><td>{}</td></tr>",
                m.metric.name(),
                m.reference,
                m.current.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}")),
                m.delta.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.4}"))
            );
        }
        html.push_str("</table>\n");
        html_list(&mut html, "Quality warnings", &quality.warnings);
    }

    html_list(&mut html, "Reasons", &report.reasons);
    html_list(&mut html, "Warnings", &report.warnings);
    html.push_str("</body>\n</html>\n");
    html
}

fn html_feature_row(html: &mut String, feature: &FeatureDrift) {
    let optional = |v: Option<f64>| v.map_or_else(String::new, |v| format!("{v:.4}"));
    let _ = writeln!(
        html,
        "<tr><td>{}</td><td>{:.4}</td><td class=\"{tier}\">{tier}</td><td>{}</td><td>{}</td></tr>",
        escape_html(&feature.feature),
        feature.score,
        optional(feature.ks_statistic),
        optional(feature.ks_p_value),
        tier = feature.tier,
    );
}

fn html_list(html: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(html, "<h2>{title}</h2>\n<ul>");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", escape_html(item));
    }
    html.push_str("</ul>\n");
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
