use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use mapping_protocol::{serialize_json_pretty, ReconciliationRecord, Report, ReportSummary, Status};
use std::fs;
use std::path::Path;

/// Drift rows listed in the console summary before truncating
const MAX_LISTED_DRIFT: usize = 20;

pub fn build_report(
    api_base_url: &str,
    openapi_url: &str,
    total_frontend_endpoints: usize,
    total_calls_detected: usize,
    details: Vec<ReconciliationRecord>,
) -> Report {
    Report {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        api_base_url: api_base_url.to_string(),
        openapi_url: openapi_url.to_string(),
        summary: ReportSummary {
            total_frontend_endpoints,
            total_calls_detected,
        },
        details,
    }
}

/// Write the report as pretty JSON, creating parent directories and replacing
/// any previous report.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create report dir {}", parent.display()))?;
    }
    let mut body = serialize_json_pretty(report)?;
    body.push('\n');
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Report written to {}", path.display());
    Ok(())
}

pub fn render_summary(report: &Report, report_path: &Path) -> String {
    let counts = report.status_counts();

    let mut out = String::new();
    out.push_str(&format!("API mapping report: {}\n", report_path.display()));
    out.push_str(&format!("- Schema: {}\n", report.openapi_url));
    out.push_str(&format!(
        "- Front-end endpoints: {}\n",
        report.summary.total_frontend_endpoints
    ));
    out.push_str(&format!(
        "- Calls detected: {}\n\n",
        report.summary.total_calls_detected
    ));

    for status in Status::ALL {
        out.push_str(&format!("{:<16} {}\n", status.as_str(), counts.get(status)));
    }

    let drift: Vec<&ReconciliationRecord> = report
        .details
        .iter()
        .filter(|record| record.status.is_drift())
        .collect();

    if drift.is_empty() {
        out.push_str("\nNo METHOD_MISMATCH or NOT_FOUND: front-end calls match the backend schema.\n");
        return out;
    }

    out.push('\n');
    for record in drift.iter().take(MAX_LISTED_DRIFT) {
        out.push_str(&format!(
            "  {:<16} {:<6} {}{}{}\n",
            record.status.as_str(),
            record.method.map_or("-", |m| m.as_str()),
            record.path,
            record
                .key_path
                .as_deref()
                .map_or(String::new(), |key| format!(" ({key})")),
            available_hint(record),
        ));
    }
    if drift.len() > MAX_LISTED_DRIFT {
        out.push_str(&format!(
            "  ... {} more in the report\n",
            drift.len() - MAX_LISTED_DRIFT
        ));
    }
    out.push_str(&format!(
        "\nDrift found: {} record(s) with METHOD_MISMATCH or NOT_FOUND.\n",
        drift.len()
    ));
    out
}

fn available_hint(record: &ReconciliationRecord) -> String {
    if record.status != Status::MethodMismatch {
        return String::new();
    }
    format!(" [backend: {}]", record.backend_available_methods.join(", "))
}
