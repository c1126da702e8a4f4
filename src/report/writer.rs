use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::check::{CheckResult, Severity};
use crate::error::Result;
use super::{ReportSummary, ValidationReport};

pub const JSON_REPORT_FILE: &str = "validation_report.json";
pub const CSV_REPORT_FILE: &str = "validation_report.csv";

/// Flat form of a [`CheckResult`]; samples are embedded as a JSON string.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    check_name: &'a str,
    table: &'a str,
    severity: Severity,
    passed: bool,
    failed_count: usize,
    sample_failures: String,
}

impl<'a> CsvRow<'a> {
    fn from_result(result: &'a CheckResult) -> Result<Self> {
        Ok(Self {
            check_name: &result.check_name,
            table: &result.table,
            severity: result.severity,
            passed: result.passed,
            failed_count: result.failed_count,
            sample_failures: serde_json::to_string(&result.sample_failures)?,
        })
    }
}

/// Writes the nested (JSON) and flat (CSV) artifacts of a report.
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn write(&self, report: &ValidationReport) -> Result<ReportSummary> {
        fs::create_dir_all(&self.out_dir)?;

        let json_path = self.out_dir.join(JSON_REPORT_FILE);
        let csv_path = self.out_dir.join(CSV_REPORT_FILE);

        let json = render_json(&report.results)?;
        fs::write(&json_path, &json)?;
        write_csv(&report.results, &csv_path)?;

        info!("Wrote {} and {}", json_path.display(), csv_path.display());

        Ok(ReportSummary {
            total_checks: report.total_count(),
            passed: report.passed_count(),
            failed: report.failed_count(),
            critical_failed: report.critical_failed_count(),
            json_report: json_path,
            csv_report: csv_path,
            json_sha256: sha256(&json),
        })
    }
}

pub fn render_json(results: &[CheckResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

fn write_csv(results: &[CheckResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(CsvRow::from_result(result)?)?;
    }
    writer.flush()?;
    Ok(())
}

fn sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
