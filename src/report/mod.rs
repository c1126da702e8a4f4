mod writer;
mod table_row;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::check::{CheckResult, Severity};

pub use writer::{ReportWriter, JSON_REPORT_FILE, CSV_REPORT_FILE};
pub use table_row::CheckTableRow;

/// Process-level verdict of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    CriticalFailure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::CriticalFailure => 2,
        }
    }
}

/// Ordered results of one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub results: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self { results }
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn critical_failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_critical_failure()).count()
    }

    pub fn warn_failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.passed && r.severity == Severity::Warn)
            .count()
    }

    pub fn has_critical_failures(&self) -> bool {
        self.results.iter().any(CheckResult::is_critical_failure)
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.has_critical_failures() {
            ExitStatus::CriticalFailure
        } else {
            ExitStatus::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub critical_failed: usize,
    pub json_report: PathBuf,
    pub csv_report: PathBuf,
    /// SHA-256 of the JSON artifact.
    pub json_sha256: String,
}
