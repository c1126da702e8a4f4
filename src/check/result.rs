use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::table::Value;
use super::types::Severity;

/// Upper bound on `sample_failures` per result.
pub const MAX_SAMPLE_FAILURES: usize = 5;

/// A failing row keyed by column name.
pub type SampleRow = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_name: String,
    pub table: String,
    pub severity: Severity,
    pub passed: bool,
    pub failed_count: usize,
    pub sample_failures: Vec<SampleRow>,
}

impl CheckResult {
    pub fn passed(name: impl Into<String>, table: impl Into<String>, severity: Severity) -> Self {
        Self {
            check_name: name.into(),
            table: table.into(),
            severity,
            passed: true,
            failed_count: 0,
            sample_failures: Vec::new(),
        }
    }

    /// Result for `failed_count` offending rows; passes only when the count is zero.
    pub fn from_violations(
        name: impl Into<String>,
        table: impl Into<String>,
        severity: Severity,
        failed_count: usize,
        mut samples: Vec<SampleRow>,
    ) -> Self {
        if failed_count == 0 {
            return Self::passed(name, table, severity);
        }
        samples.truncate(MAX_SAMPLE_FAILURES);
        Self {
            check_name: name.into(),
            table: table.into(),
            severity,
            passed: false,
            failed_count,
            sample_failures: samples,
        }
    }

    /// A structural precondition (table or column) is not met.
    pub fn precondition_failed(
        name: impl Into<String>,
        table: impl Into<String>,
        severity: Severity,
        error: impl Into<String>,
    ) -> Self {
        Self::from_violations(name, table, severity, 1, vec![sample_row([("error", Value::Str(error.into()))])])
    }

    pub fn is_critical_failure(&self) -> bool {
        !self.passed && self.severity == Severity::Critical
    }

    pub fn is_warning(&self) -> bool {
        !self.passed && self.severity == Severity::Warn
    }
}

pub fn sample_row<const N: usize>(entries: [(&str, Value); N]) -> SampleRow {
    entries
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}
