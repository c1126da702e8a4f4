use tabled::Tabled;
use crate::check::{CheckResult, Severity};

#[derive(Debug, Clone, Tabled)]
pub struct CheckTableRow {
    #[tabled(rename = "Check")]
    pub check: String,
    #[tabled(rename = "Table")]
    pub table: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Failed")]
    pub failed: usize,
}

impl From<&CheckResult> for CheckTableRow {
    fn from(result: &CheckResult) -> Self {
        let status = match (result.passed, result.severity) {
            (true, _) => "✓ passed",
            (false, Severity::Critical) => "✗ failed",
            (false, Severity::Warn) => "⚠ failed",
        };

        Self {
            check: result.check_name.clone(),
            table: result.table.clone(),
            severity: result.severity.to_string(),
            status: status.to_string(),
            failed: result.failed_count,
        }
    }
}
