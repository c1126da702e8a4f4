pub mod error;
pub mod table;
pub mod check;
pub mod report;
pub mod fixture;

pub use error::{PoValidateError, Result};
pub use table::{Value, Coerced, ValueKey, Table, TableStore, TableLoader, PROCUREMENT_TABLES};
pub use check::{CheckSuite, CheckDef, CheckRule, CheckResult, CheckRunner, Severity, SampleRow};
pub use report::{ValidationReport, ReportSummary, ReportWriter, ExitStatus, CheckTableRow};
