mod types;
mod result;
mod runner;
pub mod primitives;

pub use types::{
    CheckSuite, CheckDef, CheckRule, Severity,
    DEFAULT_LINE_TOLERANCE, DEFAULT_RECONCILE_TOLERANCE, POSITIVE_EPSILON,
};
pub use result::{CheckResult, SampleRow, MAX_SAMPLE_FAILURES, sample_row};
pub use runner::CheckRunner;
