use tracing::{debug, info, warn};
use crate::error::{PoValidateError, Result};
use crate::table::TableStore;
use super::primitives;
use super::result::CheckResult;
use super::types::{CheckDef, CheckRule, CheckSuite};

/// Runs a [`CheckSuite`] against a [`TableStore`], one check after another.
pub struct CheckRunner<'a> {
    store: &'a TableStore,
}

impl<'a> CheckRunner<'a> {
    pub fn new(store: &'a TableStore) -> Self {
        Self { store }
    }

    /// Every table the suite names must be present before anything runs.
    /// After that, each check runs regardless of earlier failures and the
    /// results come back in suite order.
    pub fn run(&self, suite: &CheckSuite) -> Result<Vec<CheckResult>> {
        if let Some(missing) = suite.tables().into_iter().find(|t| !self.store.contains(t)) {
            return Err(PoValidateError::TableNotFound(missing.to_string()));
        }

        info!("Running {} checks", suite.len());
        let mut results = Vec::with_capacity(suite.len());

        for check in suite.iter() {
            let result = self.run_check(check)?;
            if result.passed {
                debug!("{} [{}] passed", result.check_name, result.table);
            } else {
                warn!(
                    "{} [{}] failed ({}): {} rows",
                    result.check_name, result.table, result.severity, result.failed_count
                );
            }
            results.push(result);
        }

        Ok(results)
    }

    pub fn run_check(&self, check: &CheckDef) -> Result<CheckResult> {
        let table = self.store.get(&check.table)?;
        let severity = check.severity;

        let result = match &check.rule {
            CheckRule::RequiredColumns { columns } => {
                primitives::required_columns(table, columns, severity)
            }
            CheckRule::PrimaryKeyUnique { column } => {
                primitives::primary_key_unique(table, column, severity)
            }
            CheckRule::NotNull { column } => {
                primitives::not_null(table, column, severity)
            }
            CheckRule::AllowedValues { column, values } => {
                primitives::allowed_values(table, column, values, severity)
            }
            CheckRule::NumericMin { column, min } => {
                primitives::numeric_min(table, column, *min, severity)
            }
            CheckRule::FkExists { column, parent_table, parent_column } => {
                let parent = self.store.get(parent_table)?;
                primitives::fk_exists(table, parent, column, parent_column, severity)
            }
            CheckRule::LineAmountMath { tolerance } => {
                primitives::line_amount_math(table, severity, *tolerance)
            }
            CheckRule::PoTotalsReconcile { lines_table, tolerance } => {
                let lines = self.store.get(lines_table)?;
                primitives::po_totals_reconcile(table, lines, severity, *tolerance)
            }
        };

        Ok(result)
    }
}
