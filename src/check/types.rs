use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use crate::error::{PoValidateError, Result};
use crate::table::{Value, PARTS, PO_LINES, PURCHASE_ORDERS, SUPPLIERS};

pub const DEFAULT_LINE_TOLERANCE: f64 = 0.01;
pub const DEFAULT_RECONCILE_TOLERANCE: f64 = 0.05;

/// Smallest accepted quantity; zero itself is rejected.
pub const POSITIVE_EPSILON: f64 = 0.000001;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Critical,
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Warn => write!(f, "WARN"),
        }
    }
}

fn default_line_tolerance() -> f64 {
    DEFAULT_LINE_TOLERANCE
}

fn default_reconcile_tolerance() -> f64 {
    DEFAULT_RECONCILE_TOLERANCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckRule {
    /// Every listed column must exist
    RequiredColumns {
        columns: Vec<String>,
    },

    /// Non-missing key values must not repeat
    PrimaryKeyUnique {
        column: String,
    },

    NotNull {
        column: String,
    },

    /// Non-missing values must belong to the set
    AllowedValues {
        column: String,
        values: Vec<Value>,
    },

    /// Coerced values must not be below `min`
    NumericMin {
        column: String,
        min: f64,
    },

    /// Non-missing foreign keys must exist in the parent key column
    FkExists {
        column: String,
        parent_table: String,
        parent_column: String,
    },

    /// `line_amount` must equal `qty * unit_price` within tolerance
    LineAmountMath {
        #[serde(default = "default_line_tolerance")]
        tolerance: f64,
    },

    /// Order totals must equal the sum of their line amounts within tolerance
    PoTotalsReconcile {
        lines_table: String,
        #[serde(default = "default_reconcile_tolerance")]
        tolerance: f64,
    },
}

/// One entry of a check suite: a rule bound to a table and a severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDef {
    pub table: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(flatten)]
    pub rule: CheckRule,
}

impl CheckDef {
    pub fn new(table: impl Into<String>, severity: Severity, rule: CheckRule) -> Self {
        Self {
            table: table.into(),
            severity,
            rule,
        }
    }

    pub fn critical(table: impl Into<String>, rule: CheckRule) -> Self {
        Self::new(table, Severity::Critical, rule)
    }

    pub fn warn(table: impl Into<String>, rule: CheckRule) -> Self {
        Self::new(table, Severity::Warn, rule)
    }

    /// Tables this check reads, its own table first.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables = vec![self.table.as_str()];
        match &self.rule {
            CheckRule::FkExists { parent_table, .. } => tables.push(parent_table),
            CheckRule::PoTotalsReconcile { lines_table, .. } => tables.push(lines_table),
            _ => {}
        }
        tables
    }
}

/// Ordered list of checks run as one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckSuite {
    #[serde(default)]
    pub checks: Vec<CheckDef>,
}

impl CheckSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check(mut self, check: CheckDef) -> Self {
        self.checks.push(check);
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckDef> {
        self.checks.iter()
    }

    pub fn tables(&self) -> BTreeSet<&str> {
        self.checks.iter().flat_map(|c| c.tables()).collect()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let suite: CheckSuite = serde_yaml::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| PoValidateError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        for check in &self.checks {
            let tolerance = match &check.rule {
                CheckRule::LineAmountMath { tolerance } => Some(*tolerance),
                CheckRule::PoTotalsReconcile { tolerance, .. } => Some(*tolerance),
                _ => None,
            };
            if let Some(t) = tolerance {
                if !t.is_finite() || t < 0.0 {
                    return Err(PoValidateError::Config(format!(
                        "tolerance must be a non-negative number, got {} on table '{}'",
                        t, check.table
                    )));
                }
            }
            if let CheckRule::NumericMin { column, min } = &check.rule {
                if min.is_nan() {
                    return Err(PoValidateError::Config(format!(
                        "numeric_min on '{}.{}' has no minimum",
                        check.table, column
                    )));
                }
            }
        }
        Ok(())
    }

    /// The fixed procurement rule set, in report order.
    pub fn procurement() -> Self {
        let mut checks = Vec::new();

        // Structure
        checks.push(CheckDef::critical(SUPPLIERS, required(&["supplier_id", "supplier_name", "status", "country"])));
        checks.push(CheckDef::critical(PARTS, required(&["part_id", "part_name", "part_type", "uom", "is_active"])));
        checks.push(CheckDef::critical(
            PURCHASE_ORDERS,
            required(&["po_id", "supplier_id", "po_date", "currency", "total_amount", "status"]),
        ));
        checks.push(CheckDef::critical(
            PO_LINES,
            required(&["po_line_id", "po_id", "part_id", "qty", "unit_price", "line_amount"]),
        ));

        // Primary keys
        for (table, column) in [
            (SUPPLIERS, "supplier_id"),
            (PARTS, "part_id"),
            (PURCHASE_ORDERS, "po_id"),
            (PO_LINES, "po_line_id"),
        ] {
            checks.push(CheckDef::critical(table, CheckRule::PrimaryKeyUnique { column: column.to_string() }));
        }

        // Identifiers, including foreign keys on child tables
        for (table, column) in [
            (SUPPLIERS, "supplier_id"),
            (PARTS, "part_id"),
            (PURCHASE_ORDERS, "po_id"),
            (PO_LINES, "po_line_id"),
            (PURCHASE_ORDERS, "supplier_id"),
            (PO_LINES, "po_id"),
            (PO_LINES, "part_id"),
        ] {
            checks.push(CheckDef::critical(table, CheckRule::NotNull { column: column.to_string() }));
        }

        // Domains
        checks.push(CheckDef::warn(SUPPLIERS, allowed("status", vec!["Active".into(), "Inactive".into()])));
        checks.push(CheckDef::warn(
            PARTS,
            allowed("is_active", vec![Value::Int(0), Value::Int(1), "0".into(), "1".into()]),
        ));
        checks.push(CheckDef::warn(
            PURCHASE_ORDERS,
            allowed("status", vec!["Open".into(), "Closed".into(), "Cancelled".into()]),
        ));
        checks.push(CheckDef::warn(
            PURCHASE_ORDERS,
            allowed(
                "currency",
                ["USD", "EUR", "GBP", "JPY", "CAD", "AUD"].into_iter().map(Value::from).collect(),
            ),
        ));

        // Numeric bounds
        checks.push(CheckDef::critical(PO_LINES, numeric_min("qty", POSITIVE_EPSILON)));
        checks.push(CheckDef::critical(PO_LINES, numeric_min("unit_price", 0.0)));
        checks.push(CheckDef::warn(PURCHASE_ORDERS, numeric_min("total_amount", 0.0)));

        // Referential integrity
        checks.push(CheckDef::critical(PURCHASE_ORDERS, fk("supplier_id", SUPPLIERS, "supplier_id")));
        checks.push(CheckDef::critical(PO_LINES, fk("po_id", PURCHASE_ORDERS, "po_id")));
        checks.push(CheckDef::critical(PO_LINES, fk("part_id", PARTS, "part_id")));

        // Arithmetic
        checks.push(CheckDef::critical(PO_LINES, CheckRule::LineAmountMath { tolerance: DEFAULT_LINE_TOLERANCE }));
        checks.push(CheckDef::warn(
            PURCHASE_ORDERS,
            CheckRule::PoTotalsReconcile {
                lines_table: PO_LINES.to_string(),
                tolerance: DEFAULT_RECONCILE_TOLERANCE,
            },
        ));

        Self { checks }
    }
}

fn required(columns: &[&str]) -> CheckRule {
    CheckRule::RequiredColumns {
        columns: columns.iter().map(|c| c.to_string()).collect(),
    }
}

fn allowed(column: &str, values: Vec<Value>) -> CheckRule {
    CheckRule::AllowedValues {
        column: column.to_string(),
        values,
    }
}

fn numeric_min(column: &str, min: f64) -> CheckRule {
    CheckRule::NumericMin {
        column: column.to_string(),
        min,
    }
}

fn fk(column: &str, parent_table: &str, parent_column: &str) -> CheckRule {
    CheckRule::FkExists {
        column: column.to_string(),
        parent_table: parent_table.to_string(),
        parent_column: parent_column.to_string(),
    }
}
