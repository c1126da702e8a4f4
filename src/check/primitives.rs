//! Stateless check primitives.
//!
//! Each primitive reads one or two tables and returns a single [`CheckResult`].
//! A missing column always yields a failed result with one `error` sample and
//! takes priority over the rule itself.
//!
//! # Missing values
//!
//! - `not_null` is the only primitive that flags missing cells.
//! - Uniqueness, domain and foreign-key checks skip missing values.
//! - Numeric primitives coerce cells first; anything that is not a number is
//!   skipped the same way as a missing cell.

use std::collections::{HashMap, HashSet};
use crate::table::{Table, Value, ValueKey};
use super::result::{sample_row, CheckResult, SampleRow, MAX_SAMPLE_FAILURES};
use super::types::Severity;

pub const QTY: &str = "qty";
pub const UNIT_PRICE: &str = "unit_price";
pub const LINE_AMOUNT: &str = "line_amount";
pub const PO_ID: &str = "po_id";
pub const TOTAL_AMOUNT: &str = "total_amount";

fn finish(
    name: impl Into<String>,
    table: &Table,
    severity: Severity,
    violations: &[usize],
    sample: impl Fn(usize) -> SampleRow,
) -> CheckResult {
    let samples = violations
        .iter()
        .take(MAX_SAMPLE_FAILURES)
        .map(|&idx| sample(idx))
        .collect();
    CheckResult::from_violations(name, table.name(), severity, violations.len(), samples)
}

fn indices(values: &[Value], predicate: impl Fn(&Value) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| predicate(*v))
        .map(|(idx, _)| idx)
        .collect()
}

fn require<'t>(table: &'t Table, column: &str) -> Result<&'t [Value], String> {
    table
        .column(column)
        .ok_or_else(|| format!("missing {}.{}", table.name(), column))
}

pub fn required_columns(table: &Table, required: &[String], severity: Severity) -> CheckResult {
    let missing: Vec<&String> = required.iter().filter(|c| !table.has_column(c)).collect();
    let samples = missing
        .iter()
        .map(|c| sample_row([("missing_column", Value::from(c.as_str()))]))
        .collect();
    CheckResult::from_violations("required_columns", table.name(), severity, missing.len(), samples)
}

/// Flags every row whose key value occurs more than once. Missing keys never collide.
pub fn primary_key_unique(table: &Table, key_column: &str, severity: Severity) -> CheckResult {
    let name = "primary_key_unique";
    let Some(values) = table.column(key_column) else {
        return CheckResult::precondition_failed(
            name,
            table.name(),
            severity,
            format!("pk column missing: {}", key_column),
        );
    };

    let keys: Vec<Option<ValueKey>> = values.iter().map(Value::key).collect();
    let mut counts: HashMap<&ValueKey, usize> = HashMap::new();
    for key in keys.iter().flatten() {
        *counts.entry(key).or_default() += 1;
    }

    let violations: Vec<usize> = keys
        .iter()
        .enumerate()
        .filter(|(_, key)| key.as_ref().is_some_and(|k| counts.get(k).copied().unwrap_or(0) > 1))
        .map(|(idx, _)| idx)
        .collect();

    finish(name, table, severity, &violations, |idx| {
        sample_row([(key_column, values[idx].clone())])
    })
}

pub fn not_null(table: &Table, column: &str, severity: Severity) -> CheckResult {
    let name = format!("not_null:{}", column);
    let Some(values) = table.column(column) else {
        return CheckResult::precondition_failed(name, table.name(), severity, format!("column missing: {}", column));
    };

    let violations = indices(values, Value::is_missing);
    finish(name, table, severity, &violations, |idx| {
        sample_row([(column, values[idx].clone())])
    })
}

/// Missing values are exempt; null-ness belongs to [`not_null`].
pub fn allowed_values(table: &Table, column: &str, allowed: &[Value], severity: Severity) -> CheckResult {
    let name = format!("allowed_values:{}", column);
    let Some(values) = table.column(column) else {
        return CheckResult::precondition_failed(name, table.name(), severity, format!("column missing: {}", column));
    };

    let allowed: HashSet<ValueKey> = allowed.iter().filter_map(Value::key).collect();
    let violations = indices(values, |v| v.key().is_some_and(|k| !allowed.contains(&k)));

    finish(name, table, severity, &violations, |idx| {
        sample_row([(column, values[idx].clone())])
    })
}

/// Flags coerced values strictly below `min_value`. Values that fail
/// coercion are skipped rather than flagged.
pub fn numeric_min(table: &Table, column: &str, min_value: f64, severity: Severity) -> CheckResult {
    let name = format!("numeric_min:{}", column);
    let Some(values) = table.column(column) else {
        return CheckResult::precondition_failed(name, table.name(), severity, format!("column missing: {}", column));
    };

    let coerced: Vec<Option<f64>> = values.iter().map(|v| v.coerce().number()).collect();
    let violations: Vec<usize> = coerced
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_some_and(|n| n < min_value))
        .map(|(idx, _)| idx)
        .collect();

    finish(name, table, severity, &violations, |idx| {
        let shown = match &values[idx] {
            Value::Str(_) => Value::from(coerced[idx]),
            other => other.clone(),
        };
        sample_row([(column, shown)])
    })
}

pub fn fk_exists(
    child: &Table,
    parent: &Table,
    fk_column: &str,
    parent_key_column: &str,
    severity: Severity,
) -> CheckResult {
    let name = format!("fk_exists:{}->{}", fk_column, parent_key_column);
    let Some(values) = child.column(fk_column) else {
        return CheckResult::precondition_failed(name, child.name(), severity, format!("fk column missing: {}", fk_column));
    };
    let Some(parent_values) = parent.column(parent_key_column) else {
        return CheckResult::precondition_failed(
            name,
            child.name(),
            severity,
            format!("parent key missing: {}", parent_key_column),
        );
    };

    let parent_keys: HashSet<ValueKey> = parent_values.iter().filter_map(Value::key).collect();
    let violations = indices(values, |v| v.key().is_some_and(|k| !parent_keys.contains(&k)));

    finish(name, child, severity, &violations, |idx| {
        sample_row([(fk_column, values[idx].clone())])
    })
}

/// Compares `line_amount` against `qty * unit_price`. Rows where any of the
/// three does not coerce to a number are skipped.
pub fn line_amount_math(lines: &Table, severity: Severity, tolerance: f64) -> CheckResult {
    let name = "line_amount_math";
    let mut columns = Vec::with_capacity(3);
    for column in [QTY, UNIT_PRICE, LINE_AMOUNT] {
        match lines.column(column) {
            Some(values) => columns.push(values),
            None => {
                return CheckResult::precondition_failed(
                    name,
                    lines.name(),
                    severity,
                    format!("missing column: {}", column),
                );
            }
        }
    }
    let (qty, unit_price, line_amount) = (columns[0], columns[1], columns[2]);

    let mut violations = Vec::new();
    let mut computed = Vec::new();
    for idx in 0..lines.row_count() {
        let q = qty[idx].coerce().number();
        let p = unit_price[idx].coerce().number();
        let a = line_amount[idx].coerce().number();

        let (Some(q), Some(p), Some(a)) = (q, p, a) else {
            continue;
        };
        let expected = q * p;
        let diff = (a - expected).abs();
        if diff > tolerance {
            violations.push(idx);
            computed.push((expected, diff));
        }
    }

    let samples = violations
        .iter()
        .zip(&computed)
        .take(MAX_SAMPLE_FAILURES)
        .map(|(&idx, &(expected, diff))| {
            sample_row([
                (QTY, qty[idx].clone()),
                (UNIT_PRICE, unit_price[idx].clone()),
                (LINE_AMOUNT, line_amount[idx].clone()),
                ("_expected", Value::Float(expected)),
                ("_diff", Value::Float(diff)),
            ])
        })
        .collect();

    CheckResult::from_violations(name, lines.name(), severity, violations.len(), samples)
}

/// Compares each order's `total_amount` with the sum of its line amounts.
///
/// Lines are grouped by `po_id` with missing ids kept as their own group.
/// An order without lines reconciles against a sum of zero. Orders whose
/// total does not coerce to a number are skipped.
pub fn po_totals_reconcile(orders: &Table, lines: &Table, severity: Severity, tolerance: f64) -> CheckResult {
    let name = "po_totals_reconcile";
    let columns = (|| {
        Ok::<_, String>((
            require(orders, PO_ID)?,
            require(orders, TOTAL_AMOUNT)?,
            require(lines, PO_ID)?,
            require(lines, LINE_AMOUNT)?,
        ))
    })();
    let (order_ids, totals, line_ids, amounts) = match columns {
        Ok(columns) => columns,
        Err(error) => return CheckResult::precondition_failed(name, orders.name(), severity, error),
    };

    let mut sums: HashMap<Option<ValueKey>, f64> = HashMap::new();
    for (id, amount) in line_ids.iter().zip(amounts) {
        *sums.entry(id.key()).or_insert(0.0) += amount.coerce().number().unwrap_or(0.0);
    }

    let mut violations = Vec::new();
    let mut samples = Vec::new();
    for (id, total) in order_ids.iter().zip(totals) {
        let Some(total) = total.coerce().number() else {
            continue;
        };
        let line_sum = sums.get(&id.key()).copied().unwrap_or(0.0);
        let diff = (total - line_sum).abs();
        if diff > tolerance {
            violations.push(id);
            if samples.len() < MAX_SAMPLE_FAILURES {
                samples.push(sample_row([
                    (PO_ID, id.clone()),
                    (TOTAL_AMOUNT, Value::Float(total)),
                    (LINE_AMOUNT, Value::Float(line_sum)),
                    ("_diff", Value::Float(diff)),
                ]));
            }
        }
    }

    CheckResult::from_violations(name, orders.name(), severity, violations.len(), samples)
}
