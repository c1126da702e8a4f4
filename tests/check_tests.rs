use povalidate::check::primitives::{
    allowed_values, fk_exists, line_amount_math, not_null, numeric_min, po_totals_reconcile,
    primary_key_unique, required_columns,
};
use povalidate::check::{POSITIVE_EPSILON, DEFAULT_LINE_TOLERANCE, DEFAULT_RECONCILE_TOLERANCE};
use povalidate::{Severity, Table, Value};

fn column(values: &[Option<i64>]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

fn single(table: &str, name: &str, values: Vec<Value>) -> Table {
    Table::new(table).with_column(name, values).unwrap()
}

#[test]
fn test_required_columns_counts_absent_names() {
    let table = Table::new("parts")
        .with_column("part_id", column(&[Some(1)]))
        .unwrap()
        .with_column("uom", vec![Value::from("Each")])
        .unwrap();

    let all_present = required_columns(&table, &["part_id".to_string(), "uom".to_string()], Severity::Critical);
    assert!(all_present.passed);

    let required: Vec<String> = ["part_id", "part_name", "part_type", "uom", "is_active"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let result = required_columns(&table, &required, Severity::Critical);
    assert!(!result.passed);
    assert_eq!(result.failed_count, 3);
    assert_eq!(result.sample_failures.len(), 3);
}

#[test]
fn test_required_columns_samples_capped_at_five() {
    let table = Table::new("empty");
    let required: Vec<String> = (0..7).map(|i| format!("c{}", i)).collect();

    let result = required_columns(&table, &required, Severity::Critical);
    assert_eq!(result.failed_count, 7);
    assert_eq!(result.sample_failures.len(), 5);
}

#[test]
fn test_primary_key_duplicate_rows_not_values() {
    let table = single("t", "id", column(&[Some(1), Some(2), Some(2), None, None]));
    let result = primary_key_unique(&table, "id", Severity::Critical);
    assert!(!result.passed);
    assert_eq!(result.failed_count, 2);
}

#[test]
fn test_primary_key_counts_every_member_of_group() {
    let table = single("t", "id", column(&[Some(7), Some(7), Some(7), Some(8), Some(8)]));
    let result = primary_key_unique(&table, "id", Severity::Critical);
    assert_eq!(result.failed_count, 5);
}

#[test]
fn test_not_null_two_of_five() {
    let table = single("t", "name", vec![
        Value::from("a"),
        Value::Missing,
        Value::from("c"),
        Value::Missing,
        Value::from("e"),
    ]);
    let result = not_null(&table, "name", Severity::Critical);
    assert!(!result.passed);
    assert_eq!(result.failed_count, 2);
}

#[test]
fn test_allowed_values_missing_exempt() {
    let table = single("suppliers", "status", vec![
        Value::from("Active"),
        Value::from("Inactive"),
        Value::from("Unknown"),
        Value::Missing,
    ]);
    let allowed = [Value::from("Active"), Value::from("Inactive")];
    let result = allowed_values(&table, "status", &allowed, Severity::Warn);
    assert_eq!(result.failed_count, 1);
}

#[test]
fn test_numeric_min_rejects_zero_and_negative() {
    let table = single("po_lines", "qty", column(&[Some(10), Some(5), Some(3), Some(-2), Some(0), Some(1)]));
    let result = numeric_min(&table, "qty", POSITIVE_EPSILON, Severity::Critical);
    assert_eq!(result.failed_count, 2);
}

#[test]
fn test_numeric_min_coercion_failure_is_silent() {
    let table = single("po_lines", "qty", vec![Value::from("ten"), Value::from("-1"), Value::Missing]);
    let result = numeric_min(&table, "qty", POSITIVE_EPSILON, Severity::Critical);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.sample_failures[0]["qty"], Value::Float(-1.0));
}

#[test]
fn test_fk_exists_orphan_flagged_missing_exempt() {
    let parent = single("suppliers", "supplier_id", column(&[Some(1), Some(2), Some(3), Some(4), Some(5)]));
    let child = single("purchase_orders", "supplier_id", vec![
        Value::Float(1.0),
        Value::Float(999.0),
        Value::Missing,
    ]);

    let result = fk_exists(&child, &parent, "supplier_id", "supplier_id", Severity::Critical);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.sample_failures[0]["supplier_id"], Value::Float(999.0));
}

#[test]
fn test_fk_exists_child_column_missing() {
    let parent = single("suppliers", "supplier_id", column(&[Some(1)]));
    let child = single("purchase_orders", "po_id", column(&[Some(1)]));

    let result = fk_exists(&child, &parent, "supplier_id", "supplier_id", Severity::Critical);
    assert!(!result.passed);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.sample_failures[0]["error"], Value::from("fk column missing: supplier_id"));
}

#[test]
fn test_line_amount_math_flags_mismatch_only() {
    let lines = Table::new("po_lines")
        .with_column("qty", column(&[Some(5), Some(10)]))
        .unwrap()
        .with_column("unit_price", vec![Value::Float(200.0), Value::Float(50.0)])
        .unwrap()
        .with_column("line_amount", vec![Value::Float(605.0), Value::Float(500.0)])
        .unwrap();

    let result = line_amount_math(&lines, Severity::Critical, DEFAULT_LINE_TOLERANCE);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.sample_failures[0]["line_amount"], Value::Float(605.0));
    assert_eq!(result.sample_failures[0]["_expected"], Value::Float(1000.0));
}

#[test]
fn test_line_amount_math_within_tolerance() {
    let lines = Table::new("po_lines")
        .with_column("qty", vec![Value::Float(3.0)])
        .unwrap()
        .with_column("unit_price", vec![Value::Float(0.1)])
        .unwrap()
        .with_column("line_amount", vec![Value::from("0.305")])
        .unwrap();

    let result = line_amount_math(&lines, Severity::Critical, DEFAULT_LINE_TOLERANCE);
    assert!(result.passed);
}

#[test]
fn test_po_totals_reconcile_zero_default_and_mismatch() {
    let orders = Table::new("purchase_orders")
        .with_column("po_id", column(&[Some(1003), Some(1004)]))
        .unwrap()
        .with_column("total_amount", vec![Value::Float(-100.0), Value::Float(0.0)])
        .unwrap();
    let lines = Table::new("po_lines")
        .with_column("po_id", column(&[Some(1003), Some(1003)]))
        .unwrap()
        .with_column("line_amount", vec![Value::Float(100.0), Value::Float(200.0)])
        .unwrap();

    let result = po_totals_reconcile(&orders, &lines, Severity::Warn, DEFAULT_RECONCILE_TOLERANCE);
    assert!(!result.passed);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.sample_failures[0]["po_id"], Value::Int(1003));
    assert_eq!(result.sample_failures[0]["_diff"], Value::Float(400.0));
}

#[test]
fn test_po_totals_reconcile_ignores_unparseable_line_amounts() {
    let orders = Table::new("purchase_orders")
        .with_column("po_id", column(&[Some(1)]))
        .unwrap()
        .with_column("total_amount", vec![Value::from("40")])
        .unwrap();
    let lines = Table::new("po_lines")
        .with_column("po_id", column(&[Some(1), Some(1)]))
        .unwrap()
        .with_column("line_amount", vec![Value::Float(40.0), Value::from("oops")])
        .unwrap();

    let result = po_totals_reconcile(&orders, &lines, Severity::Warn, DEFAULT_RECONCILE_TOLERANCE);
    assert!(result.passed);
}
