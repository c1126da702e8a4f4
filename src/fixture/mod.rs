//! Canonical procurement dataset with deliberate data-quality defects.
//!
//! - suppliers: one missing name, one `Unknown` status
//! - parts: `part_id` 101 duplicated, one missing name, one `invalid` active flag
//! - purchase_orders: supplier 999 does not exist, one missing supplier,
//!   currency `XXX`, status `Invalid`, a negative total
//! - po_lines: order 999 does not exist, quantities -2 and 0, 605.0 where 600.0 is expected

use std::fs;
use std::path::Path;
use tracing::info;
use crate::error::Result;
use crate::table::{Table, TableStore, Value, PARTS, PO_LINES, PURCHASE_ORDERS, SUPPLIERS};

fn ints(values: &[Option<i64>]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

fn floats(values: &[f64]) -> Vec<Value> {
    values.iter().map(|v| Value::Float(*v)).collect()
}

fn strs(values: &[Option<&str>]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

pub fn procurement_store() -> Result<TableStore> {
    let suppliers = Table::new(SUPPLIERS)
        .with_column("supplier_id", ints(&[Some(1), Some(2), Some(3), Some(4), Some(5)]))?
        .with_column(
            "supplier_name",
            strs(&[Some("ACME Corp"), Some("XYZ Ltd"), None, Some("Delta Inc"), Some("Epsilon AG")]),
        )?
        .with_column(
            "status",
            strs(&[Some("Active"), Some("Active"), Some("Inactive"), Some("Unknown"), Some("Active")]),
        )?
        .with_column(
            "country",
            strs(&[Some("USA"), Some("UK"), Some("Germany"), Some("Canada"), Some("France")]),
        )?;

    let parts = Table::new(PARTS)
        .with_column("part_id", ints(&[Some(101), Some(102), Some(103), Some(101), Some(105)]))?
        .with_column(
            "part_name",
            strs(&[Some("Widget A"), Some("Widget B"), Some("Widget C"), Some("Widget D"), None]),
        )?
        .with_column(
            "part_type",
            strs(&[Some("Electronic"), Some("Mechanical"), Some("Electrical"), Some("Electronic"), Some("Mechanical")]),
        )?
        .with_column("uom", strs(&[Some("Each"), Some("Each"), Some("Box"), Some("Each"), Some("Box")]))?
        .with_column(
            "is_active",
            vec![Value::Int(1), Value::Int(0), Value::Int(1), Value::Int(1), Value::from("invalid")],
        )?;

    let purchase_orders = Table::new(PURCHASE_ORDERS)
        .with_column("po_id", ints(&[Some(1001), Some(1002), Some(1003), Some(1004), Some(1005)]))?
        .with_column("supplier_id", ints(&[Some(1), Some(2), Some(999), None, Some(5)]))?
        .with_column(
            "po_date",
            strs(&[Some("2024-01-15"), Some("2024-01-16"), Some("2024-01-17"), Some("2024-01-18"), Some("2024-01-19")]),
        )?
        .with_column("currency", strs(&[Some("USD"), Some("EUR"), Some("XXX"), Some("USD"), Some("GBP")]))?
        .with_column("total_amount", floats(&[5000.50, 3200.75, -100.00, 0.00, 12500.00]))?
        .with_column(
            "status",
            strs(&[Some("Open"), Some("Closed"), Some("Cancelled"), Some("Invalid"), Some("Open")]),
        )?;

    let po_lines = Table::new(PO_LINES)
        .with_column("po_line_id", ints(&[Some(5001), Some(5002), Some(5003), Some(5004), Some(5005), Some(5006)]))?
        .with_column("po_id", ints(&[Some(1001), Some(1001), Some(1002), Some(1003), Some(1004), Some(999)]))?
        .with_column("part_id", ints(&[Some(101), Some(102), Some(102), Some(103), Some(105), Some(101)]))?
        .with_column("qty", ints(&[Some(10), Some(5), Some(3), Some(-2), Some(0), Some(1)]))?
        .with_column("unit_price", floats(&[50.00, 100.00, 200.00, 150.00, 50.00, 80.00]))?
        .with_column("line_amount", floats(&[500.00, 500.00, 605.00, 300.00, 0.00, 80.00]))?;

    Ok(TableStore::new()
        .with_table(suppliers)
        .with_table(parts)
        .with_table(purchase_orders)
        .with_table(po_lines))
}

/// Writes every table of `store` as `<dir>/<name>.csv`.
pub fn write_csv_dir(store: &TableStore, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    for name in store.table_names() {
        let table = store.get(name)?;
        let path = dir.join(format!("{}.csv", name));
        let mut writer = csv::Writer::from_path(&path)?;

        writer.write_record(table.column_names())?;
        for row in 0..table.row_count() {
            writer.write_record(table.columns().iter().map(|c| c.values[row].to_cell()))?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", table.row_count(), path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableLoader;

    #[test]
    fn test_procurement_store_shape() {
        let store = procurement_store().unwrap();
        assert_eq!(store.table_names(), vec!["parts", "po_lines", "purchase_orders", "suppliers"]);
        assert_eq!(store.get("suppliers").unwrap().row_count(), 5);
        assert_eq!(store.get("po_lines").unwrap().row_count(), 6);
    }

    #[test]
    fn test_csv_dir_loads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let store = procurement_store().unwrap();
        write_csv_dir(&store, dir.path()).unwrap();

        let loaded = TableLoader::procurement().load_dir(dir.path()).unwrap();
        for name in store.table_names() {
            assert_eq!(loaded.get(name).unwrap(), store.get(name).unwrap());
        }
    }
}
