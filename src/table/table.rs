use crate::error::{PoValidateError, Result};
use super::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// Named columnar data. Every column holds exactly `row_count` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Adds a column, replacing any existing column of the same name.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        let is_replacement = self.has_column(&name);
        let sizes_row_count = self.columns.is_empty() || (is_replacement && self.columns.len() == 1);

        if !sizes_row_count && values.len() != self.row_count {
            return Err(PoValidateError::ColumnLength {
                table: self.name.clone(),
                column: name,
                expected: self.row_count,
                actual: values.len(),
            });
        }

        self.row_count = values.len();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_with_columns() {
        let table = Table::new("suppliers")
            .with_column("supplier_id", vec![Value::Int(1), Value::Int(2)])
            .unwrap()
            .with_column("status", vec![Value::from("Active"), Value::Missing])
            .unwrap();

        assert_eq!(table.name(), "suppliers");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["supplier_id", "status"]);
        assert_eq!(table.column("status").unwrap()[1], Value::Missing);
        assert!(table.column("country").is_none());
    }

    #[test]
    fn test_column_length_mismatch_rejected() {
        let err = Table::new("parts")
            .with_column("part_id", vec![Value::Int(1), Value::Int(2)])
            .unwrap()
            .with_column("uom", vec![Value::from("Each")])
            .unwrap_err();

        match err {
            PoValidateError::ColumnLength { column, expected, actual, .. } => {
                assert_eq!(column, "uom");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected ColumnLength, got {:?}", other),
        }
    }

    #[test]
    fn test_replace_column_keeps_position() {
        let mut table = Table::new("t")
            .with_column("a", vec![Value::Int(1)])
            .unwrap()
            .with_column("b", vec![Value::Int(2)])
            .unwrap();
        table.push_column("a", vec![Value::Int(9)]).unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column("a").unwrap(), &[Value::Int(9)]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new("empty");
        assert_eq!(table.row_count(), 0);
        assert!(table.column_names().is_empty());
    }
}
